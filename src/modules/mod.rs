pub mod books;

use std::sync::Arc;

use bookshelf_kernel::ModuleRegistry;

use books::store::BookStore;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<BookStore>) {
    registry.register(books::create_module(store));
}

/// Registry holding every module, sharing `store` with the books routes
pub fn registry(store: Arc<BookStore>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, store);
    registry
}

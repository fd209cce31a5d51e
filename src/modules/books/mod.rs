pub mod error;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};

use store::BookStore;

/// Books module: the in-memory shelf and its CRUD routes
pub struct BooksModule {
    store: Arc<BookStore>,
}

impl BooksModule {
    pub const fn new(store: Arc<BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            books = self.store.len(),
            "books module started"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        // Nothing is persisted; the shelf goes away with the process.
        tracing::info!(
            module = self.name(),
            discarded = self.store.len(),
            "books module stopped"
        );
        Ok(())
    }
}

/// Create a new instance of the books module around `store`
pub fn create_module(store: Arc<BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

//! In-memory book store.
//!
//! One lock guards the whole shelf; every operation takes it once and runs to
//! completion. Records keep their insertion order for the lifetime of the process.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use time::OffsetDateTime;

use super::error::BookError;
use super::models::{Book, BookPayload, BookQuery, BookSummary};

/// Length of generated book ids.
pub const ID_LENGTH: usize = 16;

const ID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Source of mutation timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

pub struct BookStore {
    books: RwLock<Vec<Book>>,
    clock: Arc<dyn Clock>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            books: RwLock::new(Vec::new()),
            clock,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Validate and append a new book, returning its id.
    pub fn create(&self, payload: BookPayload) -> Result<String, BookError> {
        payload.validate()?;

        let book = Book::new(generate_id(), payload, self.clock.now());
        let id = book.id.clone();

        let mut books = self.write();
        // Reserve before touching the shelf so a failed allocation leaves nothing behind.
        books.try_reserve(1).map_err(|err| {
            tracing::error!(error = %err, "failed to grow book storage");
            BookError::StorageFailure
        })?;
        books.push(book);

        tracing::debug!(book_id = %id, total = books.len(), "book created");
        Ok(id)
    }

    /// Projections of the books matching `query`, in shelf order.
    ///
    /// The iterator is a snapshot taken under the lock and can be consumed once.
    pub fn list(&self, query: &BookQuery) -> impl Iterator<Item = BookSummary> {
        let filter = query.active_filter();
        let books = self.read();

        let matching: Vec<BookSummary> = books
            .iter()
            .filter(|book| filter.as_ref().map_or(true, |f| f.matches(book)))
            .map(Book::projection)
            .collect();

        tracing::debug!(filter = ?filter, matched = matching.len(), "books listed");
        matching.into_iter()
    }

    pub fn get(&self, id: &str) -> Result<Book, BookError> {
        self.read()
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(BookError::NotFound)
    }

    /// Replace every mutable field of an existing book.
    ///
    /// Existence is checked before the payload is validated.
    pub fn update(&self, id: &str, payload: BookPayload) -> Result<(), BookError> {
        let mut books = self.write();
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(BookError::NotFound)?;

        payload.validate()?;
        book.apply(payload, self.clock.now());

        tracing::debug!(book_id = %id, "book updated");
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), BookError> {
        let mut books = self.write();
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or(BookError::NotFound)?;
        books.remove(index);

        tracing::debug!(book_id = %id, total = books.len(), "book deleted");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written record: every
    // mutation is a single Vec operation, so poisoning is safe to ignore.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Book>> {
        self.books.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Book>> {
        self.books.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use time::{macros::datetime, Duration};

    /// Advances one second on every reading.
    struct TickingClock {
        ticks: AtomicI64,
    }

    impl Clock for TickingClock {
        fn now(&self) -> OffsetDateTime {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            datetime!(2020-01-01 00:00:00 UTC) + Duration::seconds(tick)
        }
    }

    fn store() -> BookStore {
        BookStore::with_clock(Arc::new(TickingClock {
            ticks: AtomicI64::new(0),
        }))
    }

    fn payload(name: &str, page_count: u32, read_page: u32) -> BookPayload {
        BookPayload {
            name: name.to_string(),
            year: 2020,
            author: "A".to_string(),
            summary: "S".to_string(),
            publisher: format!("{} Press", name),
            page_count,
            read_page,
            reading: false,
        }
    }

    fn query(name: Option<&str>, reading: Option<&str>, finished: Option<&str>) -> BookQuery {
        BookQuery {
            name: name.map(str::to_string),
            reading: reading.map(str::to_string),
            finished: finished.map(str::to_string),
        }
    }

    fn names(store: &BookStore, query: &BookQuery) -> Vec<String> {
        store.list(query).map(|summary| summary.name).collect()
    }

    #[test]
    fn generated_ids_are_url_safe() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-'));
        assert_ne!(generate_id(), id);
    }

    #[test]
    fn create_then_get_derives_finished() {
        let store = store();
        let done = store.create(payload("Dicoding", 100, 100)).unwrap();
        let halfway = store.create(payload("Rust", 100, 50)).unwrap();

        assert!(store.get(&done).unwrap().finished);
        assert!(!store.get(&halfway).unwrap().finished);

        let book = store.get(&done).unwrap();
        assert_eq!(book.inserted_at, book.updated_at);
        assert_eq!(book.year, 2020);
    }

    #[test]
    fn create_rejects_invalid_payloads_without_storing() {
        let store = store();
        assert_eq!(
            store.create(payload("", 10, 0)),
            Err(BookError::MissingName)
        );
        assert_eq!(
            store.create(payload("Dune", 50, 100)),
            Err(BookError::InvalidPageRange)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = store();
        let first = store.create(payload("One", 10, 0)).unwrap();
        let second = store.create(payload("Two", 10, 0)).unwrap();

        let listed: Vec<BookSummary> = store.list(&BookQuery::default()).collect();
        assert_eq!(
            listed,
            vec![
                BookSummary {
                    id: first,
                    name: "One".to_string(),
                    publisher: "One Press".to_string(),
                },
                BookSummary {
                    id: second,
                    name: "Two".to_string(),
                    publisher: "Two Press".to_string(),
                },
            ]
        );
    }

    #[test]
    fn list_filters_do_not_chain() {
        let store = store();
        store.create(payload("Dicoding Basics", 10, 10)).unwrap();
        store
            .create(BookPayload {
                reading: true,
                ..payload("Rust in Action", 10, 2)
            })
            .unwrap();
        store.create(payload("dicoding advanced", 10, 3)).unwrap();

        assert_eq!(
            names(&store, &query(Some("DICODING"), None, None)),
            vec!["Dicoding Basics", "dicoding advanced"]
        );
        assert_eq!(
            names(&store, &query(None, Some("1"), None)),
            vec!["Rust in Action"]
        );
        // reading overrides the name filter instead of narrowing it
        assert_eq!(
            names(&store, &query(Some("dicoding"), Some("1"), None)),
            vec!["Rust in Action"]
        );
        // finished overrides both
        assert_eq!(
            names(&store, &query(Some("rust"), Some("1"), Some("1"))),
            vec!["Dicoding Basics"]
        );
        assert!(names(&store, &query(None, None, Some("yes"))).is_empty());
    }

    #[test]
    fn update_replaces_fields_and_keeps_identity() {
        let store = store();
        let id = store.create(payload("Draft", 100, 10)).unwrap();
        let before = store.get(&id).unwrap();

        store
            .update(
                &id,
                BookPayload {
                    reading: true,
                    ..payload("Final", 200, 200)
                },
            )
            .unwrap();

        let after = store.get(&id).unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.inserted_at, before.inserted_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.name, "Final");
        assert_eq!(after.publisher, "Final Press");
        assert_eq!(after.page_count, 200);
        assert!(after.finished);
        assert!(after.reading);
    }

    #[test]
    fn update_keeps_position() {
        let store = store();
        let first = store.create(payload("One", 10, 0)).unwrap();
        store.create(payload("Two", 10, 0)).unwrap();

        store.update(&first, payload("Uno", 10, 0)).unwrap();
        assert_eq!(
            names(&store, &BookQuery::default()),
            vec!["Uno", "Two"]
        );
    }

    #[test]
    fn update_checks_existence_before_payload() {
        let store = store();
        assert_eq!(
            store.update("missing", payload("", 1, 5)),
            Err(BookError::NotFound)
        );

        let id = store.create(payload("Dune", 10, 0)).unwrap();
        assert_eq!(
            store.update(&id, payload("", 1, 5)),
            Err(BookError::MissingName)
        );
        assert_eq!(
            store.update(&id, payload("Dune", 1, 5)),
            Err(BookError::InvalidPageRange)
        );
        assert_eq!(store.get(&id).unwrap().page_count, 10);
    }

    #[test]
    fn delete_removes_only_the_target() {
        let store = store();
        let first = store.create(payload("One", 10, 0)).unwrap();
        let second = store.create(payload("Two", 10, 0)).unwrap();
        store.create(payload("Three", 10, 0)).unwrap();

        store.delete(&second).unwrap();
        assert_eq!(store.get(&second), Err(BookError::NotFound));
        assert!(store.get(&first).is_ok());
        assert_eq!(names(&store, &BookQuery::default()), vec!["One", "Three"]);

        assert_eq!(store.delete(&second), Err(BookError::NotFound));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        assert_eq!(store().get("nope"), Err(BookError::NotFound));
    }
}

use bookshelf_http::error::AppError;
use thiserror::Error;

/// Failures of the book store.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    #[error("book name is required")]
    MissingName,

    #[error("readPage must not be greater than pageCount")]
    InvalidPageRange,

    #[error("book not found")]
    NotFound,

    #[error("book storage failed")]
    StorageFailure,
}

/// Which endpoint a [`BookError`] surfaced from; the client-facing wording depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAction {
    Create,
    Read,
    Update,
    Delete,
}

impl BookError {
    pub fn into_app_error(self, action: BookAction) -> AppError {
        use BookAction::*;
        use BookError::*;

        match (action, self) {
            (Create, MissingName) => {
                AppError::bad_request("Gagal menambahkan buku. Mohon isi nama buku")
            }
            (Create, InvalidPageRange) => AppError::bad_request(
                "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount",
            ),
            (Create, _) => AppError::server_error("Buku gagal ditambahkan"),
            (Update, NotFound) => AppError::not_found("Gagal memperbarui buku. Id tidak ditemukan"),
            (Update, MissingName) => {
                AppError::bad_request("Gagal memperbarui buku. Mohon isi nama buku")
            }
            (Update, InvalidPageRange) => AppError::bad_request(
                "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount",
            ),
            (Delete, NotFound) => AppError::not_found("Buku gagal dihapus. Id tidak ditemukan"),
            (Read, NotFound) => AppError::not_found("Buku tidak ditemukan"),
            (_, other) => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use bookshelf_http::{error::AppError, response::ApiResponse};

use super::error::BookAction;
use super::models::{Book, BookPayload, BookQuery, BookSummary};
use super::store::BookStore;
use crate::utils;

const BOOK_ADDED: &str = "Buku berhasil ditambahkan";
const BOOK_UPDATED: &str = "Buku berhasil diperbarui";
const BOOK_DELETED: &str = "Buku berhasil dihapus";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedBook {
    book_id: String,
}

#[derive(Debug, Serialize)]
struct BookList {
    books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
struct BookDetail {
    book: Book,
}

/// HTTP routes of the Books module, bound to `store`.
pub fn router(store: Arc<BookStore>) -> Router {
    let prefix = utils::log_prefix("books");
    tracing::info!(target: "bookshelf.routes", %prefix, "registering books routes");

    Router::new()
        .route("/books", get(list_books).post(add_book))
        .route(
            "/books/{book_id}",
            get(get_book).put(edit_book).delete(delete_book),
        )
        .with_state(store)
}

fn json_body(payload: Result<Json<BookPayload>, JsonRejection>) -> Result<BookPayload, AppError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

async fn add_book(
    State(store): State<Arc<BookStore>>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<CreatedBook>, AppError> {
    let payload = json_body(payload)?;
    let book_id = store
        .create(payload)
        .map_err(|e| e.into_app_error(BookAction::Create))?;

    Ok(ApiResponse::created(BOOK_ADDED, CreatedBook { book_id }))
}

async fn list_books(
    State(store): State<Arc<BookStore>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResponse<BookList> {
    let query = BookQuery::from_pairs(pairs);
    ApiResponse::data(BookList {
        books: store.list(&query).collect(),
    })
}

async fn get_book(
    State(store): State<Arc<BookStore>>,
    Path(book_id): Path<String>,
) -> Result<ApiResponse<BookDetail>, AppError> {
    let book = store
        .get(&book_id)
        .map_err(|e| e.into_app_error(BookAction::Read))?;

    Ok(ApiResponse::data(BookDetail { book }))
}

async fn edit_book(
    State(store): State<Arc<BookStore>>,
    Path(book_id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<()>, AppError> {
    // An unknown id is reported ahead of anything wrong with the body.
    if payload.is_err() {
        store
            .get(&book_id)
            .map_err(|e| e.into_app_error(BookAction::Update))?;
    }
    let payload = json_body(payload)?;
    store
        .update(&book_id, payload)
        .map_err(|e| e.into_app_error(BookAction::Update))?;

    Ok(ApiResponse::message(BOOK_UPDATED))
}

async fn delete_book(
    State(store): State<Arc<BookStore>>,
    Path(book_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    store
        .delete(&book_id)
        .map_err(|e| e.into_app_error(BookAction::Delete))?;

    Ok(ApiResponse::message(BOOK_DELETED))
}

//! Book handlers.
//!
//! | Verb | Path | Operation |
//! |---|---|---|
//! | GET | /book | list books (`authorid`, `limit`, `offset`) |
//! | GET | /book/{id} | get one book joined with its author |
//! | POST | /book | create (`title`, `authorid`) |
//! | PUT | /book/{id} | replace (`title`, `authorid`) |
//! | DELETE | /book/{id} | delete |

use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::extract::{
    parse_id, require_author_id, require_text, BookListParams, BookPayload, JsonBody,
};
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use bookshelf_core::{
    Book, BookListQuery, BookService, BookWithAuthor, ListQuery, SqliteBookRepository,
};
use log::info;
use rusqlite::Connection;

pub(super) fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/book", get(list_books).post(create_book))
        .route(
            "/book/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
}

fn book_service(conn: &Connection) -> ApiResult<BookService<SqliteBookRepository<'_>>> {
    Ok(BookService::new(SqliteBookRepository::try_new(conn)?))
}

async fn list_books(
    State(state): State<AppState>,
    params: Result<Query<BookListParams>, QueryRejection>,
) -> ApiResult<Envelope<Vec<Book>>> {
    let Query(params) = params.map_err(|err| ApiError::MalformedQuery(err.body_text()))?;
    let query = BookListQuery {
        author_id: params.authorid,
        page: ListQuery {
            limit: params.limit,
            offset: params.offset.unwrap_or(0),
        },
    };

    let books = state
        .store
        .run(move |conn| Ok(book_service(conn)?.list_books(&query)?))
        .await?;
    Ok(Envelope::success("books", books))
}

async fn get_book(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Envelope<BookWithAuthor>> {
    let id = parse_id("book", &raw_id)?;
    let book = state
        .store
        .run(move |conn| Ok(book_service(conn)?.get_book_with_author(id)?))
        .await?;
    Ok(Envelope::success("book", book))
}

async fn create_book(
    State(state): State<AppState>,
    JsonBody(mut payload): JsonBody<BookPayload>,
) -> ApiResult<Envelope<Book>> {
    let title = require_text("title", payload.title.take())?;
    let author_id = require_author_id(payload.take_author_id())?;
    let book = state
        .store
        .run(move |conn| Ok(book_service(conn)?.create_book(&title, author_id)?))
        .await?;

    info!(
        "event=book_create module=api status=ok book_id={} author_id={}",
        book.id, book.author_id
    );
    Ok(Envelope::success("book", book).with_message("Book created."))
}

async fn update_book(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    JsonBody(mut payload): JsonBody<BookPayload>,
) -> ApiResult<Envelope<Book>> {
    let id = parse_id("book", &raw_id)?;
    let title = require_text("title", payload.title.take())?;
    let author_id = require_author_id(payload.take_author_id())?;
    let book = state
        .store
        .run(move |conn| Ok(book_service(conn)?.update_book(id, &title, author_id)?))
        .await?;

    info!("event=book_update module=api status=ok book_id={id} author_id={author_id}");
    Ok(Envelope::success("book", book).with_message("Book updated."))
}

async fn delete_book(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Envelope<Book>> {
    let id = parse_id("book", &raw_id)?;
    let book = state
        .store
        .run(move |conn| Ok(book_service(conn)?.delete_book(id)?))
        .await?;

    info!("event=book_delete module=api status=ok book_id={id}");
    Ok(Envelope::success("book", book).with_message("Book deleted."))
}

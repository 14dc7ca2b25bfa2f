//! Author handlers.
//!
//! | Verb | Path | Operation |
//! |---|---|---|
//! | GET | /author | list authors |
//! | GET | /author/{id} | get one author with its books |
//! | POST | /author | create (`name`) |
//! | PUT | /author/{id} | rename (`name`) |
//! | DELETE | /author/{id} | delete (rejected while books exist) |
//! | GET | /author/{id}/books | list one author's books |

use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::extract::{parse_id, require_text, AuthorPayload, JsonBody, ListParams};
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use bookshelf_core::{
    Author, AuthorService, AuthorWithBooks, Book, ListQuery, SqliteAuthorRepository,
};
use log::info;
use rusqlite::Connection;

pub(super) fn author_routes() -> Router<AppState> {
    Router::new()
        .route("/author", get(list_authors).post(create_author))
        .route(
            "/author/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        .route("/author/{id}/books", get(list_author_books))
}

fn author_service(conn: &Connection) -> ApiResult<AuthorService<SqliteAuthorRepository<'_>>> {
    Ok(AuthorService::new(SqliteAuthorRepository::try_new(conn)?))
}

async fn list_authors(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Envelope<Vec<Author>>> {
    let Query(params) = params.map_err(|err| ApiError::MalformedQuery(err.body_text()))?;
    let query = ListQuery {
        limit: params.limit,
        offset: params.offset.unwrap_or(0),
    };

    let authors = state
        .store
        .run(move |conn| Ok(author_service(conn)?.list_authors(&query)?))
        .await?;
    Ok(Envelope::success("authors", authors))
}

async fn get_author(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Envelope<AuthorWithBooks>> {
    let id = parse_id("author", &raw_id)?;
    let author = state
        .store
        .run(move |conn| Ok(author_service(conn)?.get_author_with_books(id)?))
        .await?;
    Ok(Envelope::success("author", author))
}

async fn list_author_books(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Envelope<Vec<Book>>> {
    let id = parse_id("author", &raw_id)?;
    let books = state
        .store
        .run(move |conn| Ok(author_service(conn)?.list_author_books(id)?))
        .await?;
    Ok(Envelope::success("books", books))
}

async fn create_author(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<AuthorPayload>,
) -> ApiResult<Envelope<Author>> {
    let name = require_text("name", payload.name)?;
    let author = state
        .store
        .run(move |conn| Ok(author_service(conn)?.create_author(&name)?))
        .await?;

    info!(
        "event=author_create module=api status=ok author_id={}",
        author.id
    );
    Ok(Envelope::success("author", author).with_message("Author created."))
}

async fn update_author(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    JsonBody(payload): JsonBody<AuthorPayload>,
) -> ApiResult<Envelope<Author>> {
    let id = parse_id("author", &raw_id)?;
    let name = require_text("name", payload.name)?;
    let author = state
        .store
        .run(move |conn| Ok(author_service(conn)?.update_author(id, &name)?))
        .await?;

    info!("event=author_update module=api status=ok author_id={id}");
    Ok(Envelope::success("author", author).with_message("Author updated."))
}

async fn delete_author(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Envelope<Author>> {
    let id = parse_id("author", &raw_id)?;
    let author = state
        .store
        .run(move |conn| Ok(author_service(conn)?.delete_author(id)?))
        .await?;

    info!("event=author_delete module=api status=ok author_id={id}");
    Ok(Envelope::success("author", author).with_message("Author deleted."))
}

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use super::{Ack, RecordId};
use crate::auth::Identity;
use crate::database::{
    document::strip_id, models::book, Collection, Document, InsertOneResult, StoredDocument, Update,
    UpdateResult,
};
use crate::error::ApiError;
use crate::filter::FindQuery;
use crate::middleware::ensure_owner;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// POST /books
pub async fn create_book(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = state.store.insert_one(Collection::Books, strip_id(body)).await?;
    tracing::debug!("Book inserted: {}", result.inserted_id);
    Ok(Json(result))
}

/// GET /books
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<StoredDocument>>, ApiError> {
    Ok(Json(state.store.find(Collection::Books, FindQuery::all()).await?))
}

/// GET /books/:id - the book, or `null` when absent
pub async fn get_book(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Json<Option<StoredDocument>>, ApiError> {
    Ok(Json(state.store.find_by_id(Collection::Books, id).await?))
}

/// Load a book and check the caller owns it.
async fn owned_book(state: &AppState, id: RecordId, identity: &Identity) -> Result<StoredDocument, ApiError> {
    let book = state
        .store
        .find_by_id(Collection::Books, id.0)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;
    ensure_owner(book.get_str(book::OWNER), identity)?;
    Ok(book)
}

/// PUT /books/:id - owner-only replace of the supplied fields
pub async fn replace_book(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    id: RecordId,
    Json(body): Json<Document>,
) -> Result<Json<UpdateResult>, ApiError> {
    owned_book(&state, id, &identity).await?;

    let result = state
        .store
        .update_by_id(Collection::Books, id.0, Update::Set(strip_id(body)))
        .await?;
    Ok(Json(result))
}

/// PATCH /books/:id - reading status only, open to any caller
pub async fn patch_book(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Json(body): Json<Document>,
) -> Result<Json<UpdateResult>, ApiError> {
    let status = body
        .get(book::STATUS)
        .cloned()
        .ok_or_else(|| ApiError::bad_request(format!("{} is required", book::STATUS)))?;

    let mut fields = Document::new();
    fields.insert(book::STATUS.to_string(), status);

    let result = state
        .store
        .update_by_id(Collection::Books, id, Update::Set(fields))
        .await?;
    Ok(Json(result))
}

/// DELETE /books/:id - owner-only
pub async fn delete_book(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    id: RecordId,
) -> Result<Json<Ack>, ApiError> {
    owned_book(&state, id, &identity).await?;

    let result = state.store.delete_by_id(Collection::Books, id.0).await?;
    if result.deleted_count == 1 {
        tracing::info!("Book {} deleted by {}", id.0, identity.email);
        Ok(Json(Ack::ok("Book deleted successfully")))
    } else {
        Err(ApiError::internal_server_error("Failed to delete book"))
    }
}

/// GET /my-books?email= - the caller's own books; email already checked by middleware
pub async fn my_books(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<StoredDocument>>, ApiError> {
    Ok(Json(state.store.find(Collection::Books, book::owned_by(&identity.email)).await?))
}

/// GET /top-books
pub async fn top_books(State(state): State<AppState>) -> Result<Json<Vec<StoredDocument>>, ApiError> {
    Ok(Json(state.store.find(Collection::Books, book::top_voted()).await?))
}

/// PUT /books/:id/upvote - atomic +1
pub async fn upvote_book(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Json<UpdateResult>, ApiError> {
    let update = Update::Inc {
        field: book::UPVOTE.to_string(),
        by: 1,
    };
    Ok(Json(state.store.update_by_id(Collection::Books, id, update).await?))
}

/// GET /search?q=
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<StoredDocument>>, ApiError> {
    Ok(Json(state.store.find(Collection::Books, book::search(&query.q)).await?))
}

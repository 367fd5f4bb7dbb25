use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::database::{
    document::strip_id, models::review, Collection, DeleteResult, Document, InsertOneResult,
    StoredDocument, Update, UpdateResult,
};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    pub book_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewCheckQuery {
    pub book_id: String,
    pub user_email: String,
}

#[derive(Debug, Serialize)]
pub struct Exists {
    pub exist: bool,
}

/// POST /reviews
pub async fn create_review(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.store.insert_one(Collection::Reviews, strip_id(body)).await?))
}

/// GET /reviews?book_id=
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Vec<StoredDocument>>, ApiError> {
    Ok(Json(state.store.find(Collection::Reviews, review::for_book(&query.book_id)).await?))
}

/// PUT /reviews/:id - no ownership check
pub async fn update_review(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Json(body): Json<Document>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state
        .store
        .update_by_id(Collection::Reviews, id, Update::Set(strip_id(body)))
        .await?;
    Ok(Json(result))
}

/// DELETE /reviews/:id - no ownership check
pub async fn delete_review(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.store.delete_by_id(Collection::Reviews, id).await?))
}

/// GET /reviews/check?book_id=&user_email=
pub async fn check_review(
    State(state): State<AppState>,
    Query(query): Query<ReviewCheckQuery>,
) -> Result<Json<Exists>, ApiError> {
    let exist = state
        .store
        .exists(
            Collection::Reviews,
            review::by_user_for_book(&query.book_id, &query.user_email),
        )
        .await?;
    Ok(Json(Exists { exist }))
}

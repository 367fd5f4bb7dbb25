use axum::{extract::State, Json};
use serde_json::Value;

use super::Ack;
use crate::database::{document::strip_id, models::user, Collection, Document};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /users - insert the user unless one with the same email exists
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<Json<Ack>, ApiError> {
    let email = match body.get(user::EMAIL) {
        Some(Value::String(email)) if !email.is_empty() => email.clone(),
        _ => return Err(ApiError::bad_request("email is required")),
    };

    let result = state
        .store
        .insert_if_absent(Collection::Users, user::EMAIL, &Value::String(email.clone()), strip_id(body))
        .await?;

    if result.upserted_count > 0 {
        tracing::info!("User inserted: {}", email);
        Ok(Json(Ack::ok("User inserted!")))
    } else {
        Ok(Json(Ack::rejected("User already exists!")))
    }
}

use crate::domain::payment::CreatePaymentRequest;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    match state.dispatcher.dispatch(req).await {
        Ok(resp) => (StatusCode::CREATED, Json(resp)).into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

pub async fn purge_payments(State(state): State<AppState>) -> impl IntoResponse {
    match state.payments.purge_all().await {
        Ok(purged) => (
            StatusCode::OK,
            Json(json!({ "message": format!("{purged} payments purged"), "success": true })),
        ),
        Err(err) => {
            tracing::error!("purging payments: {err:#}");
            (
                StatusCode::OK,
                Json(json!({ "message": "purge failed", "success": false })),
            )
        }
    }
}

pub async fn not_found() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}

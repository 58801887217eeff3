use crate::domain::payment::ErrorBody;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn payments_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let (from, to) = match validate_range(&query) {
        Ok(range) => range,
        Err(body) => return (StatusCode::BAD_REQUEST, Json(body)).into_response(),
    };

    match state.summary.summarize(from, to).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => {
            tracing::error!("building payments summary: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Erro interno do servidor")),
            )
                .into_response()
        }
    }
}

fn validate_range(query: &SummaryQuery) -> Result<(&str, &str), ErrorBody> {
    let from = query
        .from
        .as_deref()
        .ok_or_else(|| ErrorBody::missing("from"))?;
    let to = query.to.as_deref().ok_or_else(|| ErrorBody::missing("to"))?;
    Ok((from, to))
}

use axum::{
    Router,
    routing::post,
    Json,
    extract::{rejection::JsonRejection, State},
};
use crate::models::AppState;
use crate::middleware::auth::Claims;
use crate::payment::{PaymentRequest, PaymentResult};
use crate::types::AppResult;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/payments", post(create_payment))
        .with_state(state)
}

pub async fn create_payment(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> AppResult<Json<PaymentResult>> {
    let Json(request) = payload?;
    info!(subject = ?claims.subject(), amount = request.amount, "Received payment request");

    let result = state
        .payments
        .process_payment(request.amount, &request.card_details)
        .await;

    Ok(Json(result))
}

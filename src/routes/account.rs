use axum::{Router, routing::get, Json};
use crate::middleware::auth::Claims;

pub fn router() -> Router {
    Router::new()
        .route("/api/me", get(current_claims))
}

/// Echo back the claims the auth middleware attached to this request.
async fn current_claims(claims: Claims) -> Json<Claims> {
    Json(claims)
}

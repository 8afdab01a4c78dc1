use axum::{routing::get, Router};

pub mod dashboard;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod safety;
pub mod shipping;
pub mod system;

/// Router for every `/api` endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/dashboard/summary", get(dashboard::summary))
        .route("/priority/top", get(dashboard::top_priority))
        .nest("/inventory", inventory::router())
        .nest("/audit", inventory::audit_router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
        .route("/shipping/dashboard", get(shipping::dashboard))
        .nest("/safety", safety::router())
}

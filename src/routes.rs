use axum::{
    Router,
    routing::{get, patch, post, put},
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    category_handlers::{
        create_category_handler, delete_category_handler, get_category_handler,
        list_categories_handler, update_category_handler,
    },
    endpoint_not_found,
    health_handlers::health_handler,
    transaction_handlers::{
        create_transaction_handler, delete_transaction_handler, expense_summary_handler,
        list_transactions_handler, update_status_handler, update_transaction_handler,
    },
};
use crate::openapi::ApiDoc;
use crate::rpc::rpc_handler;
use crate::state::AppState;

/// Routes of the versioned REST API, relative to `/api/v1`.
///
/// A known path called with an unsupported method answers like an unknown path.
fn rest_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler).fallback(endpoint_not_found))
        .route(
            "/categories",
            get(list_categories_handler)
                .post(create_category_handler)
                .fallback(endpoint_not_found),
        )
        .route(
            "/categories/:id",
            get(get_category_handler)
                .put(update_category_handler)
                .delete(delete_category_handler)
                .fallback(endpoint_not_found),
        )
        .route(
            "/transactions",
            get(list_transactions_handler)
                .post(create_transaction_handler)
                .fallback(endpoint_not_found),
        )
        .route(
            "/transactions/summary",
            get(expense_summary_handler).fallback(endpoint_not_found),
        )
        .route(
            "/transactions/:id",
            put(update_transaction_handler)
                .delete(delete_transaction_handler)
                .fallback(endpoint_not_found),
        )
        .route(
            "/transactions/:id/status",
            patch(update_status_handler).fallback(endpoint_not_found),
        )
}

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", rest_routes())
        .route(
            "/rpc/:procedure",
            post(rpc_handler).fallback(endpoint_not_found),
        )
        .fallback(endpoint_not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
}

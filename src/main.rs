use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use tower_http::trace::TraceLayer;

use expense_tracker::{AppState, build_router, config::Config, db, setup_logging, shutdown_signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();
    setup_logging();

    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url, config.max_connections).await?;
    db::run_migrations(&pool).await?;

    let app = add_tracing_layer(build_router(AppState::from_pool(pool)));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("  - REST API: http://{}/api/v1", addr);
    tracing::info!("  - RPC: POST http://{}/rpc/{{procedure}}", addr);
    tracing::info!("  - API Docs: http://{}/api/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let method = req.method();
        let uri = req.uri();

        let matched_path = req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched_path| matched_path.as_str());

        tracing::debug_span!("request", %method, %uri, matched_path)
    });

    router.layer(tracing_layer)
}

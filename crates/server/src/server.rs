use axum::{
    Router,
    routing::{delete, get},
};

use std::sync::Arc;

use crate::{collections, expenses, incomes, options, stats};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/stats", get(stats::get_stats))
        .route("/stats/details", get(stats::get_details))
        .route("/dashboard", get(stats::get_dashboard))
        .route("/collections", get(collections::list))
        .route("/collections/{label}", get(collections::detail))
        .route("/incomes", get(incomes::list).post(incomes::create))
        .route("/incomes/{id}", delete(incomes::delete))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/{id}", delete(expenses::delete))
        .route("/options", get(options::get))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

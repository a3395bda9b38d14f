pub mod dispatcher;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

use axum::routing::{delete, get, post, put};
use axum::Router;
use dispatcher::Dispatcher;
use std::time::Duration;
use store::Store;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(store: Store) -> Router {
    let app_state = state::AppState::new(store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Tasks
        .route("/api/tasks", get(routes::tasks::list_tasks))
        .route("/api/tasks", post(routes::tasks::create_task))
        .route("/api/tasks/{id}", delete(routes::tasks::delete_task))
        // Instances
        .route("/api/instances", get(routes::instances::list_instances))
        .route("/api/instances", post(routes::instances::create_instance))
        .route("/api/instances/{id}", get(routes::instances::get_instance))
        .route(
            "/api/instances/{id}/status",
            put(routes::instances::set_status),
        )
        .route(
            "/api/instances/{id}/status",
            get(routes::instances::get_status),
        )
        .route(
            "/api/instances/{id}/cancel",
            post(routes::instances::cancel_instance),
        )
        .layer(cors)
        .with_state(app_state)
}

/// Start the task service with a simulated executor fleet.
pub async fn serve(port: u16, fleet_size: usize, tick: Duration) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(listener, fleet_size, tick).await
}

/// Start the task service on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so
/// the caller can read the actual port before starting (useful when
/// `port = 0` and the OS picks a free port).
pub async fn serve_on(
    listener: tokio::net::TcpListener,
    fleet_size: usize,
    tick: Duration,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let store = Store::new();

    let dispatcher = Dispatcher::new(store.clone(), fleet_size);
    tokio::spawn(dispatcher.run(tick));

    let app = build_router(store);
    tracing::info!("amrflow task service listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}

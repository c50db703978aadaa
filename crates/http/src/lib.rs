//! HTTP server facade for libris with Axum, error pages, and OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Router};

use libris_kernel::{InitCtx, ModuleRegistry};

pub mod error;
pub mod openapi;
pub mod router;

pub use error::{AppError, AppResult};
use router::RouterBuilder;

/// Assemble the application router: module routes, health check, docs and middleware.
///
/// The builder is returned unbuilt so the binary can add top-level routes before
/// the middleware stack is applied.
pub fn router_for(registry: &ModuleRegistry, ctx: &InitCtx<'_>) -> RouterBuilder {
    let settings = ctx.settings;
    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .with_static_dir(settings.server.static_dir.clone());

    let db = ctx.db.clone();
    router_builder = router_builder.route(
        "/healthz",
        get(move || {
            let db = db.clone();
            async move { health_check(&db).await }
        }),
    );

    for module in registry.modules() {
        let mount_path = module.mount_path();
        tracing::info!(
            module = module.name(),
            "mounting module routes under {}",
            mount_path
        );
        router_builder = router_builder.mount_module(&mount_path, module.routes(ctx));
    }

    router_builder.with_openapi(registry)
}

/// Serve `app` on the configured address until Ctrl-C is received.
pub async fn serve(app: Router, settings: &libris_kernel::settings::Settings) -> anyhow::Result<()> {
    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Health check endpoint
async fn health_check(db: &libris_db::Db) -> AppResult<&'static str> {
    libris_db::ping(db).await?;
    Ok("ok")
}

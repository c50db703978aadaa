//! Wiring shared by the `libris-app` binary and the `libris` CLI.

use anyhow::Context;
use axum::Router;
use libris_kernel::{settings::Settings, Db, InitCtx, ModuleRegistry};

use crate::modules;

/// Registry holding every application module.
pub fn registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry)?;
    Ok(registry)
}

/// Complete router: module pages, `/healthz`, docs, static files and `/` → `/catalog`.
pub fn app(registry: &ModuleRegistry, ctx: &InitCtx<'_>) -> Router {
    libris_http::router_for(registry, ctx)
        .redirect("/", "/catalog")
        .build()
}

pub async fn connect(settings: &Settings) -> anyhow::Result<Db> {
    libris_db::connect(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", settings.database.url))
}

/// Apply pending migrations of every module.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let registry = registry()?;
    let db = connect(settings).await?;
    let applied = registry.migrate(&db).await?;
    db.close().await;
    Ok(applied)
}

/// Migrate and insert the sample catalog.
pub async fn seed(settings: &Settings) -> anyhow::Result<crate::seed::SeedReport> {
    let registry = registry()?;
    let db = connect(settings).await?;
    registry.migrate(&db).await?;
    let report = crate::seed::seed(&db).await?;
    db.close().await;
    Ok(report)
}

/// Run the web application until shutdown, then stop modules in reverse order.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let registry = registry()?;
    let db = connect(&settings).await?;

    let applied = registry.migrate(&db).await?;
    tracing::info!(applied, "migrations up to date");

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = libris_http::serve(app(&registry, &ctx), &settings).await;

    registry.stop_modules().await?;
    db.close().await;
    served
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_modules_in_mount_order() {
        let registry = registry().unwrap();
        let names: Vec<_> = registry.modules().map(|module| module.name()).collect();
        assert_eq!(names, vec!["catalog", "users", "wiki"]);
    }

    #[tokio::test]
    async fn migrate_and_seed_against_file_database() {
        let dir = std::env::temp_dir().join(format!("libris-bootstrap-{}", libris_db::new_id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut settings = Settings::default();
        settings.database.url = format!("sqlite://{}", dir.join("libris.db").display());

        assert!(migrate(&settings).await.unwrap() > 0);
        assert_eq!(migrate(&settings).await.unwrap(), 0);

        let first = seed(&settings).await.unwrap();
        assert!(first.authors > 0);
        let second = seed(&settings).await.unwrap();
        assert_eq!(second, crate::seed::SeedReport::default());

        std::fs::remove_dir_all(&dir).ok();
    }
}

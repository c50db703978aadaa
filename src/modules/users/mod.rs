//! Registration and login pages.

pub mod forms;
pub mod models;
pub mod password;
mod routes;


use async_trait::async_trait;
use axum::Router;
use libris_http::openapi::{page_paths, PageRoute};
use libris_kernel::{Db, InitCtx, Migration, Module};

#[derive(Clone)]
pub struct UsersState {
    db: Db,
}

const PAGES: &[PageRoute] = &[
    PageRoute::get("/", "Users placeholder"),
    PageRoute::get("/cool", "Users greeting"),
    PageRoute::get("/register", "Sign up form"),
    PageRoute::post("/register", "Register a user"),
    PageRoute::get("/login", "Login form"),
    PageRoute::post("/login", "Check login credentials"),
];

/// Users module mounted at `/users`
pub struct UsersModule;

impl UsersModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        routes::router(UsersState {
            db: ctx.db.clone(),
        })
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(page_paths("Users", PAGES))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE users (
                    id            TEXT PRIMARY KEY,
                    name          TEXT NOT NULL CHECK (length(name) BETWEEN 5 AND 30),
                    email         TEXT NOT NULL CHECK (email <> ''),
                    password_hash TEXT NOT NULL,
                    created_at    TEXT NOT NULL
                );
                CREATE UNIQUE INDEX users_email_unique ON users (email COLLATE NOCASE);
                "#,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module stopped");
        Ok(())
    }
}

/// Create a new instance of the users module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(UsersModule::new())
}

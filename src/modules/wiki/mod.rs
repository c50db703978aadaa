//! Static wiki pages.

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_http::openapi::{page_paths, PageRoute};
use libris_kernel::{InitCtx, Module};

const PAGES: &[PageRoute] = &[
    PageRoute::get("/", "Wiki home"),
    PageRoute::get("/about", "About the wiki"),
];

pub struct WikiModule;

impl WikiModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for WikiModule {
    fn name(&self) -> &'static str {
        "wiki"
    }

    fn routes(&self, _ctx: &InitCtx<'_>) -> Router {
        Router::new()
            .route("/", get(home))
            .route("/about", get(about))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(page_paths("Wiki", PAGES))
    }
}

async fn home() -> &'static str {
    "Welcome to this wiki!"
}

async fn about() -> &'static str {
    "About this wiki."
}

/// Create a new instance of the wiki module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(WikiModule::new())
}

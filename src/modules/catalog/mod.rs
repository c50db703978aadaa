//! Library catalog: authors, books, genres and book copies.

pub mod forms;
pub mod models;
pub mod repo;
mod routes;
pub mod templates;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use axum::Router;
use libris_http::openapi::{page_paths, PageRoute};
use libris_kernel::{Db, InitCtx, Migration, Module};

use repo::CatalogRepo;

/// Handler state for catalog pages.
#[derive(Clone)]
pub struct CatalogState {
    db: Db,
}

impl CatalogState {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn repo(&self) -> CatalogRepo<'_> {
        CatalogRepo::new(&self.db)
    }
}

const PAGES: &[PageRoute] = &[
    PageRoute::get("/", "Catalog home with record counts"),
    PageRoute::get("/authors", "List authors"),
    PageRoute::get("/author/create", "Author create form"),
    PageRoute::post("/author/create", "Create author"),
    PageRoute::get("/author/{id}", "Author detail with books"),
    PageRoute::get("/author/{id}/delete", "Confirm author deletion"),
    PageRoute::post("/author/{id}/delete", "Delete author"),
    PageRoute::get("/author/{id}/update", "Author update form"),
    PageRoute::post("/author/{id}/update", "Update author"),
    PageRoute::get("/books", "List books"),
    PageRoute::get("/book/create", "Book create form"),
    PageRoute::post("/book/create", "Create book"),
    PageRoute::get("/book/{id}", "Book detail with copies"),
    PageRoute::get("/book/{id}/delete", "Confirm book deletion"),
    PageRoute::post("/book/{id}/delete", "Delete book"),
    PageRoute::get("/book/{id}/update", "Book update form"),
    PageRoute::post("/book/{id}/update", "Update book"),
    PageRoute::get("/genres", "List genres"),
    PageRoute::get("/genre/create", "Genre create form"),
    PageRoute::post("/genre/create", "Create genre"),
    PageRoute::get("/genre/{id}", "Genre detail with books"),
    PageRoute::get("/genre/{id}/delete", "Confirm genre deletion"),
    PageRoute::post("/genre/{id}/delete", "Delete genre"),
    PageRoute::get("/genre/{id}/update", "Genre update form"),
    PageRoute::post("/genre/{id}/update", "Update genre"),
    PageRoute::get("/bookinstances", "List book copies"),
    PageRoute::get("/bookinstance/create", "Book copy create form"),
    PageRoute::post("/bookinstance/create", "Create book copy"),
    PageRoute::get("/bookinstance/{id}", "Book copy detail"),
    PageRoute::get("/bookinstance/{id}/delete", "Confirm book copy deletion"),
    PageRoute::post("/bookinstance/{id}/delete", "Delete book copy"),
    PageRoute::get("/bookinstance/{id}/update", "Book copy update form"),
    PageRoute::post("/bookinstance/{id}/update", "Update book copy"),
];

/// Catalog module mounted at `/catalog`
pub struct CatalogModule;

impl CatalogModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let counts = CatalogRepo::new(ctx.db).counts().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = counts.books,
            authors = counts.authors,
            "catalog module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        routes::router(CatalogState::new(ctx.db.clone()))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(page_paths("Catalog", PAGES))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE authors (
                    id            TEXT PRIMARY KEY,
                    first_name    TEXT NOT NULL CHECK (length(first_name) BETWEEN 1 AND 100),
                    family_name   TEXT NOT NULL CHECK (length(family_name) BETWEEN 1 AND 100),
                    date_of_birth TEXT,
                    date_of_death TEXT
                );
                CREATE INDEX authors_family_name ON authors (family_name);

                CREATE TABLE genres (
                    id   TEXT PRIMARY KEY,
                    name TEXT NOT NULL CHECK (length(name) BETWEEN 3 AND 100)
                );
                CREATE UNIQUE INDEX genres_name_unique ON genres (name COLLATE NOCASE);

                CREATE TABLE books (
                    id        TEXT PRIMARY KEY,
                    title     TEXT NOT NULL CHECK (title <> ''),
                    author_id TEXT NOT NULL REFERENCES authors (id),
                    summary   TEXT NOT NULL CHECK (summary <> ''),
                    isbn      TEXT NOT NULL CHECK (isbn <> '')
                );
                CREATE INDEX books_author ON books (author_id);

                CREATE TABLE book_genres (
                    book_id  TEXT NOT NULL REFERENCES books (id) ON DELETE CASCADE,
                    genre_id TEXT NOT NULL REFERENCES genres (id),
                    PRIMARY KEY (book_id, genre_id)
                );
                CREATE INDEX book_genres_genre ON book_genres (genre_id);

                CREATE TABLE book_instances (
                    id       TEXT PRIMARY KEY,
                    book_id  TEXT NOT NULL REFERENCES books (id),
                    imprint  TEXT NOT NULL CHECK (imprint <> ''),
                    status   TEXT NOT NULL DEFAULT 'Maintenance'
                             CHECK (status IN ('Available', 'Maintenance', 'Loaned', 'Reserved')),
                    due_back TEXT NOT NULL
                );
                CREATE INDEX book_instances_book ON book_instances (book_id);
                CREATE INDEX book_instances_status ON book_instances (status);
                "#,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "catalog module stopped");
        Ok(())
    }
}

/// Create a new instance of the catalog module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(CatalogModule::new())
}

mod authors;
mod book_instances;
mod books;
mod genres;

use axum::{extract::State, response::Html, routing::get, Router};

use libris_http::AppResult;

use super::templates::IndexTemplate;
use super::CatalogState;
use crate::utils::render;

/// Every catalog page, relative to the module mount path.
pub fn router(state: CatalogState) -> Router {
    Router::new()
        .route("/", get(index))
        // authors
        .route("/authors", get(authors::list))
        .route(
            "/author/create",
            get(authors::create_form).post(authors::create),
        )
        .route("/author/{id}", get(authors::detail))
        .route(
            "/author/{id}/delete",
            get(authors::delete_form).post(authors::delete),
        )
        .route(
            "/author/{id}/update",
            get(authors::update_form).post(authors::update),
        )
        // books
        .route("/books", get(books::list))
        .route("/book/create", get(books::create_form).post(books::create))
        .route("/book/{id}", get(books::detail))
        .route(
            "/book/{id}/delete",
            get(books::delete_form).post(books::delete),
        )
        .route(
            "/book/{id}/update",
            get(books::update_form).post(books::update),
        )
        // genres
        .route("/genres", get(genres::list))
        .route("/genre/create", get(genres::create_form).post(genres::create))
        .route("/genre/{id}", get(genres::detail))
        .route(
            "/genre/{id}/delete",
            get(genres::delete_form).post(genres::delete),
        )
        .route(
            "/genre/{id}/update",
            get(genres::update_form).post(genres::update),
        )
        // book instances
        .route("/bookinstances", get(book_instances::list))
        .route(
            "/bookinstance/create",
            get(book_instances::create_form).post(book_instances::create),
        )
        .route("/bookinstance/{id}", get(book_instances::detail))
        .route(
            "/bookinstance/{id}/delete",
            get(book_instances::delete_form).post(book_instances::delete),
        )
        .route(
            "/bookinstance/{id}/update",
            get(book_instances::update_form).post(book_instances::update),
        )
        .with_state(state)
}

/// Catalog home page with record counts.
async fn index(State(state): State<CatalogState>) -> AppResult<Html<String>> {
    let counts = state.repo().counts().await?;
    render(&IndexTemplate {
        title: "Local Library Home".to_string(),
        counts,
    })
}

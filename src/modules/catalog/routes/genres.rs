use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use libris_http::{AppError, AppResult};

use crate::modules::catalog::forms::GenreForm;
use crate::modules::catalog::templates::{
    GenreDeleteTemplate, GenreDetailTemplate, GenreFormTemplate, GenreListTemplate,
};
use crate::modules::catalog::CatalogState;
use crate::utils::render;

const LIST_URL: &str = "/catalog/genres";
const DUPLICATE_NAME: &str = "A genre with that name already exists.";

pub async fn list(State(state): State<CatalogState>) -> AppResult<Html<String>> {
    let genres = state.repo().list_genres().await?;
    render(&GenreListTemplate {
        title: "Genre List".to_string(),
        genres,
    })
}

pub async fn detail(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let repo = state.repo();
    let (genre, books) = tokio::try_join!(repo.genre(&id), repo.books_in_genre(&id))?;
    let genre = genre.ok_or_else(|| AppError::not_found("Genre not found"))?;

    render(&GenreDetailTemplate {
        title: "Genre Detail".to_string(),
        genre,
        books,
    })
}

fn form_page(title: &str, form: GenreForm, errors: Vec<String>) -> AppResult<Response> {
    Ok(render(&GenreFormTemplate {
        title: title.to_string(),
        form,
        errors,
    })?
    .into_response())
}

pub async fn create_form() -> AppResult<Response> {
    form_page("Create Genre", GenreForm::default(), Vec::new())
}

pub async fn create(
    State(state): State<CatalogState>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let name = match form.validate() {
        Ok(name) => name,
        Err(errors) => return form_page("Create Genre", form, errors.messages()),
    };

    let repo = state.repo();
    if let Some(existing) = repo.find_genre_by_name(&name).await? {
        return Ok(Redirect::to(&existing.url()).into_response());
    }

    match repo.insert_genre(&name).await {
        Ok(stored) => {
            tracing::info!(genre = %stored.id, "genre created");
            Ok(Redirect::to(&stored.url()).into_response())
        }
        // Lost a race with a concurrent insert of the same name.
        Err(err) if libris_db::is_unique_violation(&err) => {
            let existing = repo
                .find_genre_by_name(&name)
                .await?
                .ok_or(AppError::Database(err))?;
            Ok(Redirect::to(&existing.url()).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_form(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let repo = state.repo();
    let (genre, books) = tokio::try_join!(repo.genre(&id), repo.books_in_genre(&id))?;
    let Some(genre) = genre else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    Ok(render(&GenreDeleteTemplate {
        title: "Delete Genre".to_string(),
        genre,
        books,
    })?
    .into_response())
}

pub async fn delete(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let repo = state.repo();
    let (genre, books) = tokio::try_join!(repo.genre(&id), repo.books_in_genre(&id))?;
    let Some(genre) = genre else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    if !books.is_empty() {
        return Ok(render(&GenreDeleteTemplate {
            title: "Delete Genre".to_string(),
            genre,
            books,
        })?
        .into_response());
    }

    repo.delete_genre(&genre.id).await?;
    tracing::info!(genre = %genre.id, "genre deleted");
    Ok(Redirect::to(LIST_URL).into_response())
}

pub async fn update_form(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let genre = state
        .repo()
        .genre(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Genre not found"))?;

    form_page("Update Genre", GenreForm::from(&genre), Vec::new())
}

pub async fn update(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let repo = state.repo();
    if repo.genre(&id).await?.is_none() {
        return Err(AppError::not_found("Genre not found"));
    }

    let name = match form.validate() {
        Ok(name) => name,
        Err(errors) => return form_page("Update Genre", form, errors.messages()),
    };

    match repo.update_genre(&id, &name).await {
        Ok(Some(stored)) => {
            tracing::info!(genre = %stored.id, "genre updated");
            Ok(Redirect::to(&stored.url()).into_response())
        }
        Ok(None) => Err(AppError::not_found("Genre not found")),
        Err(err) if libris_db::is_unique_violation(&err) => {
            form_page("Update Genre", form, vec![DUPLICATE_NAME.to_string()])
        }
        Err(err) => Err(err.into()),
    }
}

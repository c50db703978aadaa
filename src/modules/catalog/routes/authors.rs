use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use libris_http::{AppError, AppResult};

use crate::modules::catalog::forms::AuthorForm;
use crate::modules::catalog::templates::{
    AuthorDeleteTemplate, AuthorDetailTemplate, AuthorFormTemplate, AuthorListTemplate,
};
use crate::modules::catalog::CatalogState;
use crate::utils::render;

const LIST_URL: &str = "/catalog/authors";

pub async fn list(State(state): State<CatalogState>) -> AppResult<Html<String>> {
    let authors = state.repo().list_authors().await?;
    render(&AuthorListTemplate {
        title: "Author List".to_string(),
        authors,
    })
}

pub async fn detail(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let repo = state.repo();
    let (author, books) = tokio::try_join!(repo.author(&id), repo.books_by_author(&id))?;
    let author = author.ok_or_else(|| AppError::not_found("Author not found"))?;

    render(&AuthorDetailTemplate {
        title: "Author Detail".to_string(),
        author,
        books,
    })
}

fn form_page(title: &str, form: AuthorForm, errors: Vec<String>) -> AppResult<Response> {
    Ok(render(&AuthorFormTemplate {
        title: title.to_string(),
        form,
        errors,
    })?
    .into_response())
}

pub async fn create_form() -> AppResult<Response> {
    form_page("Create Author", AuthorForm::default(), Vec::new())
}

pub async fn create(
    State(state): State<CatalogState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let author = match form.validate() {
        Ok(author) => author,
        Err(errors) => return form_page("Create Author", form, errors.messages()),
    };

    let repo = state.repo();
    if let Some(existing) = repo
        .find_author_by_name(&author.first_name, &author.family_name)
        .await?
    {
        tracing::debug!(author = %existing.id, "author already exists");
        return Ok(Redirect::to(&existing.url()).into_response());
    }

    let stored = repo.insert_author(&author).await?;
    tracing::info!(author = %stored.id, "author created");
    Ok(Redirect::to(&stored.url()).into_response())
}

pub async fn delete_form(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let repo = state.repo();
    let (author, books) = tokio::try_join!(repo.author(&id), repo.books_by_author(&id))?;
    let Some(author) = author else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    Ok(render(&AuthorDeleteTemplate {
        title: "Delete Author".to_string(),
        author,
        books,
    })?
    .into_response())
}

pub async fn delete(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let repo = state.repo();
    let (author, books) = tokio::try_join!(repo.author(&id), repo.books_by_author(&id))?;
    let Some(author) = author else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    if !books.is_empty() {
        return Ok(render(&AuthorDeleteTemplate {
            title: "Delete Author".to_string(),
            author,
            books,
        })?
        .into_response());
    }

    repo.delete_author(&author.id).await?;
    tracing::info!(author = %author.id, "author deleted");
    Ok(Redirect::to(LIST_URL).into_response())
}

pub async fn update_form(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let author = state
        .repo()
        .author(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Author not found"))?;

    form_page("Update Author", AuthorForm::from(&author), Vec::new())
}

pub async fn update(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let repo = state.repo();
    if repo.author(&id).await?.is_none() {
        return Err(AppError::not_found("Author not found"));
    }

    let author = match form.validate() {
        Ok(author) => author,
        Err(errors) => return form_page("Update Author", form, errors.messages()),
    };

    let stored = repo
        .update_author(&id, &author)
        .await?
        .ok_or_else(|| AppError::not_found("Author not found"))?;
    tracing::info!(author = %stored.id, "author updated");
    Ok(Redirect::to(&stored.url()).into_response())
}

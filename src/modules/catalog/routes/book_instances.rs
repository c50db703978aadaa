use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use libris_http::{AppError, AppResult};

use crate::modules::catalog::forms::BookInstanceForm;
use crate::modules::catalog::models::BookTitle;
use crate::modules::catalog::templates::{
    BookInstanceDeleteTemplate, BookInstanceDetailTemplate, BookInstanceFormTemplate,
    BookInstanceListTemplate, SelectOption,
};
use crate::modules::catalog::CatalogState;
use crate::utils::render;

const LIST_URL: &str = "/catalog/bookinstances";

pub async fn list(State(state): State<CatalogState>) -> AppResult<Html<String>> {
    let instances = state.repo().list_instances().await?;
    render(&BookInstanceListTemplate {
        title: "Book Instance List".to_string(),
        instances,
    })
}

pub async fn detail(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let instance = state
        .repo()
        .instance(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Book copy not found"))?;

    render(&BookInstanceDetailTemplate {
        title: format!("Copy: {}", instance.book_title),
        instance,
    })
}

fn form_page(
    title: &str,
    form: BookInstanceForm,
    books: &[BookTitle],
    errors: Vec<String>,
) -> AppResult<Response> {
    let book_options = SelectOption::books(books, &form.book);
    let status_options = SelectOption::statuses(&form.status);
    Ok(render(&BookInstanceFormTemplate {
        title: title.to_string(),
        form,
        books: book_options,
        statuses: status_options,
        errors,
    })?
    .into_response())
}

pub async fn create_form(State(state): State<CatalogState>) -> AppResult<Response> {
    let books = state.repo().list_book_titles().await?;
    form_page("Create BookInstance", BookInstanceForm::default(), &books, Vec::new())
}

pub async fn create(
    State(state): State<CatalogState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let repo = state.repo();
    let books = repo.list_book_titles().await?;

    let instance = match form.validate(&books, BookInstanceForm::today()) {
        Ok(instance) => instance,
        Err(errors) => {
            return form_page("Create BookInstance", form, &books, errors.messages())
        }
    };

    let id = repo.insert_instance(&instance).await?;
    tracing::info!(book_instance = %id, book = %instance.book_id, "book copy created");
    Ok(Redirect::to(&format!("/catalog/bookinstance/{id}")).into_response())
}

pub async fn delete_form(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(instance) = state.repo().instance(&id).await? else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    Ok(render(&BookInstanceDeleteTemplate {
        title: "Delete BookInstance".to_string(),
        instance,
    })?
    .into_response())
}

pub async fn delete(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    if state.repo().delete_instance(&id).await? {
        tracing::info!(book_instance = %id, "book copy deleted");
    }
    Ok(Redirect::to(LIST_URL).into_response())
}

pub async fn update_form(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let repo = state.repo();
    let (instance, books) = tokio::try_join!(repo.instance(&id), repo.list_book_titles())?;
    let instance = instance.ok_or_else(|| AppError::not_found("Book copy not found"))?;

    form_page(
        "Update BookInstance",
        BookInstanceForm::from(&instance),
        &books,
        Vec::new(),
    )
}

pub async fn update(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let repo = state.repo();
    let (existing, books) = tokio::try_join!(repo.instance(&id), repo.list_book_titles())?;
    let existing = existing.ok_or_else(|| AppError::not_found("Book copy not found"))?;

    let instance = match form.validate(&books, BookInstanceForm::today()) {
        Ok(instance) => instance,
        Err(errors) => {
            return form_page("Update BookInstance", form, &books, errors.messages())
        }
    };

    if !repo.update_instance(&id, &instance).await? {
        return Err(AppError::not_found("Book copy not found"));
    }
    tracing::info!(book_instance = %id, "book copy updated");
    Ok(Redirect::to(&existing.url()).into_response())
}

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use libris_http::{AppError, AppResult};

use crate::modules::catalog::forms::BookForm;
use crate::modules::catalog::models::{Author, Genre};
use crate::modules::catalog::templates::{
    BookDeleteTemplate, BookDetailTemplate, BookFormTemplate, BookListTemplate, SelectOption,
};
use crate::modules::catalog::CatalogState;
use crate::utils::forms::FormFields;
use crate::utils::render;

const LIST_URL: &str = "/catalog/books";

pub async fn list(State(state): State<CatalogState>) -> AppResult<Html<String>> {
    let books = state.repo().list_books().await?;
    render(&BookListTemplate {
        title: "Book List".to_string(),
        books,
    })
}

pub async fn detail(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let repo = state.repo();
    let (book, genres, instances) = tokio::try_join!(
        repo.book(&id),
        repo.genres_for_book(&id),
        repo.instances_for_book(&id),
    )?;
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;
    let author = repo
        .author(&book.author_id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("book {} has no author", book.id)))?;

    render(&BookDetailTemplate {
        title: book.title.clone(),
        book,
        author,
        genres,
        instances,
    })
}

fn form_page(
    title: &str,
    form: BookForm,
    authors: &[Author],
    genres: &[Genre],
    errors: Vec<String>,
) -> AppResult<Response> {
    let author_options = SelectOption::authors(authors, &form.author);
    let genre_options = SelectOption::genres(genres, &form.genre);
    Ok(render(&BookFormTemplate {
        title: title.to_string(),
        form,
        authors: author_options,
        genres: genre_options,
        errors,
    })?
    .into_response())
}

pub async fn create_form(State(state): State<CatalogState>) -> AppResult<Response> {
    let repo = state.repo();
    let (authors, genres) = tokio::try_join!(repo.list_authors(), repo.list_genres())?;
    form_page("Create Book", BookForm::default(), &authors, &genres, Vec::new())
}

pub async fn create(
    State(state): State<CatalogState>,
    Form(fields): Form<FormFields>,
) -> AppResult<Response> {
    let form = BookForm::from_fields(&fields);
    let repo = state.repo();
    let (authors, genres) = tokio::try_join!(repo.list_authors(), repo.list_genres())?;

    let book = match form.validate(&authors, &genres) {
        Ok(book) => book,
        Err(errors) => {
            return form_page("Create Book", form, &authors, &genres, errors.messages())
        }
    };

    let stored = repo.insert_book(&book).await?;
    tracing::info!(book = %stored.id, genres = book.genre_ids.len(), "book created");
    Ok(Redirect::to(&stored.url()).into_response())
}

pub async fn delete_form(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let repo = state.repo();
    let (book, instances) = tokio::try_join!(repo.book(&id), repo.instances_for_book(&id))?;
    let Some(book) = book else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    Ok(render(&BookDeleteTemplate {
        title: "Delete Book".to_string(),
        book,
        instances,
    })?
    .into_response())
}

pub async fn delete(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let repo = state.repo();
    let (book, instances) = tokio::try_join!(repo.book(&id), repo.instances_for_book(&id))?;
    let Some(book) = book else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    if !instances.is_empty() {
        return Ok(render(&BookDeleteTemplate {
            title: "Delete Book".to_string(),
            book,
            instances,
        })?
        .into_response());
    }

    repo.delete_book(&book.id).await?;
    tracing::info!(book = %book.id, "book deleted");
    Ok(Redirect::to(LIST_URL).into_response())
}

pub async fn update_form(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let repo = state.repo();
    let (book, book_genres, authors, genres) = tokio::try_join!(
        repo.book(&id),
        repo.genres_for_book(&id),
        repo.list_authors(),
        repo.list_genres(),
    )?;
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;

    let form = BookForm::from_book(&book, &book_genres);
    form_page("Update Book", form, &authors, &genres, Vec::new())
}

pub async fn update(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    Form(fields): Form<FormFields>,
) -> AppResult<Response> {
    let form = BookForm::from_fields(&fields);
    let repo = state.repo();
    let (existing, authors, genres) =
        tokio::try_join!(repo.book(&id), repo.list_authors(), repo.list_genres())?;
    if existing.is_none() {
        return Err(AppError::not_found("Book not found"));
    }

    let book = match form.validate(&authors, &genres) {
        Ok(book) => book,
        Err(errors) => {
            return form_page("Update Book", form, &authors, &genres, errors.messages())
        }
    };

    let stored = repo
        .update_book(&id, &book)
        .await?
        .ok_or_else(|| AppError::not_found("Book not found"))?;
    tracing::info!(book = %stored.id, "book updated");
    Ok(Redirect::to(&stored.url()).into_response())
}

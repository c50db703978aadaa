use askama::Template;

use super::forms::{AuthorForm, BookForm, BookInstanceForm, GenreForm};
use super::models::{
    Author, Book, BookInstance, BookListing, BookStatus, BookTitle, CatalogCounts, Genre,
};

/// One entry of a select box or checkbox group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn authors(authors: &[Author], selected: &str) -> Vec<Self> {
        authors
            .iter()
            .map(|author| Self {
                value: author.id.clone(),
                label: author.name(),
                selected: author.id == selected,
            })
            .collect()
    }

    pub fn genres(genres: &[Genre], checked: &[String]) -> Vec<Self> {
        genres
            .iter()
            .map(|genre| Self {
                value: genre.id.clone(),
                label: genre.name.clone(),
                selected: checked.iter().any(|id| *id == genre.id),
            })
            .collect()
    }

    pub fn books(books: &[BookTitle], selected: &str) -> Vec<Self> {
        books
            .iter()
            .map(|book| Self {
                value: book.id.clone(),
                label: book.title.clone(),
                selected: book.id == selected,
            })
            .collect()
    }

    /// Statuses in form order; an unrecognised selection falls back to the default.
    pub fn statuses(selected: &str) -> Vec<Self> {
        let selected = selected.parse::<BookStatus>().unwrap_or_default();
        BookStatus::ALL
            .iter()
            .map(|status| Self {
                value: status.as_str().to_string(),
                label: status.as_str().to_string(),
                selected: *status == selected,
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub counts: CatalogCounts,
}

#[derive(Template)]
#[template(path = "author_list.html")]
pub struct AuthorListTemplate {
    pub title: String,
    pub authors: Vec<Author>,
}

#[derive(Template)]
#[template(path = "author_detail.html")]
pub struct AuthorDetailTemplate {
    pub title: String,
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Template)]
#[template(path = "author_form.html")]
pub struct AuthorFormTemplate {
    pub title: String,
    pub form: AuthorForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "author_delete.html")]
pub struct AuthorDeleteTemplate {
    pub title: String,
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Template)]
#[template(path = "book_list.html")]
pub struct BookListTemplate {
    pub title: String,
    pub books: Vec<BookListing>,
}

#[derive(Template)]
#[template(path = "book_detail.html")]
pub struct BookDetailTemplate {
    pub title: String,
    pub book: Book,
    pub author: Author,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

#[derive(Template)]
#[template(path = "book_form.html")]
pub struct BookFormTemplate {
    pub title: String,
    pub form: BookForm,
    pub authors: Vec<SelectOption>,
    pub genres: Vec<SelectOption>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "book_delete.html")]
pub struct BookDeleteTemplate {
    pub title: String,
    pub book: Book,
    pub instances: Vec<BookInstance>,
}

#[derive(Template)]
#[template(path = "genre_list.html")]
pub struct GenreListTemplate {
    pub title: String,
    pub genres: Vec<Genre>,
}

#[derive(Template)]
#[template(path = "genre_detail.html")]
pub struct GenreDetailTemplate {
    pub title: String,
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Template)]
#[template(path = "genre_form.html")]
pub struct GenreFormTemplate {
    pub title: String,
    pub form: GenreForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "genre_delete.html")]
pub struct GenreDeleteTemplate {
    pub title: String,
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Template)]
#[template(path = "bookinstance_list.html")]
pub struct BookInstanceListTemplate {
    pub title: String,
    pub instances: Vec<BookInstance>,
}

#[derive(Template)]
#[template(path = "bookinstance_detail.html")]
pub struct BookInstanceDetailTemplate {
    pub title: String,
    pub instance: BookInstance,
}

#[derive(Template)]
#[template(path = "bookinstance_form.html")]
pub struct BookInstanceFormTemplate {
    pub title: String,
    pub form: BookInstanceForm,
    pub books: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "bookinstance_delete.html")]
pub struct BookInstanceDeleteTemplate {
    pub title: String,
    pub instance: BookInstance,
}

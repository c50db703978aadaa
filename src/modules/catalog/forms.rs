//! Submitted catalog forms and their validation rules.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::models::{
    Author, Book, BookInstance, BookStatus, BookTitle, Genre, NewAuthor, NewBook, NewBookInstance,
};
use crate::utils::forms::FormFields;
use crate::utils::validation::{char_len, is_alphanumeric, optional_date, FieldErrors};

const NAME_MAX: usize = 100;
const GENRE_MIN: usize = 3;
const GENRE_MAX: usize = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub date_of_death: String,
}

impl AuthorForm {
    pub fn validate(&self) -> Result<NewAuthor, FieldErrors> {
        let mut errors = FieldErrors::new();

        let first_name = self.first_name.trim();
        name_part(&mut errors, "first_name", "First name", first_name);
        let family_name = self.family_name.trim();
        name_part(&mut errors, "family_name", "Family name", family_name);

        let date_of_birth = optional_date(
            &mut errors,
            "date_of_birth",
            &self.date_of_birth,
            "Invalid date of birth",
        );
        let date_of_death = optional_date(
            &mut errors,
            "date_of_death",
            &self.date_of_death,
            "Invalid date of death",
        );
        if let (Some(born), Some(died)) = (date_of_birth, date_of_death) {
            if died < born {
                errors.push("date_of_death", "Date of death must not be before date of birth");
            }
        }

        errors.finish(NewAuthor {
            first_name: first_name.to_string(),
            family_name: family_name.to_string(),
            date_of_birth,
            date_of_death,
        })
    }
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth_yyyy_mm_dd(),
            date_of_death: author.date_of_death_yyyy_mm_dd(),
        }
    }
}

fn name_part(errors: &mut FieldErrors, field: &'static str, label: &str, value: &str) {
    if value.is_empty() {
        errors.push(field, format!("{label} must be specified."));
    } else if !is_alphanumeric(value) {
        errors.push(field, format!("{label} has non-alphanumeric characters."));
    } else if char_len(value) > NAME_MAX {
        errors.push(field, format!("{label} must be at most {NAME_MAX} characters."));
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreForm {
    #[serde(default)]
    pub name: String,
}

impl GenreForm {
    /// The trimmed genre name.
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim();
        let len = char_len(name);
        if len < GENRE_MIN {
            errors.push("name", "Genre name must contain at least 3 characters");
        } else if len > GENRE_MAX {
            errors.push("name", "Genre name must be at most 100 characters");
        }
        errors.finish(name.to_string())
    }
}

impl From<&Genre> for GenreForm {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }
}

/// Book form; `genre` is a checkbox group so it is read from raw fields.
#[derive(Debug, Clone, Default)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<String>,
}

impl BookForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            title: fields.value("title"),
            author: fields.value("author"),
            summary: fields.value("summary"),
            isbn: fields.value("isbn"),
            genre: fields.values("genre"),
        }
    }

    pub fn from_book(book: &Book, genres: &[Genre]) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_id.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: genres.iter().map(|genre| genre.id.clone()).collect(),
        }
    }

    /// Validate against the authors and genres that currently exist.
    pub fn validate(&self, authors: &[Author], genres: &[Genre]) -> Result<NewBook, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", "Title must not be empty.");
        }

        let author = self.author.trim();
        if author.is_empty() {
            errors.push("author", "Author must not be empty.");
        } else if !authors.iter().any(|known| known.id == author) {
            errors.push("author", "Author must be an existing author.");
        }

        let summary = self.summary.trim();
        if summary.is_empty() {
            errors.push("summary", "Summary must not be empty.");
        }

        let isbn = self.isbn.trim();
        if isbn.is_empty() {
            errors.push("isbn", "ISBN must not be empty.");
        }

        let mut genre_ids: Vec<String> = Vec::new();
        for genre in self.genre.iter().map(|id| id.trim()) {
            if !genres.iter().any(|known| known.id == genre) {
                if !errors.has("genre") {
                    errors.push("genre", "Unknown genre selected.");
                }
            } else if !genre_ids.iter().any(|id| id == genre) {
                genre_ids.push(genre.to_string());
            }
        }

        errors.finish(NewBook {
            title: title.to_string(),
            author_id: author.to_string(),
            summary: summary.to_string(),
            isbn: isbn.to_string(),
            genre_ids,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookInstanceForm {
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub imprint: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub due_back: String,
}

impl BookInstanceForm {
    /// Validate against the books that currently exist. Blank status means
    /// the default status and blank `due_back` means `today`.
    pub fn validate(
        &self,
        books: &[BookTitle],
        today: NaiveDate,
    ) -> Result<NewBookInstance, FieldErrors> {
        let mut errors = FieldErrors::new();

        let book = self.book.trim();
        if book.is_empty() {
            errors.push("book", "Book must be specified");
        } else if !books.iter().any(|known| known.id == book) {
            errors.push("book", "Book must be an existing book");
        }

        let imprint = self.imprint.trim();
        if imprint.is_empty() {
            errors.push("imprint", "Imprint must be specified.");
        }

        let status = match self.status.trim() {
            "" => BookStatus::default(),
            value => value.parse().unwrap_or_else(|_| {
                errors.push("status", "Invalid status");
                BookStatus::default()
            }),
        };

        let due_back =
            optional_date(&mut errors, "due_back", &self.due_back, "Invalid date").unwrap_or(today);

        errors.finish(NewBookInstance {
            book_id: book.to_string(),
            imprint: imprint.to_string(),
            status,
            due_back,
        })
    }

    /// Current date in UTC, the default for `due_back`.
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

impl From<&BookInstance> for BookInstanceForm {
    fn from(instance: &BookInstance) -> Self {
        Self {
            book: instance.book_id.clone(),
            imprint: instance.imprint.clone(),
            status: instance.status.as_str().to_string(),
            due_back: instance.due_back_yyyy_mm_dd(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_form(first: &str, family: &str, born: &str, died: &str) -> AuthorForm {
        AuthorForm {
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: born.to_string(),
            date_of_death: died.to_string(),
        }
    }

    #[test]
    fn author_fields_are_trimmed_and_dates_parsed() {
        let author = author_form("  Patrick ", "Rothfuss", "1973-06-06", "")
            .validate()
            .unwrap();
        assert_eq!(author.first_name, "Patrick");
        assert_eq!(author.date_of_birth, NaiveDate::from_ymd_opt(1973, 6, 6));
        assert_eq!(author.date_of_death, None);
    }

    #[test]
    fn author_errors_are_reported_in_field_order() {
        let errors = author_form("", "Le Guin", "not-a-date", "")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![
                "First name must be specified.",
                "Family name has non-alphanumeric characters.",
                "Invalid date of birth",
            ]
        );
    }

    #[test]
    fn death_before_birth_is_rejected() {
        let errors = author_form("Ursula", "LeGuin", "1929-10-21", "1920-01-01")
            .validate()
            .unwrap_err();
        assert!(errors.has("date_of_death"));
    }

    #[test]
    fn genre_name_length_bounds() {
        let short = GenreForm {
            name: " ab ".to_string(),
        };
        assert_eq!(
            short.validate().unwrap_err().messages(),
            vec!["Genre name must contain at least 3 characters"]
        );

        let long = GenreForm {
            name: "x".repeat(101),
        };
        assert!(long.validate().is_err());

        let ok = GenreForm {
            name: "  Fantasy ".to_string(),
        };
        assert_eq!(ok.validate().unwrap(), "Fantasy");
    }

    fn known_author() -> Author {
        Author {
            id: "a1".to_string(),
            first_name: "Patrick".to_string(),
            family_name: "Rothfuss".to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    fn known_genre(id: &str) -> Genre {
        Genre {
            id: id.to_string(),
            name: format!("Genre {id}"),
        }
    }

    #[test]
    fn book_genres_are_deduplicated_and_checked() {
        let form = BookForm {
            title: "The Name of the Wind".to_string(),
            author: "a1".to_string(),
            summary: "A tale.".to_string(),
            isbn: "9781473211896".to_string(),
            genre: vec!["g1".to_string(), "g1".to_string(), "g2".to_string()],
        };
        let book = form
            .validate(&[known_author()], &[known_genre("g1"), known_genre("g2")])
            .unwrap();
        assert_eq!(book.genre_ids, vec!["g1", "g2"]);
    }

    #[test]
    fn book_requires_existing_references() {
        let form = BookForm {
            title: "".to_string(),
            author: "ghost".to_string(),
            summary: "".to_string(),
            isbn: " ".to_string(),
            genre: vec!["nope".to_string()],
        };
        let errors = form.validate(&[known_author()], &[]).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![
                "Title must not be empty.",
                "Author must be an existing author.",
                "Summary must not be empty.",
                "ISBN must not be empty.",
                "Unknown genre selected.",
            ]
        );
    }

    fn titles() -> Vec<BookTitle> {
        vec![BookTitle {
            id: "b1".to_string(),
            title: "The Name of the Wind".to_string(),
        }]
    }

    #[test]
    fn instance_defaults_status_and_due_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let form = BookInstanceForm {
            book: "b1".to_string(),
            imprint: "Gollancz, 2011.".to_string(),
            status: String::new(),
            due_back: String::new(),
        };
        let instance = form.validate(&titles(), today).unwrap();
        assert_eq!(instance.status, BookStatus::Maintenance);
        assert_eq!(instance.due_back, today);
    }

    #[test]
    fn instance_rejects_unknown_status_and_bad_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let form = BookInstanceForm {
            book: String::new(),
            imprint: String::new(),
            status: "Lost".to_string(),
            due_back: "soon".to_string(),
        };
        let errors = form.validate(&titles(), today).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![
                "Book must be specified",
                "Imprint must be specified.",
                "Invalid status",
                "Invalid date",
            ]
        );
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

const DISPLAY_DATE: &str = "%b %-d, %Y";
const FORM_DATE: &str = "%Y-%m-%d";

fn display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DISPLAY_DATE).to_string())
        .unwrap_or_default()
}

fn form_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(FORM_DATE).to_string())
        .unwrap_or_default()
}

/// A person who wrote one or more books.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: String,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// `"Family, First"`, or empty when either part is missing.
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            String::new()
        } else {
            format!("{}, {}", self.family_name, self.first_name)
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    pub fn date_of_birth_formatted(&self) -> String {
        display_date(self.date_of_birth)
    }

    pub fn date_of_death_formatted(&self) -> String {
        display_date(self.date_of_death)
    }

    /// `"Jan 5, 1920 - Mar 2, 1990"`; unknown ends render empty.
    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            self.date_of_birth_formatted(),
            self.date_of_death_formatted()
        )
    }

    pub fn date_of_birth_yyyy_mm_dd(&self) -> String {
        form_date(self.date_of_birth)
    }

    pub fn date_of_death_yyyy_mm_dd(&self) -> String {
        form_date(self.date_of_death)
    }
}

/// Validated author fields ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub summary: String,
    pub isbn: String,
}

impl Book {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// A book as shown in the book list: title plus its author's display name.
#[derive(Debug, Clone, FromRow)]
pub struct BookListing {
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub author_name: String,
}

impl BookListing {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }

    pub fn author_url(&self) -> String {
        format!("/catalog/author/{}", self.author_id)
    }
}

/// Just enough of a book to offer it in a select box.
#[derive(Debug, Clone, FromRow)]
pub struct BookTitle {
    pub id: String,
    pub title: String,
}

/// Validated book fields; `genre_ids` are the linked genres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author_id: String,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<String>,
}

/// Lending state of a single copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown book status '{0}'")]
pub struct UnknownStatus(pub String);

impl BookStatus {
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Maintenance,
        BookStatus::Available,
        BookStatus::Loaned,
        BookStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Maintenance => "Maintenance",
            BookStatus::Loaned => "Loaned",
            BookStatus::Reserved => "Reserved",
        }
    }

    /// Stylesheet class used when the status is displayed.
    pub fn css_class(&self) -> &'static str {
        match self {
            BookStatus::Available => "text-success",
            BookStatus::Maintenance => "text-danger",
            BookStatus::Loaned | BookStatus::Reserved => "text-warning",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BookStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

impl TryFrom<String> for BookStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A physical copy of a book, joined with the book's title.
#[derive(Debug, Clone, FromRow)]
pub struct BookInstance {
    pub id: String,
    pub book_id: String,
    pub book_title: String,
    pub imprint: String,
    #[sqlx(try_from = "String")]
    pub status: BookStatus,
    pub due_back: NaiveDate,
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn book_url(&self) -> String {
        format!("/catalog/book/{}", self.book_id)
    }

    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    pub fn due_back_formatted(&self) -> String {
        display_date(Some(self.due_back))
    }

    pub fn due_back_yyyy_mm_dd(&self) -> String {
        form_date(Some(self.due_back))
    }
}

/// Validated copy fields ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookInstance {
    pub book_id: String,
    pub imprint: String,
    pub status: BookStatus,
    pub due_back: NaiveDate,
}

/// Record counts shown on the catalog home page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub books: i64,
    pub book_instances: i64,
    pub book_instances_available: i64,
    pub authors: i64,
    pub genres: i64,
}

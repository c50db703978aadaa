//! Sample catalog for local development.

use chrono::NaiveDate;
use libris_kernel::Db;

use crate::modules::catalog::models::{BookStatus, NewAuthor, NewBook, NewBookInstance};
use crate::modules::catalog::repo::CatalogRepo;

/// Number of records inserted by [`seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub authors: usize,
    pub genres: usize,
    pub books: usize,
    pub book_instances: usize,
}

struct SampleAuthor {
    first_name: &'static str,
    family_name: &'static str,
    born: Option<(i32, u32, u32)>,
    died: Option<(i32, u32, u32)>,
}

struct SampleBook {
    title: &'static str,
    author: usize,
    summary: &'static str,
    isbn: &'static str,
    genres: &'static [usize],
}

const AUTHORS: &[SampleAuthor] = &[
    SampleAuthor {
        first_name: "Patrick",
        family_name: "Rothfuss",
        born: Some((1973, 6, 6)),
        died: None,
    },
    SampleAuthor {
        first_name: "Ben",
        family_name: "Bova",
        born: Some((1932, 11, 8)),
        died: None,
    },
    SampleAuthor {
        first_name: "Isaac",
        family_name: "Asimov",
        born: Some((1920, 1, 2)),
        died: Some((1992, 4, 6)),
    },
    SampleAuthor {
        first_name: "Bob",
        family_name: "Billings",
        born: None,
        died: None,
    },
    SampleAuthor {
        first_name: "Jim",
        family_name: "Jones",
        born: Some((1971, 12, 16)),
        died: None,
    },
];

const GENRES: &[&str] = &["Fantasy", "Science Fiction", "French Poetry"];

const BOOKS: &[SampleBook] = &[
    SampleBook {
        title: "The Name of the Wind (The Kingkiller Chronicle, #1)",
        author: 0,
        summary: "I have stolen princesses back from sleeping barrow kings. I burned down the town of Trebon. I have spent the night with Felurian and left with both my sanity and my life.",
        isbn: "9781473211896",
        genres: &[0],
    },
    SampleBook {
        title: "The Wise Man's Fear (The Kingkiller Chronicle, #2)",
        author: 0,
        summary: "Picking up the tale of Kvothe Kingkiller once again, we follow him into exile, into political intrigue, courtship, adventure, love and magic.",
        isbn: "9788401352836",
        genres: &[0],
    },
    SampleBook {
        title: "The Slow Regard of Silent Things (Kingkiller Chronicle)",
        author: 0,
        summary: "Deep below the University, there is a dark place. Few people know of it: a broken web of ancient passageways and abandoned rooms.",
        isbn: "9780756411336",
        genres: &[0],
    },
    SampleBook {
        title: "Apes and Angels",
        author: 1,
        summary: "Humankind headed out to the stars not for conquest, nor exploration, nor even for curiosity. Humans went to the stars in a desperate crusade to save intelligent life wherever they found it.",
        isbn: "9780765379528",
        genres: &[1],
    },
    SampleBook {
        title: "Death Wave",
        author: 1,
        summary: "In Ben Bova's previous novel New Earth, Jordan Kell led the first human mission beyond the solar system.",
        isbn: "9780765379504",
        genres: &[1],
    },
    SampleBook {
        title: "Test Book 1",
        author: 4,
        summary: "Summary of test book 1",
        isbn: "ISBN111111",
        genres: &[0, 1],
    },
    SampleBook {
        title: "Test Book 2",
        author: 4,
        summary: "Summary of test book 2",
        isbn: "ISBN222222",
        genres: &[],
    },
];

/// `(book, imprint, status, due back)`
const INSTANCES: &[(usize, &str, BookStatus, Option<(i32, u32, u32)>)] = &[
    (0, "London Gollancz, 2014.", BookStatus::Available, None),
    (1, "Gollancz, 2011.", BookStatus::Loaned, Some((2020, 5, 1))),
    (2, "Gollancz, 2015.", BookStatus::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", BookStatus::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", BookStatus::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", BookStatus::Available, None),
    (4, "New York, NY Tom Doherty Associates, LLC, 2015.", BookStatus::Available, None),
    (4, "New York, NY Tom Doherty Associates, LLC, 2015.", BookStatus::Maintenance, None),
    (4, "New York, NY Tom Doherty Associates, LLC, 2015.", BookStatus::Loaned, None),
    (0, "Imprint XXX2", BookStatus::Available, None),
    (1, "Imprint XXX3", BookStatus::Available, None),
];

fn date(parts: Option<(i32, u32, u32)>) -> Option<NaiveDate> {
    parts.and_then(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day))
}

/// Insert the sample catalog. Does nothing when any author already exists.
pub async fn seed(db: &Db) -> anyhow::Result<SeedReport> {
    let repo = CatalogRepo::new(db);
    if !repo.list_authors().await?.is_empty() {
        tracing::info!("catalog already has authors; skipping sample data");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();

    let mut author_ids = Vec::with_capacity(AUTHORS.len());
    for sample in AUTHORS {
        let author = repo
            .insert_author(&NewAuthor {
                first_name: sample.first_name.to_string(),
                family_name: sample.family_name.to_string(),
                date_of_birth: date(sample.born),
                date_of_death: date(sample.died),
            })
            .await?;
        author_ids.push(author.id);
        report.authors += 1;
    }

    let mut genre_ids = Vec::with_capacity(GENRES.len());
    for name in GENRES {
        genre_ids.push(repo.insert_genre(name).await?.id);
        report.genres += 1;
    }

    let mut book_ids = Vec::with_capacity(BOOKS.len());
    for sample in BOOKS {
        let book = repo
            .insert_book(&NewBook {
                title: sample.title.to_string(),
                author_id: author_ids[sample.author].clone(),
                summary: sample.summary.to_string(),
                isbn: sample.isbn.to_string(),
                genre_ids: sample.genres.iter().map(|&g| genre_ids[g].clone()).collect(),
            })
            .await?;
        book_ids.push(book.id);
        report.books += 1;
    }

    let today = chrono::Utc::now().date_naive();
    for &(book, imprint, status, due_back) in INSTANCES {
        repo.insert_instance(&NewBookInstance {
            book_id: book_ids[book].clone(),
            imprint: imprint.to_string(),
            status,
            due_back: date(due_back).unwrap_or(today),
        })
        .await?;
        report.book_instances += 1;
    }

    tracing::info!(
        authors = report.authors,
        genres = report.genres,
        books = report.books,
        book_instances = report.book_instances,
        "sample catalog inserted"
    );
    Ok(report)
}

//! Catalog queries.

use libris_db::Db;

use super::models::{
    Author, Book, BookInstance, BookListing, BookTitle, CatalogCounts, Genre, NewAuthor, NewBook,
    NewBookInstance,
};

const INSTANCE_COLUMNS: &str = r#"
    SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.status, bi.due_back
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

/// Catalog repository over a borrowed pool.
pub struct CatalogRepo<'a> {
    db: &'a Db,
}

impl<'a> CatalogRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    async fn count(&self, sql: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(sql).fetch_one(self.db).await
    }

    /// Home page counts, queried concurrently.
    pub async fn counts(&self) -> Result<CatalogCounts, sqlx::Error> {
        let (books, book_instances, book_instances_available, authors, genres) = tokio::try_join!(
            self.count("SELECT COUNT(*) FROM books"),
            self.count("SELECT COUNT(*) FROM book_instances"),
            self.count("SELECT COUNT(*) FROM book_instances WHERE status = 'Available'"),
            self.count("SELECT COUNT(*) FROM authors"),
            self.count("SELECT COUNT(*) FROM genres"),
        )?;

        Ok(CatalogCounts {
            books,
            book_instances,
            book_instances_available,
            authors,
            genres,
        })
    }

    // Authors

    pub async fn list_authors(&self) -> Result<Vec<Author>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM authors ORDER BY family_name, first_name")
            .fetch_all(self.db)
            .await
    }

    pub async fn author(&self, id: &str) -> Result<Option<Author>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db)
            .await
    }

    /// Case-insensitive match on both name parts.
    pub async fn find_author_by_name(
        &self,
        first_name: &str,
        family_name: &str,
    ) -> Result<Option<Author>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM authors \
             WHERE first_name = ? COLLATE NOCASE AND family_name = ? COLLATE NOCASE \
             LIMIT 1",
        )
        .bind(first_name)
        .bind(family_name)
        .fetch_optional(self.db)
        .await
    }

    pub async fn insert_author(&self, author: &NewAuthor) -> Result<Author, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death) \
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(libris_db::new_id())
        .bind(&author.first_name)
        .bind(&author.family_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .fetch_one(self.db)
        .await
    }

    /// Returns the stored author, or `None` when `id` is unknown.
    pub async fn update_author(
        &self,
        id: &str,
        author: &NewAuthor,
    ) -> Result<Option<Author>, sqlx::Error> {
        sqlx::query_as(
            "UPDATE authors \
             SET first_name = ?, family_name = ?, date_of_birth = ?, date_of_death = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(&author.first_name)
        .bind(&author.family_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .bind(id)
        .fetch_optional(self.db)
        .await
    }

    pub async fn delete_author(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn books_by_author(&self, author_id: &str) -> Result<Vec<Book>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM books WHERE author_id = ? ORDER BY title")
            .bind(author_id)
            .fetch_all(self.db)
            .await
    }

    // Genres

    pub async fn list_genres(&self) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM genres ORDER BY name")
            .fetch_all(self.db)
            .await
    }

    pub async fn genre(&self, id: &str) -> Result<Option<Genre>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM genres WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db)
            .await
    }

    pub async fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM genres WHERE name = ? COLLATE NOCASE LIMIT 1")
            .bind(name)
            .fetch_optional(self.db)
            .await
    }

    pub async fn insert_genre(&self, name: &str) -> Result<Genre, sqlx::Error> {
        sqlx::query_as("INSERT INTO genres (id, name) VALUES (?, ?) RETURNING *")
            .bind(libris_db::new_id())
            .bind(name)
            .fetch_one(self.db)
            .await
    }

    pub async fn update_genre(&self, id: &str, name: &str) -> Result<Option<Genre>, sqlx::Error> {
        sqlx::query_as("UPDATE genres SET name = ? WHERE id = ? RETURNING *")
            .bind(name)
            .bind(id)
            .fetch_optional(self.db)
            .await
    }

    pub async fn delete_genre(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE id = ?")
            .bind(id)
            .execute(self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn books_in_genre(&self, genre_id: &str) -> Result<Vec<Book>, sqlx::Error> {
        sqlx::query_as(
            "SELECT b.* FROM books b \
             JOIN book_genres bg ON bg.book_id = b.id \
             WHERE bg.genre_id = ? ORDER BY b.title",
        )
        .bind(genre_id)
        .fetch_all(self.db)
        .await
    }

    // Books

    pub async fn list_books(&self) -> Result<Vec<BookListing>, sqlx::Error> {
        sqlx::query_as(
            "SELECT b.id, b.title, b.author_id, \
                    a.family_name || ', ' || a.first_name AS author_name \
             FROM books b JOIN authors a ON a.id = b.author_id \
             ORDER BY b.title",
        )
        .fetch_all(self.db)
        .await
    }

    pub async fn list_book_titles(&self) -> Result<Vec<BookTitle>, sqlx::Error> {
        sqlx::query_as("SELECT id, title FROM books ORDER BY title")
            .fetch_all(self.db)
            .await
    }

    pub async fn book(&self, id: &str) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db)
            .await
    }

    pub async fn genres_for_book(&self, book_id: &str) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as(
            "SELECT g.* FROM genres g \
             JOIN book_genres bg ON bg.genre_id = g.id \
             WHERE bg.book_id = ? ORDER BY g.name",
        )
        .bind(book_id)
        .fetch_all(self.db)
        .await
    }

    /// Insert the book and its genre links in one transaction.
    pub async fn insert_book(&self, book: &NewBook) -> Result<Book, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let stored: Book = sqlx::query_as(
            "INSERT INTO books (id, title, author_id, summary, isbn) \
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(libris_db::new_id())
        .bind(&book.title)
        .bind(&book.author_id)
        .bind(&book.summary)
        .bind(&book.isbn)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in &book.genre_ids {
            sqlx::query("INSERT OR IGNORE INTO book_genres (book_id, genre_id) VALUES (?, ?)")
                .bind(&stored.id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(stored)
    }

    /// Update the book and replace its genre links in one transaction.
    pub async fn update_book(&self, id: &str, book: &NewBook) -> Result<Option<Book>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let stored: Option<Book> = sqlx::query_as(
            "UPDATE books SET title = ?, author_id = ?, summary = ?, isbn = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(&book.title)
        .bind(&book.author_id)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(stored) = stored else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM book_genres WHERE book_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for genre_id in &book.genre_ids {
            sqlx::query("INSERT OR IGNORE INTO book_genres (book_id, genre_id) VALUES (?, ?)")
                .bind(id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(stored))
    }

    /// Genre links go with the book.
    pub async fn delete_book(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Book instances

    pub async fn list_instances(&self) -> Result<Vec<BookInstance>, sqlx::Error> {
        let sql = format!("{INSTANCE_COLUMNS} ORDER BY b.title, bi.imprint");
        let instances = sqlx::query_as(&sql).fetch_all(self.db).await?;
        Ok(instances)
    }

    pub async fn instance(&self, id: &str) -> Result<Option<BookInstance>, sqlx::Error> {
        let sql = format!("{INSTANCE_COLUMNS} WHERE bi.id = ?");
        let instance = sqlx::query_as(&sql).bind(id).fetch_optional(self.db).await?;
        Ok(instance)
    }

    pub async fn instances_for_book(&self, book_id: &str) -> Result<Vec<BookInstance>, sqlx::Error> {
        let sql = format!("{INSTANCE_COLUMNS} WHERE bi.book_id = ? ORDER BY bi.imprint");
        let instances = sqlx::query_as(&sql)
            .bind(book_id)
            .fetch_all(self.db)
            .await?;
        Ok(instances)
    }

    pub async fn insert_instance(&self, instance: &NewBookInstance) -> Result<String, sqlx::Error> {
        let id = libris_db::new_id();
        sqlx::query(
            "INSERT INTO book_instances (id, book_id, imprint, status, due_back) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&instance.book_id)
        .bind(&instance.imprint)
        .bind(instance.status.as_str())
        .bind(instance.due_back)
        .execute(self.db)
        .await?;
        Ok(id)
    }

    pub async fn update_instance(
        &self,
        id: &str,
        instance: &NewBookInstance,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE book_instances SET book_id = ?, imprint = ?, status = ?, due_back = ? \
             WHERE id = ?",
        )
        .bind(&instance.book_id)
        .bind(&instance.imprint)
        .bind(instance.status.as_str())
        .bind(instance.due_back)
        .bind(id)
        .execute(self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_instance(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = ?")
            .bind(id)
            .execute(self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

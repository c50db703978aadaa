use axum::http::StatusCode;

use crate::modules::catalog::forms::BookInstanceForm;
use crate::modules::catalog::models::BookStatus;
use crate::modules::catalog::repo::CatalogRepo;
use crate::test_support::{get, post_form, test_app, TestResponse};

fn location(response: &TestResponse) -> String {
    assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
    response.location.clone().unwrap()
}

async fn create_author(app: &axum::Router, first: &str, family: &str) -> String {
    let response = post_form(
        app,
        "/catalog/author/create",
        &format!("first_name={first}&family_name={family}&date_of_birth=1920-01-02"),
    )
    .await;
    location(&response)
}

fn id_of(url: &str) -> String {
    url.rsplit('/').next().unwrap().to_string()
}

#[tokio::test]
async fn root_redirects_to_catalog() {
    let (app, _db) = test_app().await;
    let response = get(&app, "/").await;
    assert_eq!(location(&response), "/catalog");
}

#[tokio::test]
async fn home_page_shows_counts() {
    let (app, _db) = test_app().await;
    let author_url = create_author(&app, "Isaac", "Asimov").await;
    assert!(author_url.starts_with("/catalog/author/"));

    let response = get(&app, "/catalog").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Local Library Home"));
    assert!(response.body.contains("<strong>Authors:</strong> 1"));
    assert!(response.body.contains("<strong>Books:</strong> 0"));
}

#[tokio::test]
async fn author_create_then_detail() {
    let (app, _db) = test_app().await;
    let url = create_author(&app, "Isaac", "Asimov").await;

    let detail = get(&app, &url).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Asimov, Isaac"));
    assert!(detail.body.contains("This author has no books."));
}

#[tokio::test]
async fn duplicate_author_redirects_to_existing() {
    let (app, _db) = test_app().await;
    let first = create_author(&app, "Isaac", "Asimov").await;
    let second = create_author(&app, "isaac", "ASIMOV").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn invalid_author_rerenders_form_with_errors() {
    let (app, db) = test_app().await;
    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=&family_name=Smith%21&date_of_birth=not-a-date",
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("First name must be specified."));
    assert!(response.body.contains("Family name has non-alphanumeric characters."));
    assert!(response.body.contains("Invalid date of birth"));
    assert!(CatalogRepo::new(&db).list_authors().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_records_are_not_found() {
    let (app, _db) = test_app().await;
    for uri in [
        "/catalog/author/missing",
        "/catalog/book/missing",
        "/catalog/genre/missing",
        "/catalog/bookinstance/missing",
        "/catalog/author/missing/update",
        "/catalog/genre/missing/update",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn deleting_unknown_records_redirects_to_list() {
    let (app, _db) = test_app().await;
    let response = post_form(&app, "/catalog/author/missing/delete", "").await;
    assert_eq!(location(&response), "/catalog/authors");

    let response = get(&app, "/catalog/genre/missing/delete").await;
    assert_eq!(location(&response), "/catalog/genres");
}

#[tokio::test]
async fn genre_names_are_unique_ignoring_case() {
    let (app, db) = test_app().await;
    let first = post_form(&app, "/catalog/genre/create", "name=Fantasy").await;
    let second = post_form(&app, "/catalog/genre/create", "name=fantasy").await;
    assert_eq!(location(&first), location(&second));
    assert_eq!(CatalogRepo::new(&db).list_genres().await.unwrap().len(), 1);

    let short = post_form(&app, "/catalog/genre/create", "name=ab").await;
    assert_eq!(short.status, StatusCode::OK);
    assert_eq!(CatalogRepo::new(&db).list_genres().await.unwrap().len(), 1);
}

#[tokio::test]
async fn book_lifecycle_with_genres_and_copies() {
    let (app, db) = test_app().await;
    let author_id = id_of(&create_author(&app, "Patrick", "Rothfuss").await);
    let fantasy = id_of(&location(
        &post_form(&app, "/catalog/genre/create", "name=Fantasy").await,
    ));
    let epic = id_of(&location(
        &post_form(&app, "/catalog/genre/create", "name=Epic").await,
    ));

    let book_url = location(
        &post_form(
            &app,
            "/catalog/book/create",
            &format!(
                "title=The+Name+of+the+Wind&author={author_id}&summary=A+story&isbn=9781473211896&genre={fantasy}&genre={epic}"
            ),
        )
        .await,
    );
    let book_id = id_of(&book_url);

    let repo = CatalogRepo::new(&db);
    assert_eq!(repo.genres_for_book(&book_id).await.unwrap().len(), 2);

    let detail = get(&app, &book_url).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("The Name of the Wind"));
    assert!(detail.body.contains("Fantasy"));

    let copy = post_form(
        &app,
        "/catalog/bookinstance/create",
        &format!("book={book_id}&imprint=Gollancz+2011&status=Available&due_back="),
    )
    .await;
    let copy_url = location(&copy);
    let copy_id = id_of(&copy_url);

    let counts = repo.counts().await.unwrap();
    assert_eq!(counts.book_instances, 1);
    assert_eq!(counts.book_instances_available, 1);

    // The author and the book are still referenced.
    let refused = post_form(&app, &format!("/catalog/author/{author_id}/delete"), "").await;
    assert_eq!(refused.status, StatusCode::OK);
    assert!(refused.body.contains("Delete the following books"));
    let refused = post_form(&app, &format!("/catalog/book/{book_id}/delete"), "").await;
    assert_eq!(refused.status, StatusCode::OK);
    assert!(refused.body.contains("Delete the following copies"));

    let deleted = post_form(&app, &format!("{copy_url}/delete"), "").await;
    assert_eq!(location(&deleted), "/catalog/bookinstances");
    assert!(repo.instance(&copy_id).await.unwrap().is_none());

    let deleted = post_form(&app, &format!("/catalog/book/{book_id}/delete"), "").await;
    assert_eq!(location(&deleted), "/catalog/books");
    assert!(repo.book(&book_id).await.unwrap().is_none());
    assert!(repo.books_in_genre(&fantasy).await.unwrap().is_empty());
}

#[tokio::test]
async fn book_update_replaces_genres() {
    let (app, db) = test_app().await;
    let author_id = id_of(&create_author(&app, "Ben", "Bova").await);
    let first = id_of(&location(
        &post_form(&app, "/catalog/genre/create", "name=Science+Fiction").await,
    ));
    let second = id_of(&location(
        &post_form(&app, "/catalog/genre/create", "name=Adventure").await,
    ));
    let book_id = id_of(&location(
        &post_form(
            &app,
            "/catalog/book/create",
            &format!("title=Death+Wave&author={author_id}&summary=Waves&isbn=9780765379504&genre={first}"),
        )
        .await,
    ));

    let updated = post_form(
        &app,
        &format!("/catalog/book/{book_id}/update"),
        &format!("title=Death+Wave+II&author={author_id}&summary=Waves&isbn=9780765379504&genre={second}"),
    )
    .await;
    assert_eq!(location(&updated), format!("/catalog/book/{book_id}"));

    let repo = CatalogRepo::new(&db);
    let book = repo.book(&book_id).await.unwrap().unwrap();
    assert_eq!(book.title, "Death Wave II");
    let genres = repo.genres_for_book(&book_id).await.unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0].id, second);
}

#[tokio::test]
async fn book_with_unknown_author_is_rejected() {
    let (app, db) = test_app().await;
    let response = post_form(
        &app,
        "/catalog/book/create",
        "title=Orphan&author=nobody&summary=None&isbn=1",
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Author must be an existing author."));
    assert!(CatalogRepo::new(&db).list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn copy_without_book_is_rejected() {
    let (app, _db) = test_app().await;
    let response = post_form(
        &app,
        "/catalog/bookinstance/create",
        "book=&imprint=&status=Lost&due_back=",
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Book must be specified"));
    assert!(response.body.contains("Imprint must be specified."));
    assert!(response.body.contains("Invalid status"));
}

#[tokio::test]
async fn author_update_changes_record() {
    let (app, db) = test_app().await;
    let url = create_author(&app, "Jim", "Jones").await;

    let response = post_form(
        &app,
        &format!("{url}/update"),
        "first_name=James&family_name=Jones&date_of_birth=1971-12-16&date_of_death=",
    )
    .await;
    assert_eq!(location(&response), url);

    let author = CatalogRepo::new(&db)
        .author(&id_of(&url))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(author.first_name, "James");
    assert!(author.date_of_death.is_none());
}

#[tokio::test]
async fn openapi_lists_catalog_pages() {
    let (app, _db) = test_app().await;
    let response = get(&app, "/docs/openapi.json").await;
    assert_eq!(response.status, StatusCode::OK);
    let document: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert!(document["paths"]["/catalog/books"]["get"].is_object());
    assert!(document["paths"]["/users/register"]["post"].is_object());
}

async fn create_genre(app: &axum::Router, name: &str) -> String {
    id_of(&location(
        &post_form(app, "/catalog/genre/create", &format!("name={name}")).await,
    ))
}

async fn create_book(app: &axum::Router, title: &str, author_id: &str, genres: &[&str]) -> String {
    let mut body = format!("title={title}&author={author_id}&summary=Summary&isbn=9780000000000");
    for genre in genres {
        body.push_str(&format!("&genre={genre}"));
    }
    id_of(&location(&post_form(app, "/catalog/book/create", &body).await))
}

fn position(body: &str, needle: &str) -> usize {
    body.find(needle)
        .unwrap_or_else(|| panic!("{needle} missing from page"))
}

#[tokio::test]
async fn list_pages_render_sorted() {
    let (app, _db) = test_app().await;
    let zimmer = create_author(&app, "Paul", "Zimmer").await;
    create_author(&app, "Anna", "Abbot").await;
    create_genre(&app, "Poetry").await;
    create_genre(&app, "Adventure").await;
    let author_id = id_of(&zimmer);
    let wind = create_book(&app, "Wind", &author_id, &[]).await;
    create_book(&app, "Atlas", &author_id, &[]).await;
    post_form(
        &app,
        "/catalog/bookinstance/create",
        &format!("book={wind}&imprint=Second+Print&status=Available"),
    )
    .await;

    let authors = get(&app, "/catalog/authors").await;
    assert_eq!(authors.status, StatusCode::OK);
    assert!(authors.body.contains("Author List"));
    assert!(position(&authors.body, "Abbot, Anna") < position(&authors.body, "Zimmer, Paul"));

    let genres = get(&app, "/catalog/genres").await;
    assert_eq!(genres.status, StatusCode::OK);
    assert!(position(&genres.body, "Adventure") < position(&genres.body, "Poetry"));

    let books = get(&app, "/catalog/books").await;
    assert_eq!(books.status, StatusCode::OK);
    assert!(position(&books.body, "Atlas") < position(&books.body, "Wind"));

    let copies = get(&app, "/catalog/bookinstances").await;
    assert_eq!(copies.status, StatusCode::OK);
    assert!(copies.body.contains("Wind : Second Print"));
}

#[tokio::test]
async fn empty_list_pages_say_so() {
    let (app, _db) = test_app().await;
    assert!(get(&app, "/catalog/authors").await.body.contains("There are no authors."));
    assert!(get(&app, "/catalog/books").await.body.contains("There are no books."));
    assert!(get(&app, "/catalog/genres").await.body.contains("There are no genres."));
    assert!(get(&app, "/catalog/bookinstances")
        .await
        .body
        .contains("There are no book copies in this library."));
}

#[tokio::test]
async fn genre_update_renames_and_refuses_collisions() {
    let (app, db) = test_app().await;
    let poetry = create_genre(&app, "Poetry").await;
    create_genre(&app, "Drama").await;

    let renamed = post_form(&app, &format!("/catalog/genre/{poetry}/update"), "name=French+Poetry").await;
    assert_eq!(location(&renamed), format!("/catalog/genre/{poetry}"));

    let repo = CatalogRepo::new(&db);
    assert_eq!(repo.genre(&poetry).await.unwrap().unwrap().name, "French Poetry");

    let collision = post_form(&app, &format!("/catalog/genre/{poetry}/update"), "name=drama").await;
    assert_eq!(collision.status, StatusCode::OK);
    assert!(collision.body.contains("A genre with that name already exists."));
    assert_eq!(repo.genre(&poetry).await.unwrap().unwrap().name, "French Poetry");

    let missing = post_form(&app, "/catalog/genre/missing/update", "name=Opera").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn genre_in_use_is_not_deleted() {
    let (app, db) = test_app().await;
    let author_id = id_of(&create_author(&app, "Ben", "Bova").await);
    let genre = create_genre(&app, "Science+Fiction").await;
    create_book(&app, "Death+Wave", &author_id, &[&genre]).await;

    let refused = post_form(&app, &format!("/catalog/genre/{genre}/delete"), "").await;
    assert_eq!(refused.status, StatusCode::OK);
    assert!(refused.body.contains("Delete the following books"));
    assert!(CatalogRepo::new(&db).genre(&genre).await.unwrap().is_some());

    let unused = create_genre(&app, "Opera").await;
    let deleted = post_form(&app, &format!("/catalog/genre/{unused}/delete"), "").await;
    assert_eq!(location(&deleted), "/catalog/genres");
    assert!(CatalogRepo::new(&db).genre(&unused).await.unwrap().is_none());
}

#[tokio::test]
async fn copy_update_changes_status_and_defaults_due_date() {
    let (app, db) = test_app().await;
    let author_id = id_of(&create_author(&app, "Jim", "Jones").await);
    let book = create_book(&app, "Test+Book", &author_id, &[]).await;
    let copy_url = location(
        &post_form(
            &app,
            "/catalog/bookinstance/create",
            &format!("book={book}&imprint=First&status=Available&due_back=2030-01-01"),
        )
        .await,
    );

    let updated = post_form(
        &app,
        &format!("{copy_url}/update"),
        &format!("book={book}&imprint=J&status=Reserved&due_back="),
    )
    .await;
    assert_eq!(location(&updated), copy_url);

    let copy = CatalogRepo::new(&db)
        .instance(&id_of(&copy_url))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(copy.imprint, "J");
    assert_eq!(copy.status, BookStatus::Reserved);
    assert_eq!(copy.due_back, BookInstanceForm::today());

    let missing = post_form(
        &app,
        "/catalog/bookinstance/missing/update",
        &format!("book={book}&imprint=J&status=Reserved"),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(
        get(&app, "/catalog/bookinstance/missing/update").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn book_errors_keep_selected_author_and_genres() {
    let (app, db) = test_app().await;
    let author_id = id_of(&create_author(&app, "Patrick", "Rothfuss").await);
    let fantasy = create_genre(&app, "Fantasy").await;
    let other = create_genre(&app, "Horror").await;

    let response = post_form(
        &app,
        "/catalog/book/create",
        &format!("title=&author={author_id}&summary=Summary&isbn=1&genre={fantasy}"),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Title must not be empty."));
    assert!(response.body.contains(&format!("value=\"{author_id}\" selected")));
    assert!(response.body.contains(&format!("value=\"{fantasy}\" checked")));
    assert!(!response.body.contains(&format!("value=\"{other}\" checked")));
    assert!(CatalogRepo::new(&db).list_books().await.unwrap().is_empty());
}

use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    Author, AuthorRepository, BookListQuery, BookRepository, BookService, ListQuery, NewBook,
    RepoError, ServiceError, SqliteAuthorRepository, SqliteBookRepository, ValidationError,
};
use rusqlite::Connection;

fn seed_author(conn: &Connection, name: &str) -> Author {
    SqliteAuthorRepository::try_new(conn)
        .unwrap()
        .create_author(name)
        .unwrap()
}

fn book_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_author(&conn, "Arthur Conan Doyle");
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let book = service.create_book("A Study in Scarlet", author.id).unwrap();
    assert_eq!(book.title, "A Study in Scarlet");
    assert_eq!(book.author_id, author.id);
    assert_eq!(service.get_book(book.id).unwrap(), book);
}

#[test]
fn create_with_unknown_author_fails_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    seed_author(&conn, "Existing Author");
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    for missing_id in [0, -1, 999] {
        let err = service.create_book("Orphan", missing_id).unwrap_err();
        assert!(
            matches!(err, ServiceError::UnknownAuthor(id) if id == missing_id),
            "unexpected error for {missing_id}: {err}"
        );
    }
    assert_eq!(book_count(&conn), 0);
}

#[test]
fn blank_title_is_rejected_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_author(&conn, "Author");
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let err = repo
        .create_book(&NewBook {
            title: " ".to_string(),
            author_id: author.id,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyField("title"))
    ));
    assert_eq!(book_count(&conn), 0);
}

#[test]
fn update_replaces_title_and_author() {
    let conn = open_db_in_memory().unwrap();
    let first = seed_author(&conn, "First");
    let second = seed_author(&conn, "Second");
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let book = service.create_book("Draft", first.id).unwrap();
    let updated = service.update_book(book.id, "Final", second.id).unwrap();
    assert_eq!(updated.id, book.id);
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.author_id, second.id);
}

#[test]
fn failed_update_leaves_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_author(&conn, "Author");
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());
    let book = service.create_book("Original", author.id).unwrap();

    let blank = service.update_book(book.id, "", author.id).unwrap_err();
    assert!(matches!(blank, ServiceError::Validation(_)));

    let dangling = service.update_book(book.id, "Changed", 777).unwrap_err();
    assert!(matches!(dangling, ServiceError::UnknownAuthor(777)));

    assert_eq!(service.get_book(book.id).unwrap(), book);
}

#[test]
fn update_missing_book_reports_not_found_before_author_check() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let err = service.update_book(5, "Anything", 777).unwrap_err();
    assert!(matches!(err, ServiceError::BookNotFound(5)));
}

#[test]
fn delete_then_get_yields_not_found() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_author(&conn, "Author");
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());
    let book = service.create_book("Gone Soon", author.id).unwrap();

    assert_eq!(service.delete_book(book.id).unwrap(), book);
    assert!(matches!(
        service.get_book(book.id).unwrap_err(),
        ServiceError::BookNotFound(id) if id == book.id
    ));
    assert!(matches!(
        service.delete_book(book.id).unwrap_err(),
        ServiceError::BookNotFound(_)
    ));
}

#[test]
fn list_filters_by_author_and_paginates() {
    let conn = open_db_in_memory().unwrap();
    let doyle = seed_author(&conn, "Doyle");
    let christie = seed_author(&conn, "Christie");
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    for (title, author_id) in [
        ("Scarlet", doyle.id),
        ("Styles", christie.id),
        ("Four", doyle.id),
        ("Baskervilles", doyle.id),
    ] {
        repo.create_book(&NewBook::new(title, author_id).unwrap())
            .unwrap();
    }

    let all = repo.list_books(&BookListQuery::default()).unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));

    let by_doyle = repo
        .list_books(&BookListQuery {
            author_id: Some(doyle.id),
            page: ListQuery {
                limit: Some(2),
                offset: 1,
            },
        })
        .unwrap();
    let titles: Vec<&str> = by_doyle.iter().map(|book| book.title.as_str()).collect();
    assert_eq!(titles, vec!["Four", "Baskervilles"]);
}

#[test]
fn get_book_with_author_joins_author_row() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_author(&conn, "Mary Shelley");
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());
    let book = service.create_book("Frankenstein", author.id).unwrap();

    let joined = service.get_book_with_author(book.id).unwrap();
    assert_eq!(joined.book, book);
    assert_eq!(joined.author, author);

    let value = serde_json::to_value(&joined).unwrap();
    assert_eq!(value["title"], "Frankenstein");
    assert_eq!(value["authorid"], author.id);
    assert_eq!(value["author"]["name"], "Mary Shelley");
}

#[test]
fn foreign_key_constraint_backs_the_integrity_check() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO books (title, author_id) VALUES ('Raw insert', 4040);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
    assert_eq!(book_count(&conn), 0);
}

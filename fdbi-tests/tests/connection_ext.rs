//! Updates, queries and finds against the embedded WORDS database

use std::cell::Cell;
use std::collections::HashMap;

use fdbi::{
    Binder, Connection, ConnectionExt, Error, FromRow, Parameters, ParametersExt, RowExt,
    SqliteConnection, Statement,
};
use fdbi_tests::EmbeddedDb;

fn word(row: &dyn fdbi::Row) -> fdbi::Result<String> {
    row.get(0)
}

#[test]
fn test_update_returns_affected_rows() {
    let db = EmbeddedDb::new().unwrap();
    assert_eq!(db.update("INSERT INTO WORDS (WORD) VALUES ('d')").unwrap(), 1);
    assert_eq!(db.update("UPDATE WORDS SET COUNT = COUNT + 1").unwrap(), 4);
    assert_eq!(db.update("DELETE FROM WORDS WHERE COUNT > 100").unwrap(), 0);
}

#[test]
fn test_update_with_bad_sql_fails() {
    let db = EmbeddedDb::new().unwrap();
    let err = db.update("INSERT INTO NOWHERE (WORD) VALUES ('d')").unwrap_err();
    assert!(err.is_driver_error());
}

#[test]
fn test_bad_query_never_reaches_extractor() {
    let db = EmbeddedDb::new().unwrap();
    let calls = Cell::new(0);
    let result = db.find("SELECT WORD FROM WORDS WHERE", |row| {
        calls.set(calls.get() + 1);
        word(row)
    });

    assert!(matches!(result, Err(Error::Sqlite(_))));
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_find_with_bound_argument() {
    let db = EmbeddedDb::new().unwrap();
    let stmt = Statement::with_binder("SELECT COUNT FROM WORDS WHERE WORD = ?", |p| p.set(1, "b"));
    let counts: Vec<i64> = db.find(&stmt, |row| row.get(0)).unwrap();
    assert_eq!(counts, vec![2]);
}

#[test]
fn test_late_bound_argument() {
    let db = EmbeddedDb::new().unwrap();
    let target = Cell::new("a");
    let stmt = Statement::with_binder("UPDATE WORDS SET WORD = 'foo' WHERE WORD = ?", |p| {
        p.set(1, target.get())
    });

    target.set("b");
    assert_eq!(db.update(&stmt).unwrap(), 1);
    target.set("a");
    assert_eq!(db.update(&stmt).unwrap(), 1);
    assert_eq!(db.update(&stmt).unwrap(), 0);

    let words = db
        .find("SELECT WORD FROM WORDS ORDER BY WORD", word)
        .unwrap();
    assert_eq!(words, vec!["c", "foo", "foo"]);
}

#[test]
fn test_find_nothing() {
    let db = EmbeddedDb::new().unwrap();
    let words = db
        .find("SELECT WORD FROM WORDS WHERE WORD = 'zzz'", word)
        .unwrap();
    assert!(words.is_empty());
}

#[test]
fn test_find_null_column() {
    let db = EmbeddedDb::new().unwrap();
    db.update("INSERT INTO WORDS (WORD, COUNT) VALUES ('n', NULL)")
        .unwrap();
    let counts: Vec<Option<i64>> = db
        .find("SELECT COUNT FROM WORDS WHERE WORD = 'n'", |row| row.get(0))
        .unwrap();
    assert_eq!(counts, vec![None]);
}

#[test]
fn test_pairs_into_map() {
    let db = EmbeddedDb::new().unwrap();
    let counts: HashMap<String, i64> = db
        .query(
            "SELECT WORD, COUNT FROM WORDS",
            |row| Ok((row.get_named::<String>("WORD")?, row.get_named::<i64>("COUNT")?)),
            |rows| rows.collect(),
        )
        .unwrap();

    assert_eq!(counts.len(), 3);
    assert_eq!(counts["a"], 1);
    assert_eq!(counts["c"], 10);
}

#[test]
fn test_query_processor_may_stop_early() {
    let db = EmbeddedDb::new().unwrap();
    let first = db
        .query("SELECT WORD FROM WORDS ORDER BY WORD", word, |rows| {
            rows.next().transpose()
        })
        .unwrap();
    assert_eq!(first.as_deref(), Some("a"));

    // the cursor is released, so the table can be dropped
    db.update("DROP TABLE WORDS").unwrap();
}

#[test]
fn test_extractor_error_propagates() {
    let db = EmbeddedDb::new().unwrap();
    let result: fdbi::Result<Vec<i64>> = db.find("SELECT WORD FROM WORDS", |row| row.get(0));
    assert!(matches!(result, Err(Error::TypeConversion { .. })));
    db.update("DROP TABLE WORDS").unwrap();
}

#[test]
fn test_batch_update() {
    let db = EmbeddedDb::new().unwrap();
    let d = |p: &mut dyn Parameters| p.set(1, "d");
    let e = |p: &mut dyn Parameters| p.set(1, "e");
    let f = |p: &mut dyn Parameters| p.set(1, "f");
    let binders: [&dyn Binder; 3] = [&d, &e, &f];

    let counts = db
        .update_batch("INSERT INTO WORDS (WORD) VALUES (?)", &binders)
        .unwrap();
    assert_eq!(counts, vec![1, 1, 1]);

    let words = db
        .find("SELECT WORD FROM WORDS ORDER BY WORD", word)
        .unwrap();
    assert_eq!(words, vec!["a", "b", "c", "d", "e", "f"]);
}

#[test]
fn test_empty_batch() {
    let db = EmbeddedDb::new().unwrap();
    let counts = db.update_batch("NOT EVEN SQL", &[]).unwrap();
    assert!(counts.is_empty());
}

#[test]
fn test_tuple_extractor() {
    let db = EmbeddedDb::new().unwrap();
    let pairs = db
        .find(
            "SELECT WORD, COUNT FROM WORDS WHERE COUNT > 1 ORDER BY WORD",
            <(String, i64)>::from_row,
        )
        .unwrap();
    assert_eq!(pairs, vec![("b".to_string(), 2), ("c".to_string(), 10)]);
}

#[test]
fn test_plain_connection_walkthrough() {
    let conn = SqliteConnection::open_in_memory().unwrap();
    conn.execute_script(
        "CREATE TABLE WORDS (WORD CHAR(20), COUNT INTEGER DEFAULT 0);
         INSERT INTO WORDS VALUES ('a', 1), ('b', 2), ('c', 10);",
    )
    .unwrap();

    let below = Statement::with_binder("SELECT WORD FROM WORDS WHERE COUNT < ?", |p| p.set(1, 5));
    let words: Vec<String> = conn.find(&below, |row| row.get(0)).unwrap();
    assert_eq!(words, vec!["a", "b"]);

    conn.transaction(|conn| {
        conn.update("INSERT INTO WORDS (WORD) VALUES ('d')")?;
        Ok::<_, Error>(())
    })
    .unwrap();
    assert_eq!(conn.find("SELECT WORD FROM WORDS", word).unwrap().len(), 4);
}

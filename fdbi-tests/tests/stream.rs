//! Rows consumed as an async stream

use std::cell::Cell;

use fdbi::{ConnectionExt, ParametersExt, Row, RowExt, Statement};
use fdbi_tests::EmbeddedDb;
use futures::future::{self, Either};
use futures::{StreamExt, TryStreamExt};

fn word(row: &dyn Row) -> fdbi::Result<String> {
    row.get(0)
}

#[tokio::test]
async fn test_stream_rows_in_order() {
    let db = EmbeddedDb::new().unwrap();
    let words = db
        .stream("SELECT WORD FROM WORDS ORDER BY WORD", word, |rows| {
            Box::pin(async move { rows.try_collect::<Vec<String>>().await })
        })
        .await
        .unwrap();
    assert_eq!(words, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_stream_agrees_with_find() {
    let db = EmbeddedDb::new().unwrap();
    let sql = "SELECT WORD FROM WORDS WHERE WORD != 'a' ORDER BY WORD";
    let streamed = db
        .stream(sql, word, |rows| {
            Box::pin(async move { rows.try_collect::<Vec<String>>().await })
        })
        .await
        .unwrap();
    let found = db.find(sql, word).unwrap();

    assert_eq!(streamed, vec!["b", "c"]);
    assert_eq!(streamed, found);
}

#[tokio::test]
async fn test_stream_optional_values() {
    let db = EmbeddedDb::new().unwrap();
    db.update("UPDATE WORDS SET WORD = NULL WHERE WORD = 'b'")
        .unwrap();

    let words = db
        .stream(
            "SELECT WORD FROM WORDS ORDER BY COUNT",
            |row| row.get::<Option<String>>(0),
            |rows| Box::pin(async move { rows.try_collect::<Vec<_>>().await }),
        )
        .await
        .unwrap();
    assert_eq!(words, vec![Some("a".to_string()), None, Some("c".to_string())]);
}

#[tokio::test]
async fn test_early_stop_releases_statement() {
    let db = EmbeddedDb::new().unwrap();
    let first = db
        .stream("SELECT WORD FROM WORDS ORDER BY WORD", word, |mut rows| {
            Box::pin(async move { rows.next().await.transpose() })
        })
        .await
        .unwrap();
    assert_eq!(first.as_deref(), Some("a"));

    // a statement still holding its cursor would lock the table
    db.update("DROP TABLE WORDS").unwrap();
}

#[tokio::test]
async fn test_stream_error_from_bad_sql() {
    let db = EmbeddedDb::new().unwrap();
    let result = db
        .stream("SELECT FROM", word, |rows| {
            Box::pin(async move { rows.try_collect::<Vec<String>>().await })
        })
        .await;
    assert!(result.unwrap_err().is_driver_error());
}

#[tokio::test]
async fn test_stream_bound_statement() {
    let db = EmbeddedDb::new().unwrap();
    let threshold = Cell::new(2);
    let stmt = Statement::with_binder(
        "SELECT WORD FROM WORDS WHERE COUNT <= ? ORDER BY WORD",
        |p| p.set(1, threshold.get()),
    );

    let below = db
        .stream(&stmt, word, |rows| {
            Box::pin(async move { rows.try_collect::<Vec<String>>().await })
        })
        .await
        .unwrap();
    assert_eq!(below, vec!["a", "b"]);

    threshold.set(20);
    let all = db
        .stream(&stmt, word, |rows| {
            Box::pin(async move { rows.try_collect::<Vec<String>>().await })
        })
        .await
        .unwrap();
    assert_eq!(all, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_dropped_stream_releases_statement() {
    let db = EmbeddedDb::new().unwrap();
    let read = Cell::new(0);
    let counted = |row: &dyn Row| {
        read.set(read.get() + 1);
        word(row)
    };

    let running = db.stream("SELECT WORD FROM WORDS ORDER BY WORD", counted, |mut rows| {
        Box::pin(async move {
            rows.next().await.transpose()?;
            future::pending::<()>().await;
            Ok::<_, fdbi::Error>(())
        })
    });
    match future::select(running, future::ready(())).await {
        Either::Right(((), unfinished)) => drop(unfinished),
        Either::Left(_) => panic!("consumer should still be waiting"),
    }
    assert_eq!(read.get(), 1);

    // a statement still holding its cursor would lock the table
    db.update("DROP TABLE WORDS").unwrap();
}

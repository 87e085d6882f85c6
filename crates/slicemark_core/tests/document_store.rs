use rusqlite::Connection;
use slicemark_core::db::{open_db, open_db_in_memory, DbError};
use slicemark_core::store::{load_document, save_document, CANVAS_KEY, TEXTMARKS_KEY};
use slicemark_core::{
    Canvas, CanvasService, DocumentStore, SliceMarkConfig, SqliteDocumentStore, StoreError,
    TextMark,
};

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteDocumentStore::try_new(&conn) {
        Err(StoreError::Db(DbError::UninitializedConnection {
            actual_version, ..
        })) => assert_eq!(actual_version, 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("store accepted an unmigrated connection"),
    }
}

#[test]
fn writes_replace_whole_document_and_bump_revision() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    assert_eq!(store.revision(TEXTMARKS_KEY).unwrap(), None);
    save_document(&store, TEXTMARKS_KEY, &vec![TextMark::new("first")]).unwrap();
    save_document(&store, TEXTMARKS_KEY, &vec![TextMark::new("second")]).unwrap();

    let marks: Vec<TextMark> = load_document(&store, TEXTMARKS_KEY).unwrap();
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].text, "second");
    assert_eq!(store.revision(TEXTMARKS_KEY).unwrap(), Some(2));

    store.remove(TEXTMARKS_KEY).unwrap();
    assert_eq!(store.get_raw(TEXTMARKS_KEY).unwrap(), None);
}

#[test]
fn malformed_canvas_reads_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();
    store.set_raw(CANVAS_KEY, "not json").unwrap();

    let service = CanvasService::new(&store, SliceMarkConfig::default());
    assert_eq!(service.load_canvas().unwrap(), Canvas::default());
}

#[test]
fn canvas_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slicemark.db");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteDocumentStore::try_new(&conn).unwrap();
        let service = CanvasService::new(&store, SliceMarkConfig::default());
        service.add_item("https://a.test", "a", 3).unwrap();
        service.add_item("https://b.test", "b", 2).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();
    let canvas = CanvasService::new(&store, SliceMarkConfig::default())
        .load_canvas()
        .unwrap();
    assert_eq!(canvas.rows.len(), 1);
    assert_eq!(canvas.item_count(), 2);
    assert_eq!(canvas.rows[0].items[1].position.col, 4);
}

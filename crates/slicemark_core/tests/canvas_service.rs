use slicemark_core::grid::session::RowMove;
use slicemark_core::store::{save_document, CANVAS_KEY, SETTINGS_KEY};
use slicemark_core::{
    CanvasService, CanvasServiceError, DocumentStore, LayoutError, MemoryDocumentStore,
    NoOpReason, ReorderOutcome, ResizeEdge, ResizeSession, RowInsertPolicy, SliceMarkConfig,
    TOTAL_COLS,
};

fn service(store: &MemoryDocumentStore) -> CanvasService<&MemoryDocumentStore> {
    CanvasService::new(store, SliceMarkConfig::default())
}

#[test]
fn add_item_fills_rows_then_opens_new_row_on_top() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);

    let first = service.add_item("https://a.test", "a", 3).unwrap();
    let second = service.add_item("https://b.test", "b", 2).unwrap();
    let third = service.add_item("https://c.test", "c", 1).unwrap();

    assert_eq!((first.position.row, first.position.col), (1, 1));
    assert_eq!((second.position.row, second.position.col), (1, 4));
    assert_eq!((third.position.row, third.position.col), (1, 1));

    let canvas = service.load_canvas().unwrap();
    assert_eq!(canvas.rows.len(), 2);
    assert_eq!(canvas.rows[1].items.len(), 2);
    assert_eq!(canvas.rows[1].items[0].position.row, 2);
    assert_eq!(canvas.validate(), Ok(()));
}

#[test]
fn blank_text_uses_configured_default_and_span_is_checked() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);

    let item = service.add_item("https://a.test", "   ", 2).unwrap();
    assert_eq!(item.text, "marktext");

    let err = service.add_item("https://a.test", "x", 0).unwrap_err();
    assert!(matches!(
        err,
        CanvasServiceError::Layout(LayoutError::InvalidSpan { len: 0, .. })
    ));
    assert_eq!(service.load_canvas().unwrap().item_count(), 1);
}

#[test]
fn stored_settings_change_row_policy() {
    let store = MemoryDocumentStore::new();
    let config = SliceMarkConfig {
        row_insert_policy: RowInsertPolicy::Bottom,
        default_row_height: 90.0,
        ..SliceMarkConfig::default()
    };
    save_document(&store, SETTINGS_KEY, &config).unwrap();
    let service = CanvasService::from_store(&store).unwrap();

    service.add_item("https://a.test", "a", 5).unwrap();
    let tail = service.add_item("https://b.test", "b", 5).unwrap();

    let canvas = service.load_canvas().unwrap();
    assert_eq!(tail.position.row, 2);
    assert_eq!(canvas.rows[1].items[0].text, "b");
    assert_eq!(canvas.rows[1].height, 90.0);
}

#[test]
fn capture_is_staged_then_saved() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);

    assert!(matches!(
        service.save_staged("x", 2),
        Err(CanvasServiceError::NoStagedItem)
    ));

    let draft = service.stage_capture("https://page.test").unwrap();
    assert_eq!(draft.len, 3);
    assert_eq!(service.staged_capture().unwrap(), Some(draft.clone()));

    assert!(service.save_staged("title", 9).is_err());
    assert!(service.staged_capture().unwrap().is_some());

    let placed = service.save_staged(" title ", 4).unwrap();
    assert_eq!(placed.id, draft.id);
    assert_eq!((placed.text.as_str(), placed.len), ("title", 4));
    assert_eq!(service.staged_capture().unwrap(), None);
    assert_eq!(service.load_canvas().unwrap().item_count(), 1);
}

#[test]
fn discarded_capture_leaves_canvas_untouched() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);

    service.stage_capture("https://page.test").unwrap();
    service.discard_staged().unwrap();

    assert_eq!(service.staged_capture().unwrap(), None);
    assert!(matches!(
        service.save_staged("title", 2),
        Err(CanvasServiceError::NoStagedItem)
    ));
    assert_eq!(service.load_canvas().unwrap().item_count(), 0);
}

#[test]
fn placement_preview_matches_the_next_add() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);

    assert!(service.preview_placement(3).unwrap().need_new_row);
    service.add_item("https://a.test", "a", 3).unwrap();

    let preview = service.preview_placement(2).unwrap();
    assert!(!preview.need_new_row);
    assert_eq!((preview.target_row_index, preview.target_col), (0, 4));
    assert!(service.preview_placement(3).unwrap().need_new_row);
    assert!(matches!(
        service.preview_placement(6),
        Err(CanvasServiceError::Layout(LayoutError::InvalidSpan { len: 6, .. }))
    ));
    assert_eq!(service.load_canvas().unwrap().item_count(), 1);

    let placed = service.add_item("https://b.test", "b", 2).unwrap();
    assert_eq!(placed.position.col, preview.target_col);
}

#[test]
fn stored_grid_width_is_reset_to_five_columns() {
    for body in [r#"{"totalCols": 3, "rows": []}"#, r#"{"totalCols": 0, "rows": []}"#] {
        let store = MemoryDocumentStore::new();
        store.set_raw(CANVAS_KEY, body).unwrap();
        let service = service(&store);

        assert_eq!(service.load_canvas().unwrap().total_cols, TOTAL_COLS);
        let item = service.add_item("https://a.test", "a", 4).unwrap();
        assert_eq!((item.position.col, item.len), (1, 4));
        let wide = service.add_item("https://b.test", "b", 5).unwrap();
        assert_eq!(wide.position.col, 1);

        let canvas = service.load_canvas().unwrap();
        assert_eq!(canvas.total_cols, TOTAL_COLS);
        assert_eq!(canvas.validate(), Ok(()));
    }
}

#[test]
fn deleting_last_card_drops_row_and_renumbers() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    let bottom = service.add_item("https://a.test", "a", 5).unwrap();
    let middle = service.add_item("https://b.test", "b", 2).unwrap();
    let lone = service.add_item("https://c.test", "c", 5).unwrap();
    // Rows now: [c], [b], [a].

    let canvas = service.delete_item(&middle.id).unwrap();
    assert_eq!(canvas.rows.len(), 2);
    assert_eq!(canvas.rows[1].items[0].id, bottom.id);
    assert_eq!(canvas.rows[1].items[0].position.row, 2);

    let canvas = service.delete_item(&lone.id).unwrap();
    assert_eq!(canvas.rows.len(), 1);
    assert_eq!(canvas.rows[0].items[0].position.row, 1);

    assert!(matches!(
        service.delete_item("missing"),
        Err(CanvasServiceError::ItemNotFound(_))
    ));
}

#[test]
fn deleting_non_last_card_keeps_other_positions() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    let left = service.add_item("https://a.test", "a", 2).unwrap();
    let right = service.add_item("https://b.test", "b", 2).unwrap();

    let canvas = service.delete_item(&left.id).unwrap();
    let (row_index, item) = canvas.find_item(&right.id).unwrap();
    assert_eq!(row_index, 0);
    assert_eq!(item.position, right.position);
}

#[test]
fn row_move_persists_and_noop_skips_write() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    service.add_item("https://a.test", "a", 5).unwrap();
    service.add_item("https://b.test", "b", 5).unwrap();
    // Rows now: [b], [a].

    let before = store.get_raw(CANVAS_KEY).unwrap();
    let noop = service
        .move_row(RowMove {
            source: 0,
            target: 1,
            insert_after: false,
        })
        .unwrap();
    assert_eq!(noop, ReorderOutcome::Unchanged(NoOpReason::SamePosition));
    assert_eq!(store.get_raw(CANVAS_KEY).unwrap(), before);

    let moved = service
        .move_row(RowMove {
            source: 0,
            target: 1,
            insert_after: true,
        })
        .unwrap();
    assert!(moved.is_moved());
    let canvas = service.load_canvas().unwrap();
    assert_eq!(canvas.rows[0].items[0].text, "a");
    assert_eq!(canvas.rows[1].items[0].position.row, 2);
}

#[test]
fn resize_commit_is_written_back() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    let item = service.add_item("https://a.test", "a", 2).unwrap();

    let session = ResizeSession::begin(
        item.id.clone(),
        ResizeEdge::Right,
        item.position.col,
        item.len,
        100.0,
        500.0,
    );
    let commit = session.end(300.0);
    let resized = service.commit_resize(&commit).unwrap();
    assert_eq!((resized.position.col, resized.len), (1, 4));

    service.delete_item(&item.id).unwrap();
    assert!(matches!(
        service.commit_resize(&commit),
        Err(CanvasServiceError::ItemNotFound(_))
    ));
}

#[test]
fn unchanged_resize_skips_write() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    let item = service.add_item("https://a.test", "a", 2).unwrap();
    let before = store.get_raw(CANVAS_KEY).unwrap();

    let session = ResizeSession::begin(
        item.id.clone(),
        ResizeEdge::Left,
        item.position.col,
        item.len,
        100.0,
        500.0,
    );
    let commit = session.end(140.0);
    assert!(!commit.changed);

    let current = service.commit_resize(&commit).unwrap();
    assert_eq!(current, item);
    assert_eq!(store.get_raw(CANVAS_KEY).unwrap(), before);
}

#[test]
fn runaway_pointer_resize_lands_on_grid_edge() {
    let store = MemoryDocumentStore::new();
    let service = service(&store);
    let item = service.add_item("https://a.test", "a", 2).unwrap();

    let session = ResizeSession::begin(
        item.id.clone(),
        ResizeEdge::Right,
        item.position.col,
        item.len,
        0.0,
        500.0,
    );
    let resized = service.commit_resize(&session.end(1e12)).unwrap();
    assert_eq!((resized.position.col, resized.len), (1, TOTAL_COLS));
    assert_eq!(service.load_canvas().unwrap().validate(), Ok(()));
}

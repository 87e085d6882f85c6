use slicemark_core::grid::resize::apply_resize;
use slicemark_core::{
    pointer_delta_cols, resize, Canvas, CanvasItem, CanvasRow, GridPosition, ResizeEdge,
    ResizeResult, ResizeSession, ResizeTracker, SessionError, TOTAL_COLS,
};

#[test]
fn pointer_delta_rounds_half_up() {
    // 500px grid -> 100px per column.
    assert_eq!(pointer_delta_cols(149.0, 500.0, 5), 1);
    assert_eq!(pointer_delta_cols(150.0, 500.0, 5), 2);
    assert_eq!(pointer_delta_cols(-150.0, 500.0, 5), -1);
    assert_eq!(pointer_delta_cols(-151.0, 500.0, 5), -2);
    assert_eq!(pointer_delta_cols(80.0, 0.0, 5), 0);
}

#[test]
fn huge_pointer_moves_clamp_without_overflow() {
    assert_eq!(pointer_delta_cols(1e12, 500.0, 5), 5);
    assert_eq!(pointer_delta_cols(-1e12, 500.0, 5), -5);
    assert_eq!(pointer_delta_cols(f64::NAN, 500.0, 5), 0);

    let session = ResizeSession::begin("a", ResizeEdge::Right, 1, 2, 0.0, 500.0);
    assert_eq!(session.update(1e12), ResizeResult { col: 1, len: 5 });
    assert_eq!(session.update(f64::INFINITY), ResizeResult { col: 1, len: 2 });

    let session = ResizeSession::begin("a", ResizeEdge::Left, 3, 2, 0.0, 500.0);
    assert_eq!(session.update(-1e12), ResizeResult { col: 1, len: 4 });
    assert_eq!(session.end(1e12).result, ResizeResult { col: 5, len: 1 });

    assert_eq!(
        resize(ResizeEdge::Right, 1, 2, i32::MAX, TOTAL_COLS),
        ResizeResult { col: 1, len: 5 }
    );
    assert_eq!(
        resize(ResizeEdge::Left, 3, 2, i32::MIN, TOTAL_COLS),
        ResizeResult { col: 1, len: 4 }
    );
}

#[test]
fn resize_never_leaves_the_grid() {
    for edge in [ResizeEdge::Left, ResizeEdge::Right] {
        for start_col in 1..=TOTAL_COLS {
            for start_len in 1..=(TOTAL_COLS - start_col + 1) {
                for delta in -7..=7 {
                    let ResizeResult { col, len } =
                        resize(edge, start_col, start_len, delta, TOTAL_COLS);
                    assert!(col >= 1 && len >= 1);
                    assert!(u16::from(col) + u16::from(len) - 1 <= u16::from(TOTAL_COLS));
                }
            }
        }
    }
}

#[test]
fn documented_resize_cases() {
    assert_eq!(
        resize(ResizeEdge::Right, 2, 2, 2, TOTAL_COLS),
        ResizeResult { col: 2, len: 4 }
    );
    assert_eq!(
        resize(ResizeEdge::Left, 2, 2, -1, TOTAL_COLS),
        ResizeResult { col: 1, len: 3 }
    );
}

#[test]
fn tracker_session_commits_once_and_clears() {
    let mut tracker = ResizeTracker::new();
    tracker
        .begin(ResizeSession::begin("card", ResizeEdge::Right, 2, 2, 300.0, 500.0))
        .unwrap();

    assert_eq!(tracker.update(420.0).unwrap(), ResizeResult { col: 2, len: 3 });
    assert_eq!(
        tracker.begin(ResizeSession::begin("other", ResizeEdge::Left, 1, 1, 0.0, 500.0)),
        Err(SessionError::AlreadyActive)
    );

    let commit = tracker.end(510.0).unwrap();
    assert_eq!(commit.item_id, "card");
    assert_eq!(commit.result, ResizeResult { col: 2, len: 4 });
    assert!(!tracker.is_active());
    assert_eq!(tracker.end(510.0), Err(SessionError::NoActiveSession));
}

#[test]
fn commit_applies_only_to_matching_card() {
    let mut canvas = Canvas {
        total_cols: TOTAL_COLS,
        rows: vec![CanvasRow {
            items: vec![CanvasItem {
                id: "card".to_string(),
                url: String::new(),
                text: "card".to_string(),
                len: 2,
                position: GridPosition { row: 1, col: 2 },
            }],
            height: 60.0,
        }],
    };
    let result = ResizeResult { col: 1, len: 3 };

    assert!(apply_resize(&mut canvas, "card", result));
    assert!(!apply_resize(&mut canvas, "gone", result));
    let item = &canvas.rows[0].items[0];
    assert_eq!((item.position.col, item.len, item.position.row), (1, 3, 1));
}

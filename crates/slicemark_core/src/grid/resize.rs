//! Edge-drag resize of one card inside its row.
//!
//! # Invariants
//! - Results always satisfy `col >= 1`, `len >= 1` and
//!   `col + len - 1 <= total_cols`.
//! - Resize never changes row membership or row order.

use crate::model::canvas::Canvas;
use serde::{Deserialize, Serialize};

/// Card edge grabbed by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeEdge {
    Left,
    Right,
}

/// Column/span pair produced by a resize step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeResult {
    pub col: u8,
    pub len: u8,
}

/// Converts a pixel delta into whole columns.
///
/// Rounds half toward positive infinity, matching the browser's
/// `Math.round`. The result is clamped to `[-total_cols, total_cols]`; a
/// non-positive container width or a non-finite quotient yields zero.
pub fn pointer_delta_cols(pixel_delta: f64, container_width: f64, total_cols: u8) -> i32 {
    if container_width <= 0.0 || total_cols == 0 {
        return 0;
    }
    let col_width = container_width / f64::from(total_cols);
    let cols = (pixel_delta / col_width + 0.5).floor();
    if !cols.is_finite() {
        return 0;
    }
    let limit = f64::from(total_cols);
    cols.clamp(-limit, limit) as i32
}

/// Computes the new column and span for an edge drag of `delta_cols`.
pub fn resize(
    edge: ResizeEdge,
    start_col: u8,
    start_len: u8,
    delta_cols: i32,
    total_cols: u8,
) -> ResizeResult {
    let total = i32::from(total_cols.max(1));
    let start_col = i32::from(start_col).clamp(1, total);
    let start_len = i32::from(start_len);
    // Anything past one grid width clamps the same way.
    let delta_cols = delta_cols.clamp(-total, total);

    let (col, len) = match edge {
        ResizeEdge::Right => {
            let len = (start_len + delta_cols).clamp(1, total - start_col + 1);
            (start_col, len)
        }
        ResizeEdge::Left => {
            let mut col = (start_col + delta_cols).clamp(1, total);
            let len = (start_len - (col - start_col)).clamp(1, total);
            if col + len - 1 > total {
                col = total - len + 1;
            }
            (col, len)
        }
    };

    ResizeResult {
        col: col as u8,
        len: len as u8,
    }
}

/// Writes a committed resize back onto the card with `id`.
///
/// Returns `false` when no card has that id. Only `position.col` and `len`
/// of the first match are touched.
pub fn apply_resize(canvas: &mut Canvas, id: &str, result: ResizeResult) -> bool {
    let target = canvas
        .rows
        .iter_mut()
        .flat_map(|row| row.items.iter_mut())
        .find(|item| item.id == id);
    match target {
        Some(item) => {
            item.position.col = result.col;
            item.len = result.len;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_edge_grows_within_grid() {
        assert_eq!(
            resize(ResizeEdge::Right, 2, 2, 2, 5),
            ResizeResult { col: 2, len: 4 }
        );
        assert_eq!(
            resize(ResizeEdge::Right, 2, 2, 9, 5),
            ResizeResult { col: 2, len: 4 }
        );
        assert_eq!(
            resize(ResizeEdge::Right, 2, 2, -5, 5),
            ResizeResult { col: 2, len: 1 }
        );
    }

    #[test]
    fn left_edge_moves_start_and_keeps_end() {
        assert_eq!(
            resize(ResizeEdge::Left, 2, 2, -1, 5),
            ResizeResult { col: 1, len: 3 }
        );
        assert_eq!(
            resize(ResizeEdge::Left, 2, 3, 1, 5),
            ResizeResult { col: 3, len: 2 }
        );
    }

    #[test]
    fn left_edge_past_right_end_slides_back() {
        assert_eq!(
            resize(ResizeEdge::Left, 4, 2, 4, 5),
            ResizeResult { col: 5, len: 1 }
        );
    }

    #[test]
    fn results_stay_inside_grid() {
        for edge in [ResizeEdge::Left, ResizeEdge::Right] {
            for col in 1..=5u8 {
                for len in 1..=(6 - col) {
                    for delta in -7..=7 {
                        let result = resize(edge, col, len, delta, 5);
                        assert!(result.col >= 1, "{edge:?} {col} {len} {delta}");
                        assert!(result.len >= 1, "{edge:?} {col} {len} {delta}");
                        assert!(
                            u16::from(result.col) + u16::from(result.len) - 1 <= 5,
                            "{edge:?} {col} {len} {delta} -> {result:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn pointer_delta_rounds_half_up() {
        assert_eq!(pointer_delta_cols(50.0, 500.0, 5), 1);
        assert_eq!(pointer_delta_cols(49.0, 500.0, 5), 0);
        assert_eq!(pointer_delta_cols(-50.0, 500.0, 5), 0);
        assert_eq!(pointer_delta_cols(-51.0, 500.0, 5), -1);
        assert_eq!(pointer_delta_cols(200.0, 500.0, 5), 2);
        assert_eq!(pointer_delta_cols(10.0, 0.0, 5), 0);
    }

    #[test]
    fn extreme_deltas_clamp_instead_of_overflowing() {
        assert_eq!(pointer_delta_cols(1e12, 500.0, 5), 5);
        assert_eq!(pointer_delta_cols(-1e12, 500.0, 5), -5);
        assert_eq!(pointer_delta_cols(10.0, 1e-320, 5), 5);
        assert_eq!(pointer_delta_cols(f64::INFINITY, 500.0, 5), 0);
        assert_eq!(pointer_delta_cols(f64::NAN, 500.0, 5), 0);

        assert_eq!(
            resize(ResizeEdge::Right, 1, 2, i32::MAX, 5),
            ResizeResult { col: 1, len: 5 }
        );
        assert_eq!(
            resize(ResizeEdge::Left, 3, 2, i32::MIN, 5),
            ResizeResult { col: 1, len: 4 }
        );
        assert_eq!(
            resize(ResizeEdge::Left, 3, 2, i32::MAX, 5),
            ResizeResult { col: 5, len: 1 }
        );
    }
}

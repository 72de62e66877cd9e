//! Shared input handling: coordinate conversion, click targets, and event types.
//!
//! Nothing here knows about the game; `tap::TapGame` does the dispatch.

use ratzilla::ratatui::layout::Rect;

/// All possible input events, normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from keyboard (lowercased).
    Key(char),
    /// A click/tap on a registered target, with the cell it landed on.
    Click { action_id: u16, col: u16, row: u16 },
}

/// A region on screen that can be tapped/clicked to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// The rectangular region (in terminal cell coordinates) for hit testing.
    pub rect: Rect,
    /// Semantic action ID, see `tap::actions`.
    pub action_id: u16,
}

/// Shared state between the render loop and click handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Register a click target with a rectangular hit region and a semantic action ID.
    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register a full-row click target at the given row within an area.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Action ID of the target under a cell. Later-registered (topmost) targets win.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }
}

/// Whether a screen width (in columns) should use the stacked layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 70
}

/// Convert a pixel Y coordinate (relative to the grid's top edge) to a row.
///
/// Returns `None` if the click is outside the grid or inputs are invalid.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }
    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;
    if row >= terminal_rows { None } else { Some(row) }
}

/// Convert a pixel X coordinate (relative to the grid's left edge) to a column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    if col >= terminal_cols { None } else { Some(col) }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── hit_test ────────────────────────────────────────────────

    #[test]
    fn hit_test_coin_and_upgrade_rows() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(2, 4, 12, 5), 0);
        cs.add_click_target(Rect::new(40, 6, 30, 1), 100);

        assert_eq!(cs.hit_test(2, 4), Some(0));
        assert_eq!(cs.hit_test(13, 8), Some(0));
        assert_eq!(cs.hit_test(14, 8), None);
        assert_eq!(cs.hit_test(55, 6), Some(100));
        assert_eq!(cs.hit_test(55, 7), None);
    }

    #[test]
    fn hit_test_overlap_last_wins() {
        let mut cs = ClickState::new();
        // Full-screen backdrop first, dialog button on top.
        cs.add_click_target(Rect::new(0, 0, 80, 30), 1);
        cs.add_click_target(Rect::new(30, 12, 20, 1), 2);

        assert_eq!(cs.hit_test(35, 12), Some(2));
        assert_eq!(cs.hit_test(5, 12), Some(1));
    }

    #[test]
    fn hit_test_empty() {
        let cs = ClickState::new();
        assert_eq!(cs.hit_test(0, 0), None);
    }

    #[test]
    fn add_row_target_clipped_to_area() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 12, 99);
        cs.add_row_target(area, 9, 98);
        cs.add_row_target(area, 15, 97);

        assert_eq!(cs.targets.len(), 1);
        assert_eq!(cs.hit_test(5, 12), Some(99));
        assert_eq!(cs.hit_test(34, 12), Some(99));
        assert_eq!(cs.hit_test(35, 12), None);
    }

    #[test]
    fn clear_removes_targets() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 1, 80, 1), 1);
        cs.clear_targets();
        assert_eq!(cs.hit_test(0, 1), None);
    }

    #[test]
    fn narrow_layout_threshold() {
        assert!(is_narrow_layout(40));
        assert!(is_narrow_layout(69));
        assert!(!is_narrow_layout(70));
        assert!(!is_narrow_layout(120));
    }

    // ── pixel conversion ────────────────────────────────────────

    #[test]
    fn pixel_to_row_basic() {
        // 30 rows, grid 450px tall → each row is 15px
        assert_eq!(pixel_y_to_row(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(14.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(449.0, 450.0, 30), Some(29));
    }

    #[test]
    fn pixel_to_row_rejects_outside() {
        assert_eq!(pixel_y_to_row(450.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(-1.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 0.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 450.0, 0), None);
    }

    #[test]
    fn pixel_to_col_basic() {
        assert_eq!(pixel_x_to_col(0.0, 800.0, 80), Some(0));
        assert_eq!(pixel_x_to_col(10.0, 800.0, 80), Some(1));
        assert_eq!(pixel_x_to_col(799.0, 800.0, 80), Some(79));
        assert_eq!(pixel_x_to_col(800.0, 800.0, 80), None);
        assert_eq!(pixel_x_to_col(-1.0, 800.0, 80), None);
    }

    #[test]
    fn tap_pipeline_hits_coin() {
        let mut cs = ClickState::new();
        cs.terminal_cols = 80;
        cs.terminal_rows = 30;
        cs.add_click_target(Rect::new(4, 6, 16, 5), 0);

        // 640x450 px grid → 8x15 px cells
        let col = pixel_x_to_col(100.0, 640.0, cs.terminal_cols).unwrap();
        let row = pixel_y_to_row(120.0, 450.0, cs.terminal_rows).unwrap();
        assert_eq!((col, row), (12, 8));
        assert_eq!(cs.hit_test(col, row), Some(0));
    }
}

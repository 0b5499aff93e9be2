//! Layout helpers for the folio TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Preferred chat window size in cells.
pub const CHAT_WIDTH: u16 = 56;
pub const CHAT_HEIGHT: u16 = 22;

/// Gap between the chat window and the screen edge.
const CHAT_MARGIN: u16 = 1;

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Create the main layout with status bar at bottom.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Floating chat window anchored to the bottom-right of `area`.
///
/// Shrinks to fit small terminals, keeping the margin where possible.
pub fn chat_window(area: Rect) -> Rect {
    let width = CHAT_WIDTH.min(area.width.saturating_sub(CHAT_MARGIN * 2)).max(area.width.min(20));
    let height = CHAT_HEIGHT
        .min(area.height.saturating_sub(CHAT_MARGIN * 2))
        .max(area.height.min(8));
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + area.width.saturating_sub(width + CHAT_MARGIN).min(area.width - width);
    let y = area.y + area.height.saturating_sub(height + CHAT_MARGIN).min(area.height - height);
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_window_bottom_right() {
        let area = Rect::new(0, 0, 120, 40);
        let rect = chat_window(area);
        assert_eq!(rect.width, CHAT_WIDTH);
        assert_eq!(rect.height, CHAT_HEIGHT);
        assert_eq!(rect.right(), 119);
        assert_eq!(rect.bottom(), 39);
    }

    #[test]
    fn test_chat_window_shrinks_to_fit() {
        let area = Rect::new(0, 0, 40, 12);
        let rect = chat_window(area);
        assert!(rect.width <= 40);
        assert!(rect.height <= 12);
        assert!(rect.x >= area.x && rect.y >= area.y);
        assert!(rect.right() <= area.right());
        assert!(rect.bottom() <= area.bottom());
    }

    #[test]
    fn test_chat_window_tiny_area() {
        let area = Rect::new(0, 0, 10, 4);
        let rect = chat_window(area);
        assert_eq!(rect, area);
    }

    #[test]
    fn test_centered_fixed() {
        let rect = centered_fixed(10, 4, Rect::new(0, 0, 30, 10));
        assert_eq!(rect, Rect::new(10, 3, 10, 4));
    }
}

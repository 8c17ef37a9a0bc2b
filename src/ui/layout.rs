use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const MIN_WIDTH: u16 = 24;
pub const MIN_HEIGHT: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub sky: Rect,
    pub status: Rect,
    pub hints: Rect,
}

#[must_use]
pub fn fits(area: Rect) -> bool {
    area.width >= MIN_WIDTH && area.height >= MIN_HEIGHT
}

/// Sky on top, then one status line and one key-hint line.
#[must_use]
pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    ScreenLayout {
        sky: chunks[0],
        status: chunks[1],
        hints: chunks[2],
    }
}

/// Sky area for a terminal of `cols` x `rows`.
#[must_use]
pub fn sky_area(cols: u16, rows: u16) -> Rect {
    let area = Rect::new(0, 0, cols, rows);
    if fits(area) {
        screen_layout(area).sky
    } else {
        Rect::new(0, 0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_reserves_two_bottom_lines() {
        let layout = screen_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.sky, Rect::new(0, 0, 80, 22));
        assert_eq!(layout.status, Rect::new(0, 22, 80, 1));
        assert_eq!(layout.hints, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn tiny_terminal_has_no_sky() {
        assert_eq!(sky_area(20, 24).area(), 0);
        assert_eq!(sky_area(80, 5).area(), 0);
        assert_eq!(sky_area(80, 24).height, 22);
    }
}

use super::surface::{CanvasSize, Point};

pub const COLUMN_WIDTH: f32 = 3.0;
/// Share of `height × depth_max` a single column may fill.
pub const PILE_FILL_RATIO: f32 = 0.85;
/// Share of a landing flake's radius added to its column.
pub const DEPOSIT_RATIO: f32 = 0.3;
pub const VISIBLE_THRESHOLD: f32 = 0.5;

/// Ground snow, one pile height per 3px column.
#[derive(Debug, Clone, Default)]
pub struct SnowPiles {
    heights: Vec<f32>,
    cap: f32,
}

impl SnowPiles {
    #[must_use]
    pub fn new(size: CanvasSize, depth_max: f32) -> Self {
        let mut piles = Self::default();
        piles.reset(size, depth_max);
        piles
    }

    pub fn reset(&mut self, size: CanvasSize, depth_max: f32) {
        let columns = (size.width / COLUMN_WIDTH).ceil().max(1.0) as usize;
        self.heights.clear();
        self.heights.resize(columns, 0.0);
        self.cap = (size.height * depth_max.max(0.0) * PILE_FILL_RATIO).max(0.0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    #[must_use]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    #[must_use]
    pub fn cap(&self) -> f32 {
        self.cap
    }

    #[must_use]
    pub fn column_for(&self, x: f32) -> usize {
        let col = (x / COLUMN_WIDTH).floor().max(0.0) as usize;
        col.min(self.heights.len().saturating_sub(1))
    }

    #[must_use]
    pub fn height(&self, column: usize) -> f32 {
        self.heights.get(column).copied().unwrap_or(0.0)
    }

    /// Adds a landed flake to `column` and returns the new pile height.
    pub fn deposit(&mut self, column: usize, flake_radius: f32) -> f32 {
        let cap = self.cap;
        let Some(height) = self.heights.get_mut(column) else {
            return 0.0;
        };
        *height = (*height + flake_radius * DEPOSIT_RATIO).min(cap);
        *height
    }

    #[must_use]
    pub fn peak(&self) -> f32 {
        self.heights.iter().copied().fold(0.0, f32::max)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.peak() > VISIBLE_THRESHOLD
    }

    /// Top edge of the snow, left to right.
    #[must_use]
    pub fn surface(&self, size: CanvasSize) -> Vec<Point> {
        self.heights
            .iter()
            .enumerate()
            .map(|(col, h)| Point::new(col as f32 * COLUMN_WIDTH, size.height - h))
            .collect()
    }

    /// Closed silhouette: bottom-left corner, the surface, bottom-right corner.
    #[must_use]
    pub fn outline(&self, size: CanvasSize) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.heights.len() + 2);
        points.push(Point::new(0.0, size.height));
        points.extend(self.surface(size));
        points.push(Point::new(size.width, size.height));
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size() -> CanvasSize {
        CanvasSize::new(300.0, 200.0)
    }

    #[test]
    fn one_column_per_three_pixels() {
        let piles = SnowPiles::new(CanvasSize::new(301.0, 100.0), 0.1);
        assert_eq!(piles.len(), 101);
        assert_eq!(piles.column_for(0.0), 0);
        assert_eq!(piles.column_for(5.9), 1);
        assert_eq!(piles.column_for(-20.0), 0);
        assert_eq!(piles.column_for(10_000.0), 100);
    }

    #[test]
    fn deposit_grows_by_fraction_of_radius() {
        let mut piles = SnowPiles::new(size(), 0.18);
        let h = piles.deposit(4, 2.0);
        assert!((h - 0.6).abs() < 1e-6);
        assert!((piles.height(4) - 0.6).abs() < 1e-6);
        assert_eq!(piles.height(3), 0.0);
    }

    #[test]
    fn deposit_is_capped() {
        let mut piles = SnowPiles::new(size(), 0.05);
        let cap = 200.0 * 0.05 * PILE_FILL_RATIO;
        for _ in 0..1_000 {
            piles.deposit(0, 3.5);
        }
        assert!((piles.height(0) - cap).abs() < 1e-4);
        assert!((piles.cap() - cap).abs() < 1e-4);
    }

    #[test]
    fn deposit_out_of_range_is_ignored() {
        let mut piles = SnowPiles::new(size(), 0.1);
        assert_eq!(piles.deposit(9_999, 3.0), 0.0);
        assert_eq!(piles.peak(), 0.0);
    }

    #[test]
    fn visible_only_above_threshold() {
        let mut piles = SnowPiles::new(size(), 0.18);
        piles.deposit(1, 1.0);
        assert!(!piles.is_visible());
        piles.deposit(1, 1.0);
        assert!(piles.is_visible());
    }

    #[test]
    fn outline_closes_along_bottom_edge() {
        let mut piles = SnowPiles::new(CanvasSize::new(9.0, 50.0), 0.18);
        piles.deposit(1, 2.0);
        let outline = piles.outline(CanvasSize::new(9.0, 50.0));
        assert_eq!(outline.len(), piles.len() + 2);
        assert_eq!(outline[0], Point::new(0.0, 50.0));
        assert_eq!(outline[2], Point::new(3.0, 50.0 - 0.6));
        assert_eq!(*outline.last().expect("closing corner"), Point::new(9.0, 50.0));
    }

    #[test]
    fn reset_clears_heights() {
        let mut piles = SnowPiles::new(size(), 0.18);
        piles.deposit(0, 3.0);
        piles.reset(CanvasSize::new(30.0, 200.0), 0.0);
        assert_eq!(piles.len(), 10);
        assert_eq!(piles.peak(), 0.0);
        assert_eq!(piles.cap(), 0.0);
    }
}

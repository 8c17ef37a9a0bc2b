#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::fx::surface::{CanvasSize, Point, Rgba, Stroke, Surface};

/// Virtual pixels covered by one terminal cell.
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Strokes at least this wide tint the background instead of drawing glyphs.
const WASH_STROKE_WIDTH: f32 = 8.0;
const LINE_SAMPLE_PX: f32 = 4.0;
const BLUR_WASH: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterCell {
    pub glyph: Option<char>,
    /// Foreground color for `glyph`.
    pub ink: Rgba,
    /// Translucent tint laid over the sky background.
    pub wash: Rgba,
    /// Accumulated soft coverage from gradients, `0..=1`.
    pub haze: f32,
}

impl Default for RasterCell {
    fn default() -> Self {
        Self {
            glyph: None,
            ink: Rgba::TRANSPARENT,
            wash: Rgba::TRANSPARENT,
            haze: 0.0,
        }
    }
}

impl RasterCell {
    /// Shade glyph for haze-only cells.
    #[must_use]
    pub fn shade(&self) -> Option<char> {
        match self.haze {
            h if h >= 0.5 => Some('▓'),
            h if h >= 0.25 => Some('▒'),
            h if h >= 0.05 => Some('░'),
            _ => None,
        }
    }
}

/// A [`Surface`] that rasterizes the engine's vector calls onto a grid of terminal cells.
#[derive(Debug, Clone)]
pub struct CellRaster {
    cols: u16,
    rows: u16,
    cells: Vec<RasterCell>,
}

impl CellRaster {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![RasterCell::default(); usize::from(cols) * usize::from(rows)],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if (cols, rows) == (self.cols, self.rows) {
            return;
        }
        *self = Self::new(cols, rows);
    }

    #[must_use]
    pub fn cols(&self) -> u16 {
        self.cols
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Canvas the engine should draw into, or `None` when the grid has no cells.
    #[must_use]
    pub fn canvas_size(&self) -> Option<CanvasSize> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        Some(CanvasSize::new(
            f32::from(self.cols) * CELL_WIDTH_PX,
            f32::from(self.rows) * CELL_HEIGHT_PX,
        ))
    }

    #[must_use]
    pub fn cell(&self, col: u16, row: u16) -> Option<&RasterCell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells
            .get(usize::from(row) * usize::from(self.cols) + usize::from(col))
    }

    #[must_use]
    pub fn glyph_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.glyph.is_some()).count()
    }

    /// Cell holding virtual pixel `p`, if it is on the grid.
    #[must_use]
    pub fn cell_for(&self, p: Point) -> Option<(u16, u16)> {
        if p.x < 0.0 || p.y < 0.0 || !p.x.is_finite() || !p.y.is_finite() {
            return None;
        }
        let col = (p.x / CELL_WIDTH_PX) as usize;
        let row = (p.y / CELL_HEIGHT_PX) as usize;
        if col >= usize::from(self.cols) || row >= usize::from(self.rows) {
            return None;
        }
        Some((col as u16, row as u16))
    }

    fn cell_mut_at(&mut self, p: Point) -> Option<&mut RasterCell> {
        let (col, row) = self.cell_for(p)?;
        let index = usize::from(row) * usize::from(self.cols) + usize::from(col);
        self.cells.get_mut(index)
    }

    fn cell_center(col: usize, row: usize) -> Point {
        Point::new(
            (col as f32 + 0.5) * CELL_WIDTH_PX,
            (row as f32 + 0.5) * CELL_HEIGHT_PX,
        )
    }

    /// Column/row ranges of cells whose area intersects the pixel box.
    fn cell_span(
        &self,
        min: Point,
        max: Point,
    ) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let cols = usize::from(self.cols);
        let rows = usize::from(self.rows);
        let to_index = |v: f32, cell: f32, limit: usize| -> usize {
            if v <= 0.0 {
                0
            } else {
                ((v / cell) as usize).min(limit)
            }
        };
        let c0 = to_index(min.x, CELL_WIDTH_PX, cols);
        let c1 = to_index(max.x, CELL_WIDTH_PX, cols.saturating_sub(1)) + 1;
        let r0 = to_index(min.y, CELL_HEIGHT_PX, rows);
        let r1 = to_index(max.y, CELL_HEIGHT_PX, rows.saturating_sub(1)) + 1;
        (c0..c1.min(cols), r0..r1.min(rows))
    }

    fn wash_at(&mut self, p: Point, color: Rgba) {
        if let Some(cell) = self.cell_mut_at(p) {
            cell.wash = color.over(cell.wash);
        }
    }
}

fn circle_glyph(radius: f32) -> char {
    if radius < 1.2 {
        '·'
    } else if radius < 2.5 {
        '•'
    } else {
        '●'
    }
}

fn line_glyph(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax < ay * 0.4 {
        '│'
    } else if ay < ax * 0.4 {
        '─'
    } else if dx * dy > 0.0 {
        '╲'
    } else {
        '╱'
    }
}

/// Even-odd point-in-polygon test.
fn polygon_contains(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = points.len().saturating_sub(1);
    for (i, a) in points.iter().enumerate() {
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

impl Surface for CellRaster {
    fn clear(&mut self) {
        self.cells.fill(RasterCell::default());
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba, blur: f32) {
        let glyph = circle_glyph(radius);
        if let Some(cell) = self.cell_mut_at(center) {
            cell.glyph = Some(glyph);
            cell.ink = color;
            if blur > 0.0 {
                cell.wash = color.with_alpha(color.a * BLUR_WASH).over(cell.wash);
            }
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let steps = (dx.hypot(dy) / LINE_SAMPLE_PX).ceil().max(1.0) as usize;
        let wide = stroke.width >= WASH_STROKE_WIDTH;
        let glyph = line_glyph(dx, dy);
        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let p = Point::new(from.x + dx * t, from.y + dy * t);
            let Some(at) = self.cell_for(p) else {
                continue;
            };
            if last == Some(at) {
                continue;
            }
            last = Some(at);
            if wide {
                self.wash_at(p, stroke.color);
                continue;
            }
            if stroke.blur > 0.0 {
                self.wash_at(p, stroke.color.with_alpha(stroke.color.a * BLUR_WASH));
            }
            if let Some(cell) = self.cell_mut_at(p) {
                cell.glyph = Some(glyph);
                cell.ink = stroke.color;
            }
        }
    }

    fn fill_radial_ellipse(&mut self, center: Point, rx: f32, ry: f32, color: Rgba) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (cols, rows) = self.cell_span(
            Point::new(center.x - rx, center.y - ry),
            Point::new(center.x + rx, center.y + ry),
        );
        let stride = usize::from(self.cols);
        for row in rows {
            for col in cols.clone() {
                let c = Self::cell_center(col, row);
                let nx = (c.x - center.x) / rx;
                let ny = (c.y - center.y) / ry;
                let d = nx.mul_add(nx, ny * ny);
                if d >= 1.0 {
                    continue;
                }
                let weight = (1.0 - d.sqrt()) * color.a;
                if let Some(cell) = self.cells.get_mut(row * stride + col) {
                    cell.haze = (cell.haze + weight).min(1.0);
                    cell.wash = color.with_alpha(weight).over(cell.wash);
                }
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let (min, max) = points.iter().fold(
            (
                Point::new(f32::INFINITY, f32::INFINITY),
                Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
            ),
            |(lo, hi), p| {
                (
                    Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Point::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        );
        let (cols, rows) = self.cell_span(min, max);
        let stride = usize::from(self.cols);
        for row in rows {
            for col in cols.clone() {
                let center = Self::cell_center(col, row);
                let lower = Point::new(center.x, center.y + CELL_HEIGHT_PX * 0.25);
                let glyph = if polygon_contains(points, center) {
                    '█'
                } else if polygon_contains(points, lower) {
                    '▄'
                } else {
                    continue;
                };
                if let Some(cell) = self.cells.get_mut(row * stride + col) {
                    cell.glyph = Some(glyph);
                    cell.ink = color;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    fn thin(color: Rgba) -> Stroke {
        Stroke {
            color,
            width: 1.0,
            blur: 0.0,
        }
    }

    #[test]
    fn canvas_size_maps_cells_to_pixels() {
        let raster = CellRaster::new(10, 4);
        assert_eq!(raster.canvas_size(), Some(CanvasSize::new(80.0, 64.0)));
        assert_eq!(CellRaster::new(0, 4).canvas_size(), None);
    }

    #[test]
    fn circle_glyph_grows_with_radius() {
        let mut raster = CellRaster::new(4, 2);
        raster.fill_circle(Point::new(4.0, 8.0), 0.8, WHITE, 0.0);
        raster.fill_circle(Point::new(12.0, 8.0), 2.0, WHITE, 0.0);
        raster.fill_circle(Point::new(20.0, 8.0), 3.2, WHITE, 0.0);
        let glyphs: Vec<_> = (0..3)
            .filter_map(|col| raster.cell(col, 0).and_then(|cell| cell.glyph))
            .collect();
        assert_eq!(glyphs, vec!['·', '•', '●']);
    }

    #[test]
    fn off_grid_draws_are_ignored() {
        let mut raster = CellRaster::new(4, 2);
        raster.fill_circle(Point::new(-3.0, 4.0), 2.0, WHITE, 0.0);
        raster.fill_circle(Point::new(4.0, 200.0), 2.0, WHITE, 0.0);
        raster.stroke_line(
            Point::new(-50.0, -50.0),
            Point::new(-10.0, -10.0),
            thin(WHITE),
        );
        assert_eq!(raster.glyph_count(), 0);
    }

    #[test]
    fn vertical_streak_uses_bar_glyph() {
        let mut raster = CellRaster::new(4, 4);
        raster.stroke_line(Point::new(12.0, 2.0), Point::new(12.5, 40.0), thin(WHITE));
        assert_eq!(raster.cell(1, 0).and_then(|c| c.glyph), Some('│'));
        assert_eq!(raster.cell(1, 2).and_then(|c| c.glyph), Some('│'));
        assert_eq!(raster.glyph_count(), 3);
    }

    #[test]
    fn diagonal_glyph_follows_slope() {
        assert_eq!(line_glyph(10.0, 10.0), '╲');
        assert_eq!(line_glyph(-10.0, 10.0), '╱');
        assert_eq!(line_glyph(10.0, 0.5), '─');
    }

    #[test]
    fn wide_strokes_only_tint() {
        let mut raster = CellRaster::new(8, 2);
        raster.stroke_line(
            Point::new(0.0, 4.0),
            Point::new(60.0, 4.0),
            Stroke {
                color: WHITE.with_alpha(0.05),
                width: 30.0,
                blur: 0.0,
            },
        );
        assert_eq!(raster.glyph_count(), 0);
        let cell = raster.cell(3, 0).copied().unwrap_or_default();
        assert!(cell.wash.a > 0.0);
    }

    #[test]
    fn radial_ellipse_accumulates_haze_towards_center() {
        let mut raster = CellRaster::new(20, 6);
        let color = WHITE.with_alpha(0.8);
        raster.fill_radial_ellipse(Point::new(84.0, 56.0), 60.0, 40.0, color);
        let center = raster.cell(10, 3).copied().unwrap_or_default();
        let edge = raster.cell(16, 3).copied().unwrap_or_default();
        assert!(center.haze > edge.haze);
        assert_eq!(center.shade(), Some('▓'));
        assert!(raster.cell(0, 0).is_some_and(|c| c.haze == 0.0));
    }

    #[test]
    fn polygon_fills_cells_with_blocks() {
        let mut raster = CellRaster::new(4, 4);
        let ground = [
            Point::new(0.0, 64.0),
            Point::new(0.0, 42.0),
            Point::new(32.0, 42.0),
            Point::new(32.0, 64.0),
        ];
        raster.fill_polygon(&ground, WHITE);
        assert_eq!(raster.cell(0, 3).and_then(|c| c.glyph), Some('█'));
        assert_eq!(raster.cell(0, 2).and_then(|c| c.glyph), Some('▄'));
        assert_eq!(raster.cell(0, 1).and_then(|c| c.glyph), None);
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut raster = CellRaster::new(4, 2);
        raster.fill_circle(Point::new(4.0, 8.0), 2.0, WHITE, 4.0);
        raster.clear();
        assert_eq!(raster.glyph_count(), 0);
        assert_eq!(raster.cell(0, 0), Some(&RasterCell::default()));
    }

    #[test]
    fn resize_reallocates_grid() {
        let mut raster = CellRaster::new(4, 2);
        raster.resize(6, 3);
        assert_eq!((raster.cols(), raster.rows()), (6, 3));
        assert!(raster.cell(5, 2).is_some());
        assert!(raster.cell(6, 0).is_none());
    }
}

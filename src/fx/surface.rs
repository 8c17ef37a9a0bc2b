#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Drawable area in virtual pixels. Both sides are at least one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0.0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Source-over compositing of `self` onto `dst`.
    #[must_use]
    pub fn over(self, dst: Self) -> Self {
        let a = self.a + dst.a * (1.0 - self.a);
        if a <= f32::EPSILON {
            return Self::TRANSPARENT;
        }
        let mix = |s: u8, d: u8| {
            let v = (f32::from(s) * self.a + f32::from(d) * dst.a * (1.0 - self.a)) / a;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::new(mix(self.r, dst.r), mix(self.g, dst.g), mix(self.b, dst.b), a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    pub blur: f32,
}

/// The 2D drawing target the engine renders into once per frame.
///
/// Coordinates are virtual pixels with the origin at the top-left corner and y
/// growing downwards. Implementations decide how those pixels map onto a real
/// device.
pub trait Surface {
    fn clear(&mut self);

    /// Filled disc. A positive `blur` asks for a soft shadow around it.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba, blur: f32);

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke);

    /// Ellipse shaded with a radial gradient from `color` at the center to transparent at the rim.
    fn fill_radial_ellipse(&mut self, center: Point, rx: f32, ry: f32, color: Rgba);

    /// Closed polygon fill.
    fn fill_polygon(&mut self, points: &[Point], color: Rgba);

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        for pair in points.windows(2) {
            self.stroke_line(pair[0], pair[1], stroke);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Circle {
        center: Point,
        radius: f32,
        color: Rgba,
        blur: f32,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Ellipse {
        center: Point,
        rx: f32,
        ry: f32,
        color: Rgba,
    },
    Polygon {
        points: Vec<Point>,
        color: Rgba,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
}

/// Surface that records every call, for headless inspection of a frame.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations issued since the most recent clear.
    #[must_use]
    pub fn frame(&self) -> &[DrawOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::Clear))
            .map_or(0, |idx| idx + 1);
        &self.ops[start..]
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.frame().iter().filter(|op| pred(op)).count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba, blur: f32) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
            blur,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.ops.push(DrawOp::Line { from, to, stroke });
    }

    fn fill_radial_ellipse(&mut self, center: Point, rx: f32, ry: f32, color: Rgba) {
        self.ops.push(DrawOp::Ellipse {
            center,
            rx,
            ry,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        self.ops.push(DrawOp::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }
}

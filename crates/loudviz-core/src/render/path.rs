use std::f32::consts::PI;

use super::{Point, RectF};

/// Arcs are flattened to segments of at most this many radians.
const ARC_STEP: f32 = PI / 24.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubPath {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// A polyline path. Curves are flattened when added.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.subpaths.push(SubPath {
            points: vec![p],
            closed: false,
        });
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        match self.subpaths.last_mut() {
            Some(sub) if !sub.closed => sub.points.push(p),
            _ => {
                self.move_to(p);
            }
        }
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if let Some(sub) = self.subpaths.last_mut() {
            sub.closed = true;
        }
        self
    }

    /// Clockwise (in screen space) arc from `start` to `end` radians,
    /// connected to the current point by a straight line.
    pub fn arc(&mut self, center: Point, radius: f32, start: f32, end: f32) -> &mut Self {
        let sweep = end - start;
        let steps = ((sweep.abs() / ARC_STEP).ceil() as usize).max(1);
        for i in 0..=steps {
            let theta = start + sweep * i as f32 / steps as f32;
            self.line_to(Point::new(
                center.x + theta.cos() * radius,
                center.y + theta.sin() * radius,
            ));
        }
        self
    }

    pub fn circle(center: Point, radius: f32) -> Self {
        let mut path = Self::new();
        path.move_to(Point::new(center.x + radius, center.y));
        path.arc(center, radius, 0.0, 2.0 * PI).close();
        path
    }

    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::new();
        path.subpaths.push(SubPath {
            points: points.to_vec(),
            closed: true,
        });
        path
    }

    pub fn rounded_rect(rect: RectF, radius: f32) -> Self {
        let r = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
        let (x0, y0, x1, y1) = (rect.x, rect.y, rect.x + rect.w, rect.y + rect.h);
        let mut path = Self::new();
        path.move_to(Point::new(x0 + r, y0));
        path.arc(Point::new(x1 - r, y0 + r), r, -PI / 2.0, 0.0);
        path.arc(Point::new(x1 - r, y1 - r), r, 0.0, PI / 2.0);
        path.arc(Point::new(x0 + r, y1 - r), r, PI / 2.0, PI);
        path.arc(Point::new(x0 + r, y0 + r), r, PI, 1.5 * PI);
        path.close();
        path
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            subpaths: self
                .subpaths
                .iter()
                .map(|sub| SubPath {
                    points: sub.points.iter().map(|p| Point::new(p.x + dx, p.y + dy)).collect(),
                    closed: sub.closed,
                })
                .collect(),
        }
    }

    /// Bounding box of all points, `None` for an empty path.
    pub fn bounds(&self) -> Option<RectF> {
        let mut points = self.subpaths.iter().flat_map(|s| s.points.iter());
        let first = points.next()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in points {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(RectF::new(x0, y0, x1 - x0, y1 - y0))
    }
}

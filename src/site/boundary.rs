//! Site boundary polygons.
//!
//! Boundaries are given as an ordered sequence of `[x, y]` vertices in metres, relative to the
//! site origin. The order defines the winding of the polygon; the closing edge from the last
//! vertex back to the first is implicit.
use anyhow::{Result, ensure};
use float_cmp::approx_eq;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single polygon vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vertex {
    /// Easting (m)
    pub x: f64,
    /// Northing (m)
    pub y: f64,
}

impl From<[f64; 2]> for Vertex {
    fn from([x, y]: [f64; 2]) -> Self {
        Vertex { x, y }
    }
}

impl From<Vertex> for [f64; 2] {
    fn from(vertex: Vertex) -> Self {
        [vertex.x, vertex.y]
    }
}

/// The direction in which a polygon's vertices are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Positive signed area
    CounterClockwise,
    /// Negative signed area
    Clockwise,
}

impl fmt::Display for Winding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CounterClockwise => write!(f, "counter-clockwise"),
            Self::Clockwise => write!(f, "clockwise"),
        }
    }
}

/// An axis-aligned rectangle enclosing a polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// The corner with the smallest coordinates
    pub min: Vertex,
    /// The corner with the largest coordinates
    pub max: Vertex,
}

impl BoundingBox {
    /// Width along the x axis
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height along the y axis
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// A simple polygon given by its ordered vertices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(pub Vec<Vertex>);

impl Polygon {
    /// The polygon's vertices in order
    pub fn vertices(&self) -> &[Vertex] {
        &self.0
    }

    /// Iterate over the edges, including the closing edge
    fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        self.0.iter().copied().circular_tuple_windows()
    }

    /// Area computed with the shoelace formula, positive for counter-clockwise order
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            / 2.0
    }

    /// Area enclosed by the polygon (m²)
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// The order in which the vertices are given.
    ///
    /// Returns `None` for a degenerate polygon with zero area, which has no winding.
    pub fn winding(&self) -> Option<Winding> {
        let area = self.signed_area();
        if approx_eq!(f64, area, 0.0) {
            None
        } else if area > 0.0 {
            Some(Winding::CounterClockwise)
        } else {
            Some(Winding::Clockwise)
        }
    }

    /// Length of the boundary (m)
    pub fn perimeter(&self) -> f64 {
        self.edges()
            .map(|(a, b)| (b.x - a.x).hypot(b.y - a.y))
            .sum()
    }

    /// The centre of mass of the enclosed area.
    ///
    /// Returns `None` for a degenerate polygon with zero area.
    pub fn centroid(&self) -> Option<Vertex> {
        let area = self.signed_area();
        if approx_eq!(f64, area, 0.0) {
            return None;
        }

        let (cx, cy) = self.edges().fold((0.0, 0.0), |(cx, cy), (a, b)| {
            let cross = a.x * b.y - b.x * a.y;
            (cx + (a.x + b.x) * cross, cy + (a.y + b.y) * cross)
        });

        Some(Vertex {
            x: cx / (6.0 * area),
            y: cy / (6.0 * area),
        })
    }

    /// The smallest axis-aligned rectangle which contains every vertex
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let (min_x, max_x) = self.0.iter().map(|v| v.x).minmax_by(f64::total_cmp).into_option()?;
        let (min_y, max_y) = self.0.iter().map(|v| v.y).minmax_by(f64::total_cmp).into_option()?;

        Some(BoundingBox {
            min: Vertex { x: min_x, y: min_y },
            max: Vertex { x: max_x, y: max_y },
        })
    }

    /// Whether `point` lies inside the polygon, using the even-odd rule
    pub fn contains(&self, point: Vertex) -> bool {
        self.edges()
            .filter(|(a, b)| {
                (a.y > point.y) != (b.y > point.y)
                    && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            })
            .count()
            % 2
            == 1
    }

    /// Check that the polygon describes a usable boundary
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.0.len() >= 3,
            "A boundary must have at least 3 vertices, found {}",
            self.0.len()
        );
        ensure!(
            self.0.iter().all(|v| v.x.is_finite() && v.y.is_finite()),
            "Boundary vertices must have finite coordinates"
        );
        ensure!(
            !approx_eq!(f64, self.area(), 0.0),
            "Boundary encloses no area"
        );

        Ok(())
    }
}

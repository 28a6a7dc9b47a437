//! Shape elements and their derived renderable representation.

use serde::{Deserialize, Serialize};

use crate::geometry::{distance, Point};

/// Bounding coordinates of a shape element, in creation order.
///
/// Not normalized until the gesture that created or resized the element
/// commits (see [`crate::geometry::adjusted_coordinates`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// First corner x.
    pub x1: f32,
    /// First corner y.
    pub y1: f32,
    /// Second corner x.
    pub x2: f32,
    /// Second corner y.
    pub y2: f32,
}

/// The kind of shape a [`PaintingElement`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Straight line between the two defining points.
    Line,
    /// Axis-aligned rectangle spanned by the two defining points.
    Rectangle,
    /// Circle centered on the first point.
    Circle,
    /// Right triangle through the two defining points.
    Triangle,
    /// Unrecognized kind; renders as a degenerate primitive.
    Default,
}

/// The derived drawing primitive of an element.
///
/// Recomputed from geometry and style by the element factory; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Renderable {
    /// Straight line segment.
    Line {
        /// Segment start.
        from: Point,
        /// Segment end.
        to: Point,
    },
    /// Rectangle from an origin with (possibly negative) extent.
    Rectangle {
        /// Origin x (first corner, not normalized).
        x: f32,
        /// Origin y (first corner, not normalized).
        y: f32,
        /// Signed width.
        width: f32,
        /// Signed height.
        height: f32,
    },
    /// Circle sized by the two defining points.
    Circle {
        /// Center x.
        cx: f32,
        /// Center y.
        cy: f32,
        /// Diameter: twice the distance between the defining points.
        diameter: f32,
    },
    /// Closed polyline.
    Polyline {
        /// Vertices, first repeated last to close the path.
        points: Vec<Point>,
    },
    /// Degenerate zero-length primitive for unrecognized kinds.
    #[default]
    Empty,
}

/// Declarative parameters for the element factory.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    /// Stable index into the owning collection.
    pub id: usize,
    /// Bounding coordinates in creation order.
    pub coordinates: Coordinates,
    /// Shape kind.
    pub kind: ShapeKind,
    /// Stroke color as a hex string.
    pub stroke_color: String,
    /// Stroke width in pixels.
    pub stroke_width: f32,
}

/// A discrete shape primitive on the canvas.
///
/// Effectively immutable: every geometry or style change goes back through
/// the factory and produces a replacement value, so the renderable never
/// drifts out of sync with the fields it was derived from.
///
/// Invariant: `id` equals the element's index in its owning collection.
/// Removal renumbers the survivors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintingElement {
    id: usize,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    #[serde(rename = "type")]
    kind: ShapeKind,
    #[serde(rename = "strokeColor")]
    stroke_color: String,
    #[serde(rename = "width")]
    stroke_width: f32,
    #[serde(skip)]
    renderable: Renderable,
}

impl PaintingElement {
    /// Build an element, deriving its renderable from kind and geometry.
    ///
    /// Unrecognized kinds yield [`Renderable::Empty`] rather than failing.
    #[must_use]
    pub fn new(spec: ElementSpec) -> Self {
        let ElementSpec {
            id,
            coordinates: Coordinates { x1, y1, x2, y2 },
            kind,
            stroke_color,
            stroke_width,
        } = spec;
        let renderable = derive_renderable(kind, x1, y1, x2, y2);
        Self {
            id,
            x1,
            y1,
            x2,
            y2,
            kind,
            stroke_color,
            stroke_width,
            renderable,
        }
    }

    /// Replacement value with new bounding coordinates, renderable re-derived.
    #[must_use]
    pub fn with_coordinates(&self, coordinates: Coordinates) -> Self {
        Self::new(ElementSpec {
            id: self.id,
            coordinates,
            kind: self.kind,
            stroke_color: self.stroke_color.clone(),
            stroke_width: self.stroke_width,
        })
    }

    /// Replacement value with the far corner moved, renderable re-derived.
    ///
    /// Style comes from the caller so an in-progress drawing gesture tracks
    /// the current tool settings rather than the element's stale state.
    #[must_use]
    pub fn with_corner2(&self, x2: f32, y2: f32, stroke_color: String, stroke_width: f32) -> Self {
        Self::new(ElementSpec {
            id: self.id,
            coordinates: Coordinates {
                x1: self.x1,
                y1: self.y1,
                x2,
                y2,
            },
            kind: self.kind,
            stroke_color,
            stroke_width,
        })
    }

    /// Replacement value with a new collection index. Geometry and style
    /// are unchanged, so the renderable carries over as-is.
    #[must_use]
    pub fn with_id(&self, id: usize) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    /// Re-derive the renderable from the persisted fields.
    ///
    /// The renderable is skipped during serialization; call this after
    /// deserializing.
    #[must_use]
    pub fn restored(self) -> Self {
        let renderable = derive_renderable(self.kind, self.x1, self.y1, self.x2, self.y2);
        Self { renderable, ..self }
    }

    /// Collection index.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Bounding coordinates in creation order.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        }
    }

    /// Shape kind.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Stroke color as a hex string.
    #[must_use]
    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    /// Stroke width in pixels.
    #[must_use]
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// The derived drawing primitive.
    #[must_use]
    pub fn renderable(&self) -> &Renderable {
        &self.renderable
    }
}

/// One fixed rendering-primitive mapping per shape kind.
fn derive_renderable(kind: ShapeKind, x1: f32, y1: f32, x2: f32, y2: f32) -> Renderable {
    match kind {
        ShapeKind::Line => Renderable::Line {
            from: Point::new(x1, y1),
            to: Point::new(x2, y2),
        },
        ShapeKind::Rectangle => Renderable::Rectangle {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        },
        ShapeKind::Circle => Renderable::Circle {
            cx: x1,
            cy: y1,
            diameter: 2.0 * distance(Point::new(x1, y1), Point::new(x2, y2)),
        },
        ShapeKind::Triangle => Renderable::Polyline {
            points: vec![
                Point::new(x1, y1),
                Point::new(x2, y2),
                Point::new(x1, y2),
                Point::new(x1, y1),
            ],
        },
        ShapeKind::Default => Renderable::Empty,
    }
}

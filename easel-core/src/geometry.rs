//! Pure hit-testing and coordinate normalization.
//!
//! Every function here is stateless and infallible: degenerate input
//! degrades to `None` or a safe default instead of failing.

use serde::{Deserialize, Serialize};

use crate::element::{Coordinates, PaintingElement, ShapeKind};

/// Pixel tolerance for corner and endpoint hit tests.
const HANDLE_TOLERANCE: f32 = 5.0;

/// Tolerance on the triangle-inequality slack that flags a point as lying
/// on a line-like element.
const SEGMENT_TOLERANCE: f32 = 1.0;

/// A point on the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate in canvas pixels.
    pub x: f32,
    /// Y coordinate in canvas pixels.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Which part of an element a point hit-tests against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Top-left corner of a rectangle.
    TopLeft,
    /// Top-right corner of a rectangle.
    TopRight,
    /// Bottom-left corner of a rectangle.
    BottomLeft,
    /// Bottom-right corner of a rectangle.
    BottomRight,
    /// First endpoint of a line-like element.
    Start,
    /// Second endpoint of a line-like element.
    End,
    /// Interior of the element.
    Inside,
}

/// Cursor affordance for a hit position. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Resize along the main diagonal (nwse).
    DiagonalResize,
    /// Resize along the anti-diagonal (nesw).
    AntiDiagonalResize,
    /// Move the whole element.
    Move,
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Midpoint between two points. Used for stroke smoothing.
#[must_use]
pub fn mid_point(a: Point, b: Point) -> Point {
    Point::new(a.x + (b.x - a.x) / 2.0, a.y + (b.y - a.y) / 2.0)
}

/// Return `tag` if `(x, y)` lies within the handle tolerance of `(x1, y1)`.
///
/// The tolerance is an axis-aligned square, not a radius.
#[must_use]
pub fn near_point(x: f32, y: f32, x1: f32, y1: f32, tag: Position) -> Option<Position> {
    if (x - x1).abs() < HANDLE_TOLERANCE && (y - y1).abs() < HANDLE_TOLERANCE {
        Some(tag)
    } else {
        None
    }
}

/// Hit-test a point against one element.
///
/// Rectangles check their four corners before the bounding-box containment
/// check, so a point within tolerance of a corner is always tagged with
/// that corner, never `Inside`. All other kinds are treated as line-like:
/// endpoints first, then the perpendicular-offset check via the
/// triangle-inequality slack `|ab| - (|ac| + |bc|)`.
#[must_use]
pub fn position_within_element(x: f32, y: f32, element: &PaintingElement) -> Option<Position> {
    let Coordinates { x1, y1, x2, y2 } = element.coordinates();
    match element.kind() {
        ShapeKind::Rectangle => near_point(x, y, x1, y1, Position::TopLeft)
            .or_else(|| near_point(x, y, x2, y1, Position::TopRight))
            .or_else(|| near_point(x, y, x1, y2, Position::BottomLeft))
            .or_else(|| near_point(x, y, x2, y2, Position::BottomRight))
            .or_else(|| {
                (x >= x1 && x <= x2 && y >= y1 && y <= y2).then_some(Position::Inside)
            }),
        _ => {
            let a = Point::new(x1, y1);
            let b = Point::new(x2, y2);
            let c = Point::new(x, y);
            let offset = distance(a, b) - (distance(a, c) + distance(b, c));
            near_point(x, y, x1, y1, Position::Start)
                .or_else(|| near_point(x, y, x2, y2, Position::End))
                .or_else(|| (offset.abs() < SEGMENT_TOLERANCE).then_some(Position::Inside))
        }
    }
}

/// Find the first element (in collection order) hit by `(x, y)`.
///
/// Returns the element's index and the position tag. First match wins, so
/// elements drawn later (and rendered on top) must also be ordered last for
/// picking to agree with what the user sees.
#[must_use]
pub fn element_at_position(
    x: f32,
    y: f32,
    elements: &[PaintingElement],
) -> Option<(usize, Position)> {
    elements
        .iter()
        .enumerate()
        .find_map(|(index, element)| {
            position_within_element(x, y, element).map(|position| (index, position))
        })
}

/// Normalize an element's corner order.
///
/// Rectangles come out with `(x1, y1)` as the min corner and `(x2, y2)` as
/// the max corner. Line-like elements are reordered so `(x1, y1)` precedes
/// `(x2, y2)` by x, then by y. Idempotent, so resize handles behave the
/// same regardless of the drag direction that created the element.
#[must_use]
pub fn adjusted_coordinates(element: &PaintingElement) -> Coordinates {
    let Coordinates { x1, y1, x2, y2 } = element.coordinates();
    match element.kind() {
        ShapeKind::Rectangle => Coordinates {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        },
        _ => {
            if x1 < x2 || (x1 == x2 && y1 < y2) {
                Coordinates { x1, y1, x2, y2 }
            } else {
                Coordinates {
                    x1: x2,
                    y1: y2,
                    x2: x1,
                    y2: y1,
                }
            }
        }
    }
}

/// Map a resize-handle tag to new coordinates under the pointer.
///
/// Returns `None` for tags that do not resize (`Inside`), which callers
/// treat as a no-op.
#[must_use]
pub fn resized_coordinates(
    client_x: f32,
    client_y: f32,
    position: Position,
    coordinates: Coordinates,
) -> Option<Coordinates> {
    let Coordinates { x1, y1, x2, y2 } = coordinates;
    match position {
        Position::TopLeft | Position::Start => Some(Coordinates {
            x1: client_x,
            y1: client_y,
            x2,
            y2,
        }),
        Position::TopRight => Some(Coordinates {
            x1,
            y1: client_y,
            x2: client_x,
            y2,
        }),
        Position::BottomLeft => Some(Coordinates {
            x1: client_x,
            y1,
            x2,
            y2: client_y,
        }),
        Position::BottomRight | Position::End => Some(Coordinates {
            x1,
            y1,
            x2: client_x,
            y2: client_y,
        }),
        Position::Inside => None,
    }
}

/// Cursor affordance for a hit position.
#[must_use]
pub fn cursor_for_position(position: Position) -> Cursor {
    match position {
        Position::TopLeft | Position::BottomRight | Position::Start | Position::End => {
            Cursor::DiagonalResize
        }
        Position::TopRight | Position::BottomLeft => Cursor::AntiDiagonalResize,
        Position::Inside => Cursor::Move,
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::element::ElementSpec;
    use proptest::prelude::*;

    fn rectangle(x1: f32, y1: f32, x2: f32, y2: f32) -> PaintingElement {
        PaintingElement::new(ElementSpec {
            id: 0,
            coordinates: Coordinates { x1, y1, x2, y2 },
            kind: ShapeKind::Rectangle,
            stroke_color: "#000000".to_string(),
            stroke_width: 1.0,
        })
    }

    fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> PaintingElement {
        PaintingElement::new(ElementSpec {
            id: 0,
            coordinates: Coordinates { x1, y1, x2, y2 },
            kind: ShapeKind::Line,
            stroke_color: "#000000".to_string(),
            stroke_width: 1.0,
        })
    }

    #[test]
    fn test_distance() {
        let d = distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mid_point() {
        let m = mid_point(Point::new(0.0, 0.0), Point::new(4.0, 2.0));
        assert_eq!(m, Point::new(2.0, 1.0));
    }

    #[test]
    fn test_near_point_square_tolerance() {
        assert_eq!(
            near_point(14.0, 10.0, 10.0, 10.0, Position::Start),
            Some(Position::Start)
        );
        // 5px exactly is outside the strict tolerance.
        assert_eq!(near_point(15.0, 10.0, 10.0, 10.0, Position::Start), None);
        // Within on one axis only is a miss.
        assert_eq!(near_point(11.0, 20.0, 10.0, 10.0, Position::Start), None);
    }

    #[test]
    fn test_rectangle_interior_is_inside() {
        let rect = rectangle(10.0, 10.0, 100.0, 80.0);
        assert_eq!(
            position_within_element(50.0, 40.0, &rect),
            Some(Position::Inside)
        );
        assert_eq!(position_within_element(200.0, 40.0, &rect), None);
    }

    #[test]
    fn test_rectangle_corners_outrank_inside() {
        let rect = rectangle(10.0, 10.0, 100.0, 80.0);
        // Each corner point is also inside the bounds, but the corner tag
        // must win.
        assert_eq!(
            position_within_element(11.0, 11.0, &rect),
            Some(Position::TopLeft)
        );
        assert_eq!(
            position_within_element(99.0, 11.0, &rect),
            Some(Position::TopRight)
        );
        assert_eq!(
            position_within_element(11.0, 79.0, &rect),
            Some(Position::BottomLeft)
        );
        assert_eq!(
            position_within_element(99.0, 79.0, &rect),
            Some(Position::BottomRight)
        );
    }

    #[test]
    fn test_line_hit_positions() {
        let l = line(0.0, 0.0, 100.0, 0.0);
        assert_eq!(
            position_within_element(1.0, 1.0, &l),
            Some(Position::Start)
        );
        assert_eq!(
            position_within_element(99.0, 1.0, &l),
            Some(Position::End)
        );
        assert_eq!(
            position_within_element(50.0, 0.0, &l),
            Some(Position::Inside)
        );
        // Well off the segment.
        assert_eq!(position_within_element(50.0, 30.0, &l), None);
    }

    #[test]
    fn test_element_at_position_first_match_wins() {
        // Both rectangles contain the probe point; picking must return the
        // first in collection order.
        let a = rectangle(0.0, 0.0, 100.0, 100.0);
        let b = rectangle(0.0, 0.0, 100.0, 100.0);
        let elements = vec![a, b];
        let (index, position) =
            element_at_position(50.0, 50.0, &elements).expect("hit expected");
        assert_eq!(index, 0);
        assert_eq!(position, Position::Inside);
        assert_eq!(element_at_position(500.0, 500.0, &elements), None);
    }

    #[test]
    fn test_resized_coordinates_mapping() {
        let coords = Coordinates {
            x1: 10.0,
            y1: 20.0,
            x2: 30.0,
            y2: 40.0,
        };
        let moved = resized_coordinates(5.0, 5.0, Position::Start, coords)
            .expect("start handle resizes");
        assert_eq!(
            moved,
            Coordinates {
                x1: 5.0,
                y1: 5.0,
                x2: 30.0,
                y2: 40.0
            }
        );
        let moved = resized_coordinates(50.0, 5.0, Position::TopRight, coords)
            .expect("top-right handle resizes");
        assert_eq!(
            moved,
            Coordinates {
                x1: 10.0,
                y1: 5.0,
                x2: 50.0,
                y2: 40.0
            }
        );
        assert_eq!(resized_coordinates(5.0, 5.0, Position::Inside, coords), None);
    }

    #[test]
    fn test_cursor_for_position() {
        assert_eq!(cursor_for_position(Position::TopLeft), Cursor::DiagonalResize);
        assert_eq!(cursor_for_position(Position::End), Cursor::DiagonalResize);
        assert_eq!(
            cursor_for_position(Position::BottomLeft),
            Cursor::AntiDiagonalResize
        );
        assert_eq!(cursor_for_position(Position::Inside), Cursor::Move);
    }

    proptest! {
        #[test]
        fn adjusted_rectangle_is_normalized_and_idempotent(
            x1 in -1000.0f32..1000.0,
            y1 in -1000.0f32..1000.0,
            x2 in -1000.0f32..1000.0,
            y2 in -1000.0f32..1000.0,
        ) {
            let rect = rectangle(x1, y1, x2, y2);
            let adjusted = adjusted_coordinates(&rect);
            prop_assert!(adjusted.x1 <= adjusted.x2);
            prop_assert!(adjusted.y1 <= adjusted.y2);

            let again = adjusted_coordinates(&rectangle(
                adjusted.x1, adjusted.y1, adjusted.x2, adjusted.y2,
            ));
            prop_assert_eq!(adjusted, again);
        }

        #[test]
        fn adjusted_line_orders_endpoints_and_is_idempotent(
            x1 in -1000.0f32..1000.0,
            y1 in -1000.0f32..1000.0,
            x2 in -1000.0f32..1000.0,
            y2 in -1000.0f32..1000.0,
        ) {
            let l = line(x1, y1, x2, y2);
            let adjusted = adjusted_coordinates(&l);
            prop_assert!(
                adjusted.x1 < adjusted.x2
                    || (adjusted.x1 == adjusted.x2 && adjusted.y1 <= adjusted.y2)
            );

            let again = adjusted_coordinates(&line(
                adjusted.x1, adjusted.y1, adjusted.x2, adjusted.y2,
            ));
            prop_assert_eq!(adjusted, again);
        }
    }
}

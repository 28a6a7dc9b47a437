//! The render step, expressed as data.
//!
//! The actual drawing surface is an external collaborator; this module
//! walks a [`CanvasContent`] into an ordered display list: first the full
//! freehand path, each stroke as a separate smoothed polyline, then every
//! element's renderable atop it in collection order (later = on top,
//! matching the hit-testing order).

use crate::content::{CanvasContent, DrawingPoint, Stroke};
use crate::element::Renderable;
use crate::geometry::{mid_point, Point};

/// One drawing instruction for the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A smoothed freehand polyline; each sample carries its own style.
    Freehand {
        /// Smoothed samples in draw order.
        points: Vec<DrawingPoint>,
    },
    /// One shape element's derived primitive.
    Shape {
        /// The drawing primitive.
        renderable: Renderable,
        /// Stroke color as a hex string.
        stroke_color: String,
        /// Stroke width in pixels.
        stroke_width: f32,
    },
}

/// Walk a snapshot into an ordered display list.
#[must_use]
pub fn display_list(content: &CanvasContent) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(content.path.len() + content.elements.len());
    for stroke in &content.path {
        if stroke.is_empty() {
            continue;
        }
        commands.push(DrawCommand::Freehand {
            points: smooth_stroke(stroke),
        });
    }
    for element in &content.elements {
        commands.push(DrawCommand::Shape {
            renderable: element.renderable().clone(),
            stroke_color: element.stroke_color().to_string(),
            stroke_width: element.stroke_width(),
        });
    }
    commands
}

/// Midpoint-smooth a stroke.
///
/// Keeps both endpoints and routes the interior through the midpoints of
/// consecutive samples, which is the polyline form of quadratic midpoint
/// smoothing. Each midpoint carries the style of the sample it leads into.
fn smooth_stroke(stroke: &Stroke) -> Vec<DrawingPoint> {
    let Some(first) = stroke.first() else {
        return Vec::new();
    };
    let mut points = Vec::with_capacity(stroke.len() + 1);
    points.push(first.clone());
    for pair in stroke.windows(2) {
        let mid = mid_point(
            Point::new(pair[0].x, pair[0].y),
            Point::new(pair[1].x, pair[1].y),
        );
        points.push(DrawingPoint {
            x: mid.x,
            y: mid.y,
            color: pair[1].color.clone(),
            line_width: pair[1].line_width,
            transparency: pair[1].transparency,
        });
    }
    if stroke.len() > 1 {
        points.push(stroke[stroke.len() - 1].clone());
    }
    points
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::element::{Coordinates, ElementSpec, PaintingElement, ShapeKind};

    fn sample(x: f32, y: f32) -> DrawingPoint {
        DrawingPoint {
            x,
            y,
            color: Some("#000000".to_string()),
            line_width: Some(2.0),
            transparency: Some(1.0),
        }
    }

    #[test]
    fn test_strokes_precede_elements_in_collection_order() {
        let content = CanvasContent {
            elements: vec![
                PaintingElement::new(ElementSpec {
                    id: 0,
                    coordinates: Coordinates {
                        x1: 0.0,
                        y1: 0.0,
                        x2: 10.0,
                        y2: 10.0,
                    },
                    kind: ShapeKind::Rectangle,
                    stroke_color: "#111111".to_string(),
                    stroke_width: 1.0,
                }),
                PaintingElement::new(ElementSpec {
                    id: 1,
                    coordinates: Coordinates {
                        x1: 5.0,
                        y1: 5.0,
                        x2: 15.0,
                        y2: 15.0,
                    },
                    kind: ShapeKind::Line,
                    stroke_color: "#222222".to_string(),
                    stroke_width: 1.0,
                }),
            ],
            path: vec![vec![sample(1.0, 1.0), sample(2.0, 2.0)]],
        };

        let commands = display_list(&content);
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::Freehand { .. }));
        match (&commands[1], &commands[2]) {
            (
                DrawCommand::Shape { stroke_color: a, .. },
                DrawCommand::Shape { stroke_color: b, .. },
            ) => {
                assert_eq!(a, "#111111");
                assert_eq!(b, "#222222");
            }
            other => panic!("expected two shapes, got {other:?}"),
        }
    }

    #[test]
    fn test_smoothing_keeps_endpoints_and_inserts_midpoints() {
        let stroke = vec![sample(0.0, 0.0), sample(10.0, 0.0), sample(10.0, 10.0)];
        let smoothed = smooth_stroke(&stroke);
        assert_eq!(smoothed.len(), 4);
        assert_eq!((smoothed[0].x, smoothed[0].y), (0.0, 0.0));
        assert_eq!((smoothed[1].x, smoothed[1].y), (5.0, 0.0));
        assert_eq!((smoothed[2].x, smoothed[2].y), (10.0, 5.0));
        assert_eq!((smoothed[3].x, smoothed[3].y), (10.0, 10.0));
        // Style carries through.
        assert_eq!(smoothed[1].line_width, Some(2.0));
    }

    #[test]
    fn test_single_sample_stroke_stays_a_dot() {
        let stroke = vec![sample(3.0, 4.0)];
        let smoothed = smooth_stroke(&stroke);
        assert_eq!(smoothed.len(), 1);
        assert_eq!((smoothed[0].x, smoothed[0].y), (3.0, 4.0));
    }
}

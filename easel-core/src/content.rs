//! Freehand strokes and the serializable canvas snapshot.

use serde::{Deserialize, Serialize};

use crate::element::PaintingElement;

/// One freehand sample: a plane point plus optional per-sample style.
///
/// Style is captured per sample so a stroke can vary visually along its
/// length, though the editor fixes it at stroke creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingPoint {
    /// X coordinate in canvas pixels.
    pub x: f32,
    /// Y coordinate in canvas pixels.
    pub y: f32,
    /// Stroke color as a hex string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Line width in pixels.
    #[serde(default, rename = "lineWidth", skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f32>,
    /// Alpha: 0.1 for brush strokes, 1.0 for pencil.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f32>,
}

/// An ordered, append-only sequence of samples from one
/// pointer-down-to-pointer-up gesture.
pub type Stroke = Vec<DrawingPoint>;

/// The freehand layer of an artwork: every stroke, in draw order.
///
/// Append-only while drawing; the erase operation may remove individual
/// strokes, preserving the order of the remainder.
pub type Path = Vec<Stroke>;

/// The complete serializable state of one artwork's drawing surface.
///
/// A save operation captures a point-in-time copy; the stored value is
/// never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasContent {
    /// Shape elements in draw order (later = on top).
    pub elements: Vec<PaintingElement>,
    /// Freehand strokes in draw order.
    pub path: Path,
}

impl CanvasContent {
    /// Re-derive every element's renderable after deserialization.
    #[must_use]
    pub fn restored(self) -> Self {
        Self {
            elements: self
                .elements
                .into_iter()
                .map(PaintingElement::restored)
                .collect(),
            path: self.path,
        }
    }

    /// Whether the snapshot describes a blank canvas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.path.is_empty()
    }
}

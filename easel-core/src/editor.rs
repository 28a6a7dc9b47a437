//! The pointer-driven editing state machine.
//!
//! Consumes pointer events against the element model and the geometry
//! queries, and owns a view's transient working copy of one artwork's
//! content. Every entry point is synchronous and infallible: unknown
//! tool/state combinations degrade to a no-op.

use crate::content::{CanvasContent, DrawingPoint, Path, Stroke};
use crate::element::{Coordinates, ElementSpec, PaintingElement, ShapeKind};
use crate::geometry::{
    adjusted_coordinates, cursor_for_position, element_at_position, resized_coordinates, Cursor,
    Position,
};

/// Pixel tolerance (axis-aligned square) for erase-by-proximity.
const ERASE_TOLERANCE: f32 = 10.0;

/// Alpha captured at the start of a brush stroke.
const BRUSH_TRANSPARENCY: f32 = 0.1;

/// Alpha captured at the start of a pencil stroke.
const PENCIL_TRANSPARENCY: f32 = 1.0;

/// The active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolType {
    /// Pick, move, and resize existing elements.
    Selection,
    /// Remove strokes and elements by proximity.
    Eraser,
    /// Freehand drawing, opaque.
    Pencil,
    /// Freehand drawing, translucent.
    Brush,
    /// Place a discrete shape.
    Shape(ShapeKind),
}

/// What the current gesture is doing.
///
/// Per-gesture data (which element, which handle, the grab offset) lives in
/// the variant, so a state can never be observed without it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// No gesture in progress.
    Idle,
    /// Dragging out a new shape element.
    Drawing {
        /// Index of the in-progress element.
        id: usize,
    },
    /// Capturing a freehand stroke.
    Sketching,
    /// Translating an element, keeping the grab offset under the pointer.
    Moving {
        /// Index of the grabbed element.
        id: usize,
        /// Pointer offset from the element origin at grab time.
        offset_x: f32,
        /// Pointer offset from the element origin at grab time.
        offset_y: f32,
    },
    /// Dragging a corner or endpoint handle.
    Resizing {
        /// Index of the grabbed element.
        id: usize,
        /// Which handle was grabbed.
        position: Position,
    },
    /// Erase gesture in progress.
    Erasing,
}

/// A view's in-memory editing state for one artwork.
#[derive(Debug, Clone)]
pub struct Editor {
    elements: Vec<PaintingElement>,
    path: Path,
    /// Samples of the stroke being captured, if any.
    points: Stroke,
    interaction: Interaction,
    tool: ToolType,
    stroke_color: String,
    /// Freehand line width.
    line_width: f32,
    /// Shape stroke width.
    shape_width: f32,
    has_local_changes: bool,
}

impl Editor {
    /// Create an editor over a blank canvas, pencil selected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            path: Path::new(),
            points: Stroke::new(),
            interaction: Interaction::Idle,
            tool: ToolType::Pencil,
            stroke_color: "#000000".to_string(),
            line_width: 1.0,
            shape_width: 1.0,
            has_local_changes: false,
        }
    }

    /// Install a loaded snapshot, discarding any current state.
    pub fn load(&mut self, content: CanvasContent) {
        let content = content.restored();
        self.elements = content.elements;
        self.path = content.path;
        self.points.clear();
        self.interaction = Interaction::Idle;
        self.has_local_changes = false;
    }

    /// Capture a point-in-time copy of the canvas for saving.
    #[must_use]
    pub fn snapshot(&self) -> CanvasContent {
        CanvasContent {
            elements: self.elements.clone(),
            path: self.path.clone(),
        }
    }

    /// Begin a gesture at `(x, y)` with the current tool.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        match self.tool {
            ToolType::Selection => {
                if let Some((id, position)) = element_at_position(x, y, &self.elements) {
                    let coords = self.elements[id].coordinates();
                    if position == Position::Inside {
                        self.interaction = Interaction::Moving {
                            id,
                            offset_x: x - coords.x1,
                            offset_y: y - coords.y1,
                        };
                    } else {
                        self.interaction = Interaction::Resizing { id, position };
                    }
                    tracing::debug!(id, ?position, "selection grabbed element");
                }
            }
            ToolType::Eraser => {
                self.interaction = Interaction::Erasing;
                self.erase_at(x, y);
            }
            ToolType::Pencil | ToolType::Brush => {
                let transparency = if self.tool == ToolType::Brush {
                    BRUSH_TRANSPARENCY
                } else {
                    PENCIL_TRANSPARENCY
                };
                self.interaction = Interaction::Sketching;
                self.points.push(DrawingPoint {
                    x,
                    y,
                    color: Some(self.stroke_color.clone()),
                    line_width: Some(self.line_width),
                    transparency: Some(transparency),
                });
            }
            ToolType::Shape(kind) => {
                let id = self.elements.len();
                self.elements.push(PaintingElement::new(ElementSpec {
                    id,
                    coordinates: Coordinates {
                        x1: x,
                        y1: y,
                        x2: x,
                        y2: y,
                    },
                    kind,
                    stroke_color: self.stroke_color.clone(),
                    stroke_width: self.shape_width,
                }));
                self.interaction = Interaction::Drawing { id };
            }
        }
        self.has_local_changes = true;
    }

    /// Continue the current gesture at `(x, y)`.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        match self.interaction {
            Interaction::Idle => {}
            Interaction::Erasing => self.erase_at(x, y),
            Interaction::Sketching => {
                // Style is fixed per-stroke at creation, inherited from the
                // first sample.
                let Some(first) = self.points.first() else {
                    return;
                };
                let sample = DrawingPoint {
                    x,
                    y,
                    color: first.color.clone(),
                    line_width: first.line_width,
                    transparency: first.transparency,
                };
                self.points.push(sample);
            }
            Interaction::Drawing { id } => {
                if let Some(element) = self.elements.get(id) {
                    let replacement =
                        element.with_corner2(x, y, self.stroke_color.clone(), self.shape_width);
                    self.elements[id] = replacement;
                }
            }
            Interaction::Moving {
                id,
                offset_x,
                offset_y,
            } => {
                if let Some(element) = self.elements.get(id) {
                    let c = element.coordinates();
                    let width = c.x2 - c.x1;
                    let height = c.y2 - c.y1;
                    let x1 = x - offset_x;
                    let y1 = y - offset_y;
                    let replacement = element.with_coordinates(Coordinates {
                        x1,
                        y1,
                        x2: x1 + width,
                        y2: y1 + height,
                    });
                    self.elements[id] = replacement;
                }
            }
            Interaction::Resizing { id, position } => {
                if let Some(element) = self.elements.get(id) {
                    if let Some(coords) =
                        resized_coordinates(x, y, position, element.coordinates())
                    {
                        let replacement = element.with_coordinates(coords);
                        self.elements[id] = replacement;
                    }
                }
            }
        }
    }

    /// Finish the current gesture and return to idle.
    pub fn pointer_up(&mut self) {
        match self.interaction {
            Interaction::Drawing { id } | Interaction::Resizing { id, .. } => {
                // Normalize corner order so future hit tests and resizes
                // work regardless of drag direction.
                if let Some(element) = self.elements.get(id) {
                    let replacement = element.with_coordinates(adjusted_coordinates(element));
                    self.elements[id] = replacement;
                }
            }
            Interaction::Sketching => {
                if !self.points.is_empty() {
                    self.path.push(std::mem::take(&mut self.points));
                }
            }
            Interaction::Idle | Interaction::Moving { .. } | Interaction::Erasing => {}
        }
        self.interaction = Interaction::Idle;
    }

    /// Remove at most one stroke and one element near `(x, y)`.
    ///
    /// First match in collection order, not nearest match; kept for
    /// compatibility with the stored-content semantics. Relative order of
    /// the remaining items is preserved, and element ids are renumbered to
    /// their new indexes.
    pub fn erase_at(&mut self, x: f32, y: f32) {
        if let Some(index) = self.path.iter().position(|stroke| {
            stroke
                .iter()
                .any(|p| (x - p.x).abs() < ERASE_TOLERANCE && (y - p.y).abs() < ERASE_TOLERANCE)
        }) {
            self.path.remove(index);
            tracing::debug!(index, "erased stroke");
        }

        if let Some(index) = self.elements.iter().position(|element| {
            let c = element.coordinates();
            x >= c.x1 && x <= c.x2 && y >= c.y1 && y <= c.y2
        }) {
            self.elements.remove(index);
            self.reindex();
            tracing::debug!(index, "erased element");
        }
    }

    /// Cursor affordance at `(x, y)`, when the selection tool is active.
    #[must_use]
    pub fn cursor_at(&self, x: f32, y: f32) -> Option<Cursor> {
        if self.tool != ToolType::Selection {
            return None;
        }
        element_at_position(x, y, &self.elements)
            .map(|(_, position)| cursor_for_position(position))
    }

    /// Clear the whole canvas.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.path.clear();
        self.points.clear();
        self.interaction = Interaction::Idle;
        self.has_local_changes = true;
    }

    /// Restore the id-equals-index invariant after a removal.
    fn reindex(&mut self) {
        let elements = std::mem::take(&mut self.elements);
        self.elements = elements
            .iter()
            .enumerate()
            .map(|(index, element)| element.with_id(index))
            .collect();
    }

    /// Shape elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[PaintingElement] {
        &self.elements
    }

    /// Committed freehand strokes in draw order.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Samples of the stroke currently being captured.
    #[must_use]
    pub fn active_stroke(&self) -> &Stroke {
        &self.points
    }

    /// The current gesture state.
    #[must_use]
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// The active tool.
    #[must_use]
    pub fn tool(&self) -> ToolType {
        self.tool
    }

    /// Select a tool.
    pub fn set_tool(&mut self, tool: ToolType) {
        self.tool = tool;
    }

    /// Set the stroke color for new strokes and shapes.
    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.stroke_color = color.into();
    }

    /// Set the freehand line width.
    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    /// Set the shape stroke width.
    pub fn set_shape_width(&mut self, width: f32) {
        self.shape_width = width;
    }

    /// Whether there are unsaved local changes.
    #[must_use]
    pub fn has_local_changes(&self) -> bool {
        self.has_local_changes
    }

    /// Mark the current state as saved.
    pub fn mark_saved(&mut self) {
        self.has_local_changes = false;
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::element::Renderable;

    fn editor_with_tool(tool: ToolType) -> Editor {
        let mut editor = Editor::new();
        editor.set_tool(tool);
        editor
    }

    #[test]
    fn test_drawing_gesture_appends_and_normalizes() {
        let mut editor = editor_with_tool(ToolType::Shape(ShapeKind::Rectangle));
        // Drag up-left, so the raw bounds come out reversed.
        editor.pointer_down(100.0, 100.0);
        editor.pointer_move(20.0, 30.0);
        editor.pointer_up();

        assert_eq!(editor.interaction(), Interaction::Idle);
        assert_eq!(editor.elements().len(), 1);
        let c = editor.elements()[0].coordinates();
        assert_eq!((c.x1, c.y1, c.x2, c.y2), (20.0, 30.0, 100.0, 100.0));
    }

    #[test]
    fn test_drawing_tracks_current_tool_settings() {
        let mut editor = editor_with_tool(ToolType::Shape(ShapeKind::Line));
        editor.pointer_down(0.0, 0.0);
        editor.set_stroke_color("#ff0000");
        editor.set_shape_width(4.0);
        editor.pointer_move(50.0, 0.0);
        editor.pointer_up();

        let element = &editor.elements()[0];
        assert_eq!(element.stroke_color(), "#ff0000");
        assert!((element.stroke_width() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pencil_and_brush_transparency() {
        let mut editor = editor_with_tool(ToolType::Pencil);
        editor.pointer_down(0.0, 0.0);
        editor.pointer_move(5.0, 5.0);
        editor.pointer_up();

        editor.set_tool(ToolType::Brush);
        editor.pointer_down(50.0, 50.0);
        editor.pointer_move(55.0, 55.0);
        editor.pointer_up();

        assert_eq!(editor.path().len(), 2);
        assert_eq!(editor.path()[0][0].transparency, Some(1.0));
        assert_eq!(editor.path()[1][0].transparency, Some(0.1));
        // Style is inherited from the first sample, not re-read mid-stroke.
        assert_eq!(editor.path()[1][1].transparency, Some(0.1));
        assert!(editor.active_stroke().is_empty());
    }

    #[test]
    fn test_moving_preserves_size() {
        let mut editor = editor_with_tool(ToolType::Shape(ShapeKind::Rectangle));
        editor.pointer_down(10.0, 10.0);
        editor.pointer_move(60.0, 40.0);
        editor.pointer_up();

        editor.set_tool(ToolType::Selection);
        // Grab well inside, away from the corner handles.
        editor.pointer_down(35.0, 25.0);
        assert!(matches!(editor.interaction(), Interaction::Moving { .. }));
        editor.pointer_move(135.0, 125.0);
        editor.pointer_up();

        let c = editor.elements()[0].coordinates();
        assert_eq!((c.x2 - c.x1, c.y2 - c.y1), (50.0, 30.0));
        assert_eq!((c.x1, c.y1), (110.0, 110.0));
    }

    #[test]
    fn test_resize_start_handle_moves_only_first_endpoint() {
        let mut editor = editor_with_tool(ToolType::Shape(ShapeKind::Line));
        editor.pointer_down(20.0, 20.0);
        editor.pointer_move(100.0, 20.0);
        editor.pointer_up();

        editor.set_tool(ToolType::Selection);
        editor.pointer_down(21.0, 21.0);
        assert_eq!(
            editor.interaction(),
            Interaction::Resizing {
                id: 0,
                position: Position::Start
            }
        );
        editor.pointer_move(10.0, 40.0);

        let c = editor.elements()[0].coordinates();
        assert_eq!((c.x1, c.y1), (10.0, 40.0));
        assert_eq!((c.x2, c.y2), (100.0, 20.0));
        editor.pointer_up();
    }

    #[test]
    fn test_resize_past_opposite_endpoint_normalizes_on_release() {
        let mut editor = editor_with_tool(ToolType::Shape(ShapeKind::Line));
        editor.pointer_down(20.0, 20.0);
        editor.pointer_move(100.0, 20.0);
        editor.pointer_up();

        editor.set_tool(ToolType::Selection);
        // Drag the start handle past the end handle.
        editor.pointer_down(21.0, 21.0);
        editor.pointer_move(200.0, 20.0);
        editor.pointer_up();

        let c = editor.elements()[0].coordinates();
        assert!(c.x1 <= c.x2);
        assert_eq!((c.x1, c.x2), (100.0, 200.0));
    }

    #[test]
    fn test_erase_removes_at_most_one_of_each_and_preserves_order() {
        let mut editor = editor_with_tool(ToolType::Pencil);
        // Three strokes near the same spot.
        for offset in [0.0, 1.0, 2.0] {
            editor.pointer_down(30.0 + offset, 30.0);
            editor.pointer_up();
        }
        // Two overlapping rectangles plus one far away.
        editor.set_tool(ToolType::Shape(ShapeKind::Rectangle));
        for (x1, x2) in [(20.0, 60.0), (25.0, 65.0), (300.0, 340.0)] {
            editor.pointer_down(x1, 20.0);
            editor.pointer_move(x2, 60.0);
            editor.pointer_up();
        }

        editor.set_tool(ToolType::Eraser);
        editor.pointer_down(30.0, 30.0);
        editor.pointer_up();

        assert_eq!(editor.path().len(), 2);
        // The surviving strokes keep their relative order.
        assert_eq!(editor.path()[0][0].x, 31.0);
        assert_eq!(editor.path()[1][0].x, 32.0);

        assert_eq!(editor.elements().len(), 2);
        let survivors: Vec<f32> = editor
            .elements()
            .iter()
            .map(|e| e.coordinates().x1)
            .collect();
        assert_eq!(survivors, vec![25.0, 300.0]);
        // Ids are renumbered to the new indexes.
        assert_eq!(editor.elements()[0].id(), 0);
        assert_eq!(editor.elements()[1].id(), 1);
    }

    #[test]
    fn test_selection_miss_is_a_no_op() {
        let mut editor = editor_with_tool(ToolType::Selection);
        editor.pointer_down(400.0, 400.0);
        assert_eq!(editor.interaction(), Interaction::Idle);
        editor.pointer_move(410.0, 410.0);
        editor.pointer_up();
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_cursor_affordance_only_for_selection_tool() {
        let mut editor = editor_with_tool(ToolType::Shape(ShapeKind::Rectangle));
        editor.pointer_down(10.0, 10.0);
        editor.pointer_move(60.0, 60.0);
        editor.pointer_up();

        assert_eq!(editor.cursor_at(30.0, 30.0), None);
        editor.set_tool(ToolType::Selection);
        assert_eq!(editor.cursor_at(30.0, 30.0), Some(Cursor::Move));
        assert_eq!(editor.cursor_at(11.0, 11.0), Some(Cursor::DiagonalResize));
        assert_eq!(editor.cursor_at(59.0, 11.0), Some(Cursor::AntiDiagonalResize));
        assert_eq!(editor.cursor_at(400.0, 400.0), None);
    }

    #[test]
    fn test_snapshot_and_load_round_trip() {
        let mut editor = editor_with_tool(ToolType::Shape(ShapeKind::Circle));
        editor.pointer_down(50.0, 50.0);
        editor.pointer_move(60.0, 50.0);
        editor.pointer_up();
        editor.set_tool(ToolType::Pencil);
        editor.pointer_down(5.0, 5.0);
        editor.pointer_move(6.0, 6.0);
        editor.pointer_up();

        let snapshot = editor.snapshot();
        let mut reloaded = Editor::new();
        reloaded.load(snapshot.clone());

        assert_eq!(reloaded.elements(), editor.elements());
        assert_eq!(reloaded.path(), editor.path());
        assert!(!reloaded.has_local_changes());
        assert_ne!(*reloaded.elements()[0].renderable(), Renderable::Empty);
        // The snapshot is a point-in-time copy; further edits don't touch it.
        editor.clear();
        assert_eq!(snapshot.elements.len(), 1);
    }
}

//! # Easel Core
//!
//! Drawing core for Easel: the vector element model and the pointer-driven
//! editing state machine that turns raw pointer input into persisted drawing
//! primitives.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 easel-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Element Model   │  Geometry                │
//! │  - Shapes        │  - Hit testing           │
//! │  - Renderables   │  - Normalization         │
//! │  - Freehand path │  - Resize handles        │
//! ├─────────────────────────────────────────────┤
//! │  Editor          │  Render / Thumbnail      │
//! │  - Tool dispatch │  - Display list          │
//! │  - Pointer FSM   │  - PNG data-URL encoder  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod content;
pub mod editor;
pub mod element;
pub mod geometry;
pub mod render;
pub mod thumbnail;

pub use content::{CanvasContent, DrawingPoint, Path, Stroke};
pub use editor::{Editor, Interaction, ToolType};
pub use element::{Coordinates, ElementSpec, PaintingElement, Renderable, ShapeKind};
pub use geometry::{
    adjusted_coordinates, cursor_for_position, distance, element_at_position, mid_point,
    near_point, position_within_element, resized_coordinates, Cursor, Point, Position,
};
pub use render::{display_list, DrawCommand};
pub use thumbnail::{PixelSurface, PngThumbnailEncoder, ThumbnailEncoder, ThumbnailError};

/// Drawing core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

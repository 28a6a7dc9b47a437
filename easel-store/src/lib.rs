//! # Easel Store
//!
//! The shared persistence and sync layer: a keyed, auto-incrementing local
//! store for artworks, a change bus that republishes the full artwork
//! listing after every mutation, and the async remote-call interface views
//! use to reach both.
//!
//! The store lives in its own task; views hold a cloneable [`StoreHandle`]
//! and never touch store memory directly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod artwork;
pub mod error;
pub mod service;
pub mod store;
pub mod view;

pub use artwork::{current_timestamp_ms, Artwork, ArtworkPatch, UNTITLED_TITLE};
pub use error::{StoreError, StoreResult};
pub use service::{spawn_store, ArtworkService, ListReceiver, StoreHandle};
pub use store::ArtworkStore;
pub use view::ViewSession;

/// Store layer version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

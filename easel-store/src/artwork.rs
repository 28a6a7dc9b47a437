//! Artwork records and partial updates.

use std::time::{SystemTime, UNIX_EPOCH};

use easel_core::CanvasContent;
use serde::{Deserialize, Serialize};

/// Title given to artworks created without one.
pub const UNTITLED_TITLE: &str = "Untitled Artwork";

/// A named, timestamped drawing document.
///
/// The store exclusively owns the durable copy; views edit a transient
/// working copy of `content` and hand back snapshots on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    /// Store-assigned key. Absent until first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Display title.
    pub title: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Last content-affecting update, milliseconds since the Unix epoch.
    pub modified_at: u64,
    /// Drawing surface snapshot. Absent means a blank canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CanvasContent>,
    /// Opaque string-encoded preview image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Artwork {
    /// A fresh, never-saved record: title and timestamps only.
    #[must_use]
    pub fn new(title: impl Into<String>, created_at: u64) -> Self {
        Self {
            id: None,
            title: title.into(),
            created_at,
            modified_at: created_at,
            content: None,
            thumbnail: None,
        }
    }
}

/// A partial update to an artwork.
///
/// Shallow merge: provided fields fully replace the stored value, omitted
/// fields are retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New modification timestamp. Content-affecting updates must set it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<u64>,
    /// New drawing surface snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CanvasContent>,
    /// New preview image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl ArtworkPatch {
    /// Merge this patch over an existing record.
    pub fn apply(self, artwork: &mut Artwork) {
        if let Some(title) = self.title {
            artwork.title = title;
        }
        if let Some(modified_at) = self.modified_at {
            artwork.modified_at = modified_at;
        }
        if let Some(content) = self.content {
            artwork.content = Some(content);
        }
        if let Some(thumbnail) = self.thumbnail {
            artwork.thumbnail = Some(thumbnail);
        }
    }
}

/// Current Unix timestamp in milliseconds.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Will not exceed u64 max for millennia.
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}

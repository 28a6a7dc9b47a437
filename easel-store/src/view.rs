//! A view's editing session over one artwork.
//!
//! Owns the transient in-memory working copy while the artwork is open;
//! the store keeps the durable copy. The working copy is relinquished by
//! saving or by dropping the session.

use easel_core::{Editor, PixelSurface, ThumbnailEncoder};

use crate::artwork::{current_timestamp_ms, Artwork, ArtworkPatch, UNTITLED_TITLE};
use crate::error::StoreResult;
use crate::service::StoreHandle;

/// One open view of one artwork.
#[derive(Debug)]
pub struct ViewSession {
    editor: Editor,
    store: StoreHandle,
    artwork_id: u64,
}

impl ViewSession {
    /// Open an existing artwork for editing.
    ///
    /// Absent content means a blank canvas.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::NotFound`] if the artwork does not
    /// exist, or [`crate::StoreError::Unavailable`] if the store cannot be
    /// reached.
    pub async fn open(store: StoreHandle, artwork_id: u64) -> StoreResult<Self> {
        let artwork = store.get(artwork_id).await?;
        let mut editor = Editor::new();
        if let Some(content) = artwork.content {
            editor.load(content);
        }
        Ok(Self {
            editor,
            store,
            artwork_id,
        })
    }

    /// Create a fresh untitled artwork and open it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Unavailable`] if the store cannot be
    /// reached.
    pub async fn create(store: StoreHandle) -> StoreResult<Self> {
        let artwork = store
            .create(UNTITLED_TITLE, current_timestamp_ms())
            .await?;
        let artwork_id = artwork.id.unwrap_or_default();
        Ok(Self {
            editor: Editor::new(),
            store,
            artwork_id,
        })
    }

    /// The pointer-driven editing state machine for this view.
    pub fn editor(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// The id of the open artwork.
    #[must_use]
    pub fn artwork_id(&self) -> u64 {
        self.artwork_id
    }

    /// Persist the current canvas, with a thumbnail when one can be
    /// encoded.
    ///
    /// A thumbnail encoding failure is tolerated: the content still saves,
    /// just without a preview. `modified_at` is refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::NotFound`] if the artwork was removed
    /// underneath this view, or [`crate::StoreError::Unavailable`] if the
    /// store cannot be reached.
    pub async fn save(
        &mut self,
        encoder: &dyn ThumbnailEncoder,
        surface: Option<&PixelSurface>,
    ) -> StoreResult<Artwork> {
        let content = self.editor.snapshot();
        let thumbnail = surface.and_then(|surface| match encoder.encode(surface) {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                tracing::warn!(artwork_id = self.artwork_id, "Saving without thumbnail: {e}");
                None
            }
        });

        let saved = self
            .store
            .update(
                self.artwork_id,
                ArtworkPatch {
                    modified_at: Some(current_timestamp_ms()),
                    content: Some(content),
                    thumbnail,
                    ..ArtworkPatch::default()
                },
            )
            .await?;
        self.editor.mark_saved();
        Ok(saved)
    }

    /// Rename the open artwork.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::NotFound`] if the artwork was removed
    /// underneath this view, or [`crate::StoreError::Unavailable`] if the
    /// store cannot be reached.
    pub async fn rename(&self, title: impl Into<String>) -> StoreResult<Artwork> {
        self.store
            .update(
                self.artwork_id,
                ArtworkPatch {
                    title: Some(title.into()),
                    modified_at: Some(current_timestamp_ms()),
                    ..ArtworkPatch::default()
                },
            )
            .await
    }
}

//! The change bus and the remote-call interface to the store.
//!
//! [`ArtworkService`] wraps an [`ArtworkStore`] and adds the broadcast
//! contract: every mutating operation republishes the complete artwork
//! listing exactly once, after the mutation is applied, before the reply
//! goes out. [`spawn_store`] moves the service onto its own task, the
//! store's execution context; views keep a cloneable [`StoreHandle`] and
//! reach the store only through asynchronous request/response messages.

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::artwork::{Artwork, ArtworkPatch};
use crate::error::{StoreError, StoreResult};
use crate::store::ArtworkStore;

/// Buffered list broadcasts per lagging subscriber.
const BROADCAST_CAPACITY: usize = 100;

/// In-flight remote calls the store task will buffer.
const REQUEST_CAPACITY: usize = 32;

/// A subscription to the post-mutation full-list broadcast.
///
/// Dropping the receiver unsubscribes. Delivery is at-most-once per
/// broadcast, best-effort; broadcasts arrive in the order mutations were
/// applied.
pub type ListReceiver = broadcast::Receiver<Vec<Artwork>>;

/// The store plus its change bus.
///
/// Lives for the lifetime of the store's execution context; it has no
/// persistence of its own, so a fresh process starts with zero
/// subscribers.
#[derive(Debug)]
pub struct ArtworkService {
    store: ArtworkStore,
    list_tx: broadcast::Sender<Vec<Artwork>>,
}

impl ArtworkService {
    /// Wrap a store with a fresh change bus.
    #[must_use]
    pub fn new(store: ArtworkStore) -> Self {
        let (list_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { store, list_tx }
    }

    /// All artworks, ordered by ascending id.
    #[must_use]
    pub fn list(&self) -> Vec<Artwork> {
        self.store.list()
    }

    /// Create a record and republish the listing.
    #[must_use]
    pub fn create(&self, title: impl Into<String>, created_at: u64) -> Artwork {
        let artwork = self.store.create(title, created_at);
        self.publish();
        artwork
    }

    /// The record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent.
    pub fn get(&self, id: u64) -> StoreResult<Artwork> {
        self.store.get(id)
    }

    /// Merge a patch over a record and republish the listing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent; nothing is
    /// published in that case.
    pub fn update(&self, id: u64, patch: ArtworkPatch) -> StoreResult<Artwork> {
        let updated = self.store.update(id, patch)?;
        self.publish();
        Ok(updated)
    }

    /// Delete a record, republish the listing, and return the deleted
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent; nothing is
    /// published in that case.
    pub fn remove(&self, id: u64) -> StoreResult<Artwork> {
        let removed = self.store.remove(id)?;
        self.publish();
        Ok(removed)
    }

    /// Attach a listener to the change bus.
    #[must_use]
    pub fn subscribe(&self) -> ListReceiver {
        self.list_tx.subscribe()
    }

    /// Broadcast the complete current listing once.
    fn publish(&self) {
        if let Err(e) = self.list_tx.send(self.store.list()) {
            // No receivers is expected when no other view is open.
            tracing::debug!("List broadcast skipped: no receivers ({e})");
        }
    }

    /// Serve one remote call. Replies are best-effort: a caller that went
    /// away just loses its answer.
    fn handle(&self, request: StoreRequest) {
        match request {
            StoreRequest::List { reply } => {
                let _ = reply.send(self.list());
            }
            StoreRequest::Create {
                title,
                created_at,
                reply,
            } => {
                let _ = reply.send(self.create(title, created_at));
            }
            StoreRequest::Get { id, reply } => {
                let _ = reply.send(self.get(id));
            }
            StoreRequest::Update { id, patch, reply } => {
                let _ = reply.send(self.update(id, patch));
            }
            StoreRequest::Remove { id, reply } => {
                let _ = reply.send(self.remove(id));
            }
            StoreRequest::Subscribe { reply } => {
                let _ = reply.send(self.subscribe());
            }
        }
    }
}

/// One remote call, carrying its reply channel.
enum StoreRequest {
    List {
        reply: oneshot::Sender<Vec<Artwork>>,
    },
    Create {
        title: String,
        created_at: u64,
        reply: oneshot::Sender<Artwork>,
    },
    Get {
        id: u64,
        reply: oneshot::Sender<StoreResult<Artwork>>,
    },
    Update {
        id: u64,
        patch: ArtworkPatch,
        reply: oneshot::Sender<StoreResult<Artwork>>,
    },
    Remove {
        id: u64,
        reply: oneshot::Sender<StoreResult<Artwork>>,
    },
    Subscribe {
        reply: oneshot::Sender<ListReceiver>,
    },
}

/// Move a store onto its own task and return a handle to it.
///
/// The task processes calls from every view sequentially, which is the
/// only serialization mutations get. It stops once every handle is
/// dropped.
#[must_use]
pub fn spawn_store(store: ArtworkStore) -> StoreHandle {
    let (tx, mut rx) = mpsc::channel(REQUEST_CAPACITY);
    let service = ArtworkService::new(store);
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            service.handle(request);
        }
        tracing::debug!("Artwork store task stopped");
    });
    StoreHandle { tx }
}

/// A view's end of the remote-call interface.
///
/// Cloneable; every clone talks to the same store task. All calls cross
/// the task boundary and are asynchronous.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreRequest>,
}

impl StoreHandle {
    /// All artworks, ordered by ascending id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store task is gone.
    pub async fn list(&self) -> StoreResult<Vec<Artwork>> {
        self.request(|reply| StoreRequest::List { reply }).await
    }

    /// Create an artwork and receive the stored record, id assigned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store task is gone.
    pub async fn create(
        &self,
        title: impl Into<String>,
        created_at: u64,
    ) -> StoreResult<Artwork> {
        let title = title.into();
        self.request(|reply| StoreRequest::Create {
            title,
            created_at,
            reply,
        })
        .await
    }

    /// The record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent, or
    /// [`StoreError::Unavailable`] if the store task is gone.
    pub async fn get(&self, id: u64) -> StoreResult<Artwork> {
        self.request(|reply| StoreRequest::Get { id, reply }).await?
    }

    /// Merge a patch over the record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent, or
    /// [`StoreError::Unavailable`] if the store task is gone.
    pub async fn update(&self, id: u64, patch: ArtworkPatch) -> StoreResult<Artwork> {
        self.request(|reply| StoreRequest::Update { id, patch, reply })
            .await?
    }

    /// Delete the record for `id` and receive the pre-deletion record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent, or
    /// [`StoreError::Unavailable`] if the store task is gone.
    pub async fn remove(&self, id: u64) -> StoreResult<Artwork> {
        self.request(|reply| StoreRequest::Remove { id, reply })
            .await?
    }

    /// Attach a listener to the change bus. Dropping the receiver
    /// unsubscribes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store task is gone.
    pub async fn subscribe(&self) -> StoreResult<ListReceiver> {
        self.request(|reply| StoreRequest::Subscribe { reply }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> StoreRequest,
    ) -> StoreResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| StoreError::Unavailable("store task is not running".to_string()))?;
        reply_rx
            .await
            .map_err(|_| StoreError::Unavailable("store task dropped the request".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mutation_publishes_exactly_once() {
        let service = ArtworkService::new(ArtworkStore::new());
        let mut rx = service.subscribe();

        let artwork = service.create("a", 1000);
        let id = artwork.id.expect("id assigned");
        let listed = rx.try_recv().expect("create broadcast");
        assert_eq!(listed.len(), 1);
        assert!(rx.try_recv().is_err());

        service
            .update(
                id,
                ArtworkPatch {
                    title: Some("b".to_string()),
                    ..ArtworkPatch::default()
                },
            )
            .expect("update");
        let listed = rx.try_recv().expect("update broadcast");
        assert_eq!(listed[0].title, "b");
        assert!(rx.try_recv().is_err());

        service.remove(id).expect("remove");
        let listed = rx.try_recv().expect("remove broadcast");
        assert!(listed.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_failed_mutation_publishes_nothing() {
        let service = ArtworkService::new(ArtworkStore::new());
        let mut rx = service.subscribe();

        assert!(service.update(7, ArtworkPatch::default()).is_err());
        assert!(service.remove(7).is_err());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_reads_publish_nothing() {
        let service = ArtworkService::new(ArtworkStore::new());
        let _ = service.create("a", 1000);
        let mut rx = service.subscribe();

        let _ = service.list();
        let _ = service.get(1);
        assert!(rx.try_recv().is_err());
    }
}

//! Registry of per-connection pipelines.
//!
//! Hosts multiplexing many connections over worker threads park each
//! connection's [`Pipeline`] here, keyed by [`ConnectionId`]. The registry
//! shares one payload codec across all pipelines while keeping every
//! pipeline's decode state isolated. Access is exclusive per entry, which
//! matches the single-owner discipline the pipeline requires: only the
//! thread currently driving a connection may touch its pipeline.

use std::sync::Arc;

use dashmap::DashMap;

use crate::pipeline::Pipeline;

/// Identifier the host assigns to a connection when it opens.
///
/// Purely a registry key; the framing layer attaches no meaning to the
/// value beyond uniqueness among live connections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wrap a host-assigned identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl From<u64> for ConnectionId {
    fn from(value: u64) -> Self { Self(value) }
}

impl From<ConnectionId> for u64 {
    fn from(value: ConnectionId) -> Self { value.0 }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Concurrent registry of pipelines keyed by [`ConnectionId`].
pub struct PipelineRegistry<C> {
    codec: Arc<C>,
    pipelines: DashMap<ConnectionId, Pipeline<C>>,
}

impl<C> PipelineRegistry<C> {
    /// Create a registry whose pipelines share `codec`.
    #[must_use]
    pub fn new(codec: Arc<C>) -> Self {
        Self {
            codec,
            pipelines: DashMap::new(),
        }
    }

    /// Bind a fresh pipeline for a newly established connection.
    ///
    /// An existing pipeline under the same id is replaced and its pending
    /// decode state discarded.
    pub fn open(&self, id: ConnectionId) {
        let previous = self
            .pipelines
            .insert(id, Pipeline::new(Arc::clone(&self.codec)));
        #[cfg(feature = "metrics")]
        if previous.is_none() {
            crate::metrics::inc_pipelines();
        }
        drop(previous);
    }

    /// Remove a pipeline on connection close, discarding pending state.
    ///
    /// Returns `false` if no pipeline was registered for `id`.
    pub fn close(&self, id: &ConnectionId) -> bool {
        let Some((_, pipeline)) = self.pipelines.remove(id) else {
            return false;
        };
        pipeline.close();
        #[cfg(feature = "metrics")]
        crate::metrics::dec_pipelines();
        true
    }

    /// Run `f` with exclusive access to the pipeline for `id`.
    ///
    /// Returns `None` if no pipeline is registered for `id`.
    pub fn with_pipeline<R>(
        &self,
        id: &ConnectionId,
        f: impl FnOnce(&mut Pipeline<C>) -> R,
    ) -> Option<R> {
        self.pipelines.get_mut(id).map(|mut entry| f(entry.value_mut()))
    }

    /// Number of registered connections.
    #[must_use]
    pub fn len(&self) -> usize { self.pipelines.len() }

    /// Whether no connections are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.pipelines.is_empty() }
}

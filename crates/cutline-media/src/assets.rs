//! Asset table keyed by media reference.
//!
//! Loads run as tasks on a tokio runtime; the compositor only ever asks
//! [`AssetStore::get_ready`], which never waits.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cutline_core::MediaRef;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::error::{MediaError, Result};
use crate::source::{AssetLoader, SharedSource};

/// Load state of a single asset.
#[derive(Debug, Clone)]
pub enum AssetState {
    Loading,
    Ready(SharedSource),
    Failed(MediaError),
}

impl AssetState {
    pub fn is_ready(&self) -> bool {
        matches!(self, AssetState::Ready(source) if source.is_ready())
    }
}

/// Shared asset table. Clones refer to the same entries.
#[derive(Clone)]
pub struct AssetStore {
    loader: Arc<dyn AssetLoader>,
    runtime: Handle,
    entries: Arc<Mutex<HashMap<MediaRef, AssetState>>>,
}

impl AssetStore {
    pub fn new(loader: Arc<dyn AssetLoader>, runtime: Handle) -> Self {
        Self {
            loader,
            runtime,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Source for `src` if it has finished loading.
    pub fn get_ready(&self, src: &MediaRef) -> Option<SharedSource> {
        match self.entries.lock().get(src) {
            Some(AssetState::Ready(source)) if source.is_ready() => Some(Arc::clone(source)),
            _ => None,
        }
    }

    pub fn status(&self, src: &MediaRef) -> Option<AssetState> {
        self.entries.lock().get(src).cloned()
    }

    /// Start loading `src` unless it is already known.
    ///
    /// Returns `true` when a new load was spawned. Failed assets stay failed
    /// until [`forget`](Self::forget) is called.
    pub fn request(&self, src: &MediaRef) -> bool {
        {
            let mut entries = self.entries.lock();
            if entries.contains_key(src) {
                return false;
            }
            entries.insert(src.clone(), AssetState::Loading);
        }

        debug!("Requesting asset {}", src);
        let loader = Arc::clone(&self.loader);
        let entries = Arc::clone(&self.entries);
        let src = src.clone();
        self.runtime.spawn(async move {
            let state = match loader.load(&src).await {
                Ok(source) => {
                    info!("Asset ready: {}", src.display_name());
                    AssetState::Ready(source)
                }
                Err(e) => {
                    warn!("Asset {} failed to load: {}", src, e);
                    AssetState::Failed(e)
                }
            };
            let mut entries = entries.lock();
            // A forget() while loading drops the result.
            if let Some(entry) = entries.get_mut(&src) {
                if matches!(entry, AssetState::Loading) {
                    *entry = state;
                }
            }
        });
        true
    }

    /// Ready source, or `None` after making sure a load is in flight.
    pub fn get_or_request(&self, src: &MediaRef) -> Option<SharedSource> {
        let ready = self.get_ready(src);
        if ready.is_none() {
            self.request(src);
        }
        ready
    }

    /// Load `src` on the current task and record the outcome.
    pub async fn load_now(&self, src: &MediaRef) -> Result<SharedSource> {
        if let Some(source) = self.get_ready(src) {
            return Ok(source);
        }
        let result = self.loader.load(src).await;
        let state = match &result {
            Ok(source) => AssetState::Ready(Arc::clone(source)),
            Err(e) => AssetState::Failed(e.clone()),
        };
        self.entries.lock().insert(src.clone(), state);
        result
    }

    /// Register an already-built source.
    pub fn insert_ready(&self, src: impl Into<MediaRef>, source: SharedSource) {
        self.entries.lock().insert(src.into(), AssetState::Ready(source));
    }

    pub fn forget(&self, src: &MediaRef) -> Option<AssetState> {
        self.entries.lock().remove(src)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetStore")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

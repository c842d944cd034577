//! The canonical gradient collection.
//!
//! [`GradientStore`] owns the ordered list and mediates its three input
//! channels: explicit edits, the persisted copy, and a share token found on
//! the page URL at startup.
//!
//! Persistence: the first save after [`open`](GradientStore::open) is
//! immediate; every later mutation restarts a trailing debounce window and the
//! write that eventually fires carries the latest list. Callers drive the
//! window with [`poll_persistence`](GradientStore::poll_persistence) and call
//! [`flush`](GradientStore::flush) before shutting down.

use std::time::Instant;

use phase_engine::time::Debouncer;
use phase_mesh::codec::{same_content, try_decode, try_encode};
use phase_mesh::factory::create_gradient;
use phase_mesh::limits::{MAX_URL_LENGTH, POSITION_RANGE, STORAGE_KEY};
use phase_mesh::{DecodeError, Gradient, GradientConfig, GradientPatch};

use crate::config::StudioConfig;
use crate::persist::{KeyValueStore, load_gradients, save_gradients};
use crate::share::{Clipboard, PageLocation, ShareError};

/// Outcome of the startup import check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    /// The page URL carried no share token.
    None,
    /// This many net-new gradients await a [`resolve_import`](GradientStore::resolve_import).
    Pending(usize),
    /// The token was rejected; the list is untouched.
    Rejected(DecodeError),
    /// Every decoded gradient is already in the collection.
    AllDuplicates,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImportResolution {
    /// Prepend the imported gradients.
    Merge,
    /// Replace the collection with the imported gradients.
    Replace,
    /// Keep the collection as it is.
    Ignore,
}

pub struct GradientStore<S: KeyValueStore> {
    gradients: Vec<Gradient>,
    pending: Option<Vec<Gradient>>,
    storage: S,
    location: PageLocation,
    save: Debouncer,
}

impl<S: KeyValueStore> GradientStore<S> {
    /// Loads the persisted collection, checks `location` for a share token and
    /// writes the resulting list back immediately.
    ///
    /// Unreadable or corrupt storage starts an empty collection; stored entries
    /// that fail validation are left out. In either case the stored value is
    /// not overwritten until the next mutation.
    pub fn open(storage: S, location: PageLocation, config: &StudioConfig) -> (Self, ImportStatus) {
        let (gradients, intact) = match load_gradients(&storage, STORAGE_KEY) {
            Ok(loaded) => {
                if loaded.dropped > 0 {
                    log::warn!("skipped {} invalid stored gradient(s)", loaded.dropped);
                }
                (loaded.gradients, loaded.dropped == 0)
            }
            Err(e) => {
                log::error!("failed to load gradients, starting empty: {e}");
                (Vec::new(), false)
            }
        };
        log::debug!("loaded {} gradient(s)", gradients.len());

        let mut store = Self {
            gradients,
            pending: None,
            storage,
            location,
            save: Debouncer::new(config.save_debounce),
        };

        let status = store.check_import();
        if intact {
            store.save_now();
        }
        (store, status)
    }

    fn check_import(&mut self) -> ImportStatus {
        let Some(token) = self.location.token() else {
            return ImportStatus::None;
        };

        let decoded = match try_decode(token) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("share link rejected: {e}");
                self.location.clear_token();
                return ImportStatus::Rejected(e);
            }
        };

        let fresh: Vec<Gradient> = decoded
            .into_iter()
            .filter(|g| !self.gradients.iter().any(|existing| same_content(existing, g)))
            .collect();

        if fresh.is_empty() {
            log::info!("share link holds only gradients already in the collection");
            self.location.clear_token();
            return ImportStatus::AllDuplicates;
        }

        let n = fresh.len();
        self.pending = Some(fresh);
        ImportStatus::Pending(n)
    }

    // ── reads ────────────────────────────────────────────────────────────

    /// Newest first.
    #[inline]
    pub fn gradients(&self) -> &[Gradient] {
        &self.gradients
    }

    pub fn get_gradient(&self, id: &str) -> Option<&Gradient> {
        self.gradients.iter().find(|g| g.id() == id)
    }

    #[inline]
    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ── mutations ────────────────────────────────────────────────────────

    /// Creates a gradient and puts it first.
    pub fn add_gradient(&mut self, config: GradientConfig) -> Gradient {
        let gradient = create_gradient(config);
        self.gradients.insert(0, gradient.clone());
        self.touch();
        gradient
    }

    /// Applies `patch` to the gradient with `id` in place.
    pub fn update_gradient(&mut self, id: &str, patch: GradientPatch) -> bool {
        let Some(gradient) = self.gradients.iter_mut().find(|g| g.id() == id) else {
            return false;
        };
        gradient.apply(patch);
        self.touch();
        true
    }

    /// Moves one stop, clamping the position into the canvas.
    ///
    /// Meant for drag gestures: a burst of calls ends up as one persisted write.
    pub fn reposition_stop(&mut self, id: &str, index: usize, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let Some(stop) = self
            .gradients
            .iter_mut()
            .find(|g| g.id() == id)
            .and_then(|g| g.color_stops.get_mut(index))
        else {
            return false;
        };
        stop.x = x.clamp(*POSITION_RANGE.start(), *POSITION_RANGE.end());
        stop.y = y.clamp(*POSITION_RANGE.start(), *POSITION_RANGE.end());
        self.touch();
        true
    }

    pub fn delete_gradient(&mut self, id: &str) -> bool {
        let before = self.gradients.len();
        self.gradients.retain(|g| g.id() != id);
        if self.gradients.len() == before {
            return false;
        }
        self.touch();
        true
    }

    pub fn clear_gradients(&mut self) {
        self.gradients.clear();
        self.touch();
    }

    // ── import ───────────────────────────────────────────────────────────

    pub fn pending_import(&self) -> Option<&[Gradient]> {
        self.pending.as_deref()
    }

    /// Settles a pending import and clears the share token from the page URL.
    ///
    /// Merge and Replace persist right away. Returns how many gradients were
    /// taken in.
    pub fn resolve_import(&mut self, resolution: ImportResolution) -> usize {
        self.location.clear_token();
        let Some(imported) = self.pending.take() else {
            return 0;
        };

        let n = imported.len();
        match resolution {
            ImportResolution::Merge => {
                let mut merged = imported;
                merged.append(&mut self.gradients);
                self.gradients = merged;
                log::info!("merged {n} gradient(s) into the collection");
            }
            ImportResolution::Replace => {
                self.gradients = imported;
                log::info!("replaced the collection with {n} gradient(s)");
            }
            ImportResolution::Ignore => {
                log::info!("import cancelled, kept existing gradients");
                return 0;
            }
        }

        self.save.cancel();
        self.save_now();
        n
    }

    // ── persistence ──────────────────────────────────────────────────────

    fn touch(&mut self) {
        self.save.schedule(Instant::now());
    }

    fn save_now(&mut self) -> bool {
        match save_gradients(&mut self.storage, STORAGE_KEY, &self.gradients) {
            Ok(()) => {
                log::trace!("saved {} gradient(s)", self.gradients.len());
                true
            }
            Err(e) => {
                log::error!("failed to save gradients: {e}");
                false
            }
        }
    }

    /// Whether a debounced save is waiting.
    pub fn has_pending_save(&self) -> bool {
        self.save.is_pending()
    }

    /// Writes the list if the debounce window has closed by `now`. Returns
    /// whether a write was attempted.
    pub fn poll_persistence_at(&mut self, now: Instant) -> bool {
        if !self.save.fire_if_due(now) {
            return false;
        }
        self.save_now();
        true
    }

    pub fn poll_persistence(&mut self) -> bool {
        self.poll_persistence_at(Instant::now())
    }

    /// Writes any pending save now. Returns `false` only when that write failed.
    pub fn flush(&mut self) -> bool {
        if !self.save.cancel() {
            return true;
        }
        self.save_now()
    }

    // ── sharing ──────────────────────────────────────────────────────────

    /// Share link for the whole collection.
    ///
    /// An empty collection shares the bare page URL.
    pub fn share_url(&self) -> Result<String, ShareError> {
        if self.gradients.is_empty() {
            return Ok(self.location.base().to_string());
        }

        let token = try_encode(&self.gradients).map_err(|e| {
            log::error!("failed to encode gradients: {e}");
            ShareError::EncodeFailed
        })?;
        let url = self.location.with_token(&token);
        if url.len() > MAX_URL_LENGTH {
            return Err(ShareError::Unavailable { len: url.len() });
        }
        Ok(url)
    }

    /// [`share_url`](Self::share_url), with every failure collapsed to `None`.
    pub fn generate_share_url(&self) -> Option<String> {
        self.share_url().ok()
    }

    /// Copies the share link. Fails when there is nothing to share.
    pub fn copy_share_url(&self, clipboard: &mut impl Clipboard) -> Result<String, ShareError> {
        if self.gradients.is_empty() {
            return Err(ShareError::NothingToShare);
        }
        let url = self.share_url()?;
        clipboard.write_text(&url)?;
        Ok(url)
    }
}

//! One-time swipe hint
//!
//! Shown once per `(mode, slider_id)` per session. Dismissal (timeout or user
//! action) writes a flag to session storage; unusable storage means the hint
//! simply shows every time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::constants::slider::HINT_KEY_PREFIX;
use crate::scroll_mode::ScrollMode;
use crate::storage::SessionStorage;
use crate::timing::Deadline;

/// Value written once the hint has been seen
const DISMISSED_FLAG: &str = "true";

/// Session storage key for a slider's hint flag
pub fn hint_storage_key(mode: ScrollMode, slider_id: &str) -> String {
    format!("{HINT_KEY_PREFIX}-{mode}-{slider_id}")
}

/// Hint visibility and its auto-dismiss timer
pub struct SwipeHint {
    key: String,
    storage: Arc<dyn SessionStorage>,
    visible: bool,
    auto_dismiss: Option<Deadline>,
}

impl SwipeHint {
    /// Decide on mount whether the hint shows
    pub fn on_mount(
        key: String,
        storage: Arc<dyn SessionStorage>,
        enabled: bool,
        timeout: Duration,
        now: Instant,
    ) -> Self {
        let visible = enabled && !already_dismissed(storage.as_ref(), &key);
        Self {
            auto_dismiss: visible.then(|| Deadline::after(now, timeout)),
            key,
            storage,
            visible,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Dismiss once the timeout has passed; returns true if dismissed now
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.auto_dismiss {
            Some(deadline) if deadline.is_due(now) => {
                self.dismiss();
                true
            }
            _ => false,
        }
    }

    /// Hide the hint and remember that it was seen
    pub fn dismiss(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.auto_dismiss = None;
        if let Err(e) = self.storage.set(&self.key, DISMISSED_FLAG) {
            debug!(key = %self.key, error = %e, "Could not persist hint dismissal");
        }
    }
}

/// Any non-empty stored value suppresses the hint
fn already_dismissed(storage: &dyn SessionStorage, key: &str) -> bool {
    match storage.get(key) {
        Ok(value) => value.is_some_and(|v| !v.is_empty()),
        Err(e) => {
            debug!(key, error = %e, "Hint flag unreadable, showing hint");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemorySessionStorage, UnavailableStorage};

    const TIMEOUT: Duration = Duration::from_millis(3000);

    #[test]
    fn test_key_format() {
        assert_eq!(
            hint_storage_key(ScrollMode::Scroll, "quickActions"),
            "reelHintShown-scroll-quickActions"
        );
        assert_eq!(hint_storage_key(ScrollMode::Reel, "x"), "reelHintShown-reel-x");
    }

    #[test]
    fn test_timeout_dismisses_and_persists() {
        let storage = Arc::new(MemorySessionStorage::new());
        let now = Instant::now();
        let mut hint = SwipeHint::on_mount("k".into(), storage.clone(), true, TIMEOUT, now);
        assert!(hint.is_visible());

        assert!(!hint.tick(now + Duration::from_millis(2999)));
        assert!(hint.is_visible());
        assert!(hint.tick(now + TIMEOUT));
        assert!(!hint.is_visible());
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("true"));

        let again = SwipeHint::on_mount("k".into(), storage, true, TIMEOUT, now);
        assert!(!again.is_visible());
    }

    #[test]
    fn test_empty_flag_does_not_suppress() {
        let storage = Arc::new(MemorySessionStorage::new());
        storage.set("k", "").unwrap();
        let hint = SwipeHint::on_mount("k".into(), storage, true, TIMEOUT, Instant::now());
        assert!(hint.is_visible());
    }

    #[test]
    fn test_disabled_hint_never_shows() {
        let storage = Arc::new(MemorySessionStorage::new());
        let mut hint =
            SwipeHint::on_mount("k".into(), storage.clone(), false, TIMEOUT, Instant::now());
        assert!(!hint.is_visible());
        hint.dismiss();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_unavailable_storage_shows_every_time() {
        let storage: Arc<dyn SessionStorage> = Arc::new(UnavailableStorage);
        let now = Instant::now();
        let mut hint = SwipeHint::on_mount("k".into(), storage.clone(), true, TIMEOUT, now);
        assert!(hint.is_visible());
        hint.dismiss();
        assert!(!hint.is_visible());

        let again = SwipeHint::on_mount("k".into(), storage, true, TIMEOUT, now);
        assert!(again.is_visible());
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative abort flag checked between entities during frame setup.
///
/// Cloning is cheap and shares the underlying flag, so a controller thread
/// can hold one clone while frame setup polls another. The flag is only
/// consulted at entity granularity: a long detection scan over a large,
/// fully-opaque texture is not interruptible.
#[derive(Clone, Debug, Default)]
pub struct AbortSwitch {
    flag: Arc<AtomicBool>,
}

impl AbortSwitch {
    /// Create a new, unset switch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an abort.
    pub fn set(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Clear a previously requested abort.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }

    /// Whether an abort has been requested.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

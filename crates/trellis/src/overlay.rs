//! Overlay state shared between the grid and its host.
//!
//! While a folder popup, context menu, or drag preview is open above the
//! grid, page navigation must not move the view underneath it. Components
//! that open such an overlay take a [`OverlayHold`] from the shared
//! [`OverlayGate`]; the gate reads as open until every hold is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared open-overlay state.
///
/// Cloning the gate shares the underlying counter, so the grid view, the
/// page navigator, and host-side overlay widgets can all observe the same
/// state. Holds nest: the gate stays open until the last one is released.
///
/// # Example
///
/// ```
/// use trellis::overlay::OverlayGate;
///
/// let gate = OverlayGate::new();
/// assert!(!gate.is_open());
/// {
///     let _popup = gate.hold();
///     let _menu = gate.hold();
///     assert!(gate.is_open());
///     assert_eq!(gate.depth(), 2);
/// }
/// assert!(!gate.is_open());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OverlayGate {
    depth: Arc<AtomicUsize>,
}

impl OverlayGate {
    /// Create a gate with no open overlays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open overlay for the lifetime of the returned hold.
    pub fn hold(&self) -> OverlayHold {
        let depth = self.depth.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(target: "trellis::overlay", depth, "overlay opened");
        OverlayHold {
            depth: self.depth.clone(),
        }
    }

    /// Whether at least one overlay is currently open.
    pub fn is_open(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }

    /// The number of overlays currently open.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

/// RAII registration of one open overlay.
///
/// Dropping the hold closes its overlay; there is no manual release call to
/// forget.
#[derive(Debug)]
pub struct OverlayHold {
    depth: Arc<AtomicUsize>,
}

impl Drop for OverlayHold {
    fn drop(&mut self) {
        let depth = self.depth.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::trace!(target: "trellis::overlay", depth, "overlay closed");
    }
}

static_assertions::assert_impl_all!(OverlayGate: Send, Sync);
static_assertions::assert_impl_all!(OverlayHold: Send, Sync);

//! Presentation surfaces that anchor provider sign-in UI.

/// Handle to the window a provider presents its sign-in UI over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresentationAnchor {
    window_id: u64,
}

impl PresentationAnchor {
    /// Creates an anchor for the host window with the given id.
    #[must_use]
    pub const fn new(window_id: u64) -> Self {
        Self { window_id }
    }

    /// Host window id.
    #[must_use]
    pub const fn window_id(&self) -> u64 {
        self.window_id
    }
}

/// Supplies the currently active window, if any.
///
/// Adapters call this at the moment a sign-in starts and never cache the
/// answer, since the active window can change between attempts.
#[cfg_attr(test, mockall::automock)]
pub trait PresentationSurface: Send + Sync {
    /// Returns the active window, or `None` when nothing can host provider UI.
    fn current_anchor(&self) -> Option<PresentationAnchor>;
}

//! Events delivered to a [`Presenter`](super::Presenter) from other threads.

/// A change to the display surface.
///
/// Typically produced by an input or signal thread and sent over a
/// `crossbeam_channel` to the thread that owns the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The display changed size.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// The screen contents are unknown; redraw everything next frame.
    Invalidate,
}

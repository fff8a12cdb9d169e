//! Injectable diagnostics sink.
//!
//! The core never panics on bad interaction input (double clicks, stale
//! handlers, degenerate viewports); it degrades and reports the event here.
//! Each component receives the sink explicitly instead of writing to a
//! global.

/// Non-fatal events emitted by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagEvent {
    /// A zoom-in target was not a drillable child of the current focus.
    ZoomRejected { reason: &'static str },
    /// A zoom-out was requested while already at the root.
    ZoomOutAtRoot,
    /// A new tree replaced the old one; focus and layout were reset.
    TreeRebuilt { nodes: usize },
    /// Layout was asked for a degenerate viewport and returned nothing.
    DegenerateViewport,
}

pub trait Diagnostics {
    fn note(&self, event: DiagEvent);
}

/// Default sink: forwards to the `log` crate.
pub struct LogSink;

impl Diagnostics for LogSink {
    fn note(&self, event: DiagEvent) {
        match event {
            DiagEvent::ZoomRejected { reason } => log::debug!("zoom rejected: {reason}"),
            DiagEvent::ZoomOutAtRoot => log::debug!("zoom out ignored: already at root"),
            DiagEvent::TreeRebuilt { nodes } => log::info!("tree rebuilt: {nodes} nodes"),
            DiagEvent::DegenerateViewport => log::debug!("layout skipped: degenerate viewport"),
        }
    }
}

/// Sink that drops everything. Useful for benchmarks and tests that do not
/// assert on diagnostics.
pub struct NullSink;

impl Diagnostics for NullSink {
    fn note(&self, _event: DiagEvent) {}
}

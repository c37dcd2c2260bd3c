//! Fragment sink port
//!
//! Defines where streamed text goes while a reply is being generated.

use studio_domain::Model;

/// Receives a reply incrementally as the model streams it.
///
/// Implementations live in the presentation layer (terminal renderer) or in
/// tests (recording sinks).
pub trait FragmentSink: Send + Sync {
    /// Called once before the first fragment.
    fn on_stream_start(&self, _model: Model) {}

    /// Called for each text fragment, in arrival order.
    fn on_fragment(&self, fragment: &str);

    /// Called once after the last fragment, whether the stream ended or failed.
    fn on_stream_end(&self) {}
}

/// Sink that discards everything
pub struct NoFragmentSink;

impl FragmentSink for NoFragmentSink {
    fn on_fragment(&self, _fragment: &str) {}
}

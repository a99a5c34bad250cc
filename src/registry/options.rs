use serde::{Deserialize, Serialize};

/// Options for a single listener registration.
///
/// Deserializes from the JavaScript-style options object, e.g.
/// `{"useCapture": true}`. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListenerOptions {
    /// Fire during the capture phase instead of the bubble phase.
    pub use_capture: bool,
}

impl ListenerOptions {
    /// Options for a capture-phase listener.
    pub fn capture() -> Self {
        ListenerOptions { use_capture: true }
    }
}

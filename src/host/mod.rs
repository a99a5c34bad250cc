//! Native event attachment.
//!
//! The registry never touches the platform itself: it goes through an
//! `EventHost`, which is either the browser (`web`, behind the `web_sys`
//! feature) or the in-process `memory::Document`.

pub mod memory;
#[cfg(feature = "web_sys")]
pub mod web;

use crate::callback::Callback;
use crate::registry::ListenerOptions;
use std::error::Error;

/// `EventHost` is the pair of native primitives a listener registry is
/// built on: attach a callback to a target and detach it again.
pub trait EventHost {
    /// Something events can be dispatched to. Equality must be identity.
    type Target: Clone + PartialEq;
    /// The event value handed to callbacks.
    type Event: 'static;
    /// Proof of an attachment, required to detach it.
    type Handle;
    /// Whatever the platform raises.
    type Error: Error + 'static;

    /// Attaches `callback` to `target` for `event`.
    ///
    /// Each call must produce an independent attachment even if the same
    /// callback is attached twice.
    fn attach(
        &self,
        target: &Self::Target,
        event: &str,
        callback: Callback<Self::Event>,
        options: &ListenerOptions,
    ) -> Result<Self::Handle, Self::Error>;

    /// Detaches a previous attachment. Detaching something that is no longer
    /// attached is not an error.
    fn detach(
        &self,
        target: &Self::Target,
        event: &str,
        handle: &Self::Handle,
        options: &ListenerOptions,
    ) -> Result<(), Self::Error>;
}

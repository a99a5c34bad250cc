//! Browser event targets through `web-sys`.

use super::EventHost;
use crate::callback::Callback;
use crate::registry::ListenerOptions;
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget};

/// An exception thrown by `addEventListener` or `removeEventListener`.
#[derive(Debug, Error)]
#[error("event target rejected the call: {0:?}")]
pub struct WebError(pub JsValue);

/// The attached JS function. Dropping it while still attached makes the
/// next dispatch throw, so the registry keeps it until detach.
pub type WebHandle = Closure<dyn Fn(Event)>;

/// `EventHost` for the page the code runs in.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebHost;

impl EventHost for WebHost {
    type Target = EventTarget;
    type Event = Event;
    type Handle = WebHandle;
    type Error = WebError;

    fn attach(
        &self,
        target: &EventTarget,
        event: &str,
        callback: Callback<Event>,
        options: &ListenerOptions,
    ) -> Result<WebHandle, WebError> {
        let closure = Closure::wrap(Box::new(move |event: Event| callback.emit(event)) as Box<dyn Fn(Event)>);
        target
            .add_event_listener_with_callback_and_bool(
                event,
                closure.as_ref().unchecked_ref(),
                options.use_capture,
            )
            .map_err(WebError)?;
        Ok(closure)
    }

    fn detach(
        &self,
        target: &EventTarget,
        event: &str,
        handle: &WebHandle,
        options: &ListenerOptions,
    ) -> Result<(), WebError> {
        target
            .remove_event_listener_with_callback_and_bool(
                event,
                handle.as_ref().unchecked_ref(),
                options.use_capture,
            )
            .map_err(WebError)
    }
}

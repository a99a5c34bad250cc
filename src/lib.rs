#![deny(
    missing_docs,
    missing_debug_implementations,
    bare_trait_objects,
    anonymous_parameters,
    elided_lifetimes_in_paths
)]

//! # DOM utilities
//!
//! The shared layer the widgets of a data and map application (grid,
//! filters, search, map view, info panels) wire their DOM interactivity
//! through.
//!
//! The centerpiece is [`ListenerRegistry`](registry/struct.ListenerRegistry.html):
//! it attaches listeners through an [`EventHost`](host/trait.EventHost.html)
//! and lets callers remove them again by the key they registered them
//! with, either a callback or the name of a method on a context that is
//! looked up every time the event fires.
//!
//! ```
//! use dom_utils::host::memory::{Document, Event};
//! use dom_utils::prelude::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let doc = Document::new();
//! let button = doc.create_element("button");
//! doc.append_child(doc.root(), button).unwrap();
//!
//! let clicks = Rc::new(Cell::new(0));
//! let grid = Context::new();
//! let counter = clicks.clone();
//! grid.set_method("onRowClick", move |_: Event| counter.set(counter.get() + 1));
//!
//! let mut registry = ListenerRegistry::new(doc.clone());
//! registry
//!     .register(&button, "click", "onRowClick", Some(&grid), ListenerOptions::default())
//!     .unwrap();
//! doc.dispatch(button, "click").unwrap();
//!
//! registry.unregister(&button, "click", "onRowClick", Some(&grid)).unwrap();
//! doc.dispatch(button, "click").unwrap();
//! assert_eq!(clicks.get(), 1);
//! ```
//!
//! In the browser use `host::web::WebHost` (cargo feature `web_sys`,
//! enabled by default).

pub mod callback;
pub mod host;
pub mod registry;
pub mod utils;

pub use crate::callback::Callback;

/// The module that contains the items most widgets need.
pub mod prelude {
    pub use crate::callback::Callback;
    pub use crate::host::EventHost;
    pub use crate::registry::{
        Context, ListenerKey, ListenerOptions, ListenerRegistry, RegistryError,
    };

    cfg_if::cfg_if! {
        if #[cfg(feature = "web_sys")] {
            pub use crate::host::web::WebHost;
        }
    }
}

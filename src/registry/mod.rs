//! Listener bookkeeping.
//!
//! Native removal needs the exact callback that was attached, while callers
//! want to remove listeners by what they registered them with: a callback or
//! the name of a method on some context. `ListenerRegistry` keeps the bound
//! callbacks and their handles so the two can be matched up again.

mod context;
mod key;
mod options;

pub use self::context::Context;
pub use self::key::ListenerKey;
pub use self::options::ListenerOptions;

use crate::callback::Callback;
use crate::host::EventHost;
use log::{trace, warn};
use slab::Slab;
use std::error::Error as StdError;
use std::fmt;
use std::mem;
use thiserror::Error;

/// Failure of `ListenerRegistry::register`.
#[derive(Debug, Error)]
pub enum RegistryError<E>
where
    E: StdError + 'static,
{
    /// A method name was given without a context to look it up on.
    #[error("listener `{0}` names a method but no context was given")]
    UnboundMethod(String),
    /// The host refused the attachment.
    #[error(transparent)]
    Host(E),
}

/// One successful registration.
pub struct ListenerRecord<H: EventHost> {
    seq: u64,
    target: H::Target,
    event: String,
    key: ListenerKey<H::Event>,
    context: Option<Context<H::Event>>,
    options: ListenerOptions,
    bound: Callback<H::Event>,
    handle: H::Handle,
}

impl<H: EventHost> ListenerRecord<H> {
    /// The target the listener is attached to.
    pub fn target(&self) -> &H::Target {
        &self.target
    }

    /// The event type.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The key it was registered under.
    pub fn key(&self) -> &ListenerKey<H::Event> {
        &self.key
    }

    /// The context it was registered with.
    pub fn context(&self) -> Option<&Context<H::Event>> {
        self.context.as_ref()
    }

    /// Options used at attach time.
    pub fn options(&self) -> &ListenerOptions {
        &self.options
    }

    /// The callback handed to the host.
    pub fn bound(&self) -> &Callback<H::Event> {
        &self.bound
    }

    fn matches(
        &self,
        target: &H::Target,
        event: &str,
        key: &ListenerKey<H::Event>,
        context: Option<&Context<H::Event>>,
    ) -> bool {
        self.target == *target
            && self.event == event
            && self.key == *key
            && self.context.as_ref() == context
    }
}

impl<H: EventHost> fmt::Debug for ListenerRecord<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRecord")
            .field("seq", &self.seq)
            .field("event", &self.event)
            .field("key", &self.key)
            .field("context", &self.context)
            .field("options", &self.options)
            .finish()
    }
}

/// Attaches listeners through an `EventHost` and remembers them for removal.
///
/// Registering the same tuple twice attaches twice; each `unregister` undoes
/// the earliest remaining one. Dropping the registry detaches everything
/// still registered.
pub struct ListenerRegistry<H: EventHost> {
    host: H,
    records: Slab<ListenerRecord<H>>,
    next_seq: u64,
}

impl<H: EventHost> ListenerRegistry<H> {
    /// Creates an empty registry on top of `host`.
    pub fn new(host: H) -> Self {
        ListenerRegistry {
            host,
            records: Slab::new(),
            next_seq: 0,
        }
    }

    /// The host listeners are attached through.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Number of active registrations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Active registrations in the order they were made.
    pub fn records(&self) -> Vec<&ListenerRecord<H>> {
        let mut records: Vec<_> = self.records.iter().map(|(_, record)| record).collect();
        records.sort_by_key(|record| record.seq);
        records
    }

    /// Attaches a listener to `target` for `event`.
    ///
    /// A `Named` key is resolved on `context` each time the event fires, so
    /// the method may be defined or replaced after registration. A `Direct`
    /// callback is attached as is and `context` only takes part in matching.
    pub fn register<K>(
        &mut self,
        target: &H::Target,
        event: &str,
        key: K,
        context: Option<&Context<H::Event>>,
        options: ListenerOptions,
    ) -> Result<(), RegistryError<H::Error>>
    where
        K: Into<ListenerKey<H::Event>>,
    {
        let key = key.into();
        let bound = match (&key, context) {
            (ListenerKey::Direct(callback), _) => callback.clone(),
            (ListenerKey::Named(name), Some(context)) => bind_method(name, context),
            (ListenerKey::Named(name), None) => {
                return Err(RegistryError::UnboundMethod(name.clone()));
            }
        };

        let handle = self
            .host
            .attach(target, event, bound.clone(), &options)
            .map_err(RegistryError::Host)?;

        let seq = self.next_seq;
        self.next_seq += 1;
        trace!("register #{} {:?} for `{}`", seq, key, event);
        self.records.insert(ListenerRecord {
            seq,
            target: target.clone(),
            event: event.to_owned(),
            key,
            context: context.cloned(),
            options,
            bound,
            handle,
        });
        Ok(())
    }

    /// Detaches the earliest listener registered with exactly this tuple.
    ///
    /// Returns `Ok(false)` if there is none. If the host fails to detach, the
    /// registration stays in place.
    pub fn unregister<K>(
        &mut self,
        target: &H::Target,
        event: &str,
        key: K,
        context: Option<&Context<H::Event>>,
    ) -> Result<bool, H::Error>
    where
        K: Into<ListenerKey<H::Event>>,
    {
        let key = key.into();
        let slot = self
            .records
            .iter()
            .filter(|(_, record)| record.matches(target, event, &key, context))
            .min_by_key(|(_, record)| record.seq)
            .map(|(slot, _)| slot);

        let slot = match slot {
            Some(slot) => slot,
            None => {
                trace!("unregister {:?} for `{}`: no match", key, event);
                return Ok(false);
            }
        };

        {
            let record = &self.records[slot];
            self.host
                .detach(&record.target, &record.event, &record.handle, &record.options)?;
            trace!("unregister #{} {:?} for `{}`", record.seq, key, event);
        }
        self.records.remove(slot);
        Ok(true)
    }

    /// Checks whether a registration with exactly this tuple is active.
    pub fn is_registered<K>(
        &self,
        target: &H::Target,
        event: &str,
        key: K,
        context: Option<&Context<H::Event>>,
    ) -> bool
    where
        K: Into<ListenerKey<H::Event>>,
    {
        let key = key.into();
        self.records
            .iter()
            .any(|(_, record)| record.matches(target, event, &key, context))
    }

    /// Detaches every active listener in registration order.
    ///
    /// Detach failures are logged and do not stop the sweep. Records whose
    /// detach failed stay registered, like a failed `unregister`, so a later
    /// `clear` can retry them.
    pub fn clear(&mut self) {
        let mut slots: Vec<(u64, usize)> = self
            .records
            .iter()
            .map(|(slot, record)| (record.seq, slot))
            .collect();
        slots.sort();
        for (_, slot) in slots {
            let record = &self.records[slot];
            match self
                .host
                .detach(&record.target, &record.event, &record.handle, &record.options)
            {
                Ok(()) => {
                    self.records.remove(slot);
                }
                Err(err) => warn!(
                    "failed to detach listener #{} for `{}`: {}",
                    record.seq, record.event, err
                ),
            }
        }
    }
}

/// Detaches what is left. Listeners the host refuses to detach are leaked
/// rather than dropped, since the host may still call them.
impl<H: EventHost> Drop for ListenerRegistry<H> {
    fn drop(&mut self) {
        self.clear();
        for record in self.records.drain() {
            warn!("leaking listener #{} for `{}`", record.seq, record.event);
            mem::forget(record);
        }
    }
}

impl<H: EventHost> fmt::Debug for ListenerRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("records", &self.records.len())
            .finish()
    }
}

/// Wraps a method name into a callback that looks the method up on
/// `context` at call time.
fn bind_method<E: 'static>(name: &str, context: &Context<E>) -> Callback<E> {
    let name = name.to_owned();
    let context = context.clone();
    Callback::from(move |event| match context.method(&name) {
        Some(method) => method.emit(event),
        None => warn!("context has no method `{}`, event dropped", name),
    })
}

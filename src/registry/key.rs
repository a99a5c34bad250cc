use crate::callback::Callback;
use std::fmt;

/// What a caller registers a listener under, and later removes it by.
pub enum ListenerKey<E> {
    /// A callback attached as is.
    Direct(Callback<E>),
    /// The name of a method looked up on the context every time the event
    /// fires.
    Named(String),
}

impl<E> Clone for ListenerKey<E> {
    fn clone(&self) -> Self {
        match self {
            ListenerKey::Direct(callback) => ListenerKey::Direct(callback.clone()),
            ListenerKey::Named(name) => ListenerKey::Named(name.clone()),
        }
    }
}

impl<E> PartialEq for ListenerKey<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ListenerKey::Direct(a), ListenerKey::Direct(b)) => a == b,
            (ListenerKey::Named(a), ListenerKey::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl<E> fmt::Debug for ListenerKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerKey::Direct(_) => f.write_str("Direct(Callback<_>)"),
            ListenerKey::Named(name) => write!(f, "Named({:?})", name),
        }
    }
}

impl<E> From<Callback<E>> for ListenerKey<E> {
    fn from(callback: Callback<E>) -> Self {
        ListenerKey::Direct(callback)
    }
}

impl<E> From<&Callback<E>> for ListenerKey<E> {
    fn from(callback: &Callback<E>) -> Self {
        ListenerKey::Direct(callback.clone())
    }
}

impl<E> From<&str> for ListenerKey<E> {
    fn from(name: &str) -> Self {
        ListenerKey::Named(name.to_owned())
    }
}

impl<E> From<String> for ListenerKey<E> {
    fn from(name: String) -> Self {
        ListenerKey::Named(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_keys_compare_by_identity() {
        let cb: Callback<()> = Callback::from(|_: ()| {});
        let twin: Callback<()> = Callback::from(|_: ()| {});
        assert_eq!(ListenerKey::from(&cb), ListenerKey::from(cb.clone()));
        assert_ne!(ListenerKey::from(&cb), ListenerKey::from(&twin));
    }

    #[test]
    fn named_keys_compare_by_name() {
        let a: ListenerKey<()> = "onClick".into();
        let b: ListenerKey<()> = String::from("onClick").into();
        assert_eq!(a, b);
        assert_ne!(a, ListenerKey::from("onKeyUp"));
    }
}

//! This module contains the `Callback` type, the context-binding primitive
//! every listener is expressed with.

use std::fmt;
use std::rc::Rc;

/// Universal callback wrapper.
///
/// Clones share the same closure. Two callbacks are equal only when they are
/// clones of each other, which is the identity the registry matches
/// listeners by.
pub struct Callback<IN>(Rc<dyn Fn(IN)>);

impl<IN, F: Fn(IN) + 'static> From<F> for Callback<IN> {
    fn from(func: F) -> Self {
        Callback(Rc::new(func))
    }
}

impl<IN> Clone for Callback<IN> {
    fn clone(&self) -> Self {
        Callback(self.0.clone())
    }
}

impl<IN> PartialEq for Callback<IN> {
    fn eq(&self, other: &Callback<IN>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<IN> fmt::Debug for Callback<IN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback<_>")
    }
}

impl<IN> Callback<IN> {
    /// This method calls the actual callback.
    pub fn emit(&self, value: IN) {
        (self.0)(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_are_equal() {
        let cb: Callback<()> = Callback::from(|_: ()| {});
        assert_eq!(cb, cb.clone());
    }

    #[test]
    fn identical_closures_are_distinct() {
        let a: Callback<()> = Callback::from(|_: ()| {});
        let b: Callback<()> = Callback::from(|_: ()| {});
        assert_ne!(a, b);
    }
}

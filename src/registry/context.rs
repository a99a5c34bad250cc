use crate::callback::Callback;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A receiver whose methods can be looked up by name.
///
/// Methods are resolved every time an event fires, so replacing a method
/// changes what already registered listeners run. Clones share the same
/// method table, and two contexts are equal only if they share it.
pub struct Context<E> {
    methods: Rc<RefCell<IndexMap<String, Callback<E>>>>,
}

impl<E> Context<E> {
    /// Creates a context without methods.
    pub fn new() -> Self {
        Context {
            methods: Rc::new(RefCell::new(IndexMap::new())),
        }
    }

    /// Builder-style `set_method`.
    pub fn with_method<F>(self, name: &str, method: F) -> Self
    where
        F: Into<Callback<E>>,
    {
        self.set_method(name, method);
        self
    }

    /// Defines or replaces a method, returning the previous one.
    pub fn set_method<F>(&self, name: &str, method: F) -> Option<Callback<E>>
    where
        F: Into<Callback<E>>,
    {
        self.methods
            .borrow_mut()
            .insert(name.to_owned(), method.into())
    }

    /// Removes a method, returning it.
    pub fn remove_method(&self, name: &str) -> Option<Callback<E>> {
        self.methods.borrow_mut().shift_remove(name)
    }

    /// Current value of a method.
    pub fn method(&self, name: &str) -> Option<Callback<E>> {
        self.methods.borrow().get(name).cloned()
    }

    /// Checks whether both handles refer to the same receiver.
    pub fn ptr_eq(&self, other: &Context<E>) -> bool {
        Rc::ptr_eq(&self.methods, &other.methods)
    }
}

impl<E> Default for Context<E> {
    fn default() -> Self {
        Context::new()
    }
}

impl<E> Clone for Context<E> {
    fn clone(&self) -> Self {
        Context {
            methods: self.methods.clone(),
        }
    }
}

impl<E> PartialEq for Context<E> {
    fn eq(&self, other: &Context<E>) -> bool {
        self.ptr_eq(other)
    }
}

impl<E> fmt::Debug for Context<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.methods.borrow().keys())
            .finish()
    }
}

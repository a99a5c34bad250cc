//! Class name handling for elements.

use indexmap::set::IndexSet;
use std::fmt;

/// A set of classes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classes {
    set: IndexSet<String>,
}

impl Classes {
    /// Creates empty set of classes.
    pub fn new() -> Self {
        Self {
            set: IndexSet::new(),
        }
    }

    /// Adds a class to a set.
    ///
    /// Prevents duplication of class names.
    pub fn push(&mut self, class: &str) {
        let class = class.trim();
        if !class.is_empty() {
            self.set.insert(class.into());
        }
    }

    /// Removes a class, keeping the order of the rest.
    pub fn remove(&mut self, class: &str) -> bool {
        self.set.shift_remove(class)
    }

    /// Check the set contains a class.
    pub fn contains(&self, class: &str) -> bool {
        self.set.contains(class)
    }

    /// Returns `true` if there are no classes.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Adds other classes to this set of classes; returning itself.
    ///
    /// Takes the logical union of both `Classes`.
    pub fn extend<T: Into<Classes>>(mut self, other: T) -> Self {
        self.set.extend(other.into().set.into_iter());
        self
    }
}

impl fmt::Display for Classes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for class in &self.set {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(class)?;
            first = false;
        }
        Ok(())
    }
}

impl From<&str> for Classes {
    fn from(t: &str) -> Self {
        let set = t.split_whitespace().map(String::from).collect();
        Self { set }
    }
}

impl From<String> for Classes {
    fn from(t: String) -> Self {
        Classes::from(t.as_str())
    }
}

impl<T: AsRef<str>> From<Vec<T>> for Classes {
    fn from(t: Vec<T>) -> Self {
        let mut classes = Classes::new();
        for class in &t {
            classes.push(class.as_ref());
        }
        classes
    }
}

/// Checks whether a `className` string contains `class` as a whole word.
pub fn has_class(class_name: &str, class: &str) -> bool {
    class_name.split_whitespace().any(|c| c == class)
}

/// Returns `class_name` with `class` appended unless it is already there.
pub fn add_class(class_name: &str, class: &str) -> String {
    if has_class(class_name, class) {
        return class_name.to_owned();
    }
    let mut classes = Classes::from(class_name);
    classes.push(class);
    classes.to_string()
}

/// Returns `class_name` without `class`.
pub fn remove_class(class_name: &str, class: &str) -> String {
    if !has_class(class_name, class) {
        return class_name.to_owned();
    }
    let mut classes = Classes::from(class_name);
    classes.remove(class);
    classes.to_string()
}

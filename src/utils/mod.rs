//! Stateless helpers shared by the widgets of the application.

pub mod classes;
pub mod css;
pub mod nested;

pub use self::classes::{add_class, has_class, remove_class, Classes};

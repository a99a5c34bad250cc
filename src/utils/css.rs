//! Parsing of CSS values as reported by computed styles.

use thiserror::Error;

/// A CSS value that does not hold a number.
#[derive(Debug, Error, PartialEq)]
#[error("`{0}` is not a numeric CSS value")]
pub struct CssValueError(pub String);

fn split_unit(value: &str) -> (&str, &str) {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|&(_, c)| c.is_ascii_alphabetic() || c == '%')
        .map(|(i, _)| i)
        .unwrap_or_else(|| value.len());
    (value[..end].trim_end(), &value[end..])
}

/// Strips the unit from a CSS value, e.g. `"12px"` gives `12.0`.
pub fn unit_to_number(value: &str) -> Result<f64, CssValueError> {
    let (number, _) = split_unit(value);
    number
        .parse::<f64>()
        .map_err(|_| CssValueError(value.to_owned()))
}

/// Converts a CSS time such as `"1.5s"` or `"250ms"` to milliseconds.
///
/// Values without a unit are taken as milliseconds.
pub fn time_to_millis(value: &str) -> Result<f64, CssValueError> {
    let (_, unit) = split_unit(value);
    let number = unit_to_number(value)?;
    match unit {
        "s" => Ok(number * 1000.0),
        "ms" | "" => Ok(number),
        _ => Err(CssValueError(value.to_owned())),
    }
}

/// Turns a CSS property name into its JavaScript style name:
/// `"border-top-width"` becomes `"borderTopWidth"`.
pub fn js_prop_name(prop: &str) -> String {
    let mut name = String::with_capacity(prop.len());
    let mut chars = prop.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '-' && next.is_ascii_lowercase() => {
                name.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => name.push(c),
        }
    }
    name
}

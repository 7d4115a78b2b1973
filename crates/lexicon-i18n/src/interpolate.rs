//! `{{name}}` placeholder interpolation.
//!
//! # Invariants
//!
//! 1. **Single pass**: substituted values are copied verbatim and never
//!    re-scanned, so a value containing `{{x}}` is not expanded again.
//! 2. **Unmatched tokens survive**: a placeholder with no parameter is
//!    emitted exactly as written, including any inner whitespace.
//! 3. **Unclosed braces survive**: `{{name` without `}}` is copied as-is.

use std::fmt;

/// A parameter value: a string or a number.
///
/// Numbers are rendered with their `Display` form.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

macro_rules! int_param {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

int_param!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Int)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Int)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Named interpolation parameters, kept in insertion order.
///
/// Setting the same name twice replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Params::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.set(name, value);
        }
        params
    }
}

/// Output of [`interpolate`]: the rendered text plus the names of
/// placeholders that had no matching parameter, in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolated {
    pub text: String,
    pub unresolved: Vec<String>,
}

/// Replace every `{{name}}` in `template` with `params[name]`.
///
/// Names are matched after trimming surrounding whitespace, so
/// `{{ name }}` and `{{name}}` are the same placeholder.
#[must_use]
pub fn interpolate(template: &str, params: &Params) -> Interpolated {
    let mut text = String::with_capacity(template.len());
    let mut unresolved = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        text.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            // Unclosed: emit the remainder untouched.
            text.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let raw = &after_open[..close];
        let name = raw.trim();
        match params.get(name) {
            Some(value) => text.push_str(&value.to_string()),
            None => {
                text.push_str("{{");
                text.push_str(raw);
                text.push_str("}}");
                unresolved.push(name.to_string());
            }
        }
        rest = &after_open[close + 2..];
    }
    text.push_str(rest);

    Interpolated { text, unresolved }
}

/// Names of all placeholders in `template`, in order of appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<String> {
    interpolate(template, &Params::new()).unresolved
}

//! Column value resolution.
//!
//! An [`Accessor`] describes how a column pulls its value out of a [`Row`]:
//!
//! - a plain field name (`"email"`) is a direct lookup,
//! - a dotted path (`"address.city"`) walks nested maps,
//! - a computed accessor calls a function with the whole row.
//!
//! Path walks never panic. A missing segment or a non-map intermediate value
//! short-circuits to [`Resolved::Absent`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::model::Row;
use crate::model::Value;

/// Text used when an absent value is coerced to a string.
pub const ABSENT_TEXT: &str = "undefined";

/// A computed accessor function.
pub type ComputeFn = Arc<dyn Fn(&Row) -> Value + Send + Sync>;

/// A pre-split field path such as `address.city`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dot-separated path.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns `true` if the path has more than one segment.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Walks the path through `row`.
    pub fn resolve<'a>(&self, row: &'a Row) -> Resolved<'a> {
        let Some((first, rest)) = self.segments.split_first() else {
            return Resolved::Absent;
        };

        let Some(mut current) = row.get(first) else {
            return Resolved::Absent;
        };

        for segment in rest {
            let next = match current {
                Value::Map(inner) => inner.get(segment),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Resolved::Absent,
            }
        }

        Resolved::Present(Cow::Borrowed(current))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// The result of resolving a column against a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// The accessor produced a value.
    Present(Cow<'a, Value>),
    /// The path did not resolve.
    Absent,
}

impl Resolved<'_> {
    /// Returns `true` if the accessor did not resolve.
    pub fn is_absent(&self) -> bool {
        matches!(self, Resolved::Absent)
    }

    /// Returns the resolved value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Resolved::Present(v) => Some(v.as_ref()),
            Resolved::Absent => None,
        }
    }

    /// Coerces the result to text. Never fails.
    pub fn to_text(&self) -> String {
        match self {
            Resolved::Present(v) => v.to_string(),
            Resolved::Absent => ABSENT_TEXT.to_string(),
        }
    }

    /// Converts into an owned value, mapping `Absent` to `Null`.
    pub fn into_value(self) -> Value {
        match self {
            Resolved::Present(v) => v.into_owned(),
            Resolved::Absent => Value::Null,
        }
    }
}

/// How a column extracts its value from a row.
#[derive(Clone)]
pub enum Accessor {
    /// A field name or dotted field path.
    Path(FieldPath),
    /// A function of the whole row.
    Computed(ComputeFn),
}

impl Accessor {
    /// Creates a path accessor.
    pub fn path(path: &str) -> Self {
        Accessor::Path(FieldPath::parse(path))
    }

    /// Creates a computed accessor.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Row) -> Value + Send + Sync + 'static,
    {
        Accessor::Computed(Arc::new(f))
    }

    /// Resolves the accessor against a row.
    ///
    /// Computed accessors are called as-is; a panic inside one propagates.
    pub fn resolve<'a>(&self, row: &'a Row) -> Resolved<'a> {
        match self {
            Accessor::Path(path) => path.resolve(row),
            Accessor::Computed(f) => Resolved::Present(Cow::Owned(f(row))),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Path(path) => f.debug_tuple("Path").field(&path.to_string()).finish(),
            Accessor::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl From<&str> for Accessor {
    fn from(path: &str) -> Self {
        Accessor::path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> Row {
        Row::new()
            .set("name", "Ada")
            .set(
                "address",
                Row::new().set("city", "London").set("geo", Row::new().set("lat", 51)),
            )
            .set("title", "Engineer")
    }

    #[test]
    fn test_direct_lookup() {
        let row = employee();
        let resolved = Accessor::path("name").resolve(&row);
        assert_eq!(resolved.value(), Some(&Value::from("Ada")));
    }

    #[test]
    fn test_nested_lookup() {
        let row = employee();
        assert_eq!(
            Accessor::path("address.city").resolve(&row).value(),
            Some(&Value::from("London"))
        );
        assert_eq!(
            Accessor::path("address.geo.lat").resolve(&row).value(),
            Some(&Value::Int(51))
        );
    }

    #[test]
    fn test_missing_intermediate_is_absent() {
        let row = employee();
        assert!(Accessor::path("company.name").resolve(&row).is_absent());
        assert!(Accessor::path("address.zip.code").resolve(&row).is_absent());
        assert!(Accessor::path("missing").resolve(&row).is_absent());
    }

    #[test]
    fn test_non_map_intermediate_is_absent() {
        let row = employee();
        assert!(Accessor::path("name.first").resolve(&row).is_absent());
        assert!(Accessor::path("title.length").resolve(&row).is_absent());
    }

    #[test]
    fn test_absent_coerces_to_text() {
        let row = Row::new().set("n", Value::Null);
        assert_eq!(Accessor::path("x.y").resolve(&row).to_text(), "undefined");
        assert_eq!(Accessor::path("n").resolve(&row).to_text(), "null");
    }

    #[test]
    fn test_computed_accessor() {
        let row = Row::new().set("first", "Ada").set("last", "Lovelace");
        let full = Accessor::computed(|r| {
            let first = r.get("first").map(Value::to_string).unwrap_or_default();
            let last = r.get("last").map(Value::to_string).unwrap_or_default();
            Value::from(format!("{} {}", first, last))
        });
        assert_eq!(full.resolve(&row).to_text(), "Ada Lovelace");
    }

    #[test]
    #[should_panic(expected = "accessor failure")]
    fn test_computed_accessor_panic_propagates() {
        let row = Row::new();
        let broken = Accessor::computed(|_| panic!("accessor failure"));
        let _ = broken.resolve(&row);
    }
}

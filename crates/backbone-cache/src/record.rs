//! Records that can be turned into cache keys.
//!
//! A record lists its fields, in declaration order, through [`Fields`].
//! Untagged fields are declared too: they never reach the key, but they
//! decide whether the record as a whole is zero and they appear in its
//! opaque rendering.
//!
//! ```
//! use backbone_cache::{CacheKey, Fields};
//!
//! struct UserKey {
//!     id: String,
//!     device_id: String,
//! }
//!
//! impl CacheKey for UserKey {
//!     fn fields<'a>(&'a self, fields: &mut Fields<'a>) {
//!         fields.value("ID", &self.id).cache("key");
//!         fields.value("DeviceID", &self.device_id).cache("optional").json("device_id");
//!     }
//! }
//! ```

use crate::error::KeyError;
use crate::tag::{self, FieldRule, Presence};
use crate::value::KeyValue;

/// A structured value that can be turned into a cache key.
pub trait CacheKey {
    /// Type name written after the namespace.
    ///
    /// Defaults to the Rust type name without its module path or generic
    /// arguments. Override it with a literal when keys must survive a
    /// rename of the type.
    fn type_name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Declares every field of the record in declaration order.
    fn fields<'a>(&'a self, fields: &mut Fields<'a>);
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// One `(name, value)` pair contributed to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub value: String,
}

enum Slot<'a> {
    Value(&'a dyn KeyValue),
    Record(Option<&'a dyn CacheKey>),
}

/// A declared field with its annotations.
pub struct Field<'a> {
    name: &'static str,
    cache: Option<&'static str>,
    json: Option<&'static str>,
    slot: Slot<'a>,
}

impl<'a> Field<'a> {
    /// Sets the `cache` participation annotation, e.g. `"key"` or `"nodive,optional"`.
    pub fn cache(&mut self, tag: &'static str) -> &mut Self {
        self.cache = Some(tag);
        self
    }

    /// Sets the `json` name annotation, e.g. `"device_id,omitempty"`.
    pub fn json(&mut self, tag: &'static str) -> &mut Self {
        self.json = Some(tag);
        self
    }

    fn is_record(&self) -> bool {
        matches!(self.slot, Slot::Record(_))
    }

    fn is_null(&self) -> bool {
        match &self.slot {
            Slot::Value(value) => value.is_null(),
            Slot::Record(record) => record.is_none(),
        }
    }

    fn is_zero(&self) -> bool {
        match &self.slot {
            Slot::Value(value) => value.is_zero(),
            Slot::Record(None) => true,
            Slot::Record(Some(record)) => is_zero_record(*record),
        }
    }
}

/// Collects the field declarations of a record.
#[derive(Default)]
pub struct Fields<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> Fields<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a scalar or collection field.
    pub fn value<V: KeyValue>(&mut self, name: &'static str, value: &'a V) -> &mut Field<'a> {
        self.push(name, Slot::Value(value))
    }

    /// Declares a nested record.
    pub fn record<R: CacheKey>(&mut self, name: &'static str, record: &'a R) -> &mut Field<'a> {
        self.push(name, Slot::Record(Some(record as &dyn CacheKey)))
    }

    /// Declares a nested record behind an optional reference.
    pub fn nullable_record<R: CacheKey>(
        &mut self,
        name: &'static str,
        record: Option<&'a R>,
    ) -> &mut Field<'a> {
        self.push(name, Slot::Record(record.map(|r| r as &dyn CacheKey)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(&mut self, name: &'static str, slot: Slot<'a>) -> &mut Field<'a> {
        let index = self.fields.len();
        self.fields.push(Field {
            name,
            cache: None,
            json: None,
            slot,
        });
        &mut self.fields[index]
    }
}

fn declared(record: &dyn CacheKey) -> Vec<Field<'_>> {
    let mut fields = Fields::new();
    record.fields(&mut fields);
    fields.fields
}

fn is_zero_record(record: &dyn CacheKey) -> bool {
    declared(record).iter().all(Field::is_zero)
}

/// Flattens the tagged fields of a record into fragments.
///
/// Fails on the first field that breaks its annotation contract; nothing
/// is returned for a partially valid record.
pub fn fragments(record: &dyn CacheKey) -> Result<Vec<Fragment>, KeyError> {
    let mut out = Vec::new();
    collect(record, None, true, &mut out)?;
    Ok(out)
}

/// Walks `record`, appending fragments to `out`.
///
/// `strict` is cleared while rendering the zero value of an optional nested
/// record, whose own required fields are necessarily empty.
fn collect(
    record: &dyn CacheKey,
    path: Option<&str>,
    strict: bool,
    out: &mut Vec<Fragment>,
) -> Result<(), KeyError> {
    for field in declared(record) {
        let rule = tag::classify(field.cache, field.is_record());
        let Some(presence) = rule.presence() else {
            continue;
        };

        let name = tag::field_name(field.json, field.name);
        let qualified = match path {
            Some(parent) => format!("{parent}.{name}"),
            None => name.clone(),
        };

        if field.is_zero() {
            if strict && presence == Presence::Required {
                return Err(KeyError::EmptyRequiredField { field: qualified });
            }
            if field.is_null() {
                continue;
            }
        }

        match (rule, &field.slot) {
            (FieldRule::Dive(_), Slot::Value(_)) => {
                return Err(KeyError::NotAStruct { field: qualified });
            }
            (FieldRule::Dive(_), Slot::Record(Some(nested))) => {
                let strict = strict && !field.is_zero();
                collect(*nested, Some(&qualified), strict, out)?;
            }
            (_, Slot::Record(Some(nested))) => out.push(Fragment {
                name,
                value: opaque(*nested, &qualified)?,
            }),
            (_, Slot::Value(value)) => out.push(Fragment {
                name,
                value: render(*value, &qualified)?,
            }),
            (_, Slot::Record(None)) => {}
        }
    }
    Ok(())
}

/// Renders a whole record as one value: `{v1 v2 ...}` over every declared field.
fn opaque(record: &dyn CacheKey, path: &str) -> Result<String, KeyError> {
    let mut parts = Vec::new();
    for field in declared(record) {
        let part = match field.slot {
            Slot::Value(value) => render(value, path)?,
            Slot::Record(Some(nested)) => opaque(nested, path)?,
            Slot::Record(None) => "<nil>".to_string(),
        };
        parts.push(part);
    }
    Ok(format!("{{{}}}", parts.join(" ")))
}

fn render(value: &dyn KeyValue, path: &str) -> Result<String, KeyError> {
    value
        .render()
        .map_err(|unsupported| KeyError::UnsupportedFieldType {
            field: path.to_string(),
            type_name: unsupported.0,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
        y: i32,
    }

    impl CacheKey for Point {
        fn fields<'a>(&'a self, fields: &mut Fields<'a>) {
            fields.value("X", &self.x).cache("optional");
            fields.value("Y", &self.y).cache("optional");
        }
    }

    struct Shape {
        name: String,
        origin: Point,
        anchor: Point,
        note: String,
    }

    impl CacheKey for Shape {
        fn fields<'a>(&'a self, fields: &mut Fields<'a>) {
            fields.value("Name", &self.name).cache("key");
            fields.record("Origin", &self.origin).cache("dive");
            fields.record("Anchor", &self.anchor).cache("nodive,optional");
            fields.value("Note", &self.note);
        }
    }

    fn shape() -> Shape {
        Shape {
            name: "square".into(),
            origin: Point { x: 1, y: 2 },
            anchor: Point { x: 0, y: 5 },
            note: "ignored".into(),
        }
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("backbone_cache::record::Shape"), "Shape");
        assert_eq!(short_type_name("app::Wrapper<alloc::string::String>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn test_default_type_name() {
        assert_eq!(shape().type_name(), "Shape");
    }

    #[test]
    fn test_fragments_follow_declaration_order() {
        let fragments = fragments(&shape()).unwrap();
        let rendered: Vec<_> = fragments
            .iter()
            .map(|f| format!("{}:{}", f.name, f.value))
            .collect();
        assert_eq!(rendered, vec!["name:square", "x:1", "y:2", "anchor:{0 5}"]);
    }

    #[test]
    fn test_untagged_fields_are_declared_but_skipped() {
        let shape = shape();
        let mut fields = Fields::new();
        shape.fields(&mut fields);
        assert_eq!(fields.len(), 4);
        assert!(fragments(&shape).unwrap().iter().all(|f| f.name != "note"));
    }

    #[test]
    fn test_zero_record_detection() {
        assert!(is_zero_record(&Point { x: 0, y: 0 }));
        assert!(!is_zero_record(&Point { x: 0, y: 1 }));
    }

    #[test]
    fn test_required_zero_dive_target_fails() {
        let mut value = shape();
        value.origin = Point { x: 0, y: 0 };
        assert_eq!(
            fragments(&value),
            Err(KeyError::EmptyRequiredField {
                field: "origin".into()
            })
        );
    }
}

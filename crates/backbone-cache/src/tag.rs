//! Field annotation parsing for cache keys.
//!
//! Each field a record declares may carry two annotations, written the way
//! struct tags are written:
//!
//! - `cache`: participation in the key. The first comma-separated token
//!   decides: `key` (required, must be non-empty), `optional` (may be
//!   empty), `dive` (expand a nested record) or `nodive` (treat a nested
//!   record as one opaque value). After `dive`/`nodive` a second token,
//!   `key` or `optional`, gives the field's own presence rule.
//! - `json`: the serialized name. Only the first segment is used; an empty
//!   name or `-` falls back to the lower-cased field name.
//!
//! Parsing never fails: an unrecognised annotation leaves the field out of
//! the key.

/// Whether an included field may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// How a declared field takes part in a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Not part of the key.
    Excluded,
    /// Scalar that must be non-empty.
    Required,
    /// Scalar that may be empty.
    Optional,
    /// Nested record whose fields are spliced into the parent's fragments.
    Dive(Presence),
    /// Nested record rendered as a single value.
    Opaque(Presence),
}

impl FieldRule {
    /// Presence rule of an included field, `None` when excluded.
    #[must_use]
    pub fn presence(self) -> Option<Presence> {
        match self {
            Self::Excluded => None,
            Self::Required => Some(Presence::Required),
            Self::Optional => Some(Presence::Optional),
            Self::Dive(presence) | Self::Opaque(presence) => Some(presence),
        }
    }

    #[must_use]
    pub fn is_required(self) -> bool {
        self.presence() == Some(Presence::Required)
    }
}

/// Classifies a field from its `cache` annotation.
///
/// `is_record` tells whether the field holds a nested record; `key` and
/// `optional` on a record imply diving into it, and `nodive` on a scalar has
/// nothing to suppress.
///
/// # Example
///
/// ```
/// use backbone_cache::tag::{classify, FieldRule, Presence};
///
/// assert_eq!(classify(Some("key"), false), FieldRule::Required);
/// assert_eq!(classify(Some("nodive,optional"), true), FieldRule::Opaque(Presence::Optional));
/// assert_eq!(classify(None, true), FieldRule::Excluded);
/// ```
#[must_use]
pub fn classify(cache: Option<&str>, is_record: bool) -> FieldRule {
    let Some(tag) = cache.map(str::trim).filter(|tag| !tag.is_empty()) else {
        return FieldRule::Excluded;
    };

    let mut tokens = tag.split(',').map(str::trim);
    let first = tokens.next().unwrap_or_default();

    let presence = match first {
        "key" => Presence::Required,
        "optional" => Presence::Optional,
        "" | "dive" | "nodive" => match tokens.next() {
            None | Some("") | Some("key") => Presence::Required,
            Some("optional") => Presence::Optional,
            Some(_) => return FieldRule::Excluded,
        },
        _ => return FieldRule::Excluded,
    };

    match (first, is_record) {
        ("nodive", true) => FieldRule::Opaque(presence),
        // An explicit dive on a scalar is kept so the normalizer can report it.
        (_, true) | ("dive", false) => FieldRule::Dive(presence),
        (_, false) => match presence {
            Presence::Required => FieldRule::Required,
            Presence::Optional => FieldRule::Optional,
        },
    }
}

/// Resolves the name a field is rendered under.
///
/// # Example
///
/// ```
/// use backbone_cache::tag::field_name;
///
/// assert_eq!(field_name(Some("device_id,omitempty"), "DeviceID"), "device_id");
/// assert_eq!(field_name(Some("-"), "DeviceID"), "deviceid");
/// assert_eq!(field_name(None, "ID"), "id");
/// ```
#[must_use]
pub fn field_name(json: Option<&str>, field: &str) -> String {
    match json.and_then(|tag| tag.split(',').next()).map(str::trim) {
        Some(name) if !name.is_empty() && name != "-" => name.to_string(),
        _ => field.to_lowercase(),
    }
}

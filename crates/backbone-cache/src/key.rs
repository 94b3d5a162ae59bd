//! Cache key composition.
//!
//! A key is `<namespace>#<TypeName>` followed by `#<prefix>` for each prefix
//! and `#<name>:<value>` for each fragment of the record. Without a record
//! it is just the namespace and the prefixes.

use std::sync::Arc;

use backbone_config::ServiceConfig;

use crate::error::KeyError;
use crate::namespace;
use crate::record::{self, CacheKey};

/// Separator between key segments.
pub const SEPARATOR: char = '#';

/// Derives a key under the process-wide namespace.
///
/// # Errors
///
/// Returns [`KeyError::EmptyNamespace`] when no namespace is configured, or
/// the first field-level error of `value`.
///
/// # Example
///
/// ```ignore
/// backbone_cache::set_namespace("feed");
/// let key = derive_key(Some(&PostKey { id: 7 }), &["v2"])?;
/// // "feed#PostKey#v2#id:7"
/// ```
pub fn derive_key(value: Option<&dyn CacheKey>, prefixes: &[&str]) -> Result<String, KeyError> {
    let namespace = namespace::namespace();
    derive_key_with_namespace(&namespace, value, prefixes)
}

/// Derives a key under an explicit namespace, e.g. to read another service's keys.
///
/// # Errors
///
/// Same as [`derive_key`].
///
/// # Example
///
/// ```
/// use backbone_cache::derive_key_with_namespace;
///
/// let key = derive_key_with_namespace("svc", None, &["a", "b"]).unwrap();
/// assert_eq!(key, "svc#a#b");
/// ```
pub fn derive_key_with_namespace(
    namespace: &str,
    value: Option<&dyn CacheKey>,
    prefixes: &[&str],
) -> Result<String, KeyError> {
    if namespace.is_empty() {
        return Err(KeyError::EmptyNamespace);
    }

    let mut key = String::from(namespace);

    let Some(value) = value else {
        push_prefixes(&mut key, prefixes);
        return Ok(key);
    };

    let fragments = record::fragments(value)?;

    key.push(SEPARATOR);
    key.push_str(value.type_name());
    push_prefixes(&mut key, prefixes);
    for fragment in fragments {
        key.push(SEPARATOR);
        key.push_str(&fragment.name);
        key.push(':');
        key.push_str(&fragment.value);
    }

    Ok(key)
}

fn push_prefixes(key: &mut String, prefixes: &[&str]) {
    for prefix in prefixes {
        key.push(SEPARATOR);
        key.push_str(prefix);
    }
}

/// Key deriver bound to a fixed namespace.
///
/// An alternative to the process-wide namespace for services that pass
/// their dependencies explicitly.
#[derive(Clone, Debug)]
pub struct KeyDeriver {
    namespace: Arc<str>,
}

impl KeyDeriver {
    pub fn new(namespace: impl Into<Arc<str>>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.name.as_str())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// # Errors
    ///
    /// Same as [`derive_key`].
    pub fn derive(
        &self,
        value: Option<&dyn CacheKey>,
        prefixes: &[&str],
    ) -> Result<String, KeyError> {
        derive_key_with_namespace(&self.namespace, value, prefixes)
    }
}

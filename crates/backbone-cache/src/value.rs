//! Deterministic rendering of field values.
//!
//! [`KeyValue`] is implemented for the scalar and collection types a cache
//! key is usually built from. Every rendering is a pure function of the
//! value: no addresses, no hash-seeded iteration order. Sequences render as
//! `[a b]`, ordered maps as `map[k:v k:v]`, absent optionals as `<nil>`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// A value type that has no reproducible rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedType(pub &'static str);

impl fmt::Display for UnsupportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A field value that can take part in a cache key.
pub trait KeyValue {
    /// Whether the value equals its type's zero value.
    fn is_zero(&self) -> bool;

    /// Whether the value is an absent reference.
    ///
    /// Null values are empty; an optional null field is left out of the key.
    fn is_null(&self) -> bool {
        false
    }

    /// Renders the value for use inside a key.
    fn render(&self) -> Result<String, UnsupportedType>;
}

macro_rules! display_key_value {
    ($zero:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl KeyValue for $ty {
                fn is_zero(&self) -> bool {
                    *self == $zero
                }

                fn render(&self) -> Result<String, UnsupportedType> {
                    Ok(self.to_string())
                }
            }
        )+
    };
}

display_key_value!(0 => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
display_key_value!(0.0 => f32, f64);
display_key_value!(false => bool);
display_key_value!('\0' => char);

impl KeyValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        Ok(self.clone())
    }
}

impl KeyValue for &str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        Ok((*self).to_string())
    }
}

impl KeyValue for Uuid {
    fn is_zero(&self) -> bool {
        self.is_nil()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        Ok(self.to_string())
    }
}

impl KeyValue for DateTime<Utc> {
    fn is_zero(&self) -> bool {
        *self == DateTime::<Utc>::default()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        Ok(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl<T: KeyValue> KeyValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.as_ref().is_none_or(KeyValue::is_zero)
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        match self {
            Some(value) => value.render(),
            None => Ok("<nil>".to_string()),
        }
    }
}

impl<T: KeyValue + ?Sized> KeyValue for Box<T> {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        (**self).render()
    }
}

impl<T: KeyValue> KeyValue for [T] {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        render_sequence(self.iter())
    }
}

impl<T: KeyValue> KeyValue for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        render_sequence(self.iter())
    }
}

impl<T: KeyValue> KeyValue for BTreeSet<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        render_sequence(self.iter())
    }
}

impl<K: KeyValue, V: KeyValue> KeyValue for BTreeMap<K, V> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        let mut entries = Vec::with_capacity(self.len());
        for (key, value) in self {
            entries.push(format!("{}:{}", key.render()?, value.render()?));
        }
        Ok(format!("map[{}]", entries.join(" ")))
    }
}

// Hash-ordered collections iterate in a per-process random order.
impl<K, V, S> KeyValue for HashMap<K, V, S> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        Err(UnsupportedType("HashMap"))
    }
}

impl<T, S> KeyValue for HashSet<T, S> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn render(&self) -> Result<String, UnsupportedType> {
        Err(UnsupportedType("HashSet"))
    }
}

fn render_sequence<'a, T, I>(items: I) -> Result<String, UnsupportedType>
where
    T: KeyValue + 'a,
    I: Iterator<Item = &'a T>,
{
    let rendered = items.map(KeyValue::render).collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", rendered.join(" ")))
}

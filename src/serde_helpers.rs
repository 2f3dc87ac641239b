//! Serde helpers for validating API responses at the boundary.
//!
//! When the `tracing` feature is enabled, unknown response fields are logged as warnings
//! and deserialization failures are logged with the JSON path that broke, so backend
//! schema drift shows up in logs instead of silently vanishing.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A `serde_as` type for identifiers the backend may send as either strings or integers.
///
/// Use with `#[serde_as(as = "StringFromAny")]` for `String` fields
/// or `#[serde_as(as = "Option<StringFromAny>")]` for `Option<String>`.
pub struct StringFromAny;

impl<'de> serde_with::DeserializeAs<'de, String> for StringFromAny {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use std::fmt;

        use serde::de::{self, Visitor};

        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a string or integer identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
                Ok(v.to_owned())
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<String, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
                Ok(v.to_string())
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

impl serde_with::SerializeAs<String> for StringFromAny {
    fn serialize_as<S>(source: &String, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(source)
    }
}

/// Deserialize a response body, warning about fields the target type does not capture.
///
/// Unknown fields never fail deserialization; missing or mistyped required fields do.
#[cfg(feature = "tracing")]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    use std::any::type_name;

    tracing::trace!(type_name = %type_name::<T>(), json = %value, "deserializing JSON");

    let original = value.clone();
    let mut unknown: Vec<String> = Vec::new();

    let result: T = serde_ignored::deserialize(value, |path| unknown.push(path.to_string()))
        .inspect_err(|_| {
            // serde_ignored loses the location of the failure, so replay with path tracking
            let replay: Result<T, _> = serde_path_to_error::deserialize(original.clone());
            if let Err(path_err) = replay {
                let path = path_err.path().to_string();
                tracing::error!(
                    type_name = %type_name::<T>(),
                    path = %path,
                    value = %describe(lookup_value(&original, &path)),
                    error = %path_err.inner(),
                    "deserialization failed"
                );
            }
        })?;

    for path in unknown {
        tracing::warn!(
            type_name = %type_name::<T>(),
            field = %path,
            value = %describe(lookup_value(&original, &path)),
            "unknown field in API response"
        );
    }

    Ok(result)
}

/// Pass-through deserialization when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Resolve a serde path (`bets.3.status`, `bets[3].status`, `?.token`) against `value`
/// by translating it into a JSON pointer.
#[cfg(feature = "tracing")]
fn lookup_value<'value>(value: &'value Value, path: &str) -> Option<&'value Value> {
    let pointer: String = path
        .split(['.', '[', ']'])
        .filter(|segment| !segment.is_empty() && *segment != "?")
        .flat_map(|segment| ["/", segment])
        .collect();

    value.pointer(&pointer)
}

#[cfg(feature = "tracing")]
fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "<unable to retrieve>".to_owned(), Value::to_string)
}

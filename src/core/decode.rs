//! Lenient field decoders for stored documents.
//!
//! Documents written from the mongo shell or imported from JSON carry every
//! number as a double, and hand-edited documents sometimes hold `null` where a
//! sub-document is expected. Neither should make a whole cycle fail, so these
//! helpers read such values the way the store's own tooling does: doubles are
//! truncated into integer fields and `null` becomes the field's default.
use std::fmt;

use serde::{
    Deserialize, Deserializer,
    de::{self, Unexpected, Visitor},
};

struct IntegerVisitor;

impl Visitor<'_> for IntegerVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a finite floating point number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if v.is_finite() {
            Ok(v.trunc() as i64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }

    fn visit_none<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }
}

fn narrow<T, E>(value: i64) -> Result<T, E>
where
    T: TryFrom<i64>,
    E: de::Error,
{
    T::try_from(value)
        .map_err(|_| E::invalid_value(Unexpected::Signed(value), &"an integer in range"))
}

/// Integer field that also accepts doubles and `null`.
pub fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = deserializer.deserialize_any(IntegerVisitor)?;
    narrow(value)
}

/// Optional integer field that also accepts doubles. `null` reads as `None`.
pub fn optional_integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    #[derive(Deserialize)]
    struct Lenient(#[serde(deserialize_with = "integer")] i64);

    Option::<Lenient>::deserialize(deserializer)?
        .map(|Lenient(value)| narrow(value))
        .transpose()
}

/// Field that reads `null` as its default value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

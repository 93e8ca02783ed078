use serde::{Deserialize, Deserializer};

/// `deserialize_with` target for fields the records API may send as `null`.
///
/// Pair it with `#[serde(default)]` so a missing field behaves the same as
/// an explicit `null`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

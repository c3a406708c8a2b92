//! JSON encoding of stored items

use crate::error::Fault;
use crate::Item;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode an item, refusing values that would not decode back
///
/// serde_json writes non-finite floats as `null` without complaint, so the
/// bytes are decoded once before they are handed to storage.
pub(crate) fn encode<T>(item: &Item<T>) -> Result<Vec<u8>, Fault>
where
    T: Serialize + DeserializeOwned,
{
    let bytes =
        serde_json::to_vec(item).map_err(|err| Fault::Serialization(item.id.clone(), err))?;
    serde_json::from_slice::<Item<T>>(&bytes)
        .map_err(|err| Fault::Serialization(item.id.clone(), err))?;
    Ok(bytes)
}

pub(crate) fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<Item<T>, Fault> {
    serde_json::from_slice(bytes).map_err(|err| Fault::Deserialization(key.to_string(), err))
}

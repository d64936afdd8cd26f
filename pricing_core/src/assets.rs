//! Embedded reference data (default manufacturer price lists and the chimney
//! component catalog), compiled into the library from `data/`.

use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;

use crate::errors::{CalcError, CalcResult};

#[derive(RustEmbed)]
#[folder = "data/"]
struct Assets;

/// Parse an embedded JSON file.
pub(crate) fn load_json<T: DeserializeOwned>(name: &str) -> CalcResult<T> {
    let file = Assets::get(name).ok_or_else(|| CalcError::Internal {
        message: format!("embedded asset '{}' is missing", name),
    })?;
    serde_json::from_slice(&file.data)
        .map_err(|e| CalcError::serialization(format!("embedded asset '{}': {}", name, e)))
}

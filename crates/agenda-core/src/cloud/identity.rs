//! Per-install device identity.
//!
//! Stored in the prefs table; most remote calls are scoped by it.

use tracing::info;
use uuid::Uuid;

use super::CloudClient;
use crate::error::{CloudError, CoreError};
use crate::storage::Database;

const DEVICE_ID_KEY: &str = "cloud.uuid";

/// Read the stored device id.
///
/// # Errors
/// Returns [`CloudError::MissingIdentity`] when none has been registered.
pub fn device_id(db: &Database) -> Result<String, CoreError> {
    match db.pref_get(DEVICE_ID_KEY)? {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(CloudError::MissingIdentity.into()),
    }
}

/// Store a device id after checking it is a UUID.
pub fn set_device_id(db: &Database, id: &str) -> Result<String, CoreError> {
    let parsed = Uuid::parse_str(id.trim())
        .map_err(|_| CloudError::InvalidIdentity(id.to_string()))?;
    let id = parsed.hyphenated().to_string();
    db.pref_set(DEVICE_ID_KEY, &id)?;
    Ok(id)
}

/// Forget the stored device id.
pub fn clear_device_id(db: &Database) -> Result<bool, CoreError> {
    Ok(db.pref_delete(DEVICE_ID_KEY)?)
}

/// Make sure this install has a device id, asking the server for one if needed.
///
/// An existing id is kept unless `force` is set.
pub async fn register(db: &Database, client: &CloudClient, force: bool) -> Result<String, CoreError> {
    if !force {
        if let Ok(existing) = device_id(db) {
            return Ok(existing);
        }
    }

    let generated = client.generate_uuid().await?;
    let id = set_device_id(db, &generated)?;
    info!(device_id = %id, "registered device with cloud");
    Ok(id)
}

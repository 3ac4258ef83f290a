//! Provisioned device credentials.

use petdoor_hardware::ByteStore;
use serde::Serialize;
use tracing::info;

use crate::config_store::ConfigStore;
use crate::error::{StorageError, StorageResult};
use crate::layout::{ConfigField, layout_end};

/// The three strings a controller needs before it can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCredentials {
    pub network_name: String,
    pub network_secret: String,
    pub beacon_name: String,
}

impl DeviceCredentials {
    pub fn new(
        network_name: impl Into<String>,
        network_secret: impl Into<String>,
        beacon_name: impl Into<String>,
    ) -> Self {
        Self {
            network_name: network_name.into(),
            network_secret: network_secret.into(),
            beacon_name: beacon_name.into(),
        }
    }

    /// Load credentials from the store.
    ///
    /// The network secret may be empty (open network). The network name and
    /// beacon name must be present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotProvisioned`] naming the first missing
    /// field, or any read error.
    pub fn load<S: ByteStore>(store: &ConfigStore<S>) -> StorageResult<Self> {
        for field in [ConfigField::BeaconName, ConfigField::NetworkName] {
            if !store.has_data(field)? {
                return Err(StorageError::NotProvisioned {
                    field: field.label().to_string(),
                });
            }
        }

        Ok(Self {
            network_name: store.read(ConfigField::NetworkName)?,
            network_secret: store.read(ConfigField::NetworkSecret)?,
            beacon_name: store.read(ConfigField::BeaconName)?,
        })
    }

    /// Write all three fields.
    ///
    /// Every field is validated before the first byte is written, so a
    /// rejected value leaves the store untouched.
    pub fn save<S: ByteStore>(&self, store: &mut ConfigStore<S>) -> StorageResult<()> {
        for (field, value) in self.fields() {
            check_fits(field, value)?;
        }
        for (field, value) in self.fields() {
            store.write(field, value)?;
        }
        info!(beacon = %self.beacon_name, network = %self.network_name, "credentials saved");
        Ok(())
    }

    /// Zero-fill every credential region.
    pub fn erase<S: ByteStore>(store: &mut ConfigStore<S>) -> StorageResult<()> {
        store.clear(0, layout_end() - 1)?;
        info!("credentials erased");
        Ok(())
    }

    /// The network secret with every character replaced by `*`.
    pub fn masked_secret(&self) -> String {
        mask_secret(&self.network_secret)
    }

    fn fields(&self) -> [(ConfigField, &str); 3] {
        [
            (ConfigField::NetworkName, self.network_name.as_str()),
            (ConfigField::NetworkSecret, self.network_secret.as_str()),
            (ConfigField::BeaconName, self.beacon_name.as_str()),
        ]
    }
}

/// Replace every character of `secret` with `*`.
pub fn mask_secret(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

fn check_fits(field: ConfigField, value: &str) -> StorageResult<()> {
    let region = field.region();
    if value.len() > region.max_text_len() {
        return Err(StorageError::ExceedsRegion {
            field: field.label().to_string(),
            len: value.len() + 1,
            capacity: region.capacity,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use petdoor_hardware::mock::MemoryStore;

    fn fresh() -> ConfigStore<MemoryStore> {
        ConfigStore::new(MemoryStore::filled(512, 0))
    }

    #[test]
    fn test_first_boot_is_not_provisioned() {
        let store = fresh();
        let err = DeviceCredentials::load(&store).unwrap_err();
        assert!(matches!(
            err,
            StorageError::NotProvisioned { ref field } if field == "beacon name"
        ));
    }

    #[test]
    fn test_save_then_load() {
        let mut store = fresh();
        let creds = DeviceCredentials::new("home", "hunter22", "Ellie");

        creds.save(&mut store).unwrap();
        assert_eq!(DeviceCredentials::load(&store).unwrap(), creds);
    }

    #[test]
    fn test_open_network_allowed() {
        let mut store = fresh();
        DeviceCredentials::new("cafe", "", "Ellie").save(&mut store).unwrap();

        let loaded = DeviceCredentials::load(&store).unwrap();
        assert_eq!(loaded.network_secret, "");
    }

    #[test]
    fn test_missing_network_name() {
        let mut store = fresh();
        store.write(ConfigField::BeaconName, "Ellie").unwrap();

        let err = DeviceCredentials::load(&store).unwrap_err();
        assert!(matches!(
            err,
            StorageError::NotProvisioned { ref field } if field == "network name"
        ));
    }

    #[test]
    fn test_rejected_save_leaves_store_untouched() {
        let mut store = fresh();
        let creds = DeviceCredentials::new("home", "pw", "B".repeat(120));

        assert!(matches!(
            creds.save(&mut store),
            Err(StorageError::ExceedsRegion { .. })
        ));
        assert!(store.inner().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_erase() {
        let mut store = fresh();
        DeviceCredentials::new("home", "pw", "Ellie").save(&mut store).unwrap();

        DeviceCredentials::erase(&mut store).unwrap();
        assert!(DeviceCredentials::load(&store).is_err());
        assert!(!store.has_data(ConfigField::NetworkSecret).unwrap());
    }

    #[test]
    fn test_masked_secret() {
        let creds = DeviceCredentials::new("home", "pässword", "Ellie");
        assert_eq!(creds.masked_secret(), "********");
        assert_eq!(mask_secret(""), "");
    }
}

//! Store maintenance subcommands.

use anyhow::Context;
use petdoor_storage::{ConfigField, ConfigStore, DeviceCredentials, FileStore, mask_secret};
use tracing::info;

use crate::cli::ProvisionArgs;
use crate::config::StoreConfig;

/// Open the file-backed store named by the configuration.
pub fn open_store(config: &StoreConfig) -> anyhow::Result<ConfigStore<FileStore>> {
    let file = FileStore::open(&config.path, config.size)
        .with_context(|| format!("opening store {}", config.path.display()))?;
    Ok(ConfigStore::new(file))
}

pub fn provision(config: &StoreConfig, args: &ProvisionArgs) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    let credentials = DeviceCredentials::new(&args.ssid, &args.password, &args.beacon);

    credentials
        .save(&mut store)
        .context("writing credentials")?;
    info!(path = %config.path.display(), "device provisioned");
    Ok(())
}

/// Describe every stored field, one line each.
pub fn show(config: &StoreConfig) -> anyhow::Result<Vec<String>> {
    let store = open_store(config)?;

    ConfigField::ALL
        .iter()
        .map(|&field| -> anyhow::Result<String> {
            let value = if store.has_data(field)? {
                let text = store.read(field)?;
                match field {
                    ConfigField::NetworkSecret => mask_secret(&text),
                    _ => text,
                }
            } else {
                "<not set>".to_string()
            };
            Ok(format!("{:<15} {value}", field.label()))
        })
        .collect()
}

pub fn erase(config: &StoreConfig) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    DeviceCredentials::erase(&mut store).context("erasing credentials")?;
    Ok(())
}

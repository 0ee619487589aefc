use anyhow::Result;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use super::loader::ConfigLoader;
use super::types::Config;
use crate::system::FileSystemInterface;

/// Loaded configuration plus the loader that persists it.
///
/// Shared by `Arc` between the selection store and the cycler. Every `update`
/// writes the file before returning.
pub struct SettingsStore<F: FileSystemInterface> {
    loader: ConfigLoader<F>,
    config: Mutex<Config>,
}

impl<F: FileSystemInterface> SettingsStore<F> {
    /// Load the configuration once at startup
    pub fn load(loader: ConfigLoader<F>) -> Result<Self> {
        let config = loader.load_config()?;
        info!(
            "Loaded settings from {}",
            loader.get_config_path().display()
        );
        Ok(Self {
            loader,
            config: Mutex::new(config),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the current configuration
    pub fn snapshot(&self) -> Config {
        self.lock().clone()
    }

    /// Read a value out of the current configuration
    pub fn read<R>(&self, f: impl FnOnce(&Config) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the configuration and save it synchronously.
    ///
    /// The in-memory copy only changes if the save succeeds.
    pub fn update(&self, f: impl FnOnce(&mut Config)) -> Result<()> {
        self.update_if(|config| {
            f(config);
            true
        })
        .map(|_| ())
    }

    /// Like `update`, but `f` reports whether it changed anything and nothing is
    /// saved when it did not. The read, the change and the save happen under one lock.
    pub fn update_if(&self, f: impl FnOnce(&mut Config) -> bool) -> Result<bool> {
        let mut config = self.lock();
        let mut updated = config.clone();
        if !f(&mut updated) {
            return Ok(false);
        }
        self.loader.save_config(&updated)?;
        *config = updated;
        debug!("Settings saved");
        Ok(true)
    }

    /// Replace the in-memory configuration with what is on disk
    pub fn reload(&self) -> Result<()> {
        let fresh = self.loader.load_config()?;
        *self.lock() = fresh;
        info!(
            "Reloaded settings from {}",
            self.loader.get_config_path().display()
        );
        Ok(())
    }

    pub fn last_active_device(&self) -> Option<String> {
        self.read(|config| config.devices.last_active_device.clone())
    }

    pub fn set_last_active_device(&self, device_name: &str) -> Result<()> {
        self.update(|config| config.devices.last_active_device = Some(device_name.to_string()))
    }

    pub fn config_path(&self) -> &Path {
        self.loader.get_config_path()
    }

    /// Whether the configuration file is present on disk
    pub fn config_file_exists(&self) -> bool {
        self.loader.config_exists()
    }
}

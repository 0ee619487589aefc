use anyhow::Result;
use std::path::Path;

use crate::audio::AudioDevice;

/// Trait for audio system operations - abstracts CoreAudio and PulseAudio interactions
pub trait AudioSystemInterface {
    /// Enumerate the output devices in backend order, flagging the current default
    fn enumerate_devices(&self) -> Result<Vec<AudioDevice>>;

    /// Ask the system to make `device` the default output.
    ///
    /// `Ok(true)` when the switch happened, `Ok(false)` when the backend declined,
    /// `Err` on a driver-level failure.
    fn set_default_output_device(&self, device: &AudioDevice) -> Result<bool>;

    /// Get the current default output device
    fn get_default_output_device(&self) -> Result<Option<AudioDevice>> {
        Ok(self
            .enumerate_devices()?
            .into_iter()
            .find(|device| device.is_default))
    }
}

/// Trait for file system operations - abstracts std::fs for testability
pub trait FileSystemInterface {
    /// Read the entire contents of a configuration file
    fn read_config_file(&self, path: &Path) -> Result<String>;

    /// Write configuration content to a file
    fn write_config_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Check if a configuration file exists
    fn config_file_exists(&self, path: &Path) -> bool;

    /// Create the directory structure for config files
    fn create_config_dir(&self, path: &Path) -> Result<()>;
}

use anyhow::{Context, Result};
use std::path::Path;

use crate::system::traits::FileSystemInterface;

/// Audio backend for the platform this binary was built for
#[cfg(target_os = "macos")]
pub type PlatformAudioSystem = crate::audio::CoreAudioSystem;

#[cfg(not(target_os = "macos"))]
pub type PlatformAudioSystem = crate::audio::PulseAudioSystem;

/// Production implementation of FileSystemInterface using std::fs
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFileSystem;

impl FileSystemInterface for StandardFileSystem {
    fn read_config_file(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))
    }

    fn write_config_file(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    fn config_file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_config_dir(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create config directory: {}", path.display()))
    }
}

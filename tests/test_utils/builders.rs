//! Test utility builders for audio devices and fully wired cyclers
//!
//! Individual helpers may not be used by every test crate, so dead code warnings are suppressed.

#![allow(dead_code)]

use audio_device_cycler::config::{Config, ConfigLoader, SettingsStore};
use audio_device_cycler::cycling::DeviceCycler;
use audio_device_cycler::selection::{SELECTED_DEVICES_DELIMITER, SelectionStore};
use audio_device_cycler::{AudioDevice, MockAudioSystem, MockFileSystem, MockNotifier};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for creating test AudioDevice instances
pub struct AudioDeviceBuilder {
    id: Option<String>,
    name: String,
    is_default: bool,
}

impl AudioDeviceBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            name: "Test Device".to_string(),
            is_default: false,
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn default_device(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Ids default to `{name}-id`, matching `MockAudioSystem::with_devices`
    pub fn build(self) -> AudioDevice {
        let id = self.id.unwrap_or_else(|| format!("{}-id", self.name));
        AudioDevice::new(id, self.name).set_default(self.is_default)
    }
}

impl Default for AudioDeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub type MockCycler = DeviceCycler<MockAudioSystem, MockFileSystem, MockNotifier>;

/// A cycler wired to mocks, with handles kept for driving and inspecting them
pub struct CyclerFixture {
    pub audio: MockAudioSystem,
    pub file_system: MockFileSystem,
    pub notifier: MockNotifier,
    pub config_path: PathBuf,
    pub cycler: MockCycler,
}

impl CyclerFixture {
    /// Backend reporting `devices` in order, with `selected` persisted as the selection
    pub fn new(devices: &[&str], selected: &[&str]) -> Self {
        let mut config = Config::default();
        config.devices.selected_devices = selected.join(SELECTED_DEVICES_DELIMITER);
        Self::with_config(devices, &config)
    }

    pub fn with_config(devices: &[&str], config: &Config) -> Self {
        let audio = MockAudioSystem::with_devices(devices);
        let file_system = MockFileSystem::new();
        let notifier = MockNotifier::new();
        let config_path = PathBuf::from("/test/audio-device-cycler/config.toml");
        file_system.add_file(&config_path, &config.to_toml().unwrap());

        let cycler = build_cycler(&audio, &file_system, &notifier, &config_path);

        Self {
            audio,
            file_system,
            notifier,
            config_path,
            cycler,
        }
    }

    /// A second cycler over the same backend and file, as after a restart
    pub fn restart(&self) -> MockCycler {
        build_cycler(
            &self.audio,
            &self.file_system,
            &self.notifier,
            &self.config_path,
        )
    }

    /// A standalone selection store over the same file, shareable across threads
    pub fn selection_store(&self) -> Arc<SelectionStore<MockFileSystem>> {
        let loader = ConfigLoader::new(self.file_system.clone(), self.config_path.clone());
        let settings = Arc::new(SettingsStore::load(loader).unwrap());
        Arc::new(SelectionStore::new(settings))
    }

    /// Configuration as currently written to the mock file
    pub fn persisted_config(&self) -> Config {
        let content = self.file_system.file_content(&self.config_path).unwrap();
        Config::from_toml(&content).unwrap()
    }

    pub fn write_count(&self) -> usize {
        self.file_system.get_write_calls().len()
    }
}

fn build_cycler(
    audio: &MockAudioSystem,
    file_system: &MockFileSystem,
    notifier: &MockNotifier,
    config_path: &PathBuf,
) -> MockCycler {
    let loader = ConfigLoader::new(file_system.clone(), config_path.clone());
    let settings = Arc::new(SettingsStore::load(loader).unwrap());
    let selection = Arc::new(SelectionStore::new(Arc::clone(&settings)));
    DeviceCycler::new(audio.clone(), selection, settings, notifier.clone())
}

/// Helper functions for creating common test scenarios
pub mod scenarios {
    use super::*;

    /// Output devices as a laptop with a dock and headphones reports them
    pub fn typical_output_devices() -> Vec<AudioDevice> {
        vec![
            AudioDeviceBuilder::new()
                .name("AirPods Pro")
                .id("airpods_pro")
                .build(),
            AudioDeviceBuilder::new()
                .name("MacBook Pro Speakers")
                .id("mbp_speakers")
                .default_device()
                .build(),
            AudioDeviceBuilder::new()
                .name("Audioengine 2+")
                .id("audioengine")
                .build(),
        ]
    }

    /// Device names that stress the persisted encoding
    pub fn special_character_names() -> Vec<&'static str> {
        vec![
            "🎵 Music Device 🎵",
            "Device with spaces",
            "Device-with-dashes",
            "Speakers; Left",
        ]
    }
}

use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::audio::AudioDevice;
use crate::notifications::SwitchNotifier;
use crate::system::traits::{AudioSystemInterface, FileSystemInterface};

/// How the mock backend answers a request to change the default device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockSwitchOutcome {
    Switch,
    Decline,
    Fail,
}

/// Mock audio system for testing - provides controllable device behavior
#[derive(Clone)]
pub struct MockAudioSystem {
    pub devices: Arc<Mutex<Vec<AudioDevice>>>,
    pub set_device_calls: Arc<Mutex<Vec<String>>>,
    pub switch_outcome: Arc<Mutex<MockSwitchOutcome>>,
    pub should_fail_enumeration: Arc<AtomicBool>,
}

impl MockAudioSystem {
    pub fn new() -> Self {
        Self {
            devices: Arc::new(Mutex::new(Vec::new())),
            set_device_calls: Arc::new(Mutex::new(Vec::new())),
            switch_outcome: Arc::new(Mutex::new(MockSwitchOutcome::Switch)),
            should_fail_enumeration: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a mock populated with one device per name, ids derived from the names
    pub fn with_devices(names: &[&str]) -> Self {
        let system = Self::new();
        for name in names {
            system.add_device(AudioDevice::new(format!("{name}-id"), *name));
        }
        system
    }

    /// Add a device to the mock system
    pub fn add_device(&self, device: AudioDevice) {
        self.devices.lock().unwrap().push(device);
    }

    /// Remove a device from the mock system by id or name
    pub fn remove_device(&self, device: &str) {
        self.devices
            .lock()
            .unwrap()
            .retain(|d| d.id != device && d.name != device);
    }

    /// Mark the named device as the system default, or clear the default with `None`
    pub fn set_mock_default(&self, name: Option<&str>) {
        for device in self.devices.lock().unwrap().iter_mut() {
            device.is_default = Some(device.name.as_str()) == name;
        }
    }

    /// Name of the device currently flagged as default
    pub fn current_default(&self) -> Option<String> {
        self.devices
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.is_default)
            .map(|d| d.name.clone())
    }

    /// Names passed to set_default_output_device, in call order
    pub fn get_set_device_calls(&self) -> Vec<String> {
        self.set_device_calls.lock().unwrap().clone()
    }

    /// Clear the history of set device calls
    pub fn clear_set_device_calls(&self) {
        self.set_device_calls.lock().unwrap().clear();
    }

    /// Configure how subsequent switch requests are answered
    pub fn set_switch_outcome(&self, outcome: MockSwitchOutcome) {
        *self.switch_outcome.lock().unwrap() = outcome;
    }

    /// Configure the mock to fail enumeration
    pub fn set_enumeration_failure(&self, should_fail: bool) {
        self.should_fail_enumeration
            .store(should_fail, Ordering::Relaxed);
    }
}

impl AudioSystemInterface for MockAudioSystem {
    fn enumerate_devices(&self) -> Result<Vec<AudioDevice>> {
        if self.should_fail_enumeration.load(Ordering::Relaxed) {
            return Err(anyhow::anyhow!("Mock enumeration failure"));
        }
        Ok(self.devices.lock().unwrap().clone())
    }

    fn set_default_output_device(&self, device: &AudioDevice) -> Result<bool> {
        self.set_device_calls
            .lock()
            .unwrap()
            .push(device.name.clone());

        match *self.switch_outcome.lock().unwrap() {
            MockSwitchOutcome::Fail => Err(anyhow::anyhow!("Mock set device failure")),
            MockSwitchOutcome::Decline => Ok(false),
            MockSwitchOutcome::Switch => {
                let mut devices = self.devices.lock().unwrap();
                if !devices.iter().any(|d| d.id == device.id) {
                    return Ok(false);
                }
                for candidate in devices.iter_mut() {
                    candidate.is_default = candidate.id == device.id;
                }
                Ok(true)
            }
        }
    }
}

impl Default for MockAudioSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock file system for testing - provides controllable file operations
#[derive(Clone)]
pub struct MockFileSystem {
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
    pub write_calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
    pub directory_creation_calls: Arc<Mutex<Vec<PathBuf>>>,
    pub should_fail_write: Arc<AtomicBool>,
    pub should_fail_create_dir: Arc<AtomicBool>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            write_calls: Arc::new(Mutex::new(Vec::new())),
            directory_creation_calls: Arc::new(Mutex::new(Vec::new())),
            should_fail_write: Arc::new(AtomicBool::new(false)),
            should_fail_create_dir: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Add a file to the mock file system
    pub fn add_file<P: AsRef<Path>>(&self, path: P, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), content.to_string());
    }

    /// Current contents of a file, if present
    pub fn file_content<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    /// Get all write calls that were made
    pub fn get_write_calls(&self) -> Vec<(PathBuf, String)> {
        self.write_calls.lock().unwrap().clone()
    }

    /// Get all directory creation calls that were made
    pub fn get_directory_creation_calls(&self) -> Vec<PathBuf> {
        self.directory_creation_calls.lock().unwrap().clone()
    }

    /// Clear all call histories
    pub fn clear_call_history(&self) {
        self.write_calls.lock().unwrap().clear();
        self.directory_creation_calls.lock().unwrap().clear();
    }

    /// Configure the mock to fail write operations
    pub fn set_write_failure(&self, should_fail: bool) {
        self.should_fail_write.store(should_fail, Ordering::Relaxed);
    }

    /// Configure the mock to fail directory creation
    pub fn set_create_dir_failure(&self, should_fail: bool) {
        self.should_fail_create_dir
            .store(should_fail, Ordering::Relaxed);
    }
}

impl FileSystemInterface for MockFileSystem {
    fn read_config_file(&self, path: &Path) -> Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("File not found: {}", path.display()))
    }

    fn write_config_file(&self, path: &Path, content: &str) -> Result<()> {
        self.write_calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), content.to_string()));

        if self.should_fail_write.load(Ordering::Relaxed) {
            return Err(anyhow::anyhow!("Mock write failure"));
        }

        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn config_file_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn create_config_dir(&self, path: &Path) -> Result<()> {
        self.directory_creation_calls
            .lock()
            .unwrap()
            .push(path.to_path_buf());

        if self.should_fail_create_dir.load(Ordering::Relaxed) {
            return Err(anyhow::anyhow!("Mock create directory failure"));
        }

        Ok(())
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome reported to a notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    SwitchSucceeded(String),
    NoDevicesConfigured,
    Error(String),
}

/// Mock notifier that records every outcome it is given
#[derive(Clone, Default)]
pub struct MockNotifier {
    pub events: Arc<Mutex<Vec<NotifierEvent>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_events(&self) -> Vec<NotifierEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl SwitchNotifier for MockNotifier {
    fn switch_succeeded(&self, device_name: &str) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(NotifierEvent::SwitchSucceeded(device_name.to_string()));
        Ok(())
    }

    fn no_devices_configured(&self) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(NotifierEvent::NoDevicesConfigured);
        Ok(())
    }

    fn error(&self, message: &str) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(NotifierEvent::Error(message.to_string()));
        Ok(())
    }
}

use anyhow::Result;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use super::anchor::next_target;
use crate::audio::AudioDevice;
use crate::config::SettingsStore;
use crate::notifications::SwitchNotifier;
use crate::selection::{SelectionStore, available_devices};
use crate::system::{AudioSystemInterface, FileSystemInterface};

/// Why a cycle could not even attempt an activation
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("No devices to select")]
    NoDevicesConfigured,
    #[error("Failed to enumerate audio devices: {0:#}")]
    Enumeration(anyhow::Error),
}

/// Picks the next selected device and makes it the system default.
///
/// Stateless between calls apart from what the settings persist: every cycle
/// reads the live device list, the selection and the last active device.
pub struct DeviceCycler<A, F, N>
where
    A: AudioSystemInterface,
    F: FileSystemInterface,
    N: SwitchNotifier,
{
    audio_system: A,
    selection: Arc<SelectionStore<F>>,
    settings: Arc<SettingsStore<F>>,
    notifier: N,
    in_flight: Mutex<()>,
}

impl<A, F, N> DeviceCycler<A, F, N>
where
    A: AudioSystemInterface,
    F: FileSystemInterface,
    N: SwitchNotifier,
{
    pub fn new(
        audio_system: A,
        selection: Arc<SelectionStore<F>>,
        settings: Arc<SettingsStore<F>>,
        notifier: N,
    ) -> Self {
        Self {
            audio_system,
            selection,
            settings,
            notifier,
            in_flight: Mutex::new(()),
        }
    }

    /// Every output device the backend reports
    pub fn enumerate_devices(&self) -> Result<Vec<AudioDevice>> {
        self.audio_system.enumerate_devices()
    }

    /// Selected devices currently present, in backend order
    pub fn available(&self) -> Result<Vec<AudioDevice>> {
        available_devices(&self.audio_system, &self.selection.selection())
    }

    /// Ask the backend to switch to `device`.
    ///
    /// Backend errors are reported through the notifier and turned into `false`;
    /// a declined switch is `false` with no notification.
    pub fn activate(&self, device: &AudioDevice) -> bool {
        info!("Activating output device: {} ({})", device.name, device.id);

        match self.audio_system.set_default_output_device(device) {
            Ok(true) => {
                if let Err(e) = self.notifier.switch_succeeded(&device.name) {
                    error!("Failed to send device switched notification: {:#}", e);
                }
                if let Err(e) = self.settings.set_last_active_device(&device.name) {
                    warn!(
                        "Switched to '{}' but could not persist it as last active: {:#}",
                        device.name, e
                    );
                }
                info!("Successfully switched to output device: {}", device.name);
                true
            }
            Ok(false) => {
                warn!("Backend declined to switch to: {}", device.name);
                false
            }
            Err(e) => {
                error!("Failed to switch to {}: {:#}", device.name, e);
                let message = format!("Failed to change device: {e:#}");
                if let Err(e) = self.notifier.error(&message) {
                    error!("Failed to send switch failed notification: {:#}", e);
                }
                false
            }
        }
    }

    /// Activate an available device by friendly name
    pub fn activate_by_name(&self, device_name: &str) -> Result<bool> {
        let available = self.available()?;
        let device = available
            .iter()
            .find(|device| device.name == device_name)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "'{}' is not a selected device that is currently available",
                    device_name
                )
            })?;
        Ok(self.activate(device))
    }

    /// Switch to the device after the current one.
    ///
    /// Concurrent callers are serialised so each one sees the previous switch.
    pub fn cycle(&self) -> Result<bool, CycleError> {
        Ok(self.cycle_to_next()?.is_some())
    }

    /// Name of the device switched to, `None` when the switch did not happen
    fn cycle_to_next(&self) -> Result<Option<String>, CycleError> {
        let _in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());

        let list = self.available().map_err(CycleError::Enumeration)?;
        let last_active = self.settings.last_active_device();

        let Some(target) = next_target(&list, last_active.as_deref()) else {
            warn!("Cycle requested with no selected devices available");
            return Err(CycleError::NoDevicesConfigured);
        };

        debug!(
            "Cycling among {} devices (last active: {:?}) -> {}",
            list.len(),
            last_active,
            target.name
        );
        Ok(self.activate(target).then(|| target.name.clone()))
    }

    /// Run a cycle for a trigger (hotkey, signal, command) and report every outcome.
    ///
    /// Returns the name of the device now active, if the switch happened.
    pub fn handle_cycle_request(&self) -> Option<String> {
        match self.cycle_to_next() {
            Ok(activated) => activated,
            Err(CycleError::NoDevicesConfigured) => {
                if let Err(e) = self.notifier.no_devices_configured() {
                    error!("Failed to send no devices notification: {:#}", e);
                }
                None
            }
            Err(e) => {
                error!("Cycle failed: {}", e);
                if let Err(e) = self.notifier.error(&e.to_string()) {
                    error!("Failed to send error notification: {:#}", e);
                }
                None
            }
        }
    }

    /// Re-read the configuration file and hand the new notification filters to the notifier
    pub fn reload_settings(&self) -> Result<()> {
        self.settings.reload()?;
        let notifications = self.settings.read(|config| config.notifications.clone());
        self.notifier.apply_config(&notifications);
        Ok(())
    }

    pub fn audio_system(&self) -> &A {
        &self.audio_system
    }

    pub fn selection(&self) -> &SelectionStore<F> {
        &self.selection
    }

    pub fn settings(&self) -> &SettingsStore<F> {
        &self.settings
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::system::{MockAudioSystem, MockFileSystem, MockNotifier, MockSwitchOutcome, NotifierEvent};
    use std::path::PathBuf;

    fn create_cycler(
        system: MockAudioSystem,
        selected: &str,
    ) -> DeviceCycler<MockAudioSystem, MockFileSystem, MockNotifier> {
        let mock_fs = MockFileSystem::new();
        let path = PathBuf::from("/test/config.toml");
        mock_fs.add_file(&path, &format!("[devices]\nselected_devices = \"{selected}\"\n"));
        let settings = Arc::new(SettingsStore::load(ConfigLoader::new(mock_fs, path)).unwrap());
        let selection = Arc::new(SelectionStore::new(Arc::clone(&settings)));
        DeviceCycler::new(system, selection, settings, MockNotifier::new())
    }

    #[test]
    fn test_activate_success_notifies_and_persists() {
        let system = MockAudioSystem::with_devices(&["A", "B"]);
        let cycler = create_cycler(system.clone(), "A;;;B");
        let device = cycler.available().unwrap()[1].clone();

        assert!(cycler.activate(&device));

        assert_eq!(system.current_default().as_deref(), Some("B"));
        assert_eq!(cycler.settings().last_active_device().as_deref(), Some("B"));
        assert_eq!(
            cycler.notifier().get_events(),
            vec![NotifierEvent::SwitchSucceeded("B".to_string())]
        );
    }

    #[test]
    fn test_activate_declined_is_silent() {
        let system = MockAudioSystem::with_devices(&["A", "B"]);
        system.set_switch_outcome(MockSwitchOutcome::Decline);
        let cycler = create_cycler(system, "A;;;B");
        let device = cycler.available().unwrap()[0].clone();

        assert!(!cycler.activate(&device));

        assert!(cycler.settings().last_active_device().is_none());
        assert!(cycler.notifier().get_events().is_empty());
    }

    #[test]
    fn test_activate_fault_is_reported_not_propagated() {
        let system = MockAudioSystem::with_devices(&["A", "B"]);
        system.set_switch_outcome(MockSwitchOutcome::Fail);
        let cycler = create_cycler(system, "A;;;B");
        let device = cycler.available().unwrap()[0].clone();

        assert!(!cycler.activate(&device));

        assert!(cycler.settings().last_active_device().is_none());
        match cycler.notifier().get_events().as_slice() {
            [NotifierEvent::Error(message)] => {
                assert!(message.starts_with("Failed to change device:"));
                assert!(message.contains("Mock set device failure"));
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn test_activate_by_name_requires_available_device() {
        let system = MockAudioSystem::with_devices(&["A", "B", "C"]);
        let cycler = create_cycler(system.clone(), "A;;;B");

        assert!(cycler.activate_by_name("C").is_err());
        assert!(cycler.activate_by_name("Missing").is_err());
        assert!(system.get_set_device_calls().is_empty());

        assert!(cycler.activate_by_name("B").unwrap());
        assert_eq!(system.get_set_device_calls(), vec!["B"]);
    }

    #[test]
    fn test_cycle_with_no_selection_is_distinct_error() {
        let system = MockAudioSystem::with_devices(&["A", "B"]);
        let cycler = create_cycler(system.clone(), "");

        assert!(matches!(cycler.cycle(), Err(CycleError::NoDevicesConfigured)));
        assert!(system.get_set_device_calls().is_empty());
    }

    #[test]
    fn test_cycle_enumeration_failure() {
        let system = MockAudioSystem::with_devices(&["A", "B"]);
        system.set_enumeration_failure(true);
        let cycler = create_cycler(system, "A;;;B");

        assert!(matches!(cycler.cycle(), Err(CycleError::Enumeration(_))));
    }

    #[test]
    fn test_handle_cycle_request_routes_no_devices() {
        let cycler = create_cycler(MockAudioSystem::with_devices(&["A"]), "");

        assert!(cycler.handle_cycle_request().is_none());
        assert_eq!(
            cycler.notifier().get_events(),
            vec![NotifierEvent::NoDevicesConfigured]
        );
    }

    #[test]
    fn test_handle_cycle_request_routes_enumeration_failure() {
        let system = MockAudioSystem::with_devices(&["A"]);
        system.set_enumeration_failure(true);
        let cycler = create_cycler(system, "A");

        assert!(cycler.handle_cycle_request().is_none());
        assert!(matches!(
            cycler.notifier().get_events().as_slice(),
            [NotifierEvent::Error(_)]
        ));
    }

    #[test]
    fn test_handle_cycle_request_names_activated_device() {
        let system = MockAudioSystem::with_devices(&["A", "B"]);
        system.set_mock_default(Some("A"));
        let cycler = create_cycler(system.clone(), "A;;;B");

        assert_eq!(cycler.handle_cycle_request().as_deref(), Some("B"));

        system.set_switch_outcome(MockSwitchOutcome::Decline);
        assert!(cycler.handle_cycle_request().is_none());
    }

    #[test]
    fn test_repeated_cycles_walk_the_list() {
        let system = MockAudioSystem::with_devices(&["A", "B", "C"]);
        system.set_mock_default(Some("A"));
        let cycler = create_cycler(system.clone(), "A;;;B;;;C");

        let mut visited = Vec::new();
        for _ in 0..4 {
            assert!(cycler.cycle().unwrap());
            visited.push(system.current_default().unwrap());
        }

        assert_eq!(visited, vec!["B", "C", "A", "B"]);
    }
}

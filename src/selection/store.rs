use anyhow::Result;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::set::{SelectionSet, validate_device_name};
use crate::config::SettingsStore;
use crate::system::FileSystemInterface;

/// Receives the full selection after every change
pub trait SelectionObserver: Send + Sync {
    fn selection_changed(&self, selection: &[String]);
}

impl<T> SelectionObserver for T
where
    T: Fn(&[String]) + Send + Sync,
{
    fn selection_changed(&self, selection: &[String]) {
        self(selection)
    }
}

/// Forwards each new selection into a channel for an async consumer
pub struct ChannelObserver {
    sender: UnboundedSender<Vec<String>>,
}

impl ChannelObserver {
    pub fn new(sender: UnboundedSender<Vec<String>>) -> Self {
        Self { sender }
    }
}

impl SelectionObserver for ChannelObserver {
    fn selection_changed(&self, selection: &[String]) {
        if self.sender.send(selection.to_vec()).is_err() {
            warn!("Selection change receiver dropped");
        }
    }
}

/// The user's opt-in device list, persisted through the shared settings
pub struct SelectionStore<F: FileSystemInterface> {
    settings: Arc<SettingsStore<F>>,
    observers: Mutex<Vec<Box<dyn SelectionObserver>>>,
}

impl<F: FileSystemInterface> SelectionStore<F> {
    pub fn new(settings: Arc<SettingsStore<F>>) -> Self {
        Self {
            settings,
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Register an observer for selection changes
    pub fn subscribe(&self, observer: impl SelectionObserver + 'static) {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(observer));
    }

    /// Current selection, decoded from the persisted string
    pub fn selection(&self) -> SelectionSet {
        self.settings.read(|config| config.selection())
    }

    /// Selected names in insertion order
    pub fn list(&self) -> Vec<String> {
        self.selection().into_names()
    }

    pub fn contains(&self, device_name: &str) -> bool {
        self.selection().contains(device_name)
    }

    /// Select or deselect a device.
    ///
    /// On change the selection is saved, then observers are notified, both before
    /// returning. Returns `Ok(false)` when nothing changed. Names the persisted
    /// form cannot hold are rejected.
    pub fn set_selected(&self, device_name: &str, selected: bool) -> Result<bool> {
        validate_device_name(device_name)?;

        let mut current = SelectionSet::default();
        let changed = self.settings.update_if(|config| {
            let mut selection = config.selection();
            if !selection.set_selected(device_name, selected) {
                return false;
            }
            config.devices.selected_devices = selection.to_persisted();
            current = selection;
            true
        })?;

        if !changed {
            debug!(
                "Selection unchanged for '{}' (selected: {})",
                device_name, selected
            );
            return Ok(false);
        }

        info!(
            "{} device '{}' ({} selected)",
            if selected { "Selected" } else { "Deselected" },
            device_name,
            current.len()
        );

        self.notify(current.names());
        Ok(true)
    }

    fn notify(&self, selection: &[String]) {
        let observers = self.observers.lock().unwrap_or_else(|e| e.into_inner());
        for observer in observers.iter() {
            observer.selection_changed(selection);
        }
    }
}

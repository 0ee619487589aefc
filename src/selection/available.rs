use anyhow::Result;
use tracing::debug;

use super::set::SelectionSet;
use crate::audio::AudioDevice;
use crate::system::AudioSystemInterface;

/// Devices that are both present on the system and selected, in backend order.
pub fn filter_selected(devices: Vec<AudioDevice>, selection: &SelectionSet) -> Vec<AudioDevice> {
    devices
        .into_iter()
        .filter(|device| selection.contains(&device.name))
        .collect()
}

/// Query the backend and intersect with the selection. Nothing is cached.
pub fn available_devices<A: AudioSystemInterface>(
    audio_system: &A,
    selection: &SelectionSet,
) -> Result<Vec<AudioDevice>> {
    let devices = audio_system.enumerate_devices()?;
    let total = devices.len();
    let available = filter_selected(devices, selection);
    debug!(
        "{} of {} output devices are selected and available",
        available.len(),
        total
    );
    Ok(available)
}

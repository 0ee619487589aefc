use crate::audio::AudioDevice;

/// Index of the device treated as the current position.
///
/// The OS-reported default wins over the last device we activated, which wins
/// over the first entry. `list` must not be empty.
pub fn anchor_index(list: &[AudioDevice], last_active: Option<&str>) -> usize {
    list.iter()
        .position(|device| device.is_default)
        .or_else(|| {
            last_active.and_then(|name| list.iter().position(|device| device.name == name))
        })
        .unwrap_or(0)
}

/// Device after the anchor, wrapping to the first. `None` for an empty list.
pub fn next_target<'a>(list: &'a [AudioDevice], last_active: Option<&str>) -> Option<&'a AudioDevice> {
    if list.is_empty() {
        return None;
    }
    let anchor = anchor_index(list, last_active);
    list.get((anchor + 1) % list.len())
}

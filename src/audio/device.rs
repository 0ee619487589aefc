use serde::{Deserialize, Serialize};
use std::fmt;

/// An audio output device as reported by the backend.
///
/// `id` is the backend's stable identifier (CoreAudio UID, PulseAudio sink name).
/// `name` is the friendly name shown to the user; selection and cycling match on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioDevice {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

// Identity is the backend identifier, not the friendly name.
impl PartialEq for AudioDevice {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AudioDevice {}

impl fmt::Display for AudioDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]",
            self.name,
            if self.is_default {
                "Default"
            } else {
                "Available"
            }
        )
    }
}

impl AudioDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_default: false,
        }
    }

    pub fn set_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

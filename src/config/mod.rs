pub mod hotkey;
pub mod loader;
pub mod settings;
pub mod types;

pub use hotkey::{Hotkey, HotkeyParseError};
pub use loader::ConfigLoader;
pub use settings::SettingsStore;
pub use types::*;

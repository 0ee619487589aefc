pub mod audio;
pub mod config;
pub mod cycling;
pub mod logging;
pub mod notifications;
pub mod selection;
pub mod service;
pub mod system;

pub use audio::AudioDevice;
pub use config::{Config, ConfigLoader, Hotkey, SettingsStore};
pub use cycling::{CycleError, DeviceCycler};
pub use notifications::{NotificationManager, SwitchNotifier};
pub use selection::{SelectionSet, SelectionStore};
pub use service::ServiceManager;
pub use system::{AudioSystemInterface, FileSystemInterface, PlatformAudioSystem, StandardFileSystem};

#[cfg(any(test, feature = "test-mocks"))]
pub use notifications::TestNotificationSender;
#[cfg(any(test, feature = "test-mocks"))]
pub use system::{MockAudioSystem, MockFileSystem, MockNotifier, MockSwitchOutcome, NotifierEvent};

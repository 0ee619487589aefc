#[cfg(target_os = "macos")]
pub mod coreaudio;
pub mod device;
#[cfg(not(target_os = "macos"))]
pub mod pulse;

#[cfg(target_os = "macos")]
pub use coreaudio::CoreAudioSystem;
pub use device::AudioDevice;
#[cfg(not(target_os = "macos"))]
pub use pulse::PulseAudioSystem;

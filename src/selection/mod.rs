pub mod available;
pub mod set;
pub mod store;

pub use available::{available_devices, filter_selected};
pub use set::{InvalidDeviceName, SELECTED_DEVICES_DELIMITER, SelectionSet, validate_device_name};
pub use store::{ChannelObserver, SelectionObserver, SelectionStore};

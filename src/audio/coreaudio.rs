use anyhow::Result;
use core_foundation::base::TCFType;
use core_foundation::string::{CFString, CFStringRef};
use coreaudio_sys::*;
use std::os::raw::c_void;
use std::ptr;
use tracing::{debug, error, info, warn};

use super::device::AudioDevice;
use crate::system::AudioSystemInterface;

/// Output device backend talking to CoreAudio's hardware object directly
pub struct CoreAudioSystem;

fn global_address(selector: AudioObjectPropertySelector) -> AudioObjectPropertyAddress {
    AudioObjectPropertyAddress {
        mSelector: selector,
        mScope: kAudioObjectPropertyScopeGlobal,
        mElement: kAudioObjectPropertyElementMain,
    }
}

impl CoreAudioSystem {
    pub fn new() -> Result<Self> {
        info!("Initialized CoreAudio output device backend");
        Ok(Self)
    }

    /// Every audio object the hardware reports, inputs included
    fn device_ids(&self) -> Result<Vec<AudioDeviceID>> {
        let property_address = global_address(kAudioHardwarePropertyDevices);

        unsafe {
            let mut property_size: u32 = 0;
            let result = AudioObjectGetPropertyDataSize(
                kAudioObjectSystemObject,
                &property_address,
                0,
                ptr::null(),
                &mut property_size,
            );

            if result != kAudioHardwareNoError as i32 {
                return Err(anyhow::anyhow!(
                    "Failed to get device list size (OSStatus {})",
                    result
                ));
            }

            let device_count = property_size as usize / std::mem::size_of::<AudioDeviceID>();
            let mut devices = vec![0 as AudioDeviceID; device_count];

            let result = AudioObjectGetPropertyData(
                kAudioObjectSystemObject,
                &property_address,
                0,
                ptr::null(),
                &mut property_size,
                devices.as_mut_ptr() as *mut c_void,
            );

            if result != kAudioHardwareNoError as i32 {
                return Err(anyhow::anyhow!(
                    "Failed to get device list (OSStatus {})",
                    result
                ));
            }

            Ok(devices)
        }
    }

    fn default_output_id(&self) -> Result<AudioDeviceID> {
        let property_address = global_address(kAudioHardwarePropertyDefaultOutputDevice);

        unsafe {
            let mut device_id: AudioDeviceID = 0;
            let mut property_size = std::mem::size_of::<AudioDeviceID>() as u32;
            let result = AudioObjectGetPropertyData(
                kAudioObjectSystemObject,
                &property_address,
                0,
                ptr::null(),
                &mut property_size,
                &mut device_id as *mut _ as *mut c_void,
            );

            if result != kAudioHardwareNoError as i32 {
                return Err(anyhow::anyhow!(
                    "Failed to get default output device (OSStatus {})",
                    result
                ));
            }

            Ok(device_id)
        }
    }

    /// Read a CFString property (name, UID) of a device
    fn string_property(
        &self,
        device_id: AudioDeviceID,
        selector: AudioObjectPropertySelector,
    ) -> Result<String> {
        let property_address = global_address(selector);

        unsafe {
            let mut property_size = std::mem::size_of::<CFStringRef>() as u32;
            let mut cf_string: CFStringRef = ptr::null();

            let result = AudioObjectGetPropertyData(
                device_id,
                &property_address,
                0,
                ptr::null(),
                &mut property_size,
                &mut cf_string as *mut _ as *mut c_void,
            );

            if result != kAudioHardwareNoError as i32 {
                return Err(anyhow::anyhow!(
                    "Failed to read property {} of device {} (OSStatus {})",
                    selector,
                    device_id,
                    result
                ));
            }

            if cf_string.is_null() {
                return Err(anyhow::anyhow!("Property {} of device {} is null", selector, device_id));
            }

            // The property getter follows the create rule
            let cf_string = CFString::wrap_under_create_rule(cf_string);
            Ok(cf_string.to_string())
        }
    }

    fn has_output_streams(&self, device_id: AudioDeviceID) -> bool {
        let property_address = AudioObjectPropertyAddress {
            mSelector: kAudioDevicePropertyStreams,
            mScope: kAudioDevicePropertyScopeOutput,
            mElement: kAudioObjectPropertyElementMain,
        };

        unsafe {
            let mut property_size: u32 = 0;
            let result = AudioObjectGetPropertyDataSize(
                device_id,
                &property_address,
                0,
                ptr::null(),
                &mut property_size,
            );

            result == kAudioHardwareNoError as i32 && property_size > 0
        }
    }

    fn find_device_id(&self, device: &AudioDevice) -> Result<Option<AudioDeviceID>> {
        for device_id in self.device_ids()? {
            if !self.has_output_streams(device_id) {
                continue;
            }
            let uid = self.string_property(device_id, kAudioDevicePropertyDeviceUID).ok();
            if uid.as_deref() == Some(device.id.as_str()) {
                return Ok(Some(device_id));
            }
        }
        Ok(None)
    }
}

impl AudioSystemInterface for CoreAudioSystem {
    fn enumerate_devices(&self) -> Result<Vec<AudioDevice>> {
        let default_id = match self.default_output_id() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("{:#}", e);
                None
            }
        };

        let mut devices = Vec::new();
        for device_id in self.device_ids()? {
            if !self.has_output_streams(device_id) {
                continue;
            }

            let name = match self.string_property(device_id, kAudioDevicePropertyDeviceNameCFString) {
                Ok(name) => name,
                Err(e) => {
                    debug!("Skipping device {}: {:#}", device_id, e);
                    continue;
                }
            };
            let uid = self
                .string_property(device_id, kAudioDevicePropertyDeviceUID)
                .unwrap_or_else(|_| device_id.to_string());

            devices.push(AudioDevice::new(uid, name).set_default(Some(device_id) == default_id));
        }

        debug!("Enumerated {} output devices", devices.len());
        Ok(devices)
    }

    fn set_default_output_device(&self, device: &AudioDevice) -> Result<bool> {
        let Some(device_id) = self.find_device_id(device)? else {
            warn!("Output device '{}' ({}) is no longer present", device.name, device.id);
            return Ok(false);
        };

        let property_address = global_address(kAudioHardwarePropertyDefaultOutputDevice);

        unsafe {
            let result = AudioObjectSetPropertyData(
                kAudioObjectSystemObject,
                &property_address,
                0,
                ptr::null(),
                std::mem::size_of::<AudioDeviceID>() as u32,
                &device_id as *const _ as *const c_void,
            );

            if result != kAudioHardwareNoError as i32 {
                error!("Failed to set default output device: {}", result);
                return Err(anyhow::anyhow!(
                    "CoreAudio refused default output change (OSStatus {})",
                    result
                ));
            }
        }

        info!("Set default output device ID: {}", device_id);
        Ok(true)
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::process::{Command, Output};
use tracing::{debug, info, warn};

use super::device::AudioDevice;
use crate::system::AudioSystemInterface;

/// Output device backend driving PulseAudio (or PipeWire's pulse shim) through `pactl`
pub struct PulseAudioSystem {
    program: String,
}

#[derive(Debug, Deserialize)]
struct PactlSink {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

/// Build devices from `pactl --format=json list sinks` output.
///
/// The sink name is the identifier, the description the friendly name.
fn parse_sinks(json: &str, default_sink: &str) -> Result<Vec<AudioDevice>> {
    let sinks: Vec<PactlSink> =
        serde_json::from_str(json).context("Failed to parse pactl sink list")?;

    Ok(sinks
        .into_iter()
        .map(|sink| {
            let is_default = sink.name == default_sink;
            let name = sink
                .description
                .filter(|description| !description.is_empty())
                .unwrap_or_else(|| sink.name.clone());
            AudioDevice::new(sink.name, name).set_default(is_default)
        })
        .collect())
}

impl PulseAudioSystem {
    pub fn new() -> Result<Self> {
        info!("Initialized pactl output device backend");
        Ok(Self {
            program: "pactl".to_string(),
        })
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!("Running {} {}", self.program, args.join(" "));
        Command::new(&self.program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run {}", self.program))
    }

    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "{} {} failed: {}",
                self.program,
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl AudioSystemInterface for PulseAudioSystem {
    fn enumerate_devices(&self) -> Result<Vec<AudioDevice>> {
        let default_sink = match self.run_checked(&["get-default-sink"]) {
            Ok(name) => name.trim().to_string(),
            Err(e) => {
                warn!("Could not read default sink: {:#}", e);
                String::new()
            }
        };
        let json = self.run_checked(&["--format=json", "list", "sinks"])?;
        let devices = parse_sinks(&json, &default_sink)?;

        debug!("Enumerated {} output devices", devices.len());
        Ok(devices)
    }

    fn set_default_output_device(&self, device: &AudioDevice) -> Result<bool> {
        let output = self.run(&["set-default-sink", &device.id])?;
        if output.status.success() {
            info!("Set default sink: {}", device.id);
            Ok(true)
        } else {
            warn!(
                "pactl declined default sink {}: {}",
                device.id,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINKS: &str = r#"[
        {"index": 47, "name": "alsa_output.pci-0000_00_1f.3.analog-stereo", "description": "Built-in Audio Analog Stereo", "driver": "PipeWire"},
        {"index": 52, "name": "bluez_output.AA_BB_CC.1", "description": "WH-1000XM4", "driver": "PipeWire"},
        {"index": 60, "name": "null_sink", "description": ""}
    ]"#;

    #[test]
    fn test_parse_sinks_uses_description_as_name() {
        let devices = parse_sinks(SINKS, "bluez_output.AA_BB_CC.1").unwrap();

        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].name, "Built-in Audio Analog Stereo");
        assert_eq!(devices[0].id, "alsa_output.pci-0000_00_1f.3.analog-stereo");
        assert!(!devices[0].is_default);
        assert_eq!(devices[1].name, "WH-1000XM4");
        assert!(devices[1].is_default);
    }

    #[test]
    fn test_parse_sinks_falls_back_to_sink_name() {
        let devices = parse_sinks(SINKS, "").unwrap();
        assert_eq!(devices[2].name, "null_sink");
        assert!(devices.iter().all(|d| !d.is_default));
    }

    #[test]
    fn test_parse_sinks_rejects_garbage() {
        assert!(parse_sinks("Sink #47", "").is_err());
    }
}

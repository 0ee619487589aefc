use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};

use audio_device_cycler::config::{ConfigLoader, Hotkey, SettingsStore};
use audio_device_cycler::cycling::DeviceCycler;
use audio_device_cycler::logging::{self, LoggingConfig};
use audio_device_cycler::notifications::NotificationManager;
use audio_device_cycler::selection::SelectionStore;
use audio_device_cycler::service::ServiceManager;
use audio_device_cycler::system::{AudioSystemInterface, PlatformAudioSystem, StandardFileSystem};

type Cycler = DeviceCycler<PlatformAudioSystem, StandardFileSystem, NotificationManager>;

const LOG_RETENTION_DAYS: u64 = 7;

#[derive(Parser)]
#[command(name = "audio-device-cycler")]
#[command(about = "Cycle the default audio output through a chosen set of devices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all output devices, marking the selected ones
    ListDevices,
    /// List the selected device names and whether each is present
    ListSelected,
    /// Add a device to the cycle
    Select {
        /// Device name as shown by list-devices
        name: String,
    },
    /// Remove a device from the cycle
    Deselect {
        /// Device name as shown by list-devices
        name: String,
    },
    /// Switch to a specific selected device
    Switch {
        /// Device name to switch to
        name: String,
    },
    /// Switch to the next selected device
    Cycle,
    /// Show the current default output device
    ShowDefault,
    /// Show or change the cycle hotkey
    Hotkey {
        /// New key combination, e.g. "Ctrl+Alt+F11"
        #[arg(long)]
        set: Option<String>,
    },
    /// Validate configuration file
    CheckConfig,
    /// Send a test notification
    TestNotification,
    /// Run in daemon mode (SIGUSR1 cycles, SIGHUP reloads)
    Daemon,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = ConfigLoader::from_cli_path(cli.config.as_deref())?;
    let settings = Arc::new(SettingsStore::load(loader)?);

    let daemon_mode = matches!(cli.command, None | Some(Commands::Daemon));
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        settings.read(|config| logging::parse_level(&config.general.log_level))
    };
    let (_guard, log_dir) = logging::initialize_logging(LoggingConfig {
        level,
        file_output: daemon_mode,
        ..LoggingConfig::default()
    })?;

    if let Some(dir) = &log_dir {
        if let Err(e) = logging::cleanup_old_logs(dir, LOG_RETENTION_DAYS) {
            warn!("Failed to clean up old logs: {:#}", e);
        }
    }

    info!(
        "Using configuration file: {}",
        settings.config_path().display()
    );

    match cli.command {
        Some(Commands::ListDevices) => list_devices(&build_cycler(settings)?)?,
        Some(Commands::ListSelected) => list_selected(&build_cycler(settings)?)?,
        Some(Commands::Select { name }) => set_selected(&build_cycler(settings)?, &name, true)?,
        Some(Commands::Deselect { name }) => set_selected(&build_cycler(settings)?, &name, false)?,
        Some(Commands::Switch { name }) => switch_device(&build_cycler(settings)?, &name)?,
        Some(Commands::Cycle) => cycle(&build_cycler(settings)?),
        Some(Commands::ShowDefault) => show_default_device()?,
        Some(Commands::Hotkey { set }) => hotkey(&settings, set.as_deref())?,
        Some(Commands::CheckConfig) => check_config(&settings),
        Some(Commands::TestNotification) => test_notification(&settings)?,
        Some(Commands::Daemon) => run_daemon(build_cycler(settings)?).await?,
        None => {
            info!("No command specified, running in daemon mode");
            run_daemon(build_cycler(settings)?).await?;
        }
    }

    Ok(())
}

fn build_cycler(settings: Arc<SettingsStore<StandardFileSystem>>) -> Result<Cycler> {
    let audio_system = PlatformAudioSystem::new()?;
    let notifier = settings.read(|config| NotificationManager::new(&config.notifications));
    let selection = Arc::new(SelectionStore::new(Arc::clone(&settings)));
    Ok(DeviceCycler::new(audio_system, selection, settings, notifier))
}

fn list_devices(cycler: &Cycler) -> Result<()> {
    let devices = cycler.enumerate_devices()?;
    let selection = cycler.selection().selection();

    println!("Output devices:");
    if devices.is_empty() {
        println!("  No audio devices found!");
        return Ok(());
    }

    for (i, device) in devices.iter().enumerate() {
        let marker = if selection.contains(&device.name) { "*" } else { " " };
        println!("  {} {}. {}", marker, i + 1, device);
    }
    println!("\n(* = in the cycle)");

    Ok(())
}

fn list_selected(cycler: &Cycler) -> Result<()> {
    let selected = cycler.selection().list();
    if selected.is_empty() {
        println!("No devices selected. Use `select <NAME>` to add one.");
        return Ok(());
    }

    let available = cycler.available()?;
    let last_active = cycler.settings().last_active_device();

    println!("Selected devices:");
    for name in &selected {
        let present = available.iter().any(|device| &device.name == name);
        let status = if present { "available" } else { "not connected" };
        let last = if last_active.as_deref() == Some(name.as_str()) {
            " (last active)"
        } else {
            ""
        };
        println!("  - {} [{}]{}", name, status, last);
    }

    Ok(())
}

fn set_selected(cycler: &Cycler, name: &str, selected: bool) -> Result<()> {
    cycler.selection().subscribe(|names: &[String]| {
        println!("Selection is now: {}", names.join(", "));
    });

    let changed = cycler.selection().set_selected(name, selected)?;
    if !changed {
        let state = if selected { "already selected" } else { "not selected" };
        println!("'{}' is {}, nothing to do", name, state);
    }

    Ok(())
}

fn switch_device(cycler: &Cycler, name: &str) -> Result<()> {
    if cycler.activate_by_name(name)? {
        println!("Switched output to: {}", name);
    } else {
        println!("Could not switch output to: {}", name);
    }
    Ok(())
}

fn cycle(cycler: &Cycler) {
    match cycler.handle_cycle_request() {
        Some(device_name) => println!("Switched output to: {}", device_name),
        None => println!("Output device unchanged"),
    }
}

fn show_default_device() -> Result<()> {
    let audio_system = PlatformAudioSystem::new()?;
    match audio_system.get_default_output_device()? {
        Some(device) => println!("Default output: {}", device.name),
        None => println!("No default output device"),
    }
    Ok(())
}

fn hotkey(settings: &SettingsStore<StandardFileSystem>, new_binding: Option<&str>) -> Result<()> {
    let Some(binding) = new_binding else {
        let current = settings.read(|config| config.hotkey.effective());
        println!("Cycle hotkey: {}", current);
        return Ok(());
    };

    let hotkey: Hotkey = binding
        .parse()
        .with_context(|| format!("Invalid hotkey: {binding}"))?;
    settings.update(|config| config.hotkey.binding = Some(hotkey.clone()))?;
    println!("Cycle hotkey set to: {}", hotkey);

    Ok(())
}

fn check_config(settings: &SettingsStore<StandardFileSystem>) {
    let config = settings.snapshot();
    let selection = config.selection();

    println!("Configuration validation:");
    if settings.config_file_exists() {
        println!("  ✓ Configuration file: {}", settings.config_path().display());
    } else {
        println!(
            "  ✗ Configuration file not found: {} (running on defaults)",
            settings.config_path().display()
        );
    }
    println!("  ✓ Log level: {}", config.general.log_level);
    println!("  ✓ Selected devices: {}", selection.len());
    for name in selection.names() {
        println!("      - {}", name);
    }
    match &config.devices.last_active_device {
        Some(name) => println!("  ✓ Last active device: {}", name),
        None => println!("  ✓ Last active device: none"),
    }
    println!("  ✓ Cycle hotkey: {}", config.hotkey.effective());
    println!(
        "  ✓ Notifications: switching actions {}, errors {}",
        on_off(config.notifications.show_switching_actions),
        on_off(config.notifications.show_errors)
    );
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn test_notification(settings: &SettingsStore<StandardFileSystem>) -> Result<()> {
    let manager = settings.read(|config| NotificationManager::new(&config.notifications));
    manager.test_notification()?;
    println!("Test notification sent");
    Ok(())
}

async fn run_daemon(cycler: Cycler) -> Result<()> {
    let hotkey = cycler.settings().read(|config| config.hotkey.effective());

    println!("Audio device cycler daemon started (pid {})", std::process::id());
    println!("  Bind {} to `kill -USR1 {}` to cycle", hotkey, std::process::id());
    println!("  Send SIGHUP to reload the configuration");
    println!("  Press Ctrl+C to stop");

    let service = ServiceManager::new(cycler);
    service.start().await?;

    println!("Daemon stopped");
    Ok(())
}

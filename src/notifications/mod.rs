use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

use crate::config::NotificationConfig;

/// Where cycle and switch outcomes are surfaced to the user
pub trait SwitchNotifier {
    fn switch_succeeded(&self, device_name: &str) -> Result<()>;
    fn no_devices_configured(&self) -> Result<()>;
    fn error(&self, message: &str) -> Result<()>;

    /// Pick up notification settings after the configuration is reloaded
    fn apply_config(&self, _config: &NotificationConfig) {}
}

/// Trait for sending notifications - allows for testing without system calls
pub trait NotificationSender {
    fn send(&self, title: &str, body: &str) -> Result<()>;
}

/// Production notification sender: osascript on macOS, notify-send elsewhere
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotificationSender;

impl NotificationSender for DesktopNotificationSender {
    fn send(&self, title: &str, body: &str) -> Result<()> {
        send_desktop_notification(title, body)
    }
}

/// Test notification sender that doesn't actually send notifications
#[cfg(any(test, feature = "test-mocks"))]
#[derive(Clone, Default)]
pub struct TestNotificationSender {
    pub sent_notifications: std::sync::Arc<std::sync::Mutex<Vec<(String, String)>>>,
}

#[cfg(any(test, feature = "test-mocks"))]
impl TestNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_sent_notifications(&self) -> Vec<(String, String)> {
        self.sent_notifications.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent_notifications.lock().unwrap().clear();
    }
}

#[cfg(any(test, feature = "test-mocks"))]
impl NotificationSender for TestNotificationSender {
    fn send(&self, title: &str, body: &str) -> Result<()> {
        debug!("Test notification: {} - {}", title, body);
        self.sent_notifications
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

/// Turns switch outcomes into user notifications, filtered by configuration
pub struct NotificationManager<T: NotificationSender = DesktopNotificationSender> {
    show_switching_actions: AtomicBool,
    show_errors: AtomicBool,
    sender: T,
}

impl<T: NotificationSender> NotificationManager<T> {
    pub fn with_sender(config: &NotificationConfig, sender: T) -> Self {
        Self {
            show_switching_actions: AtomicBool::new(config.show_switching_actions),
            show_errors: AtomicBool::new(config.show_errors),
            sender,
        }
    }

    pub fn sender(&self) -> &T {
        &self.sender
    }

    /// Send a notification unconditionally, for checking the desktop integration
    pub fn test_notification(&self) -> Result<()> {
        info!("Sending test notification...");

        match self.sender.send(
            "Audio Device Cycler",
            "Notification system is working correctly!",
        ) {
            Ok(()) => {
                info!("Test notification sent successfully");
                Ok(())
            }
            Err(e) => {
                error!("Failed to send notification: {:#}", e);
                error!("Check Do Not Disturb and that the notification helper is installed");
                Err(e.context("Failed to send test notification"))
            }
        }
    }

    fn send_notification(&self, title: &str, body: &str) -> Result<()> {
        debug!("Sending notification: {} - {}", title, body);
        self.sender.send(title, body)?;
        debug!("Successfully sent notification: {}", title);
        Ok(())
    }
}

impl NotificationManager<DesktopNotificationSender> {
    pub fn new(config: &NotificationConfig) -> Self {
        Self::with_sender(config, DesktopNotificationSender)
    }
}

impl<T: NotificationSender> SwitchNotifier for NotificationManager<T> {
    fn switch_succeeded(&self, device_name: &str) -> Result<()> {
        if !self.show_switching_actions.load(Ordering::Relaxed) {
            return Ok(());
        }

        self.send_notification(
            "Audio Device Switched",
            &format!("🔊 Output switched to {device_name}"),
        )?;

        info!("Sent device switched notification for: {}", device_name);
        Ok(())
    }

    fn no_devices_configured(&self) -> Result<()> {
        if !self.show_errors.load(Ordering::Relaxed) {
            return Ok(());
        }

        self.send_notification(
            "Configuration Needed",
            "No devices to select. Select at least one output device to cycle through.",
        )?;

        warn!("Sent no devices configured notification");
        Ok(())
    }

    fn error(&self, message: &str) -> Result<()> {
        if !self.show_errors.load(Ordering::Relaxed) {
            return Ok(());
        }

        self.send_notification("Audio Device Switch Failed", message)?;

        warn!("Sent error notification: {}", message);
        Ok(())
    }

    fn apply_config(&self, config: &NotificationConfig) {
        self.show_switching_actions
            .store(config.show_switching_actions, Ordering::Relaxed);
        self.show_errors.store(config.show_errors, Ordering::Relaxed);
        debug!(
            "Notification filters updated (switching actions: {}, errors: {})",
            config.show_switching_actions, config.show_errors
        );
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(&NotificationConfig::default())
    }
}

#[cfg(any(target_os = "macos", test))]
fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(target_os = "macos")]
fn send_desktop_notification(title: &str, body: &str) -> Result<()> {
    use std::process::Command;

    let script = format!(
        r#"display notification "{}" with title "{}""#,
        escape_applescript(body),
        escape_applescript(title)
    );

    let output = Command::new("osascript").args(["-e", &script]).output()?;

    if output.status.success() {
        Ok(())
    } else {
        let error = String::from_utf8_lossy(&output.stderr);
        Err(anyhow::anyhow!("osascript failed: {}", error))
    }
}

#[cfg(not(target_os = "macos"))]
fn send_desktop_notification(title: &str, body: &str) -> Result<()> {
    use std::process::Command;

    let output = Command::new("notify-send")
        .args(["--app-name=audio-device-cycler", title, body])
        .output()?;

    if output.status.success() {
        Ok(())
    } else {
        let error = String::from_utf8_lossy(&output.stderr);
        Err(anyhow::anyhow!("notify-send failed: {}", error))
    }
}

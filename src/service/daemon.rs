use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::signals::{ServiceCommand, SignalHandler};
use crate::cycling::DeviceCycler;
use crate::notifications::SwitchNotifier;
use crate::system::{AudioSystemInterface, FileSystemInterface};

/// Long-running process that cycles devices on request.
///
/// Commands are handled one at a time on the loop's task.
pub struct ServiceManager<A, F, N>
where
    A: AudioSystemInterface,
    F: FileSystemInterface,
    N: SwitchNotifier,
{
    cycler: DeviceCycler<A, F, N>,
}

impl<A, F, N> ServiceManager<A, F, N>
where
    A: AudioSystemInterface,
    F: FileSystemInterface,
    N: SwitchNotifier,
{
    pub fn new(cycler: DeviceCycler<A, F, N>) -> Self {
        Self { cycler }
    }

    pub fn cycler(&self) -> &DeviceCycler<A, F, N> {
        &self.cycler
    }

    /// Install signal handling and serve until shutdown
    pub async fn start(&self) -> Result<()> {
        info!("Starting audio device cycler service");

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let signal_handler = SignalHandler::new(command_tx);
        let signal_task = tokio::spawn(async move {
            if let Err(e) = signal_handler.listen_for_signals().await {
                error!("Signal handler error: {:#}", e);
            }
        });

        let handled = self.run(command_rx).await;
        signal_task.abort();

        info!("Service stopped after {} commands", handled);
        Ok(())
    }

    /// Process commands until shutdown or until every sender is gone.
    /// Returns how many commands were handled, shutdown included.
    pub async fn run(&self, mut commands: mpsc::UnboundedReceiver<ServiceCommand>) -> usize {
        let mut handled = 0;

        while let Some(command) = commands.recv().await {
            handled += 1;
            if !self.handle_command(command) {
                return handled;
            }
        }

        warn!("Command channel closed");
        handled
    }

    /// Act on one command. Returns false once the service should stop.
    pub fn handle_command(&self, command: ServiceCommand) -> bool {
        match command {
            ServiceCommand::Cycle => {
                match self.cycler.handle_cycle_request() {
                    Some(device_name) => info!("Cycle request switched to {}", device_name),
                    None => warn!("Cycle request did not switch devices"),
                }
                true
            }
            ServiceCommand::Reload => {
                match self.cycler.reload_settings() {
                    Ok(()) => info!("Configuration reloaded successfully"),
                    Err(e) => error!("Failed to reload configuration: {:#}", e),
                }
                true
            }
            ServiceCommand::Shutdown => {
                info!("Shutdown requested");
                false
            }
        }
    }
}

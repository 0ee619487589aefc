use anyhow::Result;
use signal_hook::consts::signal::*;
use signal_hook_tokio::Signals;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{info, warn};

/// Requests the daemon loop acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCommand {
    /// Switch to the next selected device (SIGUSR1)
    Cycle,
    /// Re-read the configuration file (SIGHUP)
    Reload,
    /// Stop the daemon (SIGTERM/SIGINT)
    Shutdown,
}

/// Map a received signal to the command it triggers
pub fn command_for_signal(signal: i32) -> Option<ServiceCommand> {
    match signal {
        SIGUSR1 => Some(ServiceCommand::Cycle),
        SIGHUP => Some(ServiceCommand::Reload),
        SIGTERM | SIGINT => Some(ServiceCommand::Shutdown),
        _ => None,
    }
}

/// Translates process signals into service commands
pub struct SignalHandler {
    sender: mpsc::UnboundedSender<ServiceCommand>,
}

impl SignalHandler {
    pub fn new(sender: mpsc::UnboundedSender<ServiceCommand>) -> Self {
        Self { sender }
    }

    /// Forward signals until shutdown is requested or the receiver goes away
    pub async fn listen_for_signals(&self) -> Result<()> {
        let mut signals = Signals::new([SIGUSR1, SIGHUP, SIGTERM, SIGINT])?;
        let handle = signals.handle();

        info!("Signal handler listening for SIGUSR1 (cycle), SIGHUP (reload), SIGTERM/SIGINT (stop)");

        while let Some(signal) = signals.next().await {
            let Some(command) = command_for_signal(signal) else {
                warn!("Received unexpected signal: {}", signal);
                continue;
            };

            info!("Received signal {} -> {:?}", signal, command);
            if self.sender.send(command).is_err() {
                warn!("Service loop is gone, stopping signal handler");
                break;
            }
            if command == ServiceCommand::Shutdown {
                break;
            }
        }

        handle.close();
        Ok(())
    }
}

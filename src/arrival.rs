use async_trait::async_trait;
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{info, warn};

/// Notice printed to stdout when the order arrives
pub const ARRIVAL_NOTICE: &str = "order has arrived";

/// Side effect fired once the order is seen as arrived
#[async_trait]
pub trait ArrivalHandler: Send {
    async fn on_arrival(&mut self);
}

/// Prints the arrival notice and optionally runs a shell command
#[derive(Clone, Debug, Default)]
pub struct CommandArrival {
    command: Option<String>,
}

impl CommandArrival {
    pub fn new(command: Option<String>) -> Self {
        CommandArrival { command }
    }

    /// Shell command run on arrival, if any
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Run the configured command through the platform shell and wait for it.
    ///
    /// Output goes straight to the inherited stdout/stderr. Returns `None`
    /// when no command is configured or it could not be started.
    pub async fn run_command(&self) -> Option<ExitStatus> {
        let command = self.command()?;
        info!("Running arrival command: {}", command);

        match shell(command).status().await {
            Ok(status) => {
                if status.success() {
                    info!("Arrival command finished: {}", status);
                } else {
                    warn!("Arrival command exited with {}", status);
                }
                Some(status)
            }
            Err(e) => {
                warn!("Failed to run arrival command '{}': {}", command, e);
                None
            }
        }
    }
}

#[async_trait]
impl ArrivalHandler for CommandArrival {
    async fn on_arrival(&mut self) {
        println!("{}", ARRIVAL_NOTICE);
        // Outcome is logged only; the notifier's own result does not depend on it
        let _ = self.run_command().await;
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(test)]
#[path = "arrival_test.rs"]
mod arrival_test;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// Asynchronous control command from the control surface to the worker.
///
/// Commands are delivered, not merged: N queued `Skip`s skip exactly N
/// subsequent items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    Pause,
    Resume,
    Stop,
    Skip,
}

/// Rejection for unrecognized control input; no state is mutated
#[derive(Error, Debug, PartialEq, Eq)]
#[error("unrecognized control command: {0}")]
pub struct InvalidCommand(pub String);

impl FromStr for ControlCommand {
    type Err = InvalidCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pause" => Ok(ControlCommand::Pause),
            "resume" => Ok(ControlCommand::Resume),
            "stop" => Ok(ControlCommand::Stop),
            "skip" => Ok(ControlCommand::Skip),
            other => Err(InvalidCommand(other.to_string())),
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlCommand::Pause => "pause",
            ControlCommand::Resume => "resume",
            ControlCommand::Stop => "stop",
            ControlCommand::Skip => "skip",
        };
        write!(f, "{name}")
    }
}

/// Unbounded FIFO queue of control commands.
///
/// `enqueue` never blocks the caller; `drain_pending` non-blockingly returns
/// and removes everything queued so far (the worker calls it once per loop
/// iteration).
pub struct ControlChannel {
    tx: mpsc::UnboundedSender<ControlCommand>,
    rx: Mutex<mpsc::UnboundedReceiver<ControlCommand>>,
}

impl ControlChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    pub fn enqueue(&self, command: ControlCommand) {
        // The receiver lives as long as self, so this cannot fail
        let _ = self.tx.send(command);
    }

    pub fn drain_pending(&self) -> Vec<ControlCommand> {
        let mut rx = self.rx.lock().unwrap();
        let mut drained = Vec::new();
        while let Ok(command) = rx.try_recv() {
            drained.push(command);
        }
        drained
    }
}

impl Default for ControlChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Binary gate the worker blocks on while the run is paused.
///
/// Built on a `tokio::sync::watch` channel: `wait_until_open` returns
/// immediately when the gate is already open and is safe against `open`
/// racing ahead of the waiter.
pub struct PauseGate {
    state: watch::Sender<bool>,
}

impl PauseGate {
    /// Create an open gate
    pub fn new() -> Self {
        let (state, _) = watch::channel(true);
        Self { state }
    }

    pub fn open(&self) {
        self.state.send_replace(true);
    }

    pub fn close(&self) {
        self.state.send_replace(false);
    }

    pub fn is_open(&self) -> bool {
        *self.state.borrow()
    }

    /// Block the calling task until the gate is open
    pub async fn wait_until_open(&self) {
        let mut rx = self.state.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for PauseGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!("pause".parse::<ControlCommand>(), Ok(ControlCommand::Pause));
        assert_eq!("Resume".parse::<ControlCommand>(), Ok(ControlCommand::Resume));
        assert_eq!(" stop ".parse::<ControlCommand>(), Ok(ControlCommand::Stop));
        assert_eq!("skip".parse::<ControlCommand>(), Ok(ControlCommand::Skip));

        let err = "restart".parse::<ControlCommand>().unwrap_err();
        assert_eq!(err, InvalidCommand("restart".to_string()));
    }

    #[test]
    fn test_channel_preserves_fifo_order() {
        let channel = ControlChannel::new();
        channel.enqueue(ControlCommand::Skip);
        channel.enqueue(ControlCommand::Skip);
        channel.enqueue(ControlCommand::Pause);

        assert_eq!(
            channel.drain_pending(),
            vec![ControlCommand::Skip, ControlCommand::Skip, ControlCommand::Pause]
        );
        assert!(channel.drain_pending().is_empty());
    }

    #[test]
    fn test_gate_starts_open() {
        let gate = PauseGate::new();
        assert!(gate.is_open());

        gate.close();
        assert!(!gate.is_open());

        gate.open();
        assert!(gate.is_open());
    }

    #[test]
    fn test_wait_returns_immediately_when_open() {
        let gate = PauseGate::new();
        let mut wait = tokio_test::task::spawn(gate.wait_until_open());
        assert!(wait.poll().is_ready());
    }

    #[test]
    fn test_wait_blocks_until_opened() {
        let gate = PauseGate::new();
        gate.close();

        let mut wait = tokio_test::task::spawn(gate.wait_until_open());
        assert!(wait.poll().is_pending());

        gate.open();
        assert!(wait.is_woken());
        assert!(wait.poll().is_ready());
    }

    #[test]
    fn test_open_racing_ahead_of_waiter_is_safe() {
        let gate = PauseGate::new();
        gate.close();
        gate.open();

        // The waiter subscribes after the open and must not hang
        let mut wait = tokio_test::task::spawn(gate.wait_until_open());
        assert!(wait.poll().is_ready());
    }

    #[test]
    fn test_close_then_reclose_keeps_waiter_pending() {
        let gate = PauseGate::new();
        gate.close();

        let mut wait = tokio_test::task::spawn(gate.wait_until_open());
        assert!(wait.poll().is_pending());

        gate.close();
        assert!(wait.poll().is_pending());

        gate.open();
        assert!(wait.poll().is_ready());
    }
}

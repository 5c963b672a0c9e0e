//! Human-facing progress notices.

use std::fmt;
use std::sync::mpsc::Sender;

use tracing::info;

/// A progress notice emitted while provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PullingImage { image: String },
    RunningContainer { name: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PullingImage { image } => write!(f, "Pulling Docker image '{image}'..."),
            Notice::RunningContainer { name } => {
                write!(f, "Running Docker container '{name}'...")
            }
        }
    }
}

/// Receives notices. Delivery is fire-and-forget and never affects control flow.
pub trait Ui {
    fn notify(&self, notice: Notice);
}

/// Reports notices through `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingUi;

impl Ui for TracingUi {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::PullingImage { image } => info!(%image, "{notice}"),
            Notice::RunningContainer { name } => info!(container = %name, "{notice}"),
        }
    }
}

/// Forwards notices over a channel.
#[derive(Debug, Clone)]
pub struct ChannelUi(Sender<Notice>);

impl ChannelUi {
    pub fn new(tx: Sender<Notice>) -> Self {
        Self(tx)
    }
}

impl Ui for ChannelUi {
    fn notify(&self, notice: Notice) {
        // Receiver may be dropped; ignore send errors.
        let _ = self.0.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn notices_render_readable_text() {
        let pull = Notice::PullingImage {
            image: "nginx".into(),
        };
        assert_eq!(pull.to_string(), "Pulling Docker image 'nginx'...");
        let run = Notice::RunningContainer { name: "web".into() };
        assert_eq!(run.to_string(), "Running Docker container 'web'...");
    }

    #[test]
    fn channel_ui_forwards_in_order() {
        let (tx, rx) = mpsc::channel();
        let ui = ChannelUi::new(tx);
        ui.notify(Notice::PullingImage { image: "a".into() });
        ui.notify(Notice::RunningContainer { name: "b".into() });
        drop(ui);
        let got: Vec<Notice> = rx.iter().collect();
        assert_eq!(got.len(), 2);
        assert_eq!(got[1], Notice::RunningContainer { name: "b".into() });
    }

    #[test]
    fn channel_ui_ignores_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        ChannelUi::new(tx).notify(Notice::PullingImage { image: "x".into() });
    }
}

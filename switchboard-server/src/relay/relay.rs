use crate::relay::{RelayCommand, Router};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The single task that owns all peer and room state. Commands from every
/// connection are applied one at a time, in arrival order.
pub struct Relay {
    router: Router,
    command_rx: mpsc::Receiver<RelayCommand>,
}

impl Relay {
    pub fn new(command_rx: mpsc::Receiver<RelayCommand>) -> Self {
        Self {
            router: Router::new(),
            command_rx,
        }
    }

    pub async fn run(mut self) {
        info!("Relay event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!("Command channel closed. Relay event loop finished");
    }

    fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Connect { sink, reply } => {
                let peer_id = self.router.connect(sink);
                if reply.send(peer_id.clone()).is_err() {
                    debug!("Connection for {} went away before registration", peer_id);
                    self.router.disconnect(&peer_id);
                }
            }

            RelayCommand::Envelope { peer_id, text } => {
                self.router.dispatch(&peer_id, &text);
            }

            RelayCommand::Disconnect { peer_id } => {
                self.router.disconnect(&peer_id);
            }

            RelayCommand::Stats { reply } => {
                let _ = reply.send(self.router.stats());
            }
        }
    }
}

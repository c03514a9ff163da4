/// Tuning for the relay loop and for each connection.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Capacity of the queue feeding the relay loop.
    pub command_buffer: usize,
    /// Outbound bytes a connection may have queued before it is force-closed.
    pub max_queued_bytes: usize,
    /// Largest inbound WebSocket message accepted.
    pub max_message_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            command_buffer: 256,
            max_queued_bytes: 1024 * 1024,
            max_message_bytes: 64 * 1024,
        }
    }
}

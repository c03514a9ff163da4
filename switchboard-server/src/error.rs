use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("connection writer has gone away")]
    Closed,

    #[error("outbound queue overflow ({queued} bytes queued, limit {limit})")]
    Overflow { queued: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay loop is not running")]
    RelayClosed,
}

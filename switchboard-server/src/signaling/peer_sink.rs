use crate::error::SinkError;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Notify, mpsc};

struct SinkShared {
    queued: AtomicUsize,
    limit: usize,
    overflowed: AtomicBool,
    overflow: Notify,
}

/// Outbound half of one connection. The relay holds a clone in the peer
/// registry and only ever enqueues; the connection's writer task drains the
/// matching [`SinkReceiver`] onto the socket, so order per sink is enqueue order.
#[derive(Clone)]
pub struct PeerSink {
    tx: mpsc::UnboundedSender<String>,
    shared: Arc<SinkShared>,
}

pub struct SinkReceiver {
    rx: mpsc::UnboundedReceiver<String>,
    shared: Arc<SinkShared>,
}

impl PeerSink {
    /// A sink that trips once more than `limit` bytes are waiting to be written.
    pub fn channel(limit: usize) -> (Self, SinkReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(SinkShared {
            queued: AtomicUsize::new(0),
            limit,
            overflowed: AtomicBool::new(false),
            overflow: Notify::new(),
        });

        (
            Self {
                tx,
                shared: shared.clone(),
            },
            SinkReceiver { rx, shared },
        )
    }

    pub fn is_open(&self) -> bool {
        !self.tx.is_closed() && !self.shared.overflowed.load(Ordering::Acquire)
    }

    pub fn queued_bytes(&self) -> usize {
        self.shared.queued.load(Ordering::Acquire)
    }

    pub fn send_text(&self, text: String) -> Result<(), SinkError> {
        if self.shared.overflowed.load(Ordering::Acquire) {
            return Err(SinkError::Closed);
        }

        let len = text.len();
        let queued = self.shared.queued.fetch_add(len, Ordering::AcqRel) + len;
        if queued > self.shared.limit {
            self.shared.queued.fetch_sub(len, Ordering::AcqRel);
            self.shared.overflowed.store(true, Ordering::Release);
            self.shared.overflow.notify_one();
            return Err(SinkError::Overflow {
                queued,
                limit: self.shared.limit,
            });
        }

        self.tx.send(text).map_err(|_| {
            self.shared.queued.fetch_sub(len, Ordering::AcqRel);
            SinkError::Closed
        })
    }

    /// Resolves once the sink has tripped its queue limit.
    pub async fn overflowed(&self) {
        if self.shared.overflowed.load(Ordering::Acquire) {
            return;
        }
        self.shared.overflow.notified().await;
    }
}

impl fmt::Debug for PeerSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerSink")
            .field("queued", &self.queued_bytes())
            .field("open", &self.is_open())
            .finish()
    }
}

impl SinkReceiver {
    pub async fn recv(&mut self) -> Option<String> {
        let text = self.rx.recv().await?;
        self.shared.queued.fetch_sub(text.len(), Ordering::AcqRel);
        Some(text)
    }

    /// Non-blocking variant, mostly useful for draining in tests.
    pub fn try_recv(&mut self) -> Option<String> {
        let text = self.rx.try_recv().ok()?;
        self.shared.queued.fetch_sub(text.len(), Ordering::AcqRel);
        Some(text)
    }
}

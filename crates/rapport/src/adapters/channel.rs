//! In-memory transport over tokio mpsc channels.

use crate::error::TransportError;
use crate::ports::outbound::MessageSender;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// [`MessageSender`] writing encoded messages into an mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelSender(pub mpsc::Sender<Vec<u8>>);

#[async_trait]
impl MessageSender for ChannelSender {
    async fn send(&self, message: Vec<u8>) -> Result<(), TransportError> {
        self.0
            .send(message)
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }
}

/// One end of an in-memory link: a sender to the peer and the receiver of
/// whatever the peer sends.
#[derive(Debug)]
pub struct Link {
    pub sender: ChannelSender,
    pub receiver: mpsc::Receiver<Vec<u8>>,
}

/// Create two connected ends; what one sends, the other receives.
pub fn pair(buffer: usize) -> (Link, Link) {
    let (a_tx, a_rx) = mpsc::channel(buffer);
    let (b_tx, b_rx) = mpsc::channel(buffer);
    (
        Link {
            sender: ChannelSender(a_tx),
            receiver: b_rx,
        },
        Link {
            sender: ChannelSender(b_tx),
            receiver: a_rx,
        },
    )
}

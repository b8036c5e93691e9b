//! Broadcast payload types
//!
//! A payload is an opaque chunk of bytes tagged with the connection it
//! came from. There is no framing: TCP may coalesce or split chunks
//! arbitrarily in transit, and receivers must not assume message
//! boundaries survived.

use bytes::Bytes;

/// Unique identifier for a registered connection
///
/// Allocated from a monotonically increasing counter and never reused
/// within a registry's lifetime.
pub type PeerId = u64;

/// A chunk of bytes to be relayed to all peers except the sender
///
/// Cheap to clone: the inner `Bytes` is reference counted, so fan-out
/// shares one allocation across all recipients.
#[derive(Debug, Clone)]
pub struct Payload {
    /// Connection the bytes were read from
    pub sender: PeerId,
    /// The bytes, exactly as read off the wire
    pub data: Bytes,
}

impl Payload {
    /// Create a new payload
    pub fn new(sender: PeerId, data: Bytes) -> Self {
        Self { sender, data }
    }

    /// Length of the chunk in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the chunk is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

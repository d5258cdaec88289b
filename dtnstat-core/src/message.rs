use crate::time::SimTime;
use std::{fmt, sync::Arc};

/// The identifier of a message in the simulated network.
///
/// Ids are free-form strings assigned by the simulation (`"M1"`, `"M2"`, ...).
/// The wrapper is backed by an `Arc<str>` so the accumulator can keep copies
/// in its lookup tables without duplicating the string data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(Arc<str>);

impl MessageId {
    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(Arc::from(id))
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(Arc::from(id.as_str()))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A message travelling through the simulated network.
///
/// `Message` is owned and mutated by the simulation; this crate only ever
/// reads it through the [`Event`]s it receives. The hop list records every
/// node the message has visited, in order, starting with its origin.
///
/// A message with a non-zero [`response_size`](Message::response_size) asks
/// its destination to answer with a response message; the response carries an
/// [`Arc`] back-reference to the original request so round-trip times can be
/// measured against the request's creation time.
#[derive(Debug, Clone)]
pub struct Message {
    id: MessageId,
    created: SimTime,
    hops: Vec<String>,
    response_size: u64,
    request: Option<Arc<Message>>,
    receive_time: SimTime,
}

impl Message {
    /// Creates a message at `origin`. The hop list starts with the origin
    /// node and the receive time starts equal to the creation time.
    pub fn new(id: impl Into<MessageId>, origin: impl Into<String>, created: SimTime) -> Self {
        Self {
            id: id.into(),
            created,
            hops: vec![origin.into()],
            response_size: 0,
            request: None,
            receive_time: created,
        }
    }

    /// Requests a response of `size` bytes from the destination.
    ///
    /// A size of 0 (the default) means the message does not ask for one.
    pub fn with_response_size(mut self, size: u64) -> Self {
        self.response_size = size;
        self
    }

    /// Marks this message as the response to `request`.
    pub fn as_response_to(mut self, request: Arc<Message>) -> Self {
        self.request = Some(request);
        self
    }

    /// Appends `node` to the hop list.
    pub fn record_hop(&mut self, node: impl Into<String>) {
        self.hops.push(node.into());
    }

    /// Records the time the current holder received this message.
    pub fn set_receive_time(&mut self, at: SimTime) {
        self.receive_time = at;
    }

    /// Returns the unique identifier of this message.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the simulation time this message was created at.
    pub fn created(&self) -> SimTime {
        self.created
    }

    /// The nodes this message has visited so far, in order, origin first.
    pub fn hops(&self) -> &[String] {
        &self.hops
    }

    /// Number of edges this message has traversed (hop list length − 1).
    pub fn hop_count(&self) -> usize {
        self.hops.len().saturating_sub(1)
    }

    /// Size in bytes of the requested response, 0 when none is requested.
    pub fn response_size(&self) -> u64 {
        self.response_size
    }

    /// The request this message answers, when it is a response.
    pub fn request(&self) -> Option<&Arc<Message>> {
        self.request.as_ref()
    }

    /// Returns `true` when this message is the response to another message.
    pub fn is_response(&self) -> bool {
        self.request.is_some()
    }

    /// The time the current holder received this message.
    pub fn receive_time(&self) -> SimTime {
        self.receive_time
    }
}

/// One occurrence in a message's lifecycle, delivered to
/// [`MessageStats::on_event`](crate::stats::MessageStats::on_event).
///
/// The simulation produces each occurrence exactly once, in true
/// chronological order, with `at` queried from its clock at the moment the
/// occurrence happens.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Simulation time at which the occurrence happened.
    pub at: SimTime,
    /// The message the occurrence is about.
    pub message: &'a Message,
    /// What happened.
    pub kind: EventKind<'a>,
}

/// The five kinds of lifecycle occurrence a message can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind<'a> {
    /// The message entered the network at its origin node.
    Created,
    /// A transfer of the message from one node to another began.
    TransferStarted { from: &'a str, to: &'a str },
    /// A transfer completed. `final_target` is `true` when `to` is the
    /// message's destination, i.e. this transfer delivered it.
    Transferred {
        from: &'a str,
        to: &'a str,
        final_target: bool,
    },
    /// A transfer was interrupted before completing.
    TransferAborted { from: &'a str, to: &'a str },
    /// The message left `node`'s buffer, either dropped (buffer pressure)
    /// or removed (delivered elsewhere, expired, ...).
    Deleted { node: &'a str, dropped: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_count_is_edges_traversed() {
        let mut message = Message::new("M1", "user1", SimTime::ZERO);
        assert_eq!(message.hop_count(), 0);

        message.record_hop("bs1");
        message.record_hop("user10");
        assert_eq!(message.hops(), ["user1", "bs1", "user10"]);
        assert_eq!(message.hop_count(), 2);
    }

    #[test]
    fn response_back_reference() {
        let request = Arc::new(
            Message::new("M1", "user1", SimTime::from_seconds(1.0)).with_response_size(200),
        );
        let response = Message::new("M1-resp", "user10", SimTime::from_seconds(4.0))
            .as_response_to(Arc::clone(&request));

        assert!(!request.is_response());
        assert!(response.is_response());
        let original = response.request().unwrap();
        assert_eq!(original.created(), SimTime::from_seconds(1.0));
    }

    #[test]
    fn receive_time_starts_at_creation() {
        let mut message = Message::new("M2", "user3", SimTime::from_seconds(2.0));
        assert_eq!(message.receive_time(), SimTime::from_seconds(2.0));

        message.set_receive_time(SimTime::from_seconds(5.5));
        assert_eq!(message.receive_time(), SimTime::from_seconds(5.5));
    }

    #[test]
    fn message_id_from_str_and_display() {
        let id = MessageId::from("M42");
        assert_eq!(id.as_str(), "M42");
        assert_eq!(id.to_string(), "M42");
    }
}

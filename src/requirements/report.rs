//! Violation messages and the report that collects them.

use serde::Serialize;
use std::fmt;

/// One violation, described for a human reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Message(String);

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only sequence of messages in the order they were produced.
#[derive(Debug, Clone, Default)]
pub struct Report {
    messages: Vec<Message>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append messages, keeping their order.
    pub fn extend<I: IntoIterator<Item = Message>>(&mut self, messages: I) {
        self.messages.extend(messages);
    }

    /// A copy of the messages collected so far.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages joined by newlines. Empty when nothing was reported.
    pub fn render(&self) -> String {
        render(&self.messages)
    }
}

/// Join messages by newlines.
pub fn render(messages: &[Message]) -> String {
    messages
        .iter()
        .map(Message::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

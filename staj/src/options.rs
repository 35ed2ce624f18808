// SPDX-License-Identifier: Apache-2.0

//! Configuration for [`Parser`](crate::Parser) and
//! [`EventReader`](crate::EventReader).

/// Name given to the producer thread of an `EventReader` unless configured otherwise
pub const DEFAULT_THREAD_NAME: &str = "staj-producer";

/// Options for the grammar engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Deepest allowed container nesting. `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl ParserOptions {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Options for the background [`EventReader`](crate::EventReader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    events_to_buffer: usize,
    /// Options for the parser run by the producer thread
    pub parser: ParserOptions,
    /// Name of the producer thread
    pub thread_name: String,
}

impl ReaderOptions {
    /// Options buffering up to `events_to_buffer` events (at least 1)
    pub fn new(events_to_buffer: usize) -> Self {
        Self {
            events_to_buffer: events_to_buffer.max(1),
            parser: ParserOptions::default(),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }

    /// Maximum number of unconsumed events held by the reader. Never below 1.
    pub fn events_to_buffer(&self) -> usize {
        self.events_to_buffer
    }

    /// Sets the buffer capacity. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_events_to_buffer(mut self, events_to_buffer: usize) -> Self {
        self.events_to_buffer = events_to_buffer.max(1);
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.parser = self.parser.with_max_depth(max_depth);
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

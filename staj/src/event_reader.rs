// SPDX-License-Identifier: Apache-2.0

//! A parser running on a background thread, handing events over through a
//! bounded buffer.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use log::{debug, trace, warn};

use crate::{CharSource, Event, ParseError, Parser, PullParser, ReaderOptions};

/// State shared between the consumer and the producer thread
#[derive(Debug)]
struct Queue {
    events: VecDeque<Event>,
    capacity: usize,
    /// The producer will not push anything else
    finished: bool,
    /// The error that ended production, handed out once the buffer drains
    failure: Option<ParseError>,
    shutdown: bool,
}

impl Queue {
    fn is_full(&self) -> bool {
        self.events.len() >= self.capacity
    }
}

#[derive(Debug)]
struct Shared {
    queue: Mutex<Queue>,
    /// Signalled whenever the queue changes
    changed: Condvar,
}

impl Shared {
    /// Locks the queue, taking over a poisoned lock as is
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Queue>) -> MutexGuard<'a, Queue> {
        self.changed
            .wait(guard)
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Marks production as finished when the producer thread exits, including
/// by unwinding. A producer that did not reach the end leaves
/// [`ParseError::ProducerLost`] behind for the consumer.
struct FinishGuard<'a> {
    shared: &'a Shared,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        let mut queue = self.shared.lock();
        if !queue.finished && !queue.shutdown {
            warn!("event producer exited before the end of the document");
            queue.failure = Some(ParseError::ProducerLost);
        }
        queue.finished = true;
        drop(queue);
        self.shared.changed.notify_all();
    }
}

/// Streams JSON events from a parser running on its own thread.
///
/// At most `events_to_buffer` unconsumed events are held at any time; the
/// producer blocks while the buffer is full and the consumer blocks while it
/// is empty. The first event is always [`Event::Start`] and the last is
/// [`Event::End`], after which [`next_event`](PullParser::next_event) returns
/// [`ParseError::Exhausted`].
///
/// If the input is malformed, the events parsed before the problem are
/// delivered first, then the error, then `Exhausted`.
///
/// # Example
/// ```
/// use staj::{Event, EventReader, PullParser, StrSource};
///
/// let mut reader = EventReader::new(StrSource::from("[null]"), 1).unwrap();
/// assert_eq!(reader.next_event(), Ok(Event::Start));
/// assert_eq!(reader.next_event(), Ok(Event::StartArray));
/// assert_eq!(reader.next_event(), Ok(Event::Null));
/// assert_eq!(reader.next_event(), Ok(Event::EndArray));
/// assert_eq!(reader.next_event(), Ok(Event::End));
/// reader.close();
/// ```
#[derive(Debug)]
pub struct EventReader {
    shared: Arc<Shared>,
    producer: Option<JoinHandle<()>>,
}

impl EventReader {
    /// Starts parsing `source` in the background, buffering up to
    /// `events_to_buffer` events. A capacity of 0 is treated as 1.
    ///
    /// Fails only if the producer thread cannot be spawned.
    pub fn new<S>(source: S, events_to_buffer: usize) -> io::Result<Self>
    where
        S: CharSource + Send + 'static,
    {
        Self::with_options(source, ReaderOptions::new(events_to_buffer))
    }

    pub fn with_options<S>(source: S, options: ReaderOptions) -> io::Result<Self>
    where
        S: CharSource + Send + 'static,
    {
        let capacity = options.events_to_buffer();
        let mut events = VecDeque::with_capacity(capacity);
        events.push_back(Event::Start);

        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                events,
                capacity,
                finished: false,
                failure: None,
                shutdown: false,
            }),
            changed: Condvar::new(),
        });

        let parser = Parser::with_options(source, options.parser);
        let producer_shared = Arc::clone(&shared);
        let producer = thread::Builder::new()
            .name(options.thread_name)
            .spawn(move || produce(&producer_shared, parser))?;

        Ok(Self {
            shared,
            producer: Some(producer),
        })
    }

    /// Number of events waiting to be consumed
    pub fn buffered(&self) -> usize {
        self.shared.lock().events.len()
    }

    /// Maximum number of events held in the buffer
    pub fn capacity(&self) -> usize {
        self.shared.lock().capacity
    }

    /// Stops the producer and discards buffered events.
    ///
    /// The producer finishes the event it is working on and exits; a
    /// producer blocked on a full buffer wakes up at once. Afterwards every
    /// request for an event fails with [`ParseError::Shutdown`]. Calling
    /// this more than once has no further effect.
    pub fn shutdown(&self) {
        let mut queue = self.shared.lock();
        if queue.shutdown {
            return;
        }
        debug!("shutting down event reader");
        queue.shutdown = true;
        queue.events.clear();
        drop(queue);
        self.shared.changed.notify_all();
    }

    /// Shuts the reader down and waits for the producer thread to exit.
    ///
    /// The producer may still be blocked reading from its source, in which
    /// case this waits for that read to return.
    pub fn close(mut self) {
        self.shutdown();
        self.join_producer();
    }

    fn join_producer(&mut self) {
        if let Some(producer) = self.producer.take() {
            if producer.join().is_err() {
                warn!("event producer panicked");
            }
        }
    }
}

impl PullParser for EventReader {
    fn next_event(&mut self) -> Result<Event, ParseError> {
        let mut queue = self.shared.lock();
        loop {
            if queue.shutdown {
                return Err(ParseError::Shutdown);
            }
            if let Some(event) = queue.events.pop_front() {
                drop(queue);
                self.shared.changed.notify_all();
                return Ok(event);
            }
            if queue.finished {
                return Err(queue.failure.take().unwrap_or(ParseError::Exhausted));
            }
            queue = self.shared.wait(queue);
        }
    }
}

impl Drop for EventReader {
    /// Stops the producer without waiting for it
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Body of the producer thread
fn produce<S: CharSource>(shared: &Shared, mut parser: Parser<S>) {
    let _guard = FinishGuard { shared };
    debug!("event producer started");

    loop {
        {
            let mut queue = shared.lock();
            while queue.is_full() && !queue.shutdown {
                trace!("event buffer full, waiting");
                queue = shared.wait(queue);
            }
            if queue.shutdown {
                debug!("event producer stopped by shutdown");
                return;
            }
        }

        // Parsing may block on the source, so it happens outside the lock.
        let result = parser.next_event();

        let mut queue = shared.lock();
        if queue.shutdown {
            debug!("event producer stopped by shutdown");
            return;
        }
        match result {
            Ok(event) => {
                let end = event == Event::End;
                queue.events.push_back(event);
                if end {
                    queue.finished = true;
                }
            }
            Err(err) => {
                warn!("parse failed: {err}");
                queue.failure = Some(err);
                queue.finished = true;
            }
        }
        let finished = queue.finished;
        drop(queue);
        shared.changed.notify_all();

        if finished {
            debug!("event producer finished");
            return;
        }
    }
}

// SPDX-License-Identifier: Apache-2.0

// Prints the event stream of a JSON document, one event per line, indented by
// nesting depth.
//
// Usage: cargo run --example stream_events -- [FILE] [EVENTS_TO_BUFFER]
// Reads stdin when no file is given. Set RUST_LOG=debug to watch the producer.

use std::env;
use std::error::Error;
use std::fs::File;
use std::io;

use staj::{EventReader, PullParser, Utf8Reader};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args.next().filter(|arg| arg != "-");
    let events_to_buffer = match args.next() {
        Some(size) => size.parse()?,
        None => 16,
    };

    let mut reader = match path {
        Some(path) => EventReader::new(Utf8Reader::new(File::open(path)?), events_to_buffer)?,
        None => EventReader::new(Utf8Reader::new(io::stdin()), events_to_buffer)?,
    };

    let mut depth = 0usize;
    while let Some(event) = reader.next() {
        let event = event?;
        if event.is_container_end() {
            depth = depth.saturating_sub(1);
        }
        println!("{}{}", "  ".repeat(depth), event);
        if event.is_container_start() {
            depth += 1;
        }
    }
    println!("end");

    reader.close();
    Ok(())
}

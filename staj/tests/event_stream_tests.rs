// SPDX-License-Identifier: Apache-2.0

// Structural guarantees of the event stream over a set of well-formed documents

use staj::tokenizer::{Token, Tokenizer};
use staj::{Event, EventReader, JsonNumber, Parser, PullParser, StrSource};
use test_log::test;

const DOCUMENTS: &[&str] = &[
    "{}",
    "[]",
    r#"{"a":1}"#,
    r#"[1, -2, 3.25, -0.0, 1e10, 2E-3, 4.5e+6, 0]"#,
    r#"{"nested": {"deeper": [[], [{}], {"x": null}]}}"#,
    r#"[true, false, null, "", "\"\\\/\b\f\n\r\t"]"#,
    r#"{"unicode": "é€😀", "raw": "日本語"}"#,
    "\n\t[ 1 ,\r\n 2 ]  \n",
    r#"{"a":{"b":{"c":{"d":{"e":[1,[2,[3,[4]]]]}}}}}"#,
    r#"[{"k1": "v1", "k2": [1, 2], "k3": {"k4": false}}, 12345678901234567890]"#,
];

fn events(json: &str) -> Vec<Event> {
    let mut parser = Parser::new(StrSource::from(json));
    let mut events = Vec::new();
    loop {
        let event = parser
            .next_event()
            .unwrap_or_else(|err| panic!("{json:?}: {err}"));
        let done = event == Event::End;
        events.push(event);
        if done {
            return events;
        }
    }
}

#[test]
fn test_containers_are_balanced() {
    for json in DOCUMENTS {
        let mut open = Vec::new();
        for event in events(json) {
            match event {
                Event::StartObject | Event::StartArray => open.push(event),
                Event::EndObject => assert_eq!(open.pop(), Some(Event::StartObject), "{json}"),
                Event::EndArray => assert_eq!(open.pop(), Some(Event::StartArray), "{json}"),
                _ => {}
            }
        }
        assert!(open.is_empty(), "{json}");
    }
}

#[test]
fn test_keys_only_in_objects_and_followed_by_values() {
    for json in DOCUMENTS {
        let events = events(json);
        let mut open = Vec::new();
        for (i, event) in events.iter().enumerate() {
            match event {
                Event::StartObject | Event::StartArray => open.push(event.clone()),
                Event::EndObject | Event::EndArray => {
                    open.pop();
                }
                Event::Key(_) => {
                    assert_eq!(open.last(), Some(&Event::StartObject), "{json}");
                    let next = &events[i + 1];
                    assert!(
                        !matches!(next, Event::Key(_) | Event::EndObject | Event::EndArray),
                        "{json}: key followed by {next}"
                    );
                }
                _ => {}
            }
        }
    }
}

#[test]
fn test_object_members_alternate_key_and_value() {
    let events = events(r#"{"a": 1, "b": [2], "c": {"d": null}}"#);
    let keys: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::Key(key) => Some(key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(keys, ["a", "b", "c", "d"]);
}

#[test]
fn test_numbers_keep_their_lexeme() {
    let numbers: Vec<JsonNumber> = events(DOCUMENTS[3])
        .into_iter()
        .filter_map(|event| match event {
            Event::Number(number) => Some(number),
            _ => None,
        })
        .collect();
    let lexemes: Vec<&str> = numbers.iter().map(JsonNumber::as_str).collect();
    assert_eq!(
        lexemes,
        ["1", "-2", "3.25", "-0.0", "1e10", "2E-3", "4.5e+6", "0"]
    );
    assert_eq!(numbers[0].as_i64(), Some(1));
    assert_eq!(numbers[2].as_f64(), Some(3.25));
    assert!(!numbers[4].is_integer());
}

#[test]
fn test_large_integer_is_not_truncated() {
    let last = events(DOCUMENTS[9])
        .into_iter()
        .rev()
        .find_map(|event| match event {
            Event::Number(number) => Some(number),
            _ => None,
        });
    let number = last.unwrap();
    assert_eq!(number.as_str(), "12345678901234567890");
    assert_eq!(number.as_u64(), Some(12345678901234567890));
    assert_eq!(number.as_i64(), None);
}

#[test]
fn test_strings_are_unescaped() {
    assert_eq!(
        events(DOCUMENTS[5])[5],
        Event::string("\"\\/\u{08}\u{0C}\n\r\t")
    );
    let events = events(DOCUMENTS[6]);
    assert_eq!(events[2], Event::string("\u{e9}\u{20ac}\u{1F600}"));
    assert_eq!(events[4], Event::string("日本語"));
}

#[test]
fn test_whitespace_does_not_change_events() {
    assert_eq!(events(DOCUMENTS[7]), events("[1,2]"));
    assert_eq!(
        events("{ \"a\" :\n[ true , { } ] }"),
        events(r#"{"a":[true,{}]}"#)
    );
}

#[test]
fn test_parsing_twice_gives_identical_events() {
    for json in DOCUMENTS {
        assert_eq!(events(json), events(json), "{json}");
    }
}

#[test]
fn test_reader_matches_parser() {
    for json in DOCUMENTS {
        let mut reader = EventReader::new(StrSource::from(*json), 3).unwrap();
        assert_eq!(reader.next_event(), Ok(Event::Start));
        let mut threaded = Vec::new();
        loop {
            let event = reader.next_event().unwrap();
            let done = event == Event::End;
            threaded.push(event);
            if done {
                break;
            }
        }
        assert_eq!(threaded, events(json), "{json}");
        reader.close();
    }
}

#[test]
fn test_tokenizer_end_is_idempotent() {
    let mut tokenizer = Tokenizer::new(StrSource::from("[] "));
    assert_eq!(tokenizer.next_token(), Ok(Token::OpenBracket));
    assert_eq!(tokenizer.next_token(), Ok(Token::CloseBracket));
    for _ in 0..3 {
        assert_eq!(tokenizer.next_token(), Ok(Token::End));
    }
}

// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    collections::HashMap,
    fmt::Debug,
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
    time::SystemTime,
};

use derive_more::From;
use serde::{Deserialize, Serialize};
use tracing::{
    field::{Field, Visit},
    span::Attributes,
    Event, Id, Subscriber,
};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

use crate::tracing::constants;

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveEvent {
    pub timestamp: SystemTime,
    pub kind: MoveEventKind,
}

#[derive(Debug, Serialize, Deserialize, From)]
pub enum MoveEventKind {
    Start(MoveStartEvent),
    Instant(InstantEvent),
    End(MoveEndEvent),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveStartEvent {
    pub id: u64,
    pub source: String,
    pub target: String,
    pub player: String,
    pub turn: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstantEvent {
    pub kind: InstantEventKind,
}

#[derive(Debug, Serialize, Deserialize, From)]
pub enum InstantEventKind {
    Committed(MoveCommittedEvent),
    Rejected(MoveRejectedEvent),
    Check(CheckEvent),
    CheckMate(CheckMateEvent),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveCommittedEvent {
    pub captured: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveRejectedEvent {
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckEvent {
    pub player: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckMateEvent {
    pub winner: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveEndEvent {
    pub id: u64,
}

/// The MoveLogLayer is a Layer that understands the instrumentation in the match controller and writes one JSON
/// object per line for every move attempt, its outcome, and any check or checkmate that followed.
///
/// The first write or flush error is reported on stderr and the log is closed; the match itself carries on.
pub struct MoveLogLayer {
    writer: Box<Mutex<dyn Write + Send + Sync>>,
    failed: AtomicBool,
}

impl MoveLogLayer {
    pub fn new<W: Write + 'static + Send + Sync>(dest: W) -> MoveLogLayer {
        MoveLogLayer {
            writer: Box::new(Mutex::new(dest)),
            failed: AtomicBool::new(false),
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, dyn Write + Send + Sync + 'static> {
        match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn with_writer(&self, write: impl FnOnce(&mut dyn Write) -> io::Result<()>) {
        if self.failed.load(Ordering::Relaxed) {
            return;
        }

        let mut writer = self.lock_writer();
        if let Err(err) = write(&mut *writer) {
            if !self.failed.swap(true, Ordering::Relaxed) {
                eprintln!("move log disabled: {}", err);
            }
        }
    }

    fn record_event<T: Into<MoveEventKind>>(&self, kind: T) {
        let event = MoveEvent {
            timestamp: SystemTime::now(),
            kind: kind.into(),
        };

        self.with_writer(|writer| {
            serde_json::to_writer(&mut *writer, &event)?;
            writeln!(writer)
        });
    }

    fn record_instant_event<T: Into<InstantEventKind>>(&self, kind: T) {
        let event = InstantEvent { kind: kind.into() };
        self.record_event(event);
    }

    fn on_move_enter(&self, attrs: &Attributes<'_>, id: &Id) {
        let mut attrs = attrs.extract_fields();
        let mut take = |key: &str| attrs.remove(key).unwrap_or_default();
        let event = MoveStartEvent {
            id: id.into_u64(),
            source: take("source"),
            target: take("target"),
            player: take("player"),
            turn: take("turn").parse().unwrap_or_default(),
        };
        self.record_event(event);
    }

    fn on_move_exit(&self, id: &Id) {
        self.record_event(MoveEndEvent { id: id.into_u64() });
        self.with_writer(|writer| writer.flush());
    }

    fn on_move_committed(&self, fields: &mut HashMap<String, String>) {
        let captured = fields.remove("captured").filter(|c| c != "-");
        self.record_instant_event(MoveCommittedEvent { captured });
    }

    fn on_move_rejected(&self, fields: &mut HashMap<String, String>) {
        self.record_instant_event(MoveRejectedEvent {
            reason: fields.remove("reason").unwrap_or_default(),
        });
    }

    fn on_check(&self, fields: &mut HashMap<String, String>) {
        self.record_instant_event(CheckEvent {
            player: fields.remove("player").unwrap_or_default(),
        });
    }

    fn on_check_mate(&self, fields: &mut HashMap<String, String>) {
        self.record_instant_event(CheckMateEvent {
            winner: fields.remove("winner").unwrap_or_default(),
        });
    }
}

impl<S: Subscriber> Layer<S> for MoveLogLayer
where
    S: for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        if attrs.metadata().name() == constants::PERFORM_MOVE {
            self.on_move_enter(attrs, id);
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(&id) {
            if span.name() == constants::PERFORM_MOVE {
                self.on_move_exit(&id);
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = event.extract_fields();
        // Not all events have `event` keys (e.g. mundane logs from other modules).
        // Ignore the ones we don't care about.
        let kind = match fields.remove("event") {
            Some(kind) => kind,
            None => return,
        };

        match kind.as_str() {
            constants::MOVE_COMMITTED => self.on_move_committed(&mut fields),
            constants::MOVE_REJECTED => self.on_move_rejected(&mut fields),
            constants::CHECK => self.on_check(&mut fields),
            constants::CHECK_MATE => self.on_check_mate(&mut fields),
            _ => {}
        }
    }
}

trait HasExtractableFields {
    fn extract_fields(&self) -> HashMap<String, String>;
}

impl HasExtractableFields for Attributes<'_> {
    fn extract_fields(&self) -> HashMap<String, String> {
        let mut extractor = HashMapExtractor(HashMap::new());
        self.record(&mut extractor);
        extractor.0
    }
}

impl HasExtractableFields for Event<'_> {
    fn extract_fields(&self) -> HashMap<String, String> {
        let mut extractor = HashMapExtractor(HashMap::new());
        self.record(&mut extractor);
        extractor.0
    }
}

struct HashMapExtractor(HashMap<String, String>);
impl Visit for HashMapExtractor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.0
            .insert(field.name().to_owned(), format!("{:?}", value));
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Write},
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
    };

    use serde_json::Value;
    use tracing_subscriber::prelude::*;

    use super::MoveLogLayer;
    use crate::chess_match::ChessMatch;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// A destination that refuses every write, counting the attempts.
    #[derive(Clone, Default)]
    struct BrokenWriter(Arc<AtomicUsize>);

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record(play: impl FnOnce(&mut ChessMatch)) -> Vec<Value> {
        let buffer = SharedBuffer::default();
        let subscriber = tracing_subscriber::registry().with(MoveLogLayer::new(buffer.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let mut m = ChessMatch::new();
            play(&mut m);
        });

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn instants(events: &[Value]) -> Vec<&Value> {
        events
            .iter()
            .filter_map(|e| e["kind"].get("Instant"))
            .map(|i| &i["kind"])
            .collect()
    }

    #[test]
    fn committed_move() {
        let events = record(|m| {
            m.perform_move_str("e2", "e4").unwrap();
        });

        let start = events[0]["kind"]["Start"].clone();
        assert_eq!("e2", start["source"]);
        assert_eq!("e4", start["target"]);
        assert_eq!("Light", start["player"]);
        assert_eq!(1, start["turn"]);

        let instants = instants(&events);
        assert_eq!(1, instants.len());
        assert_eq!(Value::Null, instants[0]["Committed"]["captured"]);
        assert!(events.last().unwrap()["kind"].get("End").is_some());
    }

    #[test]
    fn rejected_move() {
        let events = record(|m| {
            let _ = m.perform_move_str("e2", "e5");
        });

        let instants = instants(&events);
        assert_eq!(1, instants.len());
        assert_eq!(
            "the chosen piece can't move to the target square",
            instants[0]["Rejected"]["reason"]
        );
    }

    #[test]
    fn captures_and_check() {
        let events = record(|m| {
            let plies = [("e2", "e4"), ("d7", "d5"), ("e4", "d5"), ("d8", "d5"), ("b1", "c3"), ("d5", "e5")];
            for (source, target) in plies {
                m.perform_move_str(source, target).unwrap();
            }
        });

        let instants = instants(&events);
        let captured: Vec<_> = instants
            .iter()
            .filter_map(|i| i.get("Committed"))
            .filter(|c| !c["captured"].is_null())
            .map(|c| c["captured"].clone())
            .collect();
        assert_eq!(vec!["p", "P"], captured);
        assert_eq!("Light", instants[instants.len() - 1]["Check"]["player"]);
    }

    #[test]
    fn fools_mate_is_logged() {
        let events = record(|m| {
            for (source, target) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
                m.perform_move_str(source, target).unwrap();
            }
        });

        let instants = instants(&events);
        assert_eq!("Light", instants[instants.len() - 2]["Check"]["player"]);
        assert_eq!("Dark", instants[instants.len() - 1]["CheckMate"]["winner"]);
    }

    #[test]
    fn broken_destination_stops_logging() {
        let writer = BrokenWriter::default();
        let attempts = writer.0.clone();
        let subscriber = tracing_subscriber::registry().with(MoveLogLayer::new(writer));
        tracing::subscriber::with_default(subscriber, || {
            let mut m = ChessMatch::new();
            m.perform_move_str("e2", "e4").unwrap();
            let after_first_move = attempts.load(Ordering::SeqCst);
            assert!(after_first_move >= 1);

            m.perform_move_str("e7", "e5").unwrap();
            assert_eq!(after_first_move, attempts.load(Ordering::SeqCst));
            assert_eq!(3, m.turn());
        });
    }
}

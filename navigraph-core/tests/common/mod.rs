//! Tracing capture used to assert on index instrumentation.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};
use tracing_subscriber::{Layer, layer::Context};

pub type Fields = BTreeMap<&'static str, String>;

/// A span as it looked when it closed.
#[derive(Debug, Clone)]
pub struct ClosedSpan {
    pub name: &'static str,
    pub fields: Fields,
}

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: Fields,
}

#[derive(Default)]
struct Log {
    open: HashMap<Id, ClosedSpan>,
    closed: Vec<ClosedSpan>,
    events: Vec<CapturedEvent>,
}

/// Layer that keeps every closed span and every event in memory.
#[derive(Clone, Default)]
pub struct RecordingLayer(Arc<Mutex<Log>>);

impl RecordingLayer {
    fn with_log<T>(&self, f: impl FnOnce(&mut Log) -> T) -> T {
        f(&mut self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn spans(&self) -> Vec<ClosedSpan> {
        self.with_log(|log| log.closed.clone())
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.with_log(|log| log.events.clone())
    }
}

impl<S: Subscriber> Layer<S> for RecordingLayer {
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut fields = Fields::new();
        attrs.record(&mut Collect(&mut fields));
        let span = ClosedSpan {
            name: attrs.metadata().name(),
            fields,
        };
        self.with_log(|log| log.open.insert(id.clone(), span));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        self.with_log(|log| {
            if let Some(span) = log.open.get_mut(id) {
                values.record(&mut Collect(&mut span.fields));
            }
        });
    }

    fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
        self.with_log(|log| {
            if let Some(span) = log.open.remove(&id) {
                log.closed.push(span);
            }
        });
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::new();
        event.record(&mut Collect(&mut fields));
        let level = *event.metadata().level();
        self.with_log(|log| log.events.push(CapturedEvent { level, fields }));
    }
}

struct Collect<'a>(&'a mut Fields);

impl Visit for Collect<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name(), format!("{value:?}"));
    }
}

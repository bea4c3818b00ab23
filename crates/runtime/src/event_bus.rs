use foundation::time::Time;

use crate::frame::Frame;

/// Trace event recorded by runtime consumers.
///
/// Structured text keyed by a static `kind`, stamped with the frame it was
/// emitted on so a run can be compared line by line against a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub frame_index: u64,
    pub time: Time,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            time: frame.time,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events of one `kind`, in emission order.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

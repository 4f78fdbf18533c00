use crate::CheckStatus;
use serde::{Deserialize, Serialize};

/// Coarse progress notifications for the caller's UI. The core pushes onto
/// the bus synchronously; the caller drains between phases or after a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    GenerationStarted {
        lvw_total: usize,
        hvw_total: usize,
    },
    GenerationProgress {
        done: usize,
        total: usize,
        percent: u8,
    },
    GenerationFinished {
        tickets: usize,
    },
    PlacementFinished {
        print_tickets: usize,
        hvw_placed: usize,
    },
    CheckFinished {
        name: String,
        status: CheckStatus,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}

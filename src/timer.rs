// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::collections::HashMap;
use std::time::Duration;

#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct EventId(u64);

/// One-shot timeout service provided by the embedder's event loop.
pub trait Scheduler {
    /// Requests a callback `from_now` in the future. Returns a unique ID
    /// used to cancel the scheduled event.
    fn schedule(&mut self, from_now: Duration) -> EventId;
    /// Cancels a previously scheduled event. Unknown IDs are ignored.
    fn cancel(&mut self, id: EventId);
}

/// A timer to schedule and cancel timeouts and retrieve triggered events.
pub struct Timer<E> {
    events: HashMap<EventId, E>,
    scheduler: Box<dyn Scheduler>,
}

impl<E> Timer<E> {
    pub fn new(scheduler: Box<dyn Scheduler>) -> Self {
        Self { events: HashMap::default(), scheduler }
    }

    pub fn triggered(&mut self, event_id: &EventId) -> Option<E> {
        self.events.remove(event_id)
    }

    pub fn schedule_after(&mut self, from_now: Duration, event: E) -> EventId {
        let event_id = self.scheduler.schedule(from_now);
        self.events.insert(event_id, event);
        event_id
    }

    pub fn cancel_event(&mut self, event_id: EventId) {
        self.events.remove(&event_id);
        self.scheduler.cancel(event_id);
    }

    pub fn cancel_all(&mut self) {
        for event_id in self.events.keys() {
            self.scheduler.cancel(*event_id);
        }
        self.events.clear();
    }
}

#[cfg(test)]
pub use test_utils::FakeScheduler;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_cancel_event() {
        #[derive(PartialEq, Eq, Debug, Hash)]
        struct FooEvent(u8);

        let scheduler = FakeScheduler::new();
        let mut timer = Timer::<FooEvent>::new(scheduler.as_scheduler());
        let from_now = Duration::from_secs(5);

        // Verify event triggers no more than once.
        let event_id = timer.schedule_after(from_now, FooEvent(8));
        assert_eq!(timer.triggered(&event_id), Some(FooEvent(8)));
        assert_eq!(timer.triggered(&event_id), None);

        // Verify event does not trigger if it was canceled.
        let event_id = timer.schedule_after(from_now, FooEvent(9));
        timer.cancel_event(event_id);
        assert_eq!(timer.triggered(&event_id), None);
        assert_eq!(scheduler.canceled(), vec![event_id]);

        // Verify multiple events can be scheduled and canceled.
        let event_id_1 = timer.schedule_after(from_now, FooEvent(8));
        let event_id_2 = timer.schedule_after(from_now, FooEvent(9));
        let event_id_3 = timer.schedule_after(from_now, FooEvent(10));
        timer.cancel_event(event_id_2);
        assert_eq!(timer.triggered(&event_id_2), None);
        assert_eq!(timer.triggered(&event_id_3), Some(FooEvent(10)));
        assert_eq!(timer.triggered(&event_id_1), Some(FooEvent(8)));
    }

    #[test]
    fn cancel_all() {
        let scheduler = FakeScheduler::new();
        let mut timer = Timer::<_>::new(scheduler.as_scheduler());
        let from_now = Duration::from_secs(5);

        let event_id_1 = timer.schedule_after(from_now, 8);
        let event_id_2 = timer.schedule_after(from_now, 9);
        timer.cancel_all();
        assert_eq!(timer.triggered(&event_id_1), None);
        assert_eq!(timer.triggered(&event_id_2), None);
        assert_eq!(scheduler.canceled().len(), 2);
    }
}

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

pub const ONE_SEC_MS: u64 = 1000;
pub const ONE_MIN_MS: u64 = 60 * ONE_SEC_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    SessionStarted,
    DriverMatch,
    CountdownTick,
}

/// Entity an event is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSubject {
    Session(Entity),
}

/// Handle to one scheduled event. Handles are unique per clock and never reused,
/// so cancelling a stale handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
    pub timer: TimerId,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp, then kind, then
        // scheduling order.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.kind.cmp(&self.kind))
            .then_with(|| other.timer.cmp(&self.timer))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being processed by the schedule.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

/// Single-threaded event loop: a min-heap of timestamped events in simulation milliseconds.
#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    next_timer: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule_at(
        &mut self,
        timestamp: u64,
        kind: EventKind,
        subject: Option<EventSubject>,
    ) -> TimerId {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let timer = TimerId(self.next_timer);
        self.next_timer += 1;
        self.events.push(Event {
            timestamp,
            kind,
            subject,
            timer,
        });
        timer
    }

    pub fn schedule_in(
        &mut self,
        delay_ms: u64,
        kind: EventKind,
        subject: Option<EventSubject>,
    ) -> TimerId {
        self.schedule_at(self.now.saturating_add(delay_ms), kind, subject)
    }

    pub fn schedule_in_secs(
        &mut self,
        delay_secs: u64,
        kind: EventKind,
        subject: Option<EventSubject>,
    ) -> TimerId {
        self.schedule_in(delay_secs.saturating_mul(ONE_SEC_MS), kind, subject)
    }

    /// Removes a pending event. Returns `true` if the event was still queued.
    pub fn cancel(&mut self, timer: TimerId) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.timer != timer);
        self.events.len() != before
    }

    /// Removes every pending event addressed to `subject`. Returns how many were dropped.
    pub fn cancel_subject(&mut self, subject: EventSubject) -> usize {
        let before = self.events.len();
        self.events.retain(|event| event.subject != Some(subject));
        before - self.events.len()
    }

    pub fn is_pending(&self, timer: TimerId) -> bool {
        self.events.iter().any(|event| event.timer == timer)
    }

    pub fn pending_for(&self, subject: EventSubject) -> usize {
        self.events
            .iter()
            .filter(|event| event.subject == Some(subject))
            .count()
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|event| event.timestamp)
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    /// Moves `now` forward without processing anything. Never moves backwards and never
    /// skips past a pending event.
    pub fn advance_to(&mut self, timestamp: u64) {
        let limit = self.next_event_time().unwrap_or(u64::MAX);
        self.now = self.now.max(timestamp.min(limit));
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(10, EventKind::CountdownTick, None);
        clock.schedule_at(5, EventKind::DriverMatch, None);
        clock.schedule_at(20, EventKind::CountdownTick, None);

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5);
        assert_eq!(clock.now(), 5);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10);
        assert_eq!(clock.now(), 10);

        let third = clock.pop_next().expect("third event");
        assert_eq!(third.timestamp, 20);
        assert_eq!(clock.now(), 20);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn same_timestamp_follows_kind_then_scheduling_order() {
        let mut clock = SimulationClock::default();
        let first_tick = clock.schedule_at(100, EventKind::CountdownTick, None);
        let second_tick = clock.schedule_at(100, EventKind::CountdownTick, None);
        clock.schedule_at(100, EventKind::DriverMatch, None);

        assert_eq!(clock.pop_next().map(|e| e.kind), Some(EventKind::DriverMatch));
        assert_eq!(clock.pop_next().map(|e| e.timer), Some(first_tick));
        assert_eq!(clock.pop_next().map(|e| e.timer), Some(second_tick));
    }

    #[test]
    fn cancel_removes_only_the_named_timer() {
        let mut clock = SimulationClock::default();
        let keep = clock.schedule_in(50, EventKind::CountdownTick, None);
        let drop = clock.schedule_in(10, EventKind::DriverMatch, None);

        assert!(clock.cancel(drop));
        assert!(!clock.cancel(drop), "second cancel is a no-op");
        assert!(clock.is_pending(keep));
        assert_eq!(clock.pop_next().map(|e| e.timer), Some(keep));
    }

    #[test]
    fn advance_to_stops_at_next_pending_event() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(300, EventKind::DriverMatch, None);
        clock.advance_to(1000);
        assert_eq!(clock.now(), 300);

        clock.pop_next();
        clock.advance_to(1000);
        assert_eq!(clock.now(), 1000);
        clock.advance_to(10);
        assert_eq!(clock.now(), 1000, "clock never moves backwards");
    }
}

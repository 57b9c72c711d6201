//! Telemetry: records status transitions and timer activity for every session in the world.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::clock::EventKind;
use crate::ecs::RideStatus;

/// One status change of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransitionRecord {
    pub session: Entity,
    pub from: RideStatus,
    pub to: RideStatus,
    pub at: u64,
}

#[derive(Debug, Default, Resource)]
pub struct SessionTelemetry {
    pub transitions: Vec<StatusTransitionRecord>,
    pub countdown_ticks: u64,
    pub sessions_started: u64,
    pub sessions_cancelled: u64,
    pub match_failures: u64,
    /// Events processed by the runner, per kind.
    pub events_by_kind: HashMap<EventKind, u64>,
}

impl SessionTelemetry {
    pub fn record_event(&mut self, kind: EventKind) {
        *self.events_by_kind.entry(kind).or_insert(0) += 1;
    }

    pub fn record_transition(
        &mut self,
        session: Entity,
        from: RideStatus,
        to: RideStatus,
        at: u64,
    ) {
        self.transitions.push(StatusTransitionRecord {
            session,
            from,
            to,
            at,
        });
    }

    pub fn events_processed(&self) -> u64 {
        self.events_by_kind.values().sum()
    }

    pub fn transitions_for(
        &self,
        session: Entity,
    ) -> impl Iterator<Item = &StatusTransitionRecord> {
        self.transitions
            .iter()
            .filter(move |record| record.session == session)
    }
}

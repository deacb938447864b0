// src/scheduler.rs
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::pipeline::{PassOutcome, Pipeline};

/// Source of scheduler wake-ups.
#[async_trait]
pub trait Trigger: Send {
    /// Wait for the next fire. `false` means the trigger is exhausted and the loop should end.
    async fn fire(&mut self) -> bool;
}

/// Real clock: fires immediately, then every `period`. Never exhausted.
pub struct IntervalTrigger {
    ticker: Interval,
}

impl IntervalTrigger {
    pub fn new(period: Duration) -> Self {
        let mut ticker = interval(period);
        // A pass that overruns pushes the next one back instead of bursting.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { ticker }
    }
}

#[async_trait]
impl Trigger for IntervalTrigger {
    async fn fire(&mut self) -> bool {
        self.ticker.tick().await;
        true
    }
}

/// Fires `n` times back to back. Used by `run-once` and tests.
pub struct CountedTrigger {
    remaining: u64,
}

impl CountedTrigger {
    pub fn new(n: u64) -> Self {
        Self { remaining: n }
    }
}

#[async_trait]
impl Trigger for CountedTrigger {
    async fn fire(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

pub struct Scheduler<T: Trigger> {
    pipeline: Pipeline,
    trigger: T,
    state: watch::Sender<SchedulerState>,
    passes: u64,
    last_outcome: Option<PassOutcome>,
}

impl<T: Trigger> Scheduler<T> {
    pub fn new(pipeline: Pipeline, trigger: T) -> Self {
        Self {
            pipeline,
            trigger,
            state: watch::Sender::new(SchedulerState::Idle),
            passes: 0,
            last_outcome: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Live view of the state, readable from inside a pass.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn last_outcome(&self) -> Option<&PassOutcome> {
        self.last_outcome.as_ref()
    }

    /// Idle → Running on every fire, back to Idle whatever the pass did.
    /// Returns the number of passes run once the trigger is exhausted.
    pub async fn run(&mut self) -> u64 {
        while self.trigger.fire().await {
            self.state.send_replace(SchedulerState::Running);
            self.passes += 1;
            tracing::info!(pass = self.passes, "pass started");

            let outcome = self.pipeline.run_pass().await;

            self.state.send_replace(SchedulerState::Idle);
            tracing::info!(pass = self.passes, outcome = %outcome, "pass finished");
            self.last_outcome = Some(outcome);
        }
        tracing::info!(passes = self.passes, "trigger exhausted, scheduler stopping");
        self.passes
    }
}

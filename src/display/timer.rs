/*
 *  display/timer.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *  (c) 2020-26 Stuart Hunter
 *
 *  Timer facility for auto-advance ticks
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Identifies which arming of the auto-advance timer a tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken {
    pub generation: u64,
}

/// Delivers a one-shot tick back to the thread that owns the controller.
///
/// Ticks must never run concurrently with other controller operations;
/// implementations post them as events on the owner's queue.
pub trait TimerHost {
    /// Arm a one-shot tick
    fn schedule(&mut self, after: Duration, token: TickToken);

    /// Drop the pending tick, if any
    fn cancel(&mut self);
}

/// Timer backed by the tokio runtime
///
/// Each scheduled tick is a sleeping task that posts the token onto the
/// owner's event channel. At most one such task is alive: re-arming or
/// cancelling aborts the previous sleep. A tick already posted before the
/// abort still arrives and is dropped by the scheduler as stale.
pub struct TokioTimer<E> {
    events: UnboundedSender<E>,
    pending: Option<JoinHandle<()>>,
}

impl<E> TokioTimer<E>
where
    E: From<TickToken> + Send + 'static,
{
    pub fn new(events: UnboundedSender<E>) -> Self {
        Self { events, pending: None }
    }

    /// True while a sleep task is waiting to post its tick
    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl<E> TimerHost for TokioTimer<E>
where
    E: From<TickToken> + Send + 'static,
{
    fn schedule(&mut self, after: Duration, token: TickToken) {
        self.cancel();
        let events = self.events.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // receiver gone means we are shutting down
            let _ = events.send(E::from(token));
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl<E> Drop for TokioTimer<E> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

/// Deterministic timer for tests and single-step tooling
///
/// Records what was scheduled; the caller decides when a tick "fires".
#[derive(Debug, Default)]
pub struct ManualTimer {
    pending: Vec<(Duration, TickToken)>,
    total_scheduled: usize,
    cancelled: usize,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks scheduled but not yet fired
    pub fn pending(&self) -> &[(Duration, TickToken)] {
        &self.pending
    }

    /// How many ticks were ever scheduled
    pub fn total_scheduled(&self) -> usize {
        self.total_scheduled
    }

    /// How many times the pending tick was cancelled
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Remove and return the oldest pending tick
    pub fn fire_next(&mut self) -> Option<TickToken> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0).1)
        }
    }
}

impl TimerHost for ManualTimer {
    /// Pending ticks are kept on re-arm so tests can deliver stale ones
    fn schedule(&mut self, after: Duration, token: TickToken) {
        self.total_scheduled += 1;
        self.pending.push((after, token));
    }

    fn cancel(&mut self) {
        self.cancelled += 1;
        self.pending.clear();
    }
}

//! Before/after event correlation
//!
//! One frame is pushed per in-flight decision evaluation and popped by the
//! matching after-event. Frames nest: a decision that depends on other
//! decisions has their frames pushed and popped while its own frame is
//! still open, so pops happen in strict LIFO order when the engine behaves.
//! Bookkeeping anomalies are logged and swallowed; instrumentation must
//! never abort an evaluation.

use crate::event::{AfterDecisionEvent, BeforeDecisionEvent, DecisionHandle};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

/// Bookkeeping record for one in-flight decision evaluation
#[derive(Debug)]
pub struct CorrelationFrame {
    pub token: u64,
    pub decision: DecisionHandle,
    pub started_at: Instant,
}

/// The before/after pairing state machine of one listener
///
/// The elapsed time reported for a pop is always computed from the start
/// instant of the specific before-event the after-event carries, so a
/// parent's after-event can never read a child's start time or vice versa.
#[derive(Debug, Default)]
pub struct MetricsCorrelator {
    frames: Mutex<Vec<CorrelationFrame>>,
}

impl MetricsCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a decision's evaluation started
    pub fn opened(&self, event: &BeforeDecisionEvent) {
        let mut frames = self.frames.lock().unwrap();
        frames.push(CorrelationFrame {
            token: event.token(),
            decision: event.decision().clone(),
            started_at: event.started_at(),
        });
    }

    /// Record that a decision's evaluation ended
    ///
    /// Returns the elapsed time of the pairing, or `None` when no frame
    /// matches the after-event (a duplicate or stray after-event); callers
    /// must not emit an observation in that case.
    pub fn closed(&self, event: &AfterDecisionEvent) -> Option<Duration> {
        let elapsed = event.before().started_at().elapsed();
        let token = event.before().token();

        let mut frames = self.frames.lock().unwrap();
        match frames.last() {
            Some(top) if top.token == token => {
                frames.pop();
                Some(elapsed)
            }
            _ => match frames.iter().rposition(|frame| frame.token == token) {
                Some(position) => {
                    warn!(
                        decision = %event.before().decision().name,
                        "after-event arrived out of LIFO order"
                    );
                    frames.remove(position);
                    Some(elapsed)
                }
                None => {
                    warn!(
                        decision = %event.before().decision().name,
                        "after-event without a matching frame"
                    );
                    None
                }
            },
        }
    }

    /// Drain whatever is left at the end of an evaluation call
    ///
    /// A non-empty stack here means the engine emitted a before-event it
    /// never closed. The leftovers are logged and discarded so a cached
    /// listener starts the next call clean; the number of dropped frames is
    /// returned.
    pub fn completed(&self) -> usize {
        let mut frames = self.frames.lock().unwrap();
        for frame in frames.iter() {
            warn!(
                decision = %frame.decision.name,
                token = frame.token,
                "unmatched before-event at evaluation completion"
            );
        }
        let dropped = frames.len();
        frames.clear();
        dropped
    }

    /// Number of currently open frames
    pub fn depth(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

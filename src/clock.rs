//! Periodic session evaluator.
//!
//! Phase machine: `Active -> Warning (remaining <= threshold) -> Expired
//! (remaining <= 0)`. `Warning -> Active` is reachable only through
//! renewal, which pushes expiry back above the threshold before the next
//! evaluation. The warning event is edge-triggered: once per crossing, not
//! once per tick spent under the threshold.

use chrono::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Warning,
    Expired,
}

/// Events published to monitor subscribers on each evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Regular countdown update with the remaining window.
    Tick { remaining: Duration },
    /// First tick after crossing under the warning threshold.
    Warning { remaining: Duration },
    /// The window elapsed; the holder has been logged out and should be
    /// redirected to the login entry point.
    Expired,
    /// Explicit logout tore the session down.
    LoggedOut,
}

#[derive(Debug)]
pub struct SessionClock {
    warning_threshold: Duration,
    phase: SessionPhase,
}

impl SessionClock {
    pub fn new(warning_threshold: Duration) -> Self {
        Self { warning_threshold, phase: SessionPhase::Active }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Evaluate the remaining window, returning the events to publish.
    pub fn evaluate(&mut self, remaining: Duration) -> Vec<SessionEvent> {
        if remaining <= Duration::zero() {
            self.phase = SessionPhase::Expired;
            return vec![SessionEvent::Expired];
        }
        let mut events = vec![SessionEvent::Tick { remaining }];
        if remaining <= self.warning_threshold {
            if self.phase == SessionPhase::Active {
                events.push(SessionEvent::Warning { remaining });
            }
            self.phase = SessionPhase::Warning;
        } else {
            // Renewal moved expiry back out; re-arm the warning edge.
            self.phase = SessionPhase::Active;
        }
        events
    }

    /// Re-arm after login or teardown.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Active;
    }
}

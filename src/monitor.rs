//! Reactive session monitor: remaining-time badge and expiry warning
//! dialog state. Purely a consumer of clock events; the only state it owns
//! is whether the warning dialog is showing.

use chrono::Duration;

use crate::clock::SessionEvent;
use crate::context::AuthContext;
use crate::error::AppResult;

/// Badge level derived from the remaining window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Caution,
    Warning,
    Expired,
}

#[derive(Debug)]
pub struct SessionMonitor {
    warning_threshold: Duration,
    caution_threshold: Duration,
    remaining: Duration,
    warning_visible: bool,
    session_present: bool,
}

impl SessionMonitor {
    pub fn new(warning_threshold: Duration) -> Self {
        Self {
            warning_threshold,
            caution_threshold: warning_threshold * 2,
            remaining: Duration::zero(),
            warning_visible: false,
            session_present: false,
        }
    }

    pub fn observe(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Tick { remaining } => {
                self.session_present = true;
                self.remaining = *remaining;
                // Renewal pushed the window back out; the prompt is moot.
                if *remaining > self.warning_threshold {
                    self.warning_visible = false;
                }
            }
            SessionEvent::Warning { remaining } => {
                self.session_present = true;
                self.remaining = *remaining;
                self.warning_visible = true;
            }
            SessionEvent::Expired | SessionEvent::LoggedOut => {
                self.session_present = false;
                self.remaining = Duration::zero();
                self.warning_visible = false;
            }
        }
    }

    pub fn warning_visible(&self) -> bool {
        self.warning_visible
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn status(&self) -> SessionStatus {
        if !self.session_present || self.remaining <= Duration::zero() {
            SessionStatus::Expired
        } else if self.remaining <= self.warning_threshold {
            SessionStatus::Warning
        } else if self.remaining <= self.caution_threshold {
            SessionStatus::Caution
        } else {
            SessionStatus::Active
        }
    }

    /// "Extend Session": renew through the tracker's explicit path (which
    /// bypasses the debounce) and dismiss the dialog.
    pub fn extend(&mut self, ctx: &AuthContext) -> AppResult<()> {
        self.extend_at(ctx, chrono::Utc::now())
    }

    pub fn extend_at(&mut self, ctx: &AuthContext, now: chrono::DateTime<chrono::Utc>) -> AppResult<()> {
        ctx.extend_session_at(now)?;
        self.warning_visible = false;
        Ok(())
    }

    /// "Logout Now": tear the session down; the `LoggedOut` event also
    /// clears the dialog for any other observers.
    pub fn logout_now(&mut self, ctx: &AuthContext) {
        ctx.logout();
        self.session_present = false;
        self.remaining = Duration::zero();
        self.warning_visible = false;
    }
}

/// Render remaining time as `M:SS`, clamping at zero.
pub fn format_remaining(d: Duration) -> String {
    let secs = d.num_seconds().max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

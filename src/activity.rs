//! Interaction signals that extend the session window.

use chrono::{DateTime, Duration, Utc};

/// The six tracked interaction signals from the console front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
    Click,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 6] = [
        ActivityKind::PointerDown,
        ActivityKind::PointerMove,
        ActivityKind::KeyPress,
        ActivityKind::Scroll,
        ActivityKind::TouchStart,
        ActivityKind::Click,
    ];

    /// DOM event name the signal corresponds to.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::PointerDown => "mousedown",
            ActivityKind::PointerMove => "mousemove",
            ActivityKind::KeyPress => "keypress",
            ActivityKind::Scroll => "scroll",
            ActivityKind::TouchStart => "touchstart",
            ActivityKind::Click => "click",
        }
    }
}

/// Write-rate limiter for high-frequency signals. Pointer move fires
/// continuously, and persisting on every event would thrash the store.
/// Expiry still reflects the most recent activity within one window of lag.
#[derive(Debug)]
pub struct ActivityDebounce {
    window: Duration,
    last: Option<DateTime<Utc>>,
}

impl ActivityDebounce {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether an event at `now` should be applied. Accepting records `now`
    /// as the new anchor; an event inside the window of the previous
    /// accepted one is dropped.
    pub fn admit(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(prev) = self.last {
            if now - prev < self.window {
                return false;
            }
        }
        self.last = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

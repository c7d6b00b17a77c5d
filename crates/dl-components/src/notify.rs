//! Dashboard notifications with deterministic tick-based expiry.
//!
//! The engine keeps a single "last notification" slot that a dashboard
//! polls between simulation steps. Expiry is counted in simulation ticks
//! rather than wall-clock time so runs stay deterministic and testable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a notification stays visible, in ticks.
///
/// 100 ticks is 5 seconds at the default 50 ms step.
pub const NOTIFICATION_TTL_TICKS: u32 = 100;

/// Severity of a dashboard notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// A single message for the dashboard, alive for `ttl_ticks` more steps.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub ttl_ticks: u32,
}

/// Single-slot notification holder. A newer notification replaces the
/// current one regardless of severity: last message wins.
#[derive(Clone, Debug, Default)]
pub struct NotificationSlot {
    current: Option<Notification>,
}

impl NotificationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a notification with the default TTL.
    pub fn raise(&mut self, message: impl Into<String>, severity: Severity) {
        self.current = Some(Notification {
            message: message.into(),
            severity,
            ttl_ticks: NOTIFICATION_TTL_TICKS,
        });
    }

    /// Age the slot by one simulation tick, dropping an expired message.
    pub fn tick(&mut self) {
        if let Some(n) = self.current.as_mut() {
            if n.ttl_ticks <= 1 {
                self.current = None;
            } else {
                n.ttl_ticks -= 1;
            }
        }
    }

    /// The currently visible notification, if any.
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn has_fresh(&self) -> bool {
        self.current.is_some()
    }

    /// Explicitly dismiss the current notification.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

//! Advisory Notifier Implementation

use dms::Advisory;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Minimum gap before a repeat or a de-escalation is notified (milliseconds)
    pub cooldown_ms: u64,
    /// Consecutive no-evidence inferences before warning about thresholds
    pub no_evidence_warn_after: u32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 30_000,
            no_evidence_warn_after: 30,
        }
    }
}

/// An advisory the driver should be told about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub advisory: Advisory,
    /// Frame timestamp the notification was raised at
    pub at_ms: u64,
    /// Previously notified advisory
    pub previous: Option<Advisory>,
    /// Same advisory repeated after the cooldown
    pub repeat: bool,
}

impl Notification {
    /// More severe than what was notified before
    pub fn is_escalation(&self) -> bool {
        self.previous
            .map_or(true, |previous| self.advisory.is_more_severe_than(previous))
    }

    /// Text to show or speak
    pub fn message(&self) -> String {
        format!("{}: {}", self.advisory.label(), self.advisory.recommendation())
    }
}

/// Turns the per-frame advisory stream into sparse notifications
#[derive(Debug, Clone)]
pub struct AdvisoryNotifier {
    /// Configuration
    config: AlertConfig,
    /// Last notification raised
    last: Option<Notification>,
    /// Whether the last notification was acknowledged
    acknowledged: bool,
    /// Consecutive no-evidence inferences
    no_evidence_streak: u32,
    /// Notifications raised so far
    sent: usize,
}

impl AdvisoryNotifier {
    /// Create a new notifier
    pub fn new(config: AlertConfig) -> Self {
        info!("Creating advisory notifier with config: {:?}", config);
        Self {
            config,
            last: None,
            acknowledged: true,
            no_evidence_streak: 0,
            sent: 0,
        }
    }

    /// Feed one frame's advisory; returns a notification when one is due
    pub fn observe(&mut self, advisory: Advisory, no_evidence: bool, now_ms: u64) -> Option<Notification> {
        self.track_evidence(no_evidence);

        let notification = match self.last {
            None if advisory == Advisory::NormalDriving => None,
            None => Some(Notification {
                advisory,
                at_ms: now_ms,
                previous: None,
                repeat: false,
            }),
            Some(last) => self.follow_up(&last, advisory, now_ms),
        }?;

        self.last = Some(notification);
        self.acknowledged = false;
        self.sent += 1;
        info!(
            advisory = advisory.as_str(),
            previous = ?notification.previous.map(|p| p.as_str()),
            repeat = notification.repeat,
            "{}",
            notification.message()
        );
        Some(notification)
    }

    fn follow_up(&self, last: &Notification, advisory: Advisory, now_ms: u64) -> Option<Notification> {
        let escalation = advisory.is_more_severe_than(last.advisory);
        let cooled_down = now_ms.saturating_sub(last.at_ms) >= self.config.cooldown_ms;
        let repeat = advisory == last.advisory;

        if repeat && advisory == Advisory::NormalDriving {
            return None;
        }
        if !escalation && !cooled_down {
            debug!(
                advisory = advisory.as_str(),
                since_ms = now_ms.saturating_sub(last.at_ms),
                "Notification suppressed: in cooldown period"
            );
            return None;
        }

        Some(Notification {
            advisory,
            at_ms: now_ms,
            previous: Some(last.advisory),
            repeat,
        })
    }

    fn track_evidence(&mut self, no_evidence: bool) {
        if !no_evidence {
            self.no_evidence_streak = 0;
            return;
        }
        self.no_evidence_streak = self.no_evidence_streak.saturating_add(1);
        if self.no_evidence_streak == self.config.no_evidence_warn_after {
            warn!(
                "No fuzzy rule fired for {} consecutive frames, check membership thresholds",
                self.no_evidence_streak
            );
        }
    }

    /// Acknowledge the current notification
    pub fn acknowledge(&mut self) -> bool {
        match self.last {
            Some(last) if !self.acknowledged => {
                self.acknowledged = true;
                info!("Notification acknowledged: {}", last.advisory.as_str());
                true
            }
            _ => false,
        }
    }

    /// Get the pending (unacknowledged) notification
    pub fn pending(&self) -> Option<&Notification> {
        self.last.as_ref().filter(|_| !self.acknowledged)
    }

    /// Last notification raised, acknowledged or not
    pub fn last(&self) -> Option<&Notification> {
        self.last.as_ref()
    }

    /// Consecutive no-evidence inferences
    pub fn no_evidence_streak(&self) -> u32 {
        self.no_evidence_streak
    }

    /// Notifications raised so far
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Forget notification history (on driver change)
    pub fn clear(&mut self) {
        self.last = None;
        self.acknowledged = true;
        self.no_evidence_streak = 0;
    }
}

impl Default for AdvisoryNotifier {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}

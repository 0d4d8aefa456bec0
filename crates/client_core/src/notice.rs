use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

/// Single-slot notification area. Posting replaces whatever is showing; a notice
/// dismisses itself once the display duration has elapsed.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    current: Option<(Notice, Instant)>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn post(&mut self, notice: Notice, now: Instant) {
        self.current = Some((notice, now + self.ttl));
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.current.as_ref().map(|(_, expires_at)| *expires_at)
    }

    pub fn active(&self, now: Instant) -> Option<&Notice> {
        match &self.current {
            Some((notice, expires_at)) if now < *expires_at => Some(notice),
            _ => None,
        }
    }

    /// Drops an expired notice, returning it.
    pub fn sweep(&mut self, now: Instant) -> Option<Notice> {
        match &self.current {
            Some((_, expires_at)) if now >= *expires_at => self.current.take().map(|(n, _)| n),
            _ => None,
        }
    }
}

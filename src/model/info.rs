use std::time::SystemTime;

/// Descriptive data of the event.
///
/// None of these fields influence allocation; `expires_at` is only read by the sweeper.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventInfo {
    pub title: String,
    pub description: String,
    /// Point in time after which the sweeper deletes the event (`None` = never).
    pub expires_at: Option<SystemTime>,
}

impl EventInfo {
    /// Creates info with a title and no expiry.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Attaches a description.
    #[inline]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attaches an expiry instant.
    #[inline]
    pub fn with_expiry(mut self, at: SystemTime) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// True if the event has an expiry and it is not after `now`.
    #[inline]
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

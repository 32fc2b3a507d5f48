use chrono::{DateTime, Local};

/// The most recent successful payload of one panel.
///
/// Replaced wholesale by each successful poll, never patched.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    value: Option<T>,
    revision: u64,
    refreshed_at: Option<DateTime<Local>>,
}

impl<T> ViewState<T> {
    pub(super) fn replaced(value: T, revision: u64) -> Self {
        Self {
            value: Some(value),
            revision,
            refreshed_at: Some(Local::now()),
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }

    /// Sequence number of the request whose response is shown; 0 before the first success.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            value: None,
            revision: 0,
            refreshed_at: None,
        }
    }
}

//! Trailing-edge debounce for search-triggered fetches.
//!
//! Zellij timers carry no identity: `set_timeout` just delivers a `Timer`
//! event later. The debouncer therefore keeps its own deadline and counts the
//! wake-ups it has asked for. Every trigger pushes the deadline out by one
//! window and asks for one more wake-up; a wake-up before the deadline is
//! ignored unless it was the last one outstanding, in which case the
//! remaining time is re-armed.

/// Default quiet window between the last keystroke and the fetch.
pub const DEFAULT_WINDOW_MS: i64 = 500;

/// Result of a timer wake-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wake {
    /// The quiet window closed: fetch with this value.
    Fire(String),
    /// A value is pending but no outstanding timer covers its deadline.
    Rearm {
        /// Milliseconds until the deadline.
        delay_ms: i64,
    },
    /// Nothing to do.
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    value: String,
    deadline_ms: i64,
}

/// Per-controller search debouncer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDebouncer {
    window_ms: i64,
    pending: Option<Pending>,
    armed: u32,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MS)
    }
}

impl SearchDebouncer {
    /// Creates a debouncer with the given quiet window.
    #[must_use]
    pub const fn new(window_ms: i64) -> Self {
        Self {
            window_ms,
            pending: None,
            armed: 0,
        }
    }

    /// Records `value` as the latest search text and restarts the window.
    ///
    /// Returns the delay the caller must schedule a wake-up for.
    pub fn trigger(&mut self, value: String, now_ms: i64) -> i64 {
        self.pending = Some(Pending {
            value,
            deadline_ms: now_ms + self.window_ms,
        });
        self.armed = self.armed.saturating_add(1);
        self.window_ms
    }

    /// Handles one wake-up scheduled by [`trigger`](Self::trigger) or a
    /// previous [`Wake::Rearm`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chart_picker::app::debounce::{SearchDebouncer, Wake};
    ///
    /// let mut debouncer = SearchDebouncer::new(500);
    /// debouncer.trigger("a".to_string(), 0);
    /// debouncer.trigger("ab".to_string(), 100);
    ///
    /// assert_eq!(debouncer.wake(500), Wake::Idle);
    /// assert_eq!(debouncer.wake(600), Wake::Fire("ab".to_string()));
    /// ```
    pub fn wake(&mut self, now_ms: i64) -> Wake {
        self.armed = self.armed.saturating_sub(1);

        let Some(pending) = &self.pending else {
            return Wake::Idle;
        };

        if now_ms >= pending.deadline_ms {
            let value = pending.value.clone();
            self.pending = None;
            return Wake::Fire(value);
        }

        if self.armed == 0 {
            self.armed = 1;
            return Wake::Rearm {
                delay_ms: pending.deadline_ms - now_ms,
            };
        }

        Wake::Idle
    }

    /// Drops any pending value without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

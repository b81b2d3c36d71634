//! Debounced scheduling of re-highlighting passes.
//!
//! The scheduler is a small state machine owned by the editor session:
//!
//! ```text
//!            structural edit              routine edit
//!   Idle ─────────────────────▶ PendingFast   Idle ─────────▶ PendingNormal
//!    ▲                               │          ▲                   │
//!    └──────── timer expiry ─────────┘          └── timer expiry ───┘
//! ```
//!
//! Any edit arriving while a timer is pending replaces it, so a burst of keystrokes produces a
//! single pass once input goes quiet. Paste, cut, undo, redo and replace skip the timer and ask
//! for a pass right away.
//!
//! The scheduler does not own a clock or a timer thread. The host passes `now` in, arms a real
//! timer for the returned deadline, and calls back with the [`TimerToken`] (or simply polls).
//! Tokens of replaced timers are dead: firing them does nothing.

use std::time::{Duration, Instant};

/// Default delay after a structural edit.
pub const DEFAULT_FAST_DELAY: Duration = Duration::from_millis(20);
/// Default delay after a routine edit.
pub const DEFAULT_NORMAL_DELAY: Duration = Duration::from_millis(50);

/// What kind of content change the host observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// A typed character.
    Insert(char),
    /// A line break was inserted.
    Newline,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Clipboard paste.
    Paste,
    /// Clipboard cut.
    Cut,
    /// Host undo.
    Undo,
    /// Host redo.
    Redo,
    /// Search/replace rewrote the buffer.
    Replace,
    /// Cursor movement reported alongside a content touch.
    CursorMove,
}

/// How soon a pass should follow an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Run synchronously, no timer.
    Immediate,
    /// Short debounce.
    Fast,
    /// Regular debounce.
    Normal,
}

impl EditKind {
    /// Returns `true` for edits likely to move token boundaries: line breaks, deletions, and
    /// quote characters (which open or close strings and VB comments).
    pub fn is_structural(self) -> bool {
        match self {
            Self::Newline | Self::Backspace | Self::Delete => true,
            Self::Insert(ch) => matches!(ch, '\n' | '"' | '\''),
            Self::Paste
            | Self::Cut
            | Self::Undo
            | Self::Redo
            | Self::Replace
            | Self::CursorMove => false,
        }
    }

    /// Scheduling class of this edit.
    pub fn urgency(self) -> Urgency {
        match self {
            Self::Paste | Self::Cut | Self::Undo | Self::Redo | Self::Replace => Urgency::Immediate,
            kind if kind.is_structural() => Urgency::Fast,
            _ => Urgency::Normal,
        }
    }
}

/// Debounce delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Delay after a structural edit.
    pub fast_delay: Duration,
    /// Delay after a routine edit.
    pub normal_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fast_delay: DEFAULT_FAST_DELAY,
            normal_delay: DEFAULT_NORMAL_DELAY,
        }
    }
}

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No pass pending.
    Idle,
    /// A pass is pending on the short delay.
    PendingFast,
    /// A pass is pending on the regular delay.
    PendingNormal,
}

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Result of reporting an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// Run a pass now.
    RunNow,
    /// A timer was armed (replacing any previous one).
    Scheduled {
        /// Token to fire when the timer expires.
        token: TimerToken,
        /// When the pass is due.
        deadline: Instant,
    },
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    token: TimerToken,
    deadline: Instant,
    urgency: Urgency,
}

/// Coalesces edit notifications into re-highlighting passes.
#[derive(Debug, Clone)]
pub struct EditScheduler {
    config: SchedulerConfig,
    pending: Option<PendingTimer>,
    next_token: u64,
    passes: u64,
    superseded: u64,
}

impl EditScheduler {
    /// Create an idle scheduler.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            pending: None,
            next_token: 0,
            passes: 0,
            superseded: 0,
        }
    }

    /// Delays in use.
    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Report a content-mutating edit.
    pub fn on_edit(&mut self, kind: EditKind, now: Instant) -> ScheduleDecision {
        let urgency = kind.urgency();
        let delay = match urgency {
            Urgency::Immediate => {
                if self.pending.take().is_some() {
                    self.superseded += 1;
                }
                self.passes += 1;
                tracing::debug!(?kind, "edit requires immediate pass");
                return ScheduleDecision::RunNow;
            }
            Urgency::Fast => self.config.fast_delay,
            Urgency::Normal => self.config.normal_delay,
        };

        if self.pending.is_some() {
            self.superseded += 1;
        }

        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let deadline = now + delay;
        self.pending = Some(PendingTimer {
            token,
            deadline,
            urgency,
        });

        tracing::trace!(?kind, ?urgency, ?delay, "pass scheduled");
        ScheduleDecision::Scheduled { token, deadline }
    }

    /// Timer callback. Returns `true` if `token` is the live timer and a pass must run now.
    ///
    /// The pending handle is cleared before returning, so the pass runs with the scheduler
    /// already idle and free to accept new edits.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                self.passes += 1;
                true
            }
            _ => {
                tracing::trace!(?token, "ignoring stale timer");
                false
            }
        }
    }

    /// Returns `true` (and goes idle) if the pending timer is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(pending) if pending.deadline <= now => self.fire(pending.token),
            _ => false,
        }
    }

    /// Drop the pending timer, if any.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.superseded += 1;
        }
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        match self.pending.map(|p| p.urgency) {
            None | Some(Urgency::Immediate) => SchedulerState::Idle,
            Some(Urgency::Fast) => SchedulerState::PendingFast,
            Some(Urgency::Normal) => SchedulerState::PendingNormal,
        }
    }

    /// When the pending pass is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Passes handed out so far (immediate and timer-driven).
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Timers that were replaced or cancelled before firing.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

impl Default for EditScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_edit_classification() {
        assert_eq!(EditKind::Insert('a').urgency(), Urgency::Normal);
        assert_eq!(EditKind::CursorMove.urgency(), Urgency::Normal);
        assert_eq!(EditKind::Insert('"').urgency(), Urgency::Fast);
        assert_eq!(EditKind::Insert('\'').urgency(), Urgency::Fast);
        assert_eq!(EditKind::Insert('\n').urgency(), Urgency::Fast);
        assert_eq!(EditKind::Newline.urgency(), Urgency::Fast);
        assert_eq!(EditKind::Backspace.urgency(), Urgency::Fast);
        assert_eq!(EditKind::Delete.urgency(), Urgency::Fast);
        for kind in [
            EditKind::Paste,
            EditKind::Cut,
            EditKind::Undo,
            EditKind::Redo,
            EditKind::Replace,
        ] {
            assert_eq!(kind.urgency(), Urgency::Immediate);
        }
    }

    #[test]
    fn test_routine_edit_waits_for_normal_delay() {
        let mut scheduler = EditScheduler::default();
        let t0 = Instant::now();

        let decision = scheduler.on_edit(EditKind::Insert('x'), t0);
        assert_eq!(scheduler.state(), SchedulerState::PendingNormal);
        let ScheduleDecision::Scheduled { deadline, .. } = decision else {
            panic!("expected a timer");
        };
        assert_eq!(deadline, t0 + DEFAULT_NORMAL_DELAY);

        assert!(!scheduler.poll(t0 + ms(49)));
        assert!(scheduler.poll(t0 + ms(50)));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.passes(), 1);
        assert!(!scheduler.poll(t0 + ms(500)));
    }

    #[test]
    fn test_structural_edit_uses_fast_delay() {
        let mut scheduler = EditScheduler::default();
        let t0 = Instant::now();

        scheduler.on_edit(EditKind::Backspace, t0);
        assert_eq!(scheduler.state(), SchedulerState::PendingFast);
        assert_eq!(scheduler.next_deadline(), Some(t0 + DEFAULT_FAST_DELAY));
    }

    #[test]
    fn test_burst_coalesces_into_one_pass() {
        let mut scheduler = EditScheduler::default();
        let t0 = Instant::now();

        for i in 0..10 {
            scheduler.on_edit(EditKind::Insert('a'), t0 + ms(i * 10));
            assert!(!scheduler.poll(t0 + ms(i * 10 + 5)));
        }

        // Last edit at 90ms; due at 140ms.
        assert!(!scheduler.poll(t0 + ms(139)));
        assert!(scheduler.poll(t0 + ms(140)));
        assert_eq!(scheduler.passes(), 1);
        assert_eq!(scheduler.superseded(), 9);
    }

    #[test]
    fn test_replaced_timer_token_never_fires() {
        let mut scheduler = EditScheduler::default();
        let t0 = Instant::now();

        let ScheduleDecision::Scheduled { token: first, .. } =
            scheduler.on_edit(EditKind::Insert('a'), t0)
        else {
            panic!("expected a timer");
        };
        let ScheduleDecision::Scheduled { token: second, .. } =
            scheduler.on_edit(EditKind::Insert('b'), t0 + ms(5))
        else {
            panic!("expected a timer");
        };

        assert!(!scheduler.fire(first));
        assert_eq!(scheduler.state(), SchedulerState::PendingNormal);
        assert!(scheduler.fire(second));
        assert!(!scheduler.fire(second));
        assert_eq!(scheduler.passes(), 1);
    }

    #[test]
    fn test_immediate_edit_cancels_pending_timer() {
        let mut scheduler = EditScheduler::default();
        let t0 = Instant::now();

        let ScheduleDecision::Scheduled { token, .. } =
            scheduler.on_edit(EditKind::Insert('a'), t0)
        else {
            panic!("expected a timer");
        };
        assert_eq!(scheduler.on_edit(EditKind::Paste, t0), ScheduleDecision::RunNow);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.next_deadline(), None);
        assert!(!scheduler.fire(token));
        assert_eq!(scheduler.passes(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = EditScheduler::new(SchedulerConfig {
            fast_delay: ms(1),
            normal_delay: ms(2),
        });
        let t0 = Instant::now();
        scheduler.on_edit(EditKind::Delete, t0);
        scheduler.cancel();
        assert!(!scheduler.poll(t0 + ms(10)));
        assert_eq!(scheduler.passes(), 0);
    }
}

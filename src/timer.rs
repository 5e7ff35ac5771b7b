//! Wall-clock timers with cancelable handles.
//!
//! Replaces free-running interval/timeout callbacks: every timer is owned by a
//! [`Scheduler`], fires only from [`Scheduler::advance`], and a cancelled or
//! cleared handle is guaranteed never to fire afterwards.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One-second countdown step.
    Countdown,
    /// End of the combo window.
    ComboExpiry,
}

#[derive(Clone, Debug)]
struct Timer {
    id: u64,
    kind: TimerKind,
    due: f64,
    period: Option<f64>,
    // Time left until due while suspended.
    suspended: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn once(&mut self, now: f64, delay: f64, kind: TimerKind) -> TimerHandle {
        self.insert(kind, now + delay, None)
    }

    pub fn repeating(&mut self, now: f64, period: f64, kind: TimerKind) -> TimerHandle {
        self.insert(kind, now + period, Some(period))
    }

    fn insert(&mut self, kind: TimerKind, due: f64, period: Option<f64>) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(Timer { id, kind, due, period, suspended: None });
        TimerHandle(id)
    }

    /// Returns whether the handle was still live.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != handle.0);
        self.timers.len() != before
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.id == handle.0)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Freezes a timer, keeping the time it had left.
    pub fn suspend(&mut self, handle: TimerHandle, now: f64) {
        if let Some(t) = self.timers.iter_mut().find(|t| t.id == handle.0) {
            if t.suspended.is_none() {
                t.suspended = Some((t.due - now).max(0.0));
            }
        }
    }

    pub fn resume(&mut self, handle: TimerHandle, now: f64) {
        if let Some(t) = self.timers.iter_mut().find(|t| t.id == handle.0) {
            if let Some(left) = t.suspended.take() {
                t.due = now + left;
            }
        }
    }

    /// Fires everything due at `now`, earliest first. Repeating timers that
    /// fell behind fire once per missed period.
    pub fn advance(&mut self, now: f64) -> Vec<TimerKind> {
        let mut fired: Vec<(f64, u64, TimerKind)> = Vec::new();
        self.timers.retain_mut(|t| {
            if t.suspended.is_some() {
                return true;
            }
            while t.due <= now {
                fired.push((t.due, t.id, t.kind));
                match t.period {
                    Some(period) if period > 0.0 => t.due += period,
                    _ => return false,
                }
            }
            true
        });
        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, kind)| kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once() {
        let mut timers = Scheduler::new();
        let h = timers.once(0.0, 4.0, TimerKind::ComboExpiry);
        assert!(timers.advance(3.5).is_empty());
        assert_eq!(timers.advance(4.0), vec![TimerKind::ComboExpiry]);
        assert!(timers.advance(10.0).is_empty());
        assert!(!timers.is_active(h));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = Scheduler::new();
        let h = timers.repeating(0.0, 1.0, TimerKind::Countdown);
        assert!(timers.cancel(h));
        assert!(!timers.cancel(h), "second cancel is a no-op");
        assert!(timers.advance(100.0).is_empty());
    }

    #[test]
    fn repeating_catches_up_in_order() {
        let mut timers = Scheduler::new();
        timers.repeating(0.0, 1.0, TimerKind::Countdown);
        timers.once(0.0, 1.5, TimerKind::ComboExpiry);
        assert_eq!(
            timers.advance(3.0),
            vec![TimerKind::Countdown, TimerKind::ComboExpiry, TimerKind::Countdown, TimerKind::Countdown]
        );
    }

    #[test]
    fn suspend_preserves_remaining_time() {
        let mut timers = Scheduler::new();
        let h = timers.repeating(0.0, 1.0, TimerKind::Countdown);
        timers.suspend(h, 0.25);
        assert!(timers.advance(50.0).is_empty());
        timers.resume(h, 50.0);
        assert!(timers.advance(50.5).is_empty());
        assert_eq!(timers.advance(50.75), vec![TimerKind::Countdown]);
    }
}

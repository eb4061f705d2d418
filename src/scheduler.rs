use std::time::{Duration, Instant};

pub const WEEKDAY_CHECK_INTERVAL: Duration = Duration::from_secs(60);
pub const TOPMOST_CHECK_INTERVAL: Duration = Duration::from_secs(1);
pub const PIXEL_SHIFT_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    WeekdayCheck,
    TopmostCheck,
    PixelShift,
}

#[derive(Debug, Clone)]
struct Periodic {
    task: Task,
    interval: Duration,
    next: Instant,
}

/// Cooperative scheduler polled from the UI event loop. Each task fires at
/// most once per poll even if several intervals were missed.
#[derive(Debug, Clone)]
pub struct Scheduler {
    tasks: Vec<Periodic>,
}

impl Scheduler {
    /// The overlay's three periodic tasks. Weekday and topmost checks are due
    /// immediately, the pixel shift after its first interval.
    pub fn new(now: Instant) -> Self {
        Self {
            tasks: vec![
                Periodic {
                    task: Task::WeekdayCheck,
                    interval: WEEKDAY_CHECK_INTERVAL,
                    next: now,
                },
                Periodic {
                    task: Task::TopmostCheck,
                    interval: TOPMOST_CHECK_INTERVAL,
                    next: now,
                },
                Periodic {
                    task: Task::PixelShift,
                    interval: PIXEL_SHIFT_INTERVAL,
                    next: now + PIXEL_SHIFT_INTERVAL,
                },
            ],
        }
    }

    /// Tasks due at `now`, in registration order. Their deadlines move one
    /// interval past `now`.
    pub fn due(&mut self, now: Instant) -> Vec<Task> {
        let mut due = Vec::new();
        for periodic in &mut self.tasks {
            if now >= periodic.next {
                due.push(periodic.task);
                periodic.next = now + periodic.interval;
            }
        }
        due
    }

    /// Time until the earliest deadline.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.tasks
            .iter()
            .map(|p| p.next.saturating_duration_since(now))
            .min()
            .unwrap_or(TOPMOST_CHECK_INTERVAL)
    }
}

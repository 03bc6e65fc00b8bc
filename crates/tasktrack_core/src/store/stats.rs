//! Derived progress statistics.
//!
//! # Invariants
//! - `completed + pending == total`.
//! - All percentages are zero when `total == 0`.
//! - Each percentage is `count / total * 100` rounded half-to-even to one
//!   decimal, so `percent_completed + percent_pending == 100` when `total > 0`.
//! - `percent_overdue <= percent_pending`.

use crate::model::task::{Task, TaskLabel};
use chrono::NaiveDate;

const TENTHS_PER_WHOLE: u64 = 1000;

/// Aggregate counts and percentages for one reference date.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub due_today: usize,
    /// Rounded to one decimal place.
    pub percent_completed: f64,
    /// Rounded to one decimal place.
    pub percent_pending: f64,
    /// Rounded to one decimal place.
    pub percent_overdue: f64,
}

impl TaskStats {
    /// Computes statistics over `tasks` as of `as_of`.
    pub fn compute(tasks: &[Task], as_of: NaiveDate) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            match task.label(as_of) {
                TaskLabel::Completed => stats.completed += 1,
                TaskLabel::Overdue => stats.overdue += 1,
                TaskLabel::DueToday => stats.due_today += 1,
                TaskLabel::Normal => {}
            }
        }
        stats.pending = stats.total - stats.completed;

        if stats.total == 0 {
            return stats;
        }

        stats.percent_completed = rounded_percent(stats.completed, stats.total);
        stats.percent_pending = rounded_percent(stats.pending, stats.total);
        stats.percent_overdue = rounded_percent(stats.overdue, stats.total);
        stats
    }

    /// Whole-number completion percent (floor), suitable for a progress bar.
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        // completed <= total, so the quotient is at most 100.
        (self.completed * 100 / self.total) as u8
    }

    /// One-line human summary, e.g. `2/3 tasks completed (66.7%)`.
    pub fn summary_line(&self) -> String {
        format!(
            "{}/{} tasks completed ({:.1}%)",
            self.completed, self.total, self.percent_completed
        )
    }
}

/// `count / total * 100` to one decimal place.
fn rounded_percent(count: usize, total: usize) -> f64 {
    share_in_tenths(count, total) as f64 / 10.0
}

/// `count / total` in tenths of a percent, rounded half-to-even.
///
/// Works on the exact remainder so ties for `count` and `total - count`
/// round in opposite directions and the pair sums to 1000.
fn share_in_tenths(count: usize, total: usize) -> u64 {
    let scaled = count as u64 * TENTHS_PER_WHOLE;
    let total = total as u64;
    let quotient = scaled / total;
    let twice_remainder = (scaled % total) * 2;
    if twice_remainder > total || (twice_remainder == total && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::{share_in_tenths, TaskStats};
    use crate::model::task::{NewTask, Task};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tasks(done_flags: &[bool]) -> Vec<Task> {
        done_flags
            .iter()
            .map(|done| {
                let mut task = Task::new(NewTask::titled("t")).unwrap();
                task.done = *done;
                task
            })
            .collect()
    }

    #[test]
    fn share_rounds_half_to_even() {
        assert_eq!(share_in_tenths(1, 3), 333);
        assert_eq!(share_in_tenths(2, 3), 667);
        assert_eq!(share_in_tenths(1, 400), 2);
        assert_eq!(share_in_tenths(399, 400), 998);
        assert_eq!(share_in_tenths(3, 16), 188);
        assert_eq!(share_in_tenths(13, 16), 812);
        assert_eq!(share_in_tenths(4, 4), 1000);
    }

    #[test]
    fn empty_list_has_all_zero_stats() {
        let stats = TaskStats::compute(&[], date(2024, 6, 1));
        assert_eq!(stats, TaskStats::default());
        assert_eq!(stats.progress_percent(), 0);
    }

    #[test]
    fn tie_rounding_keeps_each_percent_on_its_own_count() {
        let as_of = date(2024, 6, 1);
        let mut all = tasks(&[true]);
        for _ in 0..399 {
            all.push(Task::new(NewTask::titled("late").with_deadline(date(2024, 1, 1))).unwrap());
        }
        let stats = TaskStats::compute(&all, as_of);

        assert_eq!(stats.overdue, 399);
        assert_eq!(stats.percent_completed, 0.2);
        assert_eq!(stats.percent_pending, 99.8);
        assert_eq!(stats.percent_overdue, 99.8);
        assert_eq!(stats.completed + stats.pending, stats.total);
    }

    #[test]
    fn progress_and_summary_follow_completion() {
        let stats = TaskStats::compute(&tasks(&[true, true, false]), date(2024, 6, 1));
        assert_eq!(stats.progress_percent(), 66);
        assert_eq!(stats.summary_line(), "2/3 tasks completed (66.7%)");
    }
}

//! Project completion progress.
//!
//! A project's `progress` column is a derived aggregate of its steps and is
//! only ever written with the value returned by [`compute_progress`].

use crate::types::Timestamp;

/// Upper bound of the progress percentage.
pub const MAX_PROGRESS: i32 = 100;

/// Compute a project's completion percentage from its steps' completion flags.
///
/// Returns `0` for an empty list, otherwise `round(100 * completed / total)`
/// with ties rounding up. The result is always within `0..=100`.
pub fn compute_progress<I>(completion_flags: I) -> i32
where
    I: IntoIterator<Item = bool>,
{
    let (total, completed) = completion_flags
        .into_iter()
        .fold((0u64, 0u64), |(total, completed), done| {
            (total + 1, completed + u64::from(done))
        });

    if total == 0 {
        return 0;
    }

    // Integer round-half-up of 100 * completed / total.
    let pct = (200 * completed + total) / (2 * total);
    pct.min(MAX_PROGRESS as u64) as i32
}

/// The `completed_at` value a step must carry for the given completion flag.
///
/// `completed_at` is set if and only if the step is completed.
pub fn completion_timestamp(completed: bool, now: Timestamp) -> Option<Timestamp> {
    completed.then_some(now)
}

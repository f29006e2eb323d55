//! Lock ordering for account rows.
//!
//! A transfer updates two account rows inside one database transaction and
//! each `UPDATE` holds its row lock until commit. Two transfers touching the
//! same pair in opposite directions would deadlock if each locked its own
//! source first. Every transfer therefore locks the lower id first.

/// Returns the two account ids in the order their rows must be locked.
#[must_use]
pub fn lock_order(a: i64, b: i64) -> (i64, i64) {
    (a.min(b), a.max(b))
}

//! Presence and completeness counters of diff nodes.
//!
//! Every node carries two tiers of counts. The *partial* tier (`present`, `missing`, ...)
//! describes the node's own level: the classification of its direct children, its own
//! warnings, and the TODO markers found on its direct children. The *total* tier
//! (`present_total`, ...) describes the node's whole subtree. A node seals its level once by
//! promoting its partial counts into its totals ([`Counters::add_partial_to_total`]), and its
//! parent absorbs the sealed subtree with [`Counters::add_total_to_total`].

use std::ops::AddAssign;

/// Counts of one diff node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Counters {
    /// Direct children found on both sides
    pub present: u32,
    /// Direct children only in the reference
    pub missing: u32,
    /// Direct children only in the target
    pub extra: u32,
    /// Direct children carrying a TODO marker
    pub todo: u32,
    /// Warnings reported on this node
    pub warning: u32,
    /// Subtree present count
    pub present_total: u32,
    /// Subtree missing count
    pub missing_total: u32,
    /// Subtree extra count
    pub extra_total: u32,
    /// Subtree TODO count
    pub todo_total: u32,
    /// Subtree warning count
    pub warning_total: u32,
    /// Subtree error count
    pub error_total: u32,
}

impl Counters {
    /// Sum `other`'s partial counts into both tiers of `self`.
    pub fn add_partial_to_partial(&mut self, other: &Counters) {
        self.present += other.present;
        self.missing += other.missing;
        self.extra += other.extra;
        self.todo += other.todo;
        self.warning += other.warning;
        self.add_partial_to_total(other);
    }

    /// Sum `other`'s partial counts into the totals of `self`.
    pub fn add_partial_to_total(&mut self, other: &Counters) {
        self.present_total += other.present;
        self.missing_total += other.missing;
        self.extra_total += other.extra;
        self.todo_total += other.todo;
        self.warning_total += other.warning;
    }

    /// Re-expose `other`'s totals as partial counts of `self`, and sum them into the totals.
    pub fn add_total_to_partial(&mut self, other: &Counters) {
        self.present += other.present_total;
        self.missing += other.missing_total;
        self.extra += other.extra_total;
        self.todo += other.todo_total;
        self.warning += other.warning_total;
        self.add_total_to_total(other);
    }

    /// Sum `other`'s totals into the totals of `self`.
    pub fn add_total_to_total(&mut self, other: &Counters) {
        self.present_total += other.present_total;
        self.missing_total += other.missing_total;
        self.extra_total += other.extra_total;
        self.todo_total += other.todo_total;
        self.warning_total += other.warning_total;
        self.error_total += other.error_total;
    }

    /// Present children without a TODO marker.
    #[must_use]
    pub fn ok(&self) -> u32 {
        self.present.saturating_sub(self.todo)
    }

    /// Subtree variant of [`Counters::ok`].
    #[must_use]
    pub fn ok_total(&self) -> u32 {
        self.present_total.saturating_sub(self.todo_total)
    }

    /// Children expected by the reference.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.present + self.missing
    }

    /// Subtree variant of [`Counters::total`].
    #[must_use]
    pub fn abs_total(&self) -> u32 {
        self.present_total + self.missing_total
    }

    /// Completeness of this level in percent; 0 when nothing is expected.
    #[must_use]
    pub fn complete(&self) -> u32 {
        percent(self.ok(), self.total())
    }

    /// Completeness of the subtree in percent; 0 when nothing is expected.
    #[must_use]
    pub fn complete_total(&self) -> u32 {
        percent(self.ok_total(), self.abs_total())
    }

    /// `true` when no count is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Counters::default()
    }
}

impl AddAssign<&Counters> for Counters {
    /// Field-wise sum of both tiers.
    fn add_assign(&mut self, other: &Counters) {
        self.present += other.present;
        self.missing += other.missing;
        self.extra += other.extra;
        self.todo += other.todo;
        self.warning += other.warning;
        self.add_total_to_total(other);
    }
}

fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let value = u64::from(part) * 100 / u64::from(whole);
    // part never exceeds whole for counters built by the engine
    value.min(100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(present: u32, missing: u32, extra: u32, todo: u32, warning: u32) -> Counters {
        Counters {
            present,
            missing,
            extra,
            todo,
            warning,
            ..Default::default()
        }
    }

    #[test]
    fn partial_into_partial_feeds_both_tiers() {
        let mut parent = level(1, 0, 0, 0, 0);
        parent.add_partial_to_partial(&level(2, 1, 3, 1, 4));
        assert_eq!(parent.present, 3);
        assert_eq!(parent.missing, 1);
        assert_eq!(parent.extra, 3);
        assert_eq!(parent.present_total, 2);
        assert_eq!(parent.warning_total, 4);
        assert_eq!(parent.error_total, 0);
    }

    #[test]
    fn total_into_partial_reexposes_subtree() {
        let mut child = level(2, 2, 0, 1, 0);
        let own = child;
        child.add_partial_to_total(&own);
        child.error_total = 1;

        let mut summary = Counters::default();
        summary.add_total_to_partial(&child);
        assert_eq!(summary.present, 2);
        assert_eq!(summary.missing, 2);
        assert_eq!(summary.todo, 1);
        assert_eq!(summary.present_total, 2);
        assert_eq!(summary.error_total, 1);
    }

    #[test]
    fn completeness() {
        let counters = level(3, 1, 5, 1, 0);
        assert_eq!(counters.ok(), 2);
        assert_eq!(counters.total(), 4);
        assert_eq!(counters.complete(), 50);

        let empty = Counters::default();
        assert_eq!(empty.complete(), 0);
        assert_eq!(empty.complete_total(), 0);
        assert!(empty.is_empty());

        let skewed = level(1, 0, 0, 3, 0);
        assert_eq!(skewed.ok(), 0);
        assert_eq!(skewed.complete(), 0);
    }

    #[test]
    fn add_assign_sums_everything() {
        let mut a = level(1, 1, 1, 1, 1);
        a.present_total = 5;
        let mut b = level(2, 0, 0, 0, 0);
        b.error_total = 2;
        a += &b;
        assert_eq!(a.present, 3);
        assert_eq!(a.present_total, 5);
        assert_eq!(a.error_total, 2);
    }
}

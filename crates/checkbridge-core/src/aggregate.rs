//! Merge both status sources into one grouped view and derive the overall status.

use crate::status::{CheckRunEntry, LegacyStatus, Status, StatusRecord};

/// Records of one poll cycle grouped by status.
///
/// Groups keep the order in which their status first appeared, and records
/// keep fetch order within a group. A `Checks` value is built once per poll
/// cycle and never merged with another cycle's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checks {
    groups: Vec<(Status, Vec<StatusRecord>)>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, record: StatusRecord) {
        match self.groups.iter_mut().find(|(status, _)| *status == record.status) {
            Some((_, records)) => records.push(record),
            None => self.groups.push((record.status, vec![record])),
        }
    }

    /// No records at all: the provider has nothing to report yet.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }

    /// Records sharing `status`, in fetch order.
    pub fn get(&self, status: Status) -> &[StatusRecord] {
        self.groups
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, records)| records.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, status: Status) -> bool {
        !self.get(status).is_empty()
    }

    /// Statuses present, in first-appearance order.
    pub fn statuses(&self) -> impl Iterator<Item = Status> + '_ {
        self.groups.iter().map(|(status, _)| *status)
    }

    /// Every record, group by group.
    pub fn iter(&self) -> impl Iterator<Item = &StatusRecord> {
        self.groups.iter().flat_map(|(_, records)| records.iter())
    }

    /// Overall status with fixed precedence Failure > InProgress > Success.
    ///
    /// Returns `None` for an empty set: no data is not success.
    pub fn overall_status(&self) -> Option<Status> {
        if self.is_empty() {
            None
        } else if self.contains(Status::Failure) {
            Some(Status::Failure)
        } else if self.contains(Status::InProgress) {
            Some(Status::InProgress)
        } else {
            Some(Status::Success)
        }
    }
}

impl FromIterator<StatusRecord> for Checks {
    fn from_iter<I: IntoIterator<Item = StatusRecord>>(iter: I) -> Self {
        let mut checks = Checks::new();
        for record in iter {
            checks.insert(record);
        }
        checks
    }
}

/// Normalize one cycle's raw entries into `Checks`.
///
/// Legacy statuses come first, then check runs, each in input order. The
/// check run named `self_check_name` is dropped. Entries describing the same
/// check in both sources are kept as separate rows.
pub fn normalize(
    legacy: &[LegacyStatus],
    check_runs: &[CheckRunEntry],
    self_check_name: &str,
) -> Checks {
    let legacy_records = legacy.iter().map(StatusRecord::from_legacy);
    let run_records = check_runs
        .iter()
        .filter(|run| run.name != self_check_name)
        .map(StatusRecord::from_check_run);

    legacy_records.chain(run_records).collect()
}

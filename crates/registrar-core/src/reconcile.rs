//! Bulk batch reconciliation.
//!
//! A bulk update or delete names a list of IDs. Before anything is written the
//! list is split into the IDs that exist (the targets) and the ones that do
//! not. A batch with any missing ID is refused as a whole, and the error names
//! exactly the missing IDs.
//!
//! Storage access goes through [`ExistenceLookup`] so the rule itself can be
//! exercised without a database. The Postgres implementation locks the rows it
//! finds, which keeps them from disappearing before the batch commits.

use std::collections::{BTreeSet, HashSet};
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;

use serde::Serialize;

use crate::errors::AppError;

/// Answers "which of these IDs exist?" for one entity table.
pub trait ExistenceLookup<Id> {
    fn existing_ids(
        &mut self,
        ids: &[Id],
    ) -> impl Future<Output = Result<HashSet<Id>, AppError>> + Send;
}

impl<Id> ExistenceLookup<Id> for HashSet<Id>
where
    Id: Copy + Eq + Hash + Send,
{
    fn existing_ids(
        &mut self,
        ids: &[Id],
    ) -> impl Future<Output = Result<HashSet<Id>, AppError>> + Send {
        let found = ids.iter().filter(|id| self.contains(*id)).copied().collect();
        std::future::ready(Ok(found))
    }
}

/// Outcome of matching a requested batch against storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan<Id> {
    targets: Vec<Id>,
    missing: Vec<Id>,
}

impl<Id> BatchPlan<Id>
where
    Id: Copy + Ord + Hash,
{
    /// Targets keep request order with duplicates dropped; missing IDs are
    /// deduplicated and ascending.
    pub fn new(requested: &[Id], existing: &HashSet<Id>) -> Self {
        let mut seen = HashSet::with_capacity(requested.len());
        let mut targets = Vec::with_capacity(requested.len());
        let mut missing = BTreeSet::new();

        for id in requested {
            if !existing.contains(id) {
                missing.insert(*id);
            } else if seen.insert(*id) {
                targets.push(*id);
            }
        }

        Self {
            targets,
            missing: missing.into_iter().collect(),
        }
    }

    pub fn targets(&self) -> &[Id] {
        &self.targets
    }

    pub fn missing(&self) -> &[Id] {
        &self.missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Returns the targets, or a 404 naming the missing IDs.
    pub fn into_targets(self, label: &str) -> Result<Vec<Id>, AppError>
    where
        Id: Display + Serialize,
    {
        if self.is_complete() {
            Ok(self.targets)
        } else {
            Err(AppError::missing_ids(label, &self.missing))
        }
    }
}

/// Looks up `requested` and returns the distinct targets in request order.
///
/// Fails without side effects when any requested ID is absent.
pub async fn reconcile<Id, L>(
    lookup: &mut L,
    requested: &[Id],
    label: &str,
) -> Result<Vec<Id>, AppError>
where
    Id: Copy + Ord + Hash + Display + Serialize,
    L: ExistenceLookup<Id>,
{
    let existing = lookup.existing_ids(requested).await?;
    BatchPlan::new(requested, &existing).into_targets(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn store(ids: &[i64]) -> HashSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_plan_all_present() {
        let plan = BatchPlan::new(&[3, 1, 2], &store(&[1, 2, 3, 4]));
        assert!(plan.is_complete());
        assert_eq!(plan.targets(), &[3, 1, 2]);
        assert!(plan.missing().is_empty());
    }

    #[test]
    fn test_plan_reports_exactly_missing() {
        let plan = BatchPlan::new(&[1, 2, 999], &store(&[1, 2]));
        assert!(!plan.is_complete());
        assert_eq!(plan.missing(), &[999]);
        assert_eq!(plan.targets(), &[1, 2]);
    }

    #[test]
    fn test_plan_dedups_targets_and_missing() {
        let plan = BatchPlan::new(&[5, 7, 5, 42, 7, 42, 8], &store(&[5, 7]));
        assert_eq!(plan.targets(), &[5, 7]);
        assert_eq!(plan.missing(), &[8, 42]);
    }

    #[test]
    fn test_plan_empty_request() {
        let plan = BatchPlan::<i64>::new(&[], &store(&[1]));
        assert!(plan.is_complete());
        assert!(plan.targets().is_empty());
    }

    #[test]
    fn test_into_targets_error_payload() {
        let err = BatchPlan::new(&[1, 999, 1000], &store(&[1]))
            .into_targets("Users")
            .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.error.to_string(), "Users [999, 1000] not found");
        assert_eq!(
            err.details.unwrap()["missing_ids"],
            serde_json::json!([999, 1000])
        );
    }

    #[tokio::test]
    async fn test_reconcile_with_in_memory_lookup() {
        let mut lookup = store(&[10, 11, 12]);

        let targets = reconcile(&mut lookup, &[12, 10, 12], "Groups").await.unwrap();
        assert_eq!(targets, vec![12, 10]);

        let err = reconcile(&mut lookup, &[10, 13], "Groups").await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.error.to_string().contains("13"));
    }
}

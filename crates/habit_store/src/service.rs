use std::fmt;

use chrono::NaiveDate;
use habit_domain::{
    codec, Habit, HabitError, HabitId, HabitList, HabitStatus, MergeReport, ParseError, ValidationError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::adapter::{Scope, StorageAdapter};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("habit `{0}` not found")]
    NotFound(HabitId),

    #[error("storage unavailable, try again later")]
    Unavailable,
}

impl From<HabitError> for ServiceError {
    fn from(err: HabitError) -> Self {
        match err {
            HabitError::Validation(err) => ServiceError::Validation(err),
            HabitError::Parse(err) => ServiceError::Parse(err),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    #[default]
    Merge,
    Replace,
}

/// Counts shown to the user after an import or reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub mode: ImportMode,
    pub imported: usize,
    pub added: usize,
    pub merged: usize,
    pub unchanged: usize,
}

impl ImportReport {
    fn merged(imported: usize, report: &MergeReport) -> Self {
        Self {
            mode: ImportMode::Merge,
            imported,
            added: report.added.len(),
            merged: report.merged.len(),
            unchanged: report.unchanged.len(),
        }
    }

    fn fresh(mode: ImportMode, list: &HabitList) -> Self {
        let imported = list.all_habits().len();
        Self {
            mode,
            imported,
            added: imported,
            merged: 0,
            unchanged: 0,
        }
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ImportMode::Merge => write!(
                f,
                "Merged {} habits ({} added, {} merged, {} unchanged)",
                self.imported, self.added, self.merged, self.unchanged
            ),
            ImportMode::Replace => write!(f, "Replaced with {} habits", self.imported),
        }
    }
}

/// Request-level operations over an injected storage adapter.
///
/// Every mutating call loads once, works on the in-memory list and saves
/// once. A failure before the save leaves storage untouched.
pub struct HabitService {
    store: Box<dyn StorageAdapter>,
}

impl HabitService {
    pub fn new(store: Box<dyn StorageAdapter>) -> Self {
        Self { store }
    }

    /// Stored list for `scope`, if any.
    pub fn load(&self, scope: &Scope) -> ServiceResult<Option<HabitList>> {
        self.store.load(scope).map_err(|err| unavailable(scope, err))
    }

    /// Stored list for `scope`, or an empty one.
    pub fn habit_list(&self, scope: &Scope) -> ServiceResult<HabitList> {
        Ok(self.load(scope)?.unwrap_or_default())
    }

    pub fn save(&self, scope: &Scope, list: &HabitList) -> ServiceResult<()> {
        self.store
            .save(scope, list)
            .map_err(|err| unavailable(scope, err))
    }

    #[instrument(skip(self, text), fields(scope = %scope))]
    pub fn import(&self, scope: &Scope, text: &str, mode: ImportMode) -> ServiceResult<ImportReport> {
        let imported = codec::parse_import(text)?;
        let report = match mode {
            ImportMode::Replace => {
                self.save(scope, &imported)?;
                ImportReport::fresh(mode, &imported)
            }
            ImportMode::Merge => self.merge_and_save(scope, &imported)?,
        };
        info!(%report, "import finished");
        Ok(report)
    }

    pub fn export(&self, scope: &Scope) -> ServiceResult<String> {
        let list = self.habit_list(scope)?;
        Ok(codec::to_json(&list)?)
    }

    /// Fold the list stored under `from` into the one under `to`, e.g. when
    /// an anonymous session signs in. Only `to` is written.
    #[instrument(skip(self), fields(from = %from, to = %to))]
    pub fn reconcile(&self, from: &Scope, to: &Scope) -> ServiceResult<ImportReport> {
        let Some(incoming) = self.load(from)?.filter(|list| !list.is_empty()) else {
            return Ok(ImportReport::merged(0, &MergeReport::default()));
        };
        let report = self.merge_and_save(to, &incoming)?;
        info!(%report, "reconciled habit lists");
        Ok(report)
    }

    pub fn add_habit(&self, scope: &Scope, name: &str) -> ServiceResult<HabitId> {
        self.update(scope, |list| Ok(list.add(name)?))
    }

    /// Returns whether anything was removed.
    pub fn remove_habit(&self, scope: &Scope, id: &HabitId) -> ServiceResult<bool> {
        self.update(scope, |list| Ok(list.remove(id).is_some()))
    }

    pub fn tick(&self, scope: &Scope, id: &HabitId, day: NaiveDate, done: bool) -> ServiceResult<()> {
        self.update_habit(scope, id, |habit| {
            habit.tick(day, done);
            Ok(())
        })
    }

    pub fn rename(&self, scope: &Scope, id: &HabitId, name: &str) -> ServiceResult<()> {
        self.update_habit(scope, id, |habit| Ok(habit.set_name(name)?))
    }

    pub fn set_star(&self, scope: &Scope, id: &HabitId, star: bool) -> ServiceResult<()> {
        self.update_habit(scope, id, |habit| {
            habit.set_star(star);
            Ok(())
        })
    }

    pub fn set_status(&self, scope: &Scope, id: &HabitId, status: HabitStatus) -> ServiceResult<()> {
        self.update_habit(scope, id, |habit| Ok(habit.set_status(status)?))
    }

    pub fn reorder(
        &self,
        scope: &Scope,
        order: Vec<HabitId>,
        moved: &HabitId,
    ) -> ServiceResult<Option<HabitStatus>> {
        self.update(scope, |list| Ok(list.reorder(order, moved)?))
    }

    fn merge_and_save(&self, scope: &Scope, incoming: &HabitList) -> ServiceResult<ImportReport> {
        match self.load(scope)? {
            None => {
                self.save(scope, incoming)?;
                Ok(ImportReport::fresh(ImportMode::Merge, incoming))
            }
            Some(current) => {
                let outcome = current.merge(incoming);
                self.save(scope, &outcome.list)?;
                Ok(ImportReport::merged(
                    incoming.all_habits().len(),
                    &outcome.report,
                ))
            }
        }
    }

    fn update<T>(
        &self,
        scope: &Scope,
        apply: impl FnOnce(&mut HabitList) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let mut list = self.habit_list(scope)?;
        let value = apply(&mut list)?;
        self.save(scope, &list)?;
        Ok(value)
    }

    fn update_habit(
        &self,
        scope: &Scope,
        id: &HabitId,
        apply: impl FnOnce(&mut Habit) -> ServiceResult<()>,
    ) -> ServiceResult<()> {
        self.update(scope, |list| {
            let habit = list
                .get_habit_by_mut(id)
                .ok_or_else(|| ServiceError::NotFound(id.clone()))?;
            apply(habit)
        })
    }
}

fn unavailable(scope: &Scope, err: anyhow::Error) -> ServiceError {
    error!(%scope, error = ?err, "storage adapter failed");
    ServiceError::Unavailable
}

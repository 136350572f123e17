use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::habit::{validate_name, Habit, HabitId, HabitStatus};
use crate::ids;

/// Ordered collection of habits with an optional explicit display order.
///
/// Soft-deleted habits stay in storage but are hidden from [`HabitList::habits`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "HabitListData")]
pub struct HabitList {
    habits: Vec<Habit>,
    order: Vec<HabitId>,
}

/// Raw persisted shape, before the unique-id check.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HabitListData {
    #[serde(default)]
    pub(crate) habits: Vec<Habit>,
    #[serde(default)]
    pub(crate) order: Vec<HabitId>,
}

impl TryFrom<HabitListData> for HabitList {
    type Error = ValidationError;

    fn try_from(data: HabitListData) -> Result<Self, Self::Error> {
        let mut list = HabitList::from_habits(data.habits)?;
        list.set_order(data.order);
        Ok(list)
    }
}

impl HabitList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_habits(habits: Vec<Habit>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for habit in &habits {
            if !seen.insert(habit.id()) {
                return Err(ValidationError::DuplicateId(habit.id().clone()));
            }
        }
        Ok(Self {
            habits,
            order: Vec::new(),
        })
    }

    /// Live habits in display order.
    ///
    /// With an explicit order, listed ids come first in that order and the
    /// rest follow in insertion order. Without one, starred habits lead.
    pub fn habits(&self) -> Vec<&Habit> {
        let mut live: Vec<&Habit> = self.habits.iter().filter(|habit| habit.is_live()).collect();
        if self.order.is_empty() {
            live.sort_by_key(|habit| Reverse(habit.star()));
        } else {
            let positions: HashMap<&HabitId, usize> = self
                .order
                .iter()
                .enumerate()
                .map(|(idx, id)| (id, idx))
                .collect();
            live.sort_by_key(|habit| positions.get(habit.id()).copied().unwrap_or(usize::MAX));
        }
        live
    }

    /// Every stored habit, soft-deleted included, in insertion order.
    pub fn all_habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit_ids(&self) -> Vec<&HabitId> {
        self.habits.iter().map(Habit::id).collect()
    }

    pub fn len(&self) -> usize {
        self.habits.iter().filter(|habit| habit.is_live()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &HabitId) -> bool {
        self.habits.iter().any(|habit| habit.id() == id)
    }

    /// Create an active habit named `name` and append it.
    pub fn add(&mut self, name: &str) -> Result<HabitId, ValidationError> {
        let name = validate_name(name)?;
        let id = self.fresh_id(&name);
        self.habits.push(Habit::new(id.clone(), name));
        if !self.order.is_empty() {
            self.order.push(id.clone());
        }
        Ok(id)
    }

    /// Delete by id. Removing an absent habit is a no-op.
    pub fn remove(&mut self, id: &HabitId) -> Option<Habit> {
        let idx = self.habits.iter().position(|habit| habit.id() == id)?;
        self.order.retain(|existing| existing != id);
        Some(self.habits.remove(idx))
    }

    pub fn get_habit_by(&self, id: &HabitId) -> Option<&Habit> {
        self.habits
            .iter()
            .find(|habit| habit.is_live() && habit.id() == id)
    }

    pub fn get_habit_by_mut(&mut self, id: &HabitId) -> Option<&mut Habit> {
        self.habits
            .iter_mut()
            .find(|habit| habit.is_live() && habit.id() == id)
    }

    pub fn order(&self) -> &[HabitId] {
        &self.order
    }

    /// Replace the explicit order. Unknown ids are kept and ignored on read;
    /// repeated ids keep their first position.
    pub fn set_order(&mut self, order: Vec<HabitId>) {
        let mut seen = HashSet::new();
        self.order = order
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
    }

    /// Apply a drag-and-drop reorder of the order page.
    ///
    /// Archived habits sit below active ones, so the moved habit becomes
    /// archived when dropped right under an archived habit and active when
    /// dropped right above an active one. Returns the moved habit's status.
    pub fn reorder(
        &mut self,
        order: Vec<HabitId>,
        moved: &HabitId,
    ) -> Result<Option<HabitStatus>, ValidationError> {
        self.set_order(order);

        let displayed: Vec<(HabitId, HabitStatus)> = self
            .habits()
            .into_iter()
            .map(|habit| (habit.id().clone(), habit.status()))
            .collect();
        let Some(pos) = displayed.iter().position(|(id, _)| id == moved) else {
            return Ok(None);
        };

        let above = pos.checked_sub(1).map(|idx| displayed[idx].1);
        let below = displayed.get(pos + 1).map(|(_, status)| *status);
        let next = match (above, below) {
            (Some(HabitStatus::Archived), _) => Some(HabitStatus::Archived),
            (_, Some(HabitStatus::Active)) => Some(HabitStatus::Active),
            _ => None,
        };

        let Some(habit) = self.get_habit_by_mut(moved) else {
            return Ok(None);
        };
        if let Some(status) = next {
            habit.set_status(status)?;
        }
        Ok(Some(habit.status()))
    }

    pub(crate) fn push_merged(&mut self, habit: Habit) {
        self.habits.push(habit);
    }

    pub(crate) fn with_order(mut self, order: Vec<HabitId>) -> Self {
        self.order = order;
        self
    }

    pub(crate) fn fresh_id(&self, name: &str) -> HabitId {
        let mut disambiguator = 0;
        loop {
            let id = HabitId::new(ids::short_hash_with(name, disambiguator));
            if !self.contains(&id) {
                return id;
            }
            disambiguator += 1;
        }
    }
}

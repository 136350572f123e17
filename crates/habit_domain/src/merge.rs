use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::habit::{Habit, HabitId};
use crate::habit_list::HabitList;

/// How habits from two lists are paired up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeKey {
    #[default]
    Id,
    /// Pair by name; the receiver's id survives.
    Name,
}

impl MergeKey {
    fn of<'a>(self, habit: &'a Habit) -> &'a str {
        match self {
            MergeKey::Id => habit.id().as_str(),
            MergeKey::Name => habit.name(),
        }
    }
}

/// Per-habit summary of a list merge, reported back to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Only in the incoming list; carried over as-is.
    pub added: Vec<HabitId>,
    /// On both sides and combined into something new.
    pub merged: Vec<HabitId>,
    /// Receiver habits that come out of the merge identical.
    pub unchanged: Vec<HabitId>,
}

impl MergeReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.merged.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub list: HabitList,
    pub report: MergeReport,
}

impl HabitList {
    /// Merge `other` into a copy of `self`, pairing habits by id.
    pub fn merge(&self, other: &HabitList) -> MergeOutcome {
        merge_lists(self, other, MergeKey::Id)
    }

    pub fn merge_by(&self, other: &HabitList, key: MergeKey) -> MergeOutcome {
        merge_lists(self, other, key)
    }
}

/// Combine two habit lists without touching either.
///
/// Receiver habits keep their positions; paired habits are combined with
/// [`Habit::merge`]; unpaired incoming habits are appended in the incoming
/// list's display order. The receiver's explicit order, if any, is extended
/// with the appended ids.
pub fn merge_lists(base: &HabitList, incoming: &HabitList, key: MergeKey) -> MergeOutcome {
    let theirs = display_then_deleted(incoming);
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (idx, habit) in theirs.iter().enumerate() {
        index.entry(key.of(habit)).or_insert(idx);
    }

    let mut result = HabitList::new();
    let mut report = MergeReport::default();
    let mut paired: HashSet<usize> = HashSet::new();

    for mine in base.all_habits() {
        let partner = index
            .get(key.of(mine))
            .copied()
            .filter(|idx| !paired.contains(idx));
        match partner {
            Some(idx) => {
                paired.insert(idx);
                let combined = mine.merge(theirs[idx]);
                if combined.content_eq(mine) {
                    report.unchanged.push(mine.id().clone());
                } else {
                    report.merged.push(mine.id().clone());
                }
                result.push_merged(combined);
            }
            None => {
                report.unchanged.push(mine.id().clone());
                result.push_merged(mine.clone());
            }
        }
    }

    for (idx, habit) in theirs.iter().enumerate() {
        if paired.contains(&idx) {
            continue;
        }
        let habit = if result.contains(habit.id()) {
            // Only reachable when pairing by name: same id, different habit.
            let id = result.fresh_id(habit.name());
            (*habit).clone().with_id(id)
        } else {
            (*habit).clone()
        };
        report.added.push(habit.id().clone());
        result.push_merged(habit);
    }

    let order = if base.order().is_empty() {
        Vec::new()
    } else {
        let mut order = base.order().to_vec();
        order.extend(report.added.iter().cloned());
        order
    };

    tracing::debug!(
        added = report.added.len(),
        merged = report.merged.len(),
        unchanged = report.unchanged.len(),
        "merged habit lists"
    );

    MergeOutcome {
        list: result.with_order(order),
        report,
    }
}

fn display_then_deleted(list: &HabitList) -> Vec<&Habit> {
    let mut habits = list.habits();
    habits.extend(list.all_habits().iter().filter(|habit| !habit.is_live()));
    habits
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::habit::HabitStatus;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn list(habits: Vec<Habit>) -> HabitList {
        HabitList::from_habits(habits).unwrap()
    }

    fn ids(list: &HabitList) -> Vec<&str> {
        list.habits().into_iter().map(|h| h.id().as_str()).collect()
    }

    #[test]
    fn unions_ticks_of_shared_habit() {
        let a = list(vec![Habit::new("x", "Run").with_record(day(1), true)]);
        let b = list(vec![Habit::new("x", "Run").with_record(day(2), true)]);

        let outcome = a.merge(&b);
        assert_eq!(ids(&outcome.list), vec!["x"]);
        let merged = outcome.list.get_habit_by(&"x".into()).unwrap();
        assert_eq!(merged.ticked_days(), vec![day(1), day(2)]);
        assert_eq!(outcome.report.merged, vec![HabitId::from("x")]);
        assert!(outcome.report.added.is_empty());
    }

    #[test]
    fn merging_a_copy_of_itself_is_a_noop() {
        let mut original = list(vec![
            Habit::new("x", "Run").with_record(day(1), true),
            Habit::new("y", "Read").with_record(day(3), true).with_star(true),
        ]);
        original.set_order(vec!["y".into(), "x".into()]);

        let outcome = original.merge(&original.clone());
        assert!(outcome.report.is_noop());
        assert_eq!(outcome.report.unchanged.len(), 2);
        assert_eq!(ids(&outcome.list), ids(&original));
        for habit in original.habits() {
            let merged = outcome.list.get_habit_by(habit.id()).unwrap();
            assert!(merged.content_eq(habit));
        }
    }

    #[test]
    fn disjoint_habits_are_added_and_order_extended() {
        let mut a = list(vec![
            Habit::new("x", "Run").with_record(day(1), true),
            Habit::new("y", "Read").with_record(day(1), true),
        ]);
        a.set_order(vec!["y".into(), "x".into()]);
        let b = list(vec![
            Habit::new("y", "Read").with_record(day(2), true),
            Habit::new("z", "Swim"),
        ]);

        let outcome = a.merge(&b);
        assert_eq!(ids(&outcome.list), vec!["y", "x", "z"]);
        assert_eq!(
            outcome.list.order(),
            &[HabitId::from("y"), HabitId::from("x"), HabitId::from("z")]
        );
        assert_eq!(outcome.report.added, vec![HabitId::from("z")]);
        assert_eq!(outcome.report.merged, vec![HabitId::from("y")]);
        assert_eq!(outcome.report.unchanged, vec![HabitId::from("x")]);
        let y = outcome.list.get_habit_by(&"y".into()).unwrap();
        assert_eq!(y.ticked_days(), vec![day(1), day(2)]);
    }

    #[test]
    fn result_size_is_union_of_ids() {
        let a = list(vec![Habit::new("a", "A"), Habit::new("b", "B")]);
        let b = list(vec![
            Habit::new("b", "B"),
            Habit::new("c", "C"),
            Habit::new("d", "D"),
        ]);
        let union: HashSet<&HabitId> = a.habit_ids().into_iter().chain(b.habit_ids()).collect();

        let outcome = a.merge(&b);
        assert_eq!(outcome.list.habit_ids().len(), union.len());
        let ids: HashSet<&HabitId> = outcome.list.habit_ids().into_iter().collect();
        assert_eq!(ids, union);
        assert_eq!(b.merge(&a).list.habit_ids().len(), 4);
    }

    #[test]
    fn inputs_are_left_untouched() {
        let a = list(vec![Habit::new("x", "Run").with_record(day(1), true)]);
        let b = list(vec![
            Habit::new("x", "Run").with_record(day(2), true),
            Habit::new("z", "Swim"),
        ]);
        let (a_json, b_json) = (
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap(),
        );

        let _ = a.merge(&b);
        assert_eq!(serde_json::to_string(&a).unwrap(), a_json);
        assert_eq!(serde_json::to_string(&b).unwrap(), b_json);
    }

    #[test]
    fn receiver_metadata_wins() {
        let mut mine = Habit::new("x", "Run");
        mine.set_status(HabitStatus::Archived).unwrap();
        let a = list(vec![mine]);
        let b = list(vec![Habit::new("x", "Running").with_star(true)]);

        let outcome = a.merge(&b);
        let habit = &outcome.list.all_habits()[0];
        assert_eq!(habit.name(), "Run");
        assert!(!habit.star());
        assert_eq!(habit.status(), HabitStatus::Archived);
        assert_eq!(outcome.report.unchanged, vec![HabitId::from("x")]);
    }

    #[test]
    fn name_key_pairs_habits_with_different_ids() {
        let a = list(vec![Habit::new("aaaa", "Run").with_record(day(1), true)]);
        let b = list(vec![
            Habit::new("bbbb", "Run").with_record(day(2), true),
            Habit::new("aaaa", "Swim"),
        ]);

        let outcome = a.merge_by(&b, MergeKey::Name);
        assert_eq!(outcome.list.all_habits().len(), 2);
        let run = outcome.list.get_habit_by(&"aaaa".into()).unwrap();
        assert_eq!(run.name(), "Run");
        assert_eq!(run.ticked_days(), vec![day(1), day(2)]);

        let swim = &outcome.list.all_habits()[1];
        assert_eq!(swim.name(), "Swim");
        assert_ne!(swim.id().as_str(), "aaaa");
        assert_eq!(outcome.report.added, vec![swim.id().clone()]);
    }
}

use chrono::{Datelike, NaiveDate};

use crate::habit::{Habit, HabitId};
use crate::habit_list::HabitList;

const DEMO_HABITS: [&str; 5] = ["Order pizza", "Running", "Table Tennis", "Clean", "Call mom"];

/// Sample list shown to first-time session users.
///
/// Every habit gets a record for each of `days`; roughly one in four is done.
pub fn demo_habit_list(days: &[NaiveDate]) -> HabitList {
    let habits = DEMO_HABITS
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            days.iter().fold(
                Habit::new(HabitId::from_name(name), *name),
                |habit, day| habit.with_record(*day, pick(idx, *day)),
            )
        })
        .collect();
    // Demo names are distinct, so their hashes are too.
    HabitList::from_habits(habits).unwrap_or_default()
}

fn pick(idx: usize, day: NaiveDate) -> bool {
    let phase = day.num_days_from_ce().rem_euclid(4) as usize;
    (phase + idx * 3) % 4 == 0
}

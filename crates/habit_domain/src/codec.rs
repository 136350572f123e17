//! JSON exchange format shared by export, import and the disk store.

use serde_json::Value;

use crate::error::{ParseError, Result, ValidationError};
use crate::habit::validate_name;
use crate::habit_list::{HabitList, HabitListData};

/// Parse a stored habit list. An empty list is fine here.
pub fn parse_habit_list(text: &str) -> Result<HabitList> {
    let data: HabitListData = serde_json::from_str(text).map_err(ParseError::from)?;
    Ok(HabitList::try_from(data)?)
}

/// Parse an uploaded export. Rejects payloads without live habits or with
/// names outside 1..=50 characters.
pub fn parse_import(text: &str) -> Result<HabitList> {
    let value: Value = serde_json::from_str(text).map_err(ParseError::from)?;
    let has_habits = value
        .get("habits")
        .and_then(Value::as_array)
        .is_some_and(|habits| !habits.is_empty());
    if !has_habits {
        return Err(ValidationError::NoHabits.into());
    }

    let data: HabitListData = serde_json::from_value(value).map_err(ParseError::from)?;
    let list = HabitList::try_from(data)?;
    for habit in list.all_habits() {
        validate_name(habit.name())?;
    }
    if list.is_empty() {
        return Err(ValidationError::NoHabits.into());
    }
    Ok(list)
}

pub fn to_json(list: &HabitList) -> Result<String> {
    Ok(serde_json::to_string_pretty(list).map_err(ParseError::from)?)
}

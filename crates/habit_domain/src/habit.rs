use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::ids;
use crate::record::Record;

pub const MAX_NAME_LEN: usize = 50;

/// Stable short identifier of a habit. Sole identity key for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_name(name: &str) -> Self {
        Self(ids::short_hash(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HabitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for HabitId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    #[default]
    #[serde(alias = "normal")]
    Active,
    Archived,
    #[serde(alias = "soft_delete")]
    SoftDeleted,
}

impl HabitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HabitStatus::Active => "active",
            HabitStatus::Archived => "archived",
            HabitStatus::SoftDeleted => "soft_deleted",
        }
    }

    /// `active <-> archived` is reversible; `soft_deleted` is terminal.
    pub fn can_become(self, next: HabitStatus) -> bool {
        self == next || self != HabitStatus::SoftDeleted
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim and check a habit name against the 1..=50 character rule.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(ValidationError::EmptyName);
    }
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "HabitData")]
pub struct Habit {
    id: HabitId,
    name: String,
    star: bool,
    status: HabitStatus,
    records: Vec<Record>,
}

impl Habit {
    pub fn new(id: impl Into<HabitId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            star: false,
            status: HabitStatus::Active,
            records: Vec::new(),
        }
    }

    /// Nameless stand-in whose metadata yields to the other side of a merge.
    pub fn placeholder(id: impl Into<HabitId>) -> Self {
        Self::new(id, String::new())
    }

    pub fn with_record(mut self, day: NaiveDate, done: bool) -> Self {
        self.tick(day, done);
        self
    }

    pub fn with_star(mut self, star: bool) -> Self {
        self.star = star;
        self
    }

    pub(crate) fn with_id(mut self, id: HabitId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> &HabitId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn star(&self) -> bool {
        self.star
    }

    pub fn status(&self) -> HabitStatus {
        self.status
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_live(&self) -> bool {
        self.status != HabitStatus::SoftDeleted
    }

    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = validate_name(name)?;
        Ok(())
    }

    pub fn set_star(&mut self, star: bool) {
        self.star = star;
    }

    pub fn set_status(&mut self, status: HabitStatus) -> Result<(), ValidationError> {
        if !self.status.can_become(status) {
            return Err(ValidationError::InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        Ok(())
    }

    /// Set the completion state for `day`, creating the record on first tick.
    pub fn tick(&mut self, day: NaiveDate, done: bool) {
        match self.records.iter_mut().find(|record| record.day == day) {
            Some(record) => record.tick(done),
            None => self.records.push(Record::new(day, done)),
        }
    }

    pub fn ticked_days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = self
            .records
            .iter()
            .filter(|record| record.done)
            .map(|record| record.day)
            .collect();
        days.sort();
        days
    }

    /// Combine two versions of the same logical habit into a new one.
    ///
    /// Records are unioned by day; a day done on either side is done in the
    /// result. Name, star and status come from `self` unless `self` is a
    /// placeholder, in which case they come from `other`. The id is always
    /// the receiver's. Neither input is modified.
    pub fn merge(&self, other: &Habit) -> Habit {
        let mut by_day = self.record_map();
        for record in &other.records {
            by_day
                .entry(record.day)
                .and_modify(|done| *done |= record.done)
                .or_insert(record.done);
        }

        let meta = if self.is_placeholder() { other } else { self };
        Habit {
            id: self.id.clone(),
            name: meta.name.clone(),
            star: meta.star,
            status: meta.status,
            records: by_day
                .into_iter()
                .map(|(day, done)| Record::new(day, done))
                .collect(),
        }
    }

    /// Field-wise comparison, unlike `==` which only looks at the id.
    pub fn content_eq(&self, other: &Habit) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.star == other.star
            && self.status == other.status
            && self.record_map() == other.record_map()
    }

    fn record_map(&self) -> BTreeMap<NaiveDate, bool> {
        self.records
            .iter()
            .map(|record| (record.day, record.done))
            .collect()
    }
}

impl PartialEq for Habit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Habit {}

impl Hash for Habit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Habit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.name, self.id)
    }
}

/// Wire shape accepted on load; tolerates older exports.
#[derive(Deserialize)]
struct HabitData {
    #[serde(default)]
    id: Option<HabitId>,
    name: String,
    #[serde(default, deserialize_with = "star_flag")]
    star: bool,
    #[serde(default)]
    status: HabitStatus,
    #[serde(default)]
    records: Vec<Record>,
}

impl From<HabitData> for Habit {
    fn from(data: HabitData) -> Self {
        let id = data.id.unwrap_or_else(|| HabitId::from_name(&data.name));
        let mut records: Vec<Record> = Vec::with_capacity(data.records.len());
        for record in data.records {
            match records.iter_mut().find(|existing| existing.day == record.day) {
                Some(existing) => existing.done |= record.done,
                None => records.push(record),
            }
        }
        Habit {
            id,
            name: data.name,
            star: data.star,
            status: data.status,
            records,
        }
    }
}

fn star_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StarFlag {
        Bool(bool),
        Int(i64),
    }

    Ok(match StarFlag::deserialize(deserializer)? {
        StarFlag::Bool(value) => value,
        StarFlag::Int(value) => value != 0,
    })
}

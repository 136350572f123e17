pub mod codec;
pub mod demo;
pub mod error;
pub mod habit;
pub mod habit_list;
pub mod ids;
pub mod merge;
pub mod record;

pub use crate::error::{HabitError, ParseError, ValidationError};
pub use crate::habit::{Habit, HabitId, HabitStatus};
pub use crate::habit_list::HabitList;
pub use crate::merge::{MergeKey, MergeOutcome, MergeReport};
pub use crate::record::Record;

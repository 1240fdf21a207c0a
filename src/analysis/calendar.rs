use chrono::{Datelike, NaiveDate, Weekday};

use crate::habits::entities::Habit;

/// One habit on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitCell<'a> {
    pub habit: &'a Habit,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumn<'a> {
    pub date: NaiveDate,
    pub cells: Vec<HabitCell<'a>>,
}

impl DayColumn<'_> {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn completed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.completed).count()
    }
}

/// Habits laid out over a week. Computed on every read and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid<'a> {
    pub days: Vec<DayColumn<'a>>,
}

/// Places every habit under every day of `week`, tagging each cell with whether the habit was
/// done that day. Weekly habits appear on all days too; hiding them is up to the display.
pub fn project<'a>(habits: &'a [Habit], week: &[NaiveDate]) -> WeekGrid<'a> {
    let days = week
        .iter()
        .map(|&date| DayColumn {
            date,
            cells: habits
                .iter()
                .map(|habit| HabitCell {
                    habit,
                    completed: habit.is_completed_on(date),
                })
                .collect(),
        })
        .collect();
    WeekGrid { days }
}

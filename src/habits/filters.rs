//! Views over an already loaded list of habits. Nothing here touches storage.

use std::str::FromStr;

use chrono::NaiveDate;

use super::{
    entities::{Frequency, Habit},
    error::HabitError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyFilter {
    #[default]
    All,
    Only(Frequency),
}

impl FromStr for FrequencyFilter {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(FrequencyFilter::All)
        } else {
            s.parse().map(FrequencyFilter::Only)
        }
    }
}

pub fn filter_by_frequency(habits: Vec<Habit>, filter: FrequencyFilter) -> Vec<Habit> {
    match filter {
        FrequencyFilter::All => habits,
        FrequencyFilter::Only(frequency) => habits
            .into_iter()
            .filter(|h| h.frequency == frequency)
            .collect(),
    }
}

/// Habits done on `date`, in input order.
pub fn completed_on(habits: &[Habit], date: NaiveDate) -> Vec<&Habit> {
    habits.iter().filter(|h| h.is_completed_on(date)).collect()
}

/// Habits done at least once, with how many times.
pub fn ever_completed(habits: &[Habit]) -> Vec<(&Habit, usize)> {
    habits
        .iter()
        .map(|h| (h, h.completed_dates.len()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn sample() -> Vec<Habit> {
        vec![
            Habit::new("Water", Frequency::Daily).with_completed([date(10), date(11)]),
            Habit::new("Laundry", Frequency::Weekly).with_completed([date(9)]),
            Habit::new("Read", Frequency::Daily),
        ]
    }

    #[test]
    fn all_filter_passes_everything_through() {
        assert_eq!(filter_by_frequency(sample(), FrequencyFilter::All), sample());
    }

    #[test]
    fn frequency_filter_keeps_order() {
        let daily = filter_by_frequency(sample(), "daily".parse().unwrap());
        let names = daily.iter().map(|h| h.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Water", "Read"]);

        let weekly = filter_by_frequency(sample(), FrequencyFilter::Only(Frequency::Weekly));
        assert_eq!(weekly.len(), 1);
        assert_eq!("ALL".parse::<FrequencyFilter>().unwrap(), FrequencyFilter::All);
        assert!("monthly".parse::<FrequencyFilter>().is_err());
    }

    #[test]
    fn completed_views() {
        let habits = sample();
        let today = completed_on(&habits, date(11));
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].name, "Water");

        let ever = ever_completed(&habits)
            .into_iter()
            .map(|(h, n)| (h.name.as_str(), n))
            .collect::<Vec<_>>();
        assert_eq!(ever, [("Water", 2), ("Laundry", 1)]);
    }
}

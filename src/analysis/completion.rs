use chrono::NaiveDate;

use crate::{
    habits::entities::Habit,
    utils::{
        clock::{today, Clock},
        percentage::Percentage,
        time::week_dates,
    },
};

/// Share of habits done on `today`. No habits means 0%.
pub fn todays_completion(habits: &[Habit], today: NaiveDate) -> Percentage {
    let completed = habits.iter().filter(|h| h.is_completed_on(today)).count();
    Percentage::of(completed, habits.len())
}

/// Completions logged during `week` relative to how many the habits' frequencies call for:
/// a daily habit expects 7, a weekly one 1. Nothing expected means 0%. Extra completions of
/// weekly habits can't push the result past 100%.
pub fn weekly_completion(habits: &[Habit], week: &[NaiveDate]) -> Percentage {
    let expected = habits
        .iter()
        .map(|h| h.frequency.expected_per_week())
        .sum::<usize>();
    let completed = habits
        .iter()
        .map(|h| h.completions_within(week))
        .sum::<usize>();
    Percentage::of(completed.min(expected), expected)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSummary {
    pub date: NaiveDate,
    pub total: usize,
    pub completed_today: usize,
    pub today: Percentage,
    pub week: Percentage,
}

/// Computes both percentages against the same day.
pub fn summarize(habits: &[Habit], clock: &dyn Clock) -> CompletionSummary {
    summarize_on(habits, today(clock))
}

pub fn summarize_on(habits: &[Habit], date: NaiveDate) -> CompletionSummary {
    let week = week_dates(date);
    CompletionSummary {
        date,
        total: habits.len(),
        completed_today: habits.iter().filter(|h| h.is_completed_on(date)).count(),
        today: todays_completion(habits, date),
        week: weekly_completion(habits, &week),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{
        habits::entities::{Frequency, Habit},
        utils::{clock::FixedClock, time::week_dates},
    };

    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn approx(value: f64, expected: f64) {
        assert!((value - expected).abs() < 1e-9, "{value} != {expected}");
    }

    #[test]
    fn empty_set_is_zero() {
        approx(*todays_completion(&[], date(11)), 0.);
        approx(*weekly_completion(&[], &week_dates(date(11))), 0.);
    }

    #[test]
    fn single_daily_habit() {
        let habits = [Habit::new("Water", Frequency::Daily).with_completed([date(10), date(11)])];
        let week = week_dates(date(11));
        assert_eq!(week[0], date(9));
        assert_eq!(week[6], date(15));

        approx(*todays_completion(&habits, date(11)), 100.);
        approx(*weekly_completion(&habits, &week), 200. / 7.);
        assert_eq!(weekly_completion(&habits, &week).to_string(), "28.6%");
    }

    #[test]
    fn daily_and_weekly_mix() {
        let habits = [
            Habit::new("Water", Frequency::Daily).with_completed([date(9), date(12), date(15)]),
            Habit::new("Laundry", Frequency::Weekly).with_completed([date(13)]),
        ];
        approx(*weekly_completion(&habits, &week_dates(date(13))), 50.);
        approx(*todays_completion(&habits, date(13)), 50.);
    }

    #[test]
    fn completions_outside_the_week_are_ignored() {
        let habits = [Habit::new("Water", Frequency::Daily)
            .with_completed([date(8), date(16), NaiveDate::from_ymd_opt(2023, 6, 11).unwrap()])];
        approx(*weekly_completion(&habits, &week_dates(date(11))), 0.);
    }

    #[test]
    fn weekly_habit_done_more_than_expected_is_capped() {
        let habits = [Habit::new("Laundry", Frequency::Weekly).with_completed([date(10), date(11)])];
        approx(*weekly_completion(&habits, &week_dates(date(11))), 100.);
    }

    #[test]
    fn summary_uses_clock_day() {
        let habits = [
            Habit::new("Water", Frequency::Daily).with_completed([date(10), date(11)]),
            Habit::new("Read", Frequency::Daily),
        ];
        let summary = summarize(&habits, &FixedClock::on(date(11)));
        assert_eq!(summary.date, date(11));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.completed_today, 1);
        approx(*summary.today, 50.);
        approx(*summary.week, 100. * 2. / 14.);
    }
}

use ansi_term::{Colour, Style};
use anyhow::Result;
use chrono::NaiveDate;

use crate::{
    analysis::{
        calendar::{project, WeekGrid},
        completion::{summarize_on, CompletionSummary},
    },
    habits::{
        entities::Habit,
        filters::{completed_on, ever_completed, filter_by_frequency, FrequencyFilter},
        repository::{CompletionStatus, HabitRepository},
    },
    storage::kv_store::KeyValueStore,
    utils::{
        clock::{today, Clock, DefaultClock},
        time::{week_dates, DAYS_IN_WEEK},
    },
};

use super::dates::AtDate;

pub enum HabitCommand {
    Add {
        name: String,
        frequency: String,
    },
    Complete {
        name: String,
    },
    Delete {
        name: String,
    },
    List {
        filter: FrequencyFilter,
        completed_today: bool,
        completed: bool,
    },
    Stats {
        at: AtDate,
    },
    Calendar {
        at: AtDate,
    },
}

pub async fn process_habit_command(store: impl KeyValueStore, command: HabitCommand) -> Result<()> {
    let clock: Box<dyn Clock> = match &command {
        HabitCommand::Stats { at } | HabitCommand::Calendar { at } => at.clock()?,
        _ => Box::new(DefaultClock),
    };
    let (day, week) = day_and_week(&*clock);
    let repository = HabitRepository::new(store, clock);

    match command {
        HabitCommand::Add { name, frequency } => {
            repository.create(&name, &frequency).await?;
            println!("Habit created successfully");
        }
        HabitCommand::Complete { name } => match repository.mark_completed_today(&name).await? {
            CompletionStatus::Completed => {
                println!("Marked {} as completed for today", name.trim())
            }
            CompletionStatus::AlreadyCompleted => {
                println!("Already marked as completed for today!")
            }
        },
        HabitCommand::Delete { name } => {
            repository.delete(&name).await?;
            println!("Habit deleted successfully");
        }
        HabitCommand::List {
            filter,
            completed_today,
            completed,
        } => {
            let habits = filter_by_frequency(repository.list_all().await?, filter);
            print!("{}", format_list(&habits, day, completed_today, completed));
        }
        HabitCommand::Stats { .. } => {
            let habits = repository.list_all().await?;
            print!("{}", format_summary(&summarize_on(&habits, day)));
        }
        HabitCommand::Calendar { .. } => {
            let habits = repository.list_all().await?;
            print!("{}", format_calendar(&project(&habits, &week), day));
        }
    }
    Ok(())
}

/// Today and the week around it, from a single read of the clock.
fn day_and_week(clock: &dyn Clock) -> (NaiveDate, [NaiveDate; DAYS_IN_WEEK]) {
    let day = today(clock);
    (day, week_dates(day))
}

fn format_list(habits: &[Habit], day: NaiveDate, completed_today: bool, completed: bool) -> String {
    if completed {
        let done = ever_completed(habits);
        if done.is_empty() {
            return "No completed habits yet.\n".to_string();
        }
        return done
            .into_iter()
            .map(|(habit, count)| format!("{} ({count} times)\n", habit.name))
            .collect();
    }

    if completed_today {
        let done = completed_on(habits, day);
        if done.is_empty() {
            return "No habits completed today.\n".to_string();
        }
        return done
            .into_iter()
            .map(|habit| format!("• {}\n", habit.name))
            .collect();
    }

    if habits.is_empty() {
        return "No habits found. Add some!\n".to_string();
    }
    let width = habits.iter().map(|h| h.name.chars().count()).max().unwrap_or(0);
    habits
        .iter()
        .map(|habit| {
            let status = if habit.is_completed_on(day) {
                "completed"
            } else {
                "pending"
            };
            format!(
                "{:width$}  {:6}  {status}\n",
                habit.name,
                habit.frequency.to_string()
            )
        })
        .collect()
}

fn format_summary(summary: &CompletionSummary) -> String {
    format!(
        "{}\nHabits completed today: {} / {}\nCompleted today: {}\nWeekly progress: {}\n",
        summary.date.format("%A, %b %-d, %Y"),
        summary.completed_today,
        summary.total,
        summary.today,
        summary.week
    )
}

const CELL_WIDTH: usize = 8;

fn format_calendar(grid: &WeekGrid<'_>, day: NaiveDate) -> String {
    let habit_count = grid.days.first().map_or(0, |d| d.cells.len());
    let width = grid
        .days
        .first()
        .and_then(|d| d.cells.iter().map(|c| c.habit.name.chars().count()).max())
        .unwrap_or(0);

    let mut out = format!("{:width$}", "");
    for column in &grid.days {
        let label = format!(
            "{:<CELL_WIDTH$}",
            format!("{} {}", column.weekday(), column.date.format("%d"))
        );
        if column.date == day {
            out.push_str(&format!("  {}", Style::new().bold().underline().paint(label)));
        } else {
            out.push_str(&format!("  {label}"));
        }
    }
    out.push('\n');

    for index in 0..habit_count {
        out.push_str(&format!("{:width$}", grid.days[0].cells[index].habit.name));
        for column in &grid.days {
            let mark = if column.cells[index].completed {
                Colour::Green.paint(format!("{:<CELL_WIDTH$}", "done"))
            } else {
                Colour::Fixed(245).paint(format!("{:<CELL_WIDTH$}", "-"))
            };
            out.push_str(&format!("  {mark}"));
        }
        out.push('\n');
    }

    if habit_count == 0 {
        out.push_str("No habits found. Add some!\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{
        analysis::{calendar::project, completion::summarize_on},
        habits::entities::{Frequency, Habit},
        utils::{clock::MockClock, time::week_dates},
    };

    use super::{day_and_week, format_calendar, format_list, format_summary};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn sample() -> Vec<Habit> {
        vec![
            Habit::new("Water", Frequency::Daily).with_completed([date(10), date(11)]),
            Habit::new("Laundry", Frequency::Weekly),
        ]
    }

    #[test]
    fn list_shows_today_status() {
        let out = format_list(&sample(), date(11), false, false);
        assert_eq!(
            out,
            "Water    Daily   completed\nLaundry  Weekly  pending\n"
        );
        assert_eq!(format_list(&[], date(11), false, false), "No habits found. Add some!\n");
    }

    #[test]
    fn list_completed_views() {
        assert_eq!(format_list(&sample(), date(11), true, false), "• Water\n");
        assert_eq!(format_list(&sample(), date(12), true, false), "No habits completed today.\n");
        assert_eq!(format_list(&sample(), date(12), false, true), "Water (2 times)\n");
    }

    #[test]
    fn summary_lines() {
        let out = format_summary(&summarize_on(&sample(), date(11)));
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Tuesday, Jun 11, 2024");
        assert_eq!(lines[1], "Habits completed today: 1 / 2");
        assert_eq!(lines[2], "Completed today: 50.0%");
        assert_eq!(lines[3], "Weekly progress: 25.0%");
    }

    #[test]
    fn calendar_has_header_and_row_per_habit() {
        let habits = sample();
        let out = format_calendar(&project(&habits, &week_dates(date(11))), date(11));
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Sun 09"));
        assert!(lines[0].contains("Sat 15"));
        assert!(lines[1].starts_with("Water"));
        assert_eq!(lines[1].matches("done").count(), 2);
        assert_eq!(lines[2].matches("done").count(), 0);
    }

    #[test]
    fn day_and_week_read_the_clock_once() {
        let mut clock = MockClock::new();
        let mut moments = [
            date(15).and_hms_opt(23, 59, 59).unwrap(),
            date(16).and_hms_opt(0, 0, 0).unwrap(),
        ]
        .into_iter();
        clock
            .expect_now()
            .times(1)
            .returning(move || moments.next().unwrap());

        let (day, week) = day_and_week(&clock);
        assert_eq!(day, date(15));
        assert_eq!(week[0], date(9));
        assert!(week.contains(&day));
    }
}

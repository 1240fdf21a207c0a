use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::HabitError;

/// How often a habit is expected to be done. Only used to weight expected completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(alias = "daily")]
    Daily,
    #[serde(alias = "weekly")]
    Weekly,
}

impl Frequency {
    pub fn expected_per_week(self) -> usize {
        match self {
            Frequency::Daily => 7,
            Frequency::Weekly => 1,
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Daily => write!(f, "Daily"),
            Frequency::Weekly => write!(f, "Weekly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Err(HabitError::Validation("frequency is required".into())),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            other => Err(HabitError::Validation(format!(
                "unknown frequency '{other}', expected daily or weekly"
            ))),
        }
    }
}

/// The struct persisted under `habit_<name>`. Field names follow the layout already present on
/// devices: `{ "habitName": .., "frequency": "Daily", "completedDates": ["2024-06-10"] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    #[serde(rename = "habitName")]
    pub name: String,
    pub frequency: Frequency,
    /// Days the habit was done. A set, so marking the same day twice can't duplicate it.
    #[serde(default, with = "completion_keys")]
    pub completed_dates: BTreeSet<NaiveDate>,
}

impl Habit {
    pub fn new(name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            name: name.into(),
            frequency,
            completed_dates: BTreeSet::new(),
        }
    }

    pub fn with_completed(self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            completed_dates: dates.into_iter().collect(),
            ..self
        }
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Number of completions falling on any of `dates`.
    pub fn completions_within(&self, dates: &[NaiveDate]) -> usize {
        dates.iter().filter(|d| self.is_completed_on(**d)).count()
    }
}

mod completion_keys {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::utils::time::{completion_key, parse_completion_key};

    pub fn serialize<S>(dates: &BTreeSet<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(dates.iter().map(|date| completion_key(*date)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeSet<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let keys = Vec::<String>::deserialize(deserializer)?;
        keys.iter()
            .map(|key| {
                parse_completion_key(key)
                    .ok_or_else(|| D::Error::custom(format!("invalid completion date '{key}'")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Frequency, Habit};
    use crate::habits::error::HabitError;

    #[test]
    fn serializes_to_stored_layout() {
        let habit = Habit::new("Water", Frequency::Daily)
            .with_completed([NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()]);

        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "habitName": "Water",
                "frequency": "Daily",
                "completedDates": ["2024-06-10"],
            })
        );
    }

    #[test]
    fn accepts_records_without_completions_and_lowercase_frequency() {
        let habit: Habit =
            serde_json::from_str(r#"{"habitName":"Read","frequency":"weekly"}"#).unwrap();
        assert_eq!(habit, Habit::new("Read", Frequency::Weekly));
    }

    #[test]
    fn duplicated_stored_dates_collapse() {
        let habit: Habit = serde_json::from_str(
            r#"{"habitName":"Run","frequency":"Daily","completedDates":["2024-06-10","2024-06-10"]}"#,
        )
        .unwrap();
        assert_eq!(habit.completed_dates.len(), 1);
    }

    #[test]
    fn rejects_malformed_records() {
        for raw in [
            r#"{"id":"1","title":"Run","type":"daily"}"#,
            r#"{"habitName":"Run","frequency":"Monthly"}"#,
            r#"{"habitName":"Run","frequency":"Daily","completedDates":["10/06/2024"]}"#,
            r#"["habitName"]"#,
        ] {
            assert!(serde_json::from_str::<Habit>(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn frequency_parsing() {
        assert_eq!(" DAILY ".parse::<Frequency>().unwrap(), Frequency::Daily);
        assert_eq!("weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert!(matches!("".parse::<Frequency>(), Err(HabitError::Validation(_))));
        assert!(matches!("hourly".parse::<Frequency>(), Err(HabitError::Validation(_))));
    }
}

use anyhow::{anyhow, Context};
use tracing::{debug, info, instrument, warn};

use crate::{
    storage::kv_store::KeyValueStore,
    utils::clock::{today, Clock},
};

use super::{
    entities::{Frequency, Habit},
    error::HabitError,
};

/// Every habit is stored under this prefix followed by its name.
pub const HABIT_KEY_PREFIX: &str = "habit_";

pub fn habit_key(name: &str) -> String {
    format!("{HABIT_KEY_PREFIX}{name}")
}

/// Outcome of marking a habit as done for today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Completed,
    AlreadyCompleted,
}

/// Sole owner of the `habit_*` keys. Everything that reads or changes habits goes through here.
pub struct HabitRepository<S: KeyValueStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> HabitRepository<S> {
    pub fn new(store: S, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Loads every stored habit. Records that can't be parsed are logged and skipped, so one
    /// broken entry doesn't hide the others.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Habit>, HabitError> {
        let keys = self
            .store
            .all_keys()
            .await?
            .into_iter()
            .filter(|key| key.starts_with(HABIT_KEY_PREFIX))
            .collect::<Vec<_>>();

        let stored = self.store.multi_get(&keys).await?;

        let habits = stored
            .into_iter()
            .filter_map(|(key, value)| {
                let value = value?;
                match decode_habit(&key, &value) {
                    Ok(habit) => Some(habit),
                    Err(e) => {
                        warn!("Skipping corrupted habit record {key}: {e:#}");
                        None
                    }
                }
            })
            .collect::<Vec<_>>();

        debug!("Loaded {} habits", habits.len());
        Ok(habits)
    }

    /// Looks a habit up by name. The name is trimmed the same way [Self::create] trims it.
    pub async fn get(&self, name: &str) -> Result<Habit, HabitError> {
        let name = name.trim();
        let key = habit_key(name);
        match self.store.get(&key).await? {
            Some(value) => Ok(decode_habit(&key, &value)?),
            None => Err(HabitError::NotFound(name.to_owned())),
        }
    }

    /// Creates a habit from raw form input. The name is trimmed, the frequency is parsed
    /// case-insensitively.
    pub async fn create(&self, name: &str, frequency: &str) -> Result<Habit, HabitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HabitError::Validation("habit name is required".into()));
        }
        let frequency = frequency.parse::<Frequency>()?;

        let key = habit_key(name);
        if self.store.get(&key).await?.is_some() {
            return Err(HabitError::Duplicate(name.to_owned()));
        }

        let habit = Habit::new(name, frequency);
        self.save(&habit).await?;
        info!("Created habit {name} ({frequency})");
        Ok(habit)
    }

    /// Adds today's date to the habit. A second call on the same day changes nothing.
    pub async fn mark_completed_today(&self, name: &str) -> Result<CompletionStatus, HabitError> {
        let name = name.trim();
        let mut habit = self.get(name).await?;
        let today = today(&*self.clock);

        if !habit.completed_dates.insert(today) {
            debug!("Habit {name} already completed on {today}");
            return Ok(CompletionStatus::AlreadyCompleted);
        }

        self.save(&habit).await?;
        info!("Marked habit {name} as completed on {today}");
        Ok(CompletionStatus::Completed)
    }

    /// Removes the habit together with its completion log.
    pub async fn delete(&self, name: &str) -> Result<(), HabitError> {
        let name = name.trim();
        let key = habit_key(name);
        if self.store.get(&key).await?.is_none() {
            return Err(HabitError::NotFound(name.to_owned()));
        }
        self.store.remove(&key).await?;
        info!("Deleted habit {name}");
        Ok(())
    }

    async fn save(&self, habit: &Habit) -> Result<(), HabitError> {
        let value = serde_json::to_string(habit).context("Failed to encode habit")?;
        self.store.set(&habit_key(&habit.name), value).await?;
        Ok(())
    }
}

fn decode_habit(key: &str, value: &str) -> anyhow::Result<Habit> {
    let habit = serde_json::from_str::<Habit>(value)
        .with_context(|| format!("Record {key} is not a valid habit"))?;
    if habit_key(&habit.name) != key {
        return Err(anyhow!(
            "Record {key} holds habit named '{}'",
            habit.name
        ));
    }
    Ok(habit)
}

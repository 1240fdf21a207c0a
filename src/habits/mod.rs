//! Habits are the only tracked entity. [repository::HabitRepository] persists them through a
//! [KeyValueStore](crate::storage::kv_store::KeyValueStore), [filters] derives the views shown
//! in lists.

pub mod entities;
pub mod error;
pub mod filters;
pub mod repository;

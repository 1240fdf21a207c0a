//! Small habit tracker. Habits with a daily or weekly frequency are kept in a local key-value
//! store, marked as done per day, and summarized as today's and this week's completion along
//! with a weekly calendar.
//!

pub mod account;
pub mod analysis;
pub mod cli;
pub mod habits;
pub mod storage;
pub mod utils;

//!  Storage is organized through [kv_store::KeyValueStore].
//!  The basic idea is:
//!   - Everything the application persists is a string value under a string key.
//!   - Habits live under `habit_<name>`, accounts under their email and the session under
//!     `currentUserEmail`.
//!   - Only the habit repository and the account service read or write keys.

pub mod kv_store;

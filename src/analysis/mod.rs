//! Pure computations over loaded habits: completion percentages and the weekly calendar grid.

pub mod calendar;
pub mod completion;

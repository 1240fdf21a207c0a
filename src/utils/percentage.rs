use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl Percentage {
    /// `part` out of `whole` as a percentage. An empty whole is defined as 0%.
    pub fn of(part: usize, whole: usize) -> Percentage {
        if whole == 0 {
            return Percentage(0.);
        }
        Percentage(part as f64 / whole as f64 * 100.)
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

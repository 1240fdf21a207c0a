use std::fmt::Display;

use anyhow::Result;
use chrono::Local;
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::utils::clock::{Clock, DefaultClock, FixedClock};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Lets read-only commands pretend today is another day.
#[derive(Debug, Clone, clap::Args)]
pub struct AtDate {
    #[arg(
        long,
        help = "Evaluate as of this day instead of today. Examples are \"yesterday\", \"last monday\", \"15/03/2025\""
    )]
    at: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

impl AtDate {
    pub fn clock(&self) -> Result<Box<dyn Clock>> {
        let Some(at) = &self.at else {
            return Ok(Box::new(DefaultClock));
        };

        match parse_date_string(at, Local::now(), self.date_style.into()) {
            Ok(v) => Ok(Box::new(FixedClock(v.naive_local()))),
            Err(e) => Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate date {at}: {e}"),
                )
                .into()),
        }
    }
}

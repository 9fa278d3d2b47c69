use chrono::{Local, NaiveDate};

/// Source of "today" for day bucketing
pub trait Clock: Send {
    fn today(&self) -> NaiveDate;
}

/// Local-timezone calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

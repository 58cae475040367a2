use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// Source of "now" for everything that decays, ticks or rolls over.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock time of day, used for the day/night decision.
    fn local_time(&self) -> NaiveTime {
        self.now().with_timezone(&Local).time()
    }

    fn local_date(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock whose local time zone is UTC.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|g| *g).unwrap_or_else(|p| *p.into_inner())
    }

    fn local_time(&self) -> NaiveTime {
        self.now().time()
    }

    fn local_date(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Which calendar day a daily quote belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    #[default]
    Utc,
    Local,
}

impl DayBoundary {
    pub fn today(self, clock: &dyn Clock) -> NaiveDate {
        match self {
            Self::Utc => clock.now().date_naive(),
            Self::Local => clock.local_date(),
        }
    }
}

impl std::str::FromStr for DayBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            other => Err(format!("unknown day boundary '{}', expected utc or local", other)),
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Publishing platforms. Every content item claims one slot on each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Facebook, Platform::Instagram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" | "fb" => Ok(Platform::Facebook),
            "instagram" | "ig" => Ok(Platform::Instagram),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// Dates already claimed per platform, supplied by the caller as a
/// point-in-time snapshot. A date is available only when neither
/// platform has it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    #[serde(default)]
    pub facebook: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub instagram: BTreeSet<NaiveDate>,
}

impl OccupancySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dates(&self, platform: Platform) -> &BTreeSet<NaiveDate> {
        match platform {
            Platform::Facebook => &self.facebook,
            Platform::Instagram => &self.instagram,
        }
    }

    fn dates_mut(&mut self, platform: Platform) -> &mut BTreeSet<NaiveDate> {
        match platform {
            Platform::Facebook => &mut self.facebook,
            Platform::Instagram => &mut self.instagram,
        }
    }

    /// Mark `date` used on `platform`. Returns `false` if it already was.
    pub fn occupy(&mut self, platform: Platform, date: NaiveDate) -> bool {
        self.dates_mut(platform).insert(date)
    }

    /// Mark `date` used on every platform.
    pub fn occupy_all(&mut self, date: NaiveDate) {
        for platform in Platform::ALL {
            self.occupy(platform, date);
        }
    }

    pub fn with_occupied(mut self, platform: Platform, date: NaiveDate) -> Self {
        self.occupy(platform, date);
        self
    }

    pub fn is_available(&self, date: NaiveDate) -> bool {
        self.occupied_platforms(date).is_empty()
    }

    /// Platforms on which `date` is already taken.
    pub fn occupied_platforms(&self, date: NaiveDate) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|platform| self.dates(*platform).contains(&date))
            .collect()
    }

    /// Dates taken on at least one platform.
    pub fn occupied_dates(&self) -> BTreeSet<NaiveDate> {
        self.facebook.union(&self.instagram).copied().collect()
    }
}

//! Region filter hierarchy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Administrative level used to scope displayed data, ordered from least to
/// most specific.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum RegionLevel {
    /// Province (도)
    #[serde(rename = "도")]
    Province,
    /// City (시)
    #[serde(rename = "시")]
    City,
    /// Zone (권역)
    #[serde(rename = "권역")]
    Zone,
    /// Township (읍면)
    #[serde(rename = "읍면")]
    #[default]
    Township,
    /// Village (리동)
    #[serde(rename = "리동")]
    Village,
}

impl RegionLevel {
    /// Korean display name, identical to the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            RegionLevel::Province => "도",
            RegionLevel::City => "시",
            RegionLevel::Zone => "권역",
            RegionLevel::Township => "읍면",
            RegionLevel::Village => "리동",
        }
    }

    /// All levels from least to most specific.
    pub fn all() -> &'static [RegionLevel] {
        &[
            RegionLevel::Province,
            RegionLevel::City,
            RegionLevel::Zone,
            RegionLevel::Township,
            RegionLevel::Village,
        ]
    }

    /// Record key holding the name of a region at this level.
    pub fn record_key(&self) -> &'static str {
        match self {
            RegionLevel::Province => "province",
            RegionLevel::City => "city",
            RegionLevel::Zone => "zone",
            RegionLevel::Township => "township",
            RegionLevel::Village => "village",
        }
    }
}

/// Region filter attached to every map.
///
/// Only the fields up to `level` are active: a township-level filter looks at
/// `city`, `regions` and `townships` and ignores `villages`. An empty list
/// means "all" at that level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionFilterSetting {
    pub level: RegionLevel,
    pub city: Option<String>,
    /// Zones (권역)
    pub regions: Vec<String>,
    pub townships: Vec<String>,
    pub villages: Vec<String>,
}

impl RegionFilterSetting {
    pub fn new(level: RegionLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Whether a data record falls inside the filter.
    ///
    /// Records name their location with the keys returned by
    /// [`RegionLevel::record_key`]. A record missing a key that the filter
    /// constrains is rejected.
    pub fn accepts(&self, record: &Map<String, Value>) -> bool {
        if self.level >= RegionLevel::City {
            if let Some(city) = &self.city {
                if record_str(record, RegionLevel::City) != Some(city.as_str()) {
                    return false;
                }
            }
        }

        let constraints = [
            (RegionLevel::Zone, &self.regions),
            (RegionLevel::Township, &self.townships),
            (RegionLevel::Village, &self.villages),
        ];

        constraints
            .iter()
            .filter(|(level, names)| *level <= self.level && !names.is_empty())
            .all(|(level, names)| {
                record_str(record, *level)
                    .map(|name| names.iter().any(|n| n == name))
                    .unwrap_or(false)
            })
    }

    /// Whether nothing narrows the data at the current level.
    pub fn is_unfiltered(&self) -> bool {
        let city_free = self.level < RegionLevel::City || self.city.is_none();
        let zone_free = self.level < RegionLevel::Zone || self.regions.is_empty();
        let township_free = self.level < RegionLevel::Township || self.townships.is_empty();
        let village_free = self.level < RegionLevel::Village || self.villages.is_empty();
        city_free && zone_free && township_free && village_free
    }
}

fn record_str(record: &Map<String, Value>, level: RegionLevel) -> Option<&str> {
    record.get(level.record_key()).and_then(Value::as_str)
}

//! Background basemap selection.

use serde::{Deserialize, Serialize};

/// Basemap drawn underneath the statistics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    /// Standard road map
    #[default]
    Base,
    Gray,
    Midnight,
    Satellite,
    /// Satellite imagery with road and label overlay
    Hybrid,
}

impl MapType {
    pub fn name(&self) -> &'static str {
        match self {
            MapType::Base => "base",
            MapType::Gray => "gray",
            MapType::Midnight => "midnight",
            MapType::Satellite => "satellite",
            MapType::Hybrid => "hybrid",
        }
    }

    pub fn all() -> &'static [MapType] {
        &[
            MapType::Base,
            MapType::Gray,
            MapType::Midnight,
            MapType::Satellite,
            MapType::Hybrid,
        ]
    }
}

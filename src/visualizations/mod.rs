//! Visualization variants.
//!
//! Each variant is a marker type implementing [`Visualization`]. The shared
//! state lives in [`MapState`](crate::state::MapState); a variant adds its
//! selection payload, setters for it, and the two render delegates.

mod aging;
mod crop_distribution;
mod disaster;
mod groundwater;
mod hibernation_vegetable;
mod mandarin;
mod registry;
mod traits;
mod tree_age;

pub use aging::{AgeBasis, AgingSelection, AgingStatus};
pub use crop_distribution::{CropDistribution, CropSelection};
pub use disaster::{DisasterCategory, DisasterInfo, DisasterSelection};
pub use groundwater::{Groundwater, GroundwaterSelection, QualityItem};
pub use hibernation_vegetable::{HibernationSelection, HibernationVegetable};
pub use mandarin::{CultivationType, MandarinCultivation, MandarinSelection};
pub use registry::{MapConstructor, VisualizationEntry, VisualizationRegistry};
pub use traits::{Selection, Visualization};
pub use tree_age::{TreeAge, TreeAgeSelection};

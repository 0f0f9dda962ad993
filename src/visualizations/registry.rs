//! Registry for discovering and constructing visualization kinds.

use std::collections::HashMap;
use std::rc::Rc;

use super::aging::AgingStatus;
use super::crop_distribution::CropDistribution;
use super::disaster::DisasterInfo;
use super::groundwater::Groundwater;
use super::hibernation_vegetable::HibernationVegetable;
use super::mandarin::MandarinCultivation;
use super::traits::Visualization;
use super::tree_age::TreeAge;
use crate::model::MapOptions;
use crate::state::{MapInstance, MapState};

/// Constructor of a type-erased map.
pub type MapConstructor = fn(MapOptions) -> Rc<dyn MapInstance>;

/// A registered visualization kind.
#[derive(Clone, Copy)]
pub struct VisualizationEntry {
    pub kind: &'static str,
    pub display_name: &'static str,
    pub create: MapConstructor,
    pub default_options: fn() -> MapOptions,
}

impl std::fmt::Debug for VisualizationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualizationEntry")
            .field("kind", &self.kind)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

fn construct<V: Visualization>(options: MapOptions) -> Rc<dyn MapInstance> {
    MapState::<V>::create(options)
}

/// Registry of available visualizations.
///
/// All built-in visualizations are registered on creation. Pages look up a
/// kind id and get back a map behind `Rc<dyn MapInstance>`.
pub struct VisualizationRegistry {
    entries: HashMap<&'static str, VisualizationEntry>,
}

impl VisualizationRegistry {
    /// Create a registry with every built-in visualization.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
        };

        registry.register::<CropDistribution>();
        registry.register::<DisasterInfo>();
        registry.register::<Groundwater>();
        registry.register::<AgingStatus>();
        registry.register::<MandarinCultivation>();
        registry.register::<TreeAge>();
        registry.register::<HibernationVegetable>();

        registry
    }

    /// Register a visualization. Re-registering a kind replaces it.
    pub fn register<V: Visualization>(&mut self) {
        let entry = VisualizationEntry {
            kind: V::KIND,
            display_name: V::DISPLAY_NAME,
            create: construct::<V>,
            default_options: V::default_options,
        };
        if self.entries.insert(V::KIND, entry).is_some() {
            log::warn!("Visualization '{}' registered twice", V::KIND);
        }
    }

    pub fn get(&self, kind: &str) -> Option<&VisualizationEntry> {
        self.entries.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Construct a map of `kind`, with the kind's default options unless
    /// `options` is given.
    pub fn create(&self, kind: &str, options: Option<MapOptions>) -> Option<Rc<dyn MapInstance>> {
        let entry = self.get(kind)?;
        let options = options.unwrap_or_else(entry.default_options);
        Some((entry.create)(options))
    }

    /// Registered kind ids, sorted.
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.entries.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// All entries, sorted by kind.
    pub fn all(&self) -> Vec<&VisualizationEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.kind);
        entries
    }
}

impl Default for VisualizationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_visualizations() {
        let registry = VisualizationRegistry::new();

        assert_eq!(
            registry.kinds(),
            vec![
                "aging-status",
                "crop-distribution",
                "disaster-info",
                "groundwater",
                "hibernation-vegetable",
                "mandarin-cultivation",
                "tree-age",
            ]
        );
        assert_eq!(registry.get("groundwater").unwrap().display_name, "지하수 수질");
    }

    #[test]
    fn test_create_with_defaults() {
        let registry = VisualizationRegistry::new();
        let map = registry.create("disaster-info", None).unwrap();

        assert_eq!(map.kind(), "disaster-info");
        assert_eq!(map.options().title, "농업 재해 현황");
        assert_eq!(map.revision(), 0);
    }

    #[test]
    fn test_create_with_options() {
        let registry = VisualizationRegistry::new();
        let map = registry
            .create("tree-age", Some(MapOptions::new("감귤 수령")))
            .unwrap();
        assert_eq!(map.options().title, "감귤 수령");
    }

    #[test]
    fn test_unknown_kind() {
        let registry = VisualizationRegistry::new();
        assert!(registry.create("weather", None).is_none());
        assert!(!registry.contains("weather"));
    }

    #[test]
    fn test_instances_are_independent() {
        let registry = VisualizationRegistry::new();
        let a = registry.create("crop-distribution", None).unwrap();
        let b = registry.create("crop-distribution", None).unwrap();

        assert_ne!(a.id(), b.id());
        a.set_exclude_dong(true);
        assert!(!b.exclude_dong());
    }
}

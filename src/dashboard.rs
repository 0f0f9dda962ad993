//! Page-level composition of registry, map list and configuration.

use std::rc::Rc;

use crate::config::DashboardConfig;
use crate::model::{MapId, MapOptions};
use crate::render::RenderBinding;
use crate::session::SessionStore;
use crate::share::{self, ShareError};
use crate::state::{MapInstance, MapList};
use crate::visualizations::VisualizationRegistry;

/// Errors from dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Unknown visualization kind '{0}'")]
    UnknownKind(String),

    #[error(transparent)]
    Share(#[from] ShareError),
}

/// One dashboard page: a list of maps of registered visualizations.
pub struct Dashboard {
    registry: VisualizationRegistry,
    config: DashboardConfig,
    session: SessionStore,
    list: MapList<dyn MapInstance>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_registry(VisualizationRegistry::new(), config)
    }

    pub fn with_registry(registry: VisualizationRegistry, config: DashboardConfig) -> Self {
        Self {
            registry,
            config,
            session: SessionStore::new(),
            list: MapList::new("지도", None),
        }
    }

    /// Add a map of `kind` and, when `url` carries a share token and this is
    /// the first map, seed it from the link.
    pub fn mount(
        &self,
        kind: &str,
        url: Option<&str>,
    ) -> Result<Rc<dyn MapInstance>, DashboardError> {
        let map = self.add_map(kind, None)?;
        if let Some(url) = url {
            if self.list.len() == 1 {
                share::seed_from_url(&self.list, url);
            }
        }
        Ok(map)
    }

    /// Add a map of `kind` with the kind's default options unless `options`
    /// is given; configured preferences are applied to the new map.
    pub fn add_map(
        &self,
        kind: &str,
        options: Option<MapOptions>,
    ) -> Result<Rc<dyn MapInstance>, DashboardError> {
        let entry = self
            .registry
            .get(kind)
            .ok_or_else(|| DashboardError::UnknownKind(kind.to_string()))?;
        let options = options.unwrap_or_else(entry.default_options);

        let map = self.list.add_map(entry.create, Some(options), None, None);
        self.apply_preferences(map.as_ref());
        Ok(map)
    }

    /// Only preferences differing from the map's defaults are set, so a map
    /// under default preferences starts at revision 0.
    fn apply_preferences(&self, map: &dyn MapInstance) {
        let prefs = &self.config.preferences;

        if map.map_type() != prefs.default_map_type {
            map.set_map_type(prefs.default_map_type);
        }
        let setting = prefs.visualization_setting();
        if map.visualization_setting() != setting {
            map.set_visualization_setting(setting);
        }
        if map.selected_region_level() != prefs.default_region_level {
            map.set_selected_region_level(prefs.default_region_level);
        }
        if map.exclude_dong() != prefs.exclude_dong {
            map.set_exclude_dong(prefs.exclude_dong);
        }
    }

    pub fn remove_map(&self, id: &MapId) -> Option<Rc<dyn MapInstance>> {
        self.list.remove_map(id)
    }

    /// Share link for the first map, built on `base_url`.
    pub fn share_link(&self, base_url: &str) -> Result<Option<String>, DashboardError> {
        let Some(map) = self.list.first_map() else {
            return Ok(None);
        };
        Ok(Some(share::share_url(base_url, map.as_ref())?))
    }

    /// Renderer bound to the map `id`.
    pub fn bind(&self, id: &MapId) -> Option<RenderBinding<dyn MapInstance>> {
        RenderBinding::for_id(&self.list, id)
    }

    /// Full data URL of a map, if its options name an endpoint.
    pub fn data_url(&self, map: &dyn MapInstance) -> Option<String> {
        let endpoint = map.options().endpoint.as_deref()?;
        Some(self.config.preferences.endpoint_url(endpoint))
    }

    pub fn maps(&self) -> &MapList<dyn MapInstance> {
        &self.list
    }

    pub fn registry(&self) -> &VisualizationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Login state of the page.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.list.destroy();
    }
}

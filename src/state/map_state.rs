//! Per-map observable state.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use agrimap_store::{Listener, ListenerSet, Revision, Subscription};
use serde::Serialize;
use serde_json::{Map, Value};

use super::instance::MapInstance;
use super::patch::{apply_sparse, patch_field};
use crate::model::{MapId, MapOptions, MapType, RegionFilterSetting, VisualizationSetting};
use crate::render::{ChartSpec, LayerSpec};
use crate::visualizations::{Selection, Visualization};

/// Mutable fields of a map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapFields<S> {
    pub region_filter: RegionFilterSetting,
    pub visualization: VisualizationSetting,
    pub map_type: MapType,
    pub exclude_dong: bool,
    pub selection: S,
}

/// Read-only view handed to render delegates.
#[derive(Debug)]
pub struct MapView<'a, S> {
    pub id: &'a MapId,
    pub kind: &'static str,
    pub options: &'a MapOptions,
    pub fields: &'a MapFields<S>,
}

impl<S> MapView<'_, S> {
    pub fn selection(&self) -> &S {
        &self.fields.selection
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareableState<'a, S> {
    map_type: MapType,
    region_filter_setting: &'a RegionFilterSetting,
    visualization_setting: &'a VisualizationSetting,
    #[serde(flatten)]
    selection: &'a S,
}

/// Observable state of one map of visualization `V`.
///
/// State is only changed through setters. Each setter mutates the fields,
/// bumps the revision and notifies listeners before returning. Variant
/// setters (selected crop, year, ...) live in inherent impls on
/// `MapState<Variant>` next to each visualization.
pub struct MapState<V: Visualization> {
    id: MapId,
    options: MapOptions,
    fields: RefCell<MapFields<V::Selection>>,
    revision: Revision,
    listeners: ListenerSet,
    _kind: PhantomData<V>,
}

impl<V: Visualization> MapState<V> {
    pub fn new(options: MapOptions) -> Self {
        let id = MapId::generate();
        log::debug!("Created {} map {}", V::KIND, id);
        Self {
            id,
            options,
            fields: RefCell::new(MapFields::default()),
            revision: Revision::new(),
            listeners: ListenerSet::new(),
            _kind: PhantomData,
        }
    }

    /// Construct a shared map. Usable as the constructor passed to
    /// [`MapList::add_map`](super::MapList::add_map).
    pub fn create(options: MapOptions) -> Rc<Self> {
        Rc::new(Self::new(options))
    }

    /// A map with the visualization's default options.
    pub fn with_defaults() -> Self {
        Self::new(V::default_options())
    }

    /// Current selection payload.
    pub fn selection(&self) -> V::Selection {
        self.fields.borrow().selection.clone()
    }

    /// Copy of every mutable field.
    pub fn fields(&self) -> MapFields<V::Selection> {
        self.fields.borrow().clone()
    }

    /// Mutate the selection payload and notify.
    pub fn update_selection<F>(&self, update: F)
    where
        F: FnOnce(&mut V::Selection),
    {
        self.mutate(|fields| update(&mut fields.selection));
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn mutate<F>(&self, update: F)
    where
        F: FnOnce(&mut MapFields<V::Selection>),
    {
        {
            let mut fields = self.fields.borrow_mut();
            update(&mut fields);
        }
        self.revision.bump();
        self.listeners.notify();
    }

    fn view<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&MapView<'_, V::Selection>) -> R,
    {
        let fields = self.fields.borrow();
        let view = MapView {
            id: &self.id,
            kind: V::KIND,
            options: &self.options,
            fields: &fields,
        };
        f(&view)
    }
}

impl<V: Visualization> MapInstance for MapState<V> {
    fn id(&self) -> &MapId {
        &self.id
    }

    fn kind(&self) -> &'static str {
        V::KIND
    }

    fn options(&self) -> &MapOptions {
        &self.options
    }

    fn revision(&self) -> u64 {
        self.revision.get()
    }

    fn snapshot(&self) -> String {
        let fields = self.fields.borrow();
        format!(
            "{}:{}",
            self.revision,
            fields.selection.snapshot_fragment()
        )
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    fn destroy(&self) {
        if !self.listeners.is_empty() {
            log::debug!("Destroying {} map {}", V::KIND, self.id);
        }
        self.listeners.clear();
    }

    fn region_filter_setting(&self) -> RegionFilterSetting {
        self.fields.borrow().region_filter.clone()
    }

    fn set_region_filter_setting(&self, setting: RegionFilterSetting) {
        self.mutate(|fields| fields.region_filter = setting);
    }

    fn visualization_setting(&self) -> VisualizationSetting {
        self.fields.borrow().visualization.clone()
    }

    fn set_visualization_setting(&self, setting: VisualizationSetting) {
        let setting = setting.sanitized();
        self.mutate(|fields| fields.visualization = setting);
    }

    fn map_type(&self) -> MapType {
        self.fields.borrow().map_type
    }

    fn set_map_type(&self, map_type: MapType) {
        self.mutate(|fields| fields.map_type = map_type);
    }

    fn exclude_dong(&self) -> bool {
        self.fields.borrow().exclude_dong
    }

    fn set_exclude_dong(&self, exclude: bool) {
        self.mutate(|fields| fields.exclude_dong = exclude);
    }

    fn shareable_state(&self) -> Value {
        let fields = self.fields.borrow();
        let state = ShareableState {
            map_type: fields.map_type,
            region_filter_setting: &fields.region_filter,
            visualization_setting: &fields.visualization,
            selection: &fields.selection,
        };

        match serde_json::to_value(&state) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Failed to serialize state of map {}: {}", self.id, e);
                Value::Object(Map::new())
            }
        }
    }

    fn apply_shared_state(&self, state: &Value) {
        let Some(patch) = state.as_object() else {
            log::debug!("Shared state for map {} is not an object", self.id);
            self.revision.bump();
            self.listeners.notify();
            return;
        };

        self.mutate(|fields| {
            patch_field(patch, "mapType", &mut fields.map_type);
            patch_field(patch, "regionFilterSetting", &mut fields.region_filter);
            if patch_field(patch, "visualizationSetting", &mut fields.visualization) {
                fields.visualization = fields.visualization.clone().sanitized();
            }
            let applied = apply_sparse(&mut fields.selection, patch);
            log::trace!("Applied {} selection field(s) to map {}", applied, self.id);
        });
    }

    fn render_map(&self, data: Option<&Value>) -> LayerSpec {
        self.view(|view| V::render_map(view, data))
    }

    fn render_chart(&self, data: Option<&Value>) -> ChartSpec {
        self.view(|view| V::render_chart(view, data))
    }
}

impl<V: Visualization> fmt::Debug for MapState<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapState")
            .field("kind", &V::KIND)
            .field("id", &self.id)
            .field("revision", &self.revision.get())
            .field("fields", &*self.fields.borrow())
            .field("listeners", &self.listeners)
            .finish()
    }
}

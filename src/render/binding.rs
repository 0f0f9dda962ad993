//! Binding between a map store and the code that draws it.
//!
//! A [`RenderBinding`] plays the role of an external-store hook: it
//! subscribes to one map, remembers the snapshot it last rendered, and
//! re-runs the map's render delegates only when that snapshot moved on.

use std::cell::Cell;
use std::rc::Rc;

use agrimap_store::{listener, Subscription};
use serde::Serialize;
use serde_json::Value;

use super::spec::{ChartSpec, LayerSpec};
use crate::model::MapId;
use crate::state::{MapInstance, MapList};

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    pub layer: LayerSpec,
    pub chart: ChartSpec,
}

/// Subscribes to a map and renders it on change.
pub struct RenderBinding<M: MapInstance + ?Sized> {
    map: Rc<M>,
    dirty: Rc<Cell<bool>>,
    last_snapshot: Option<String>,
    render_count: usize,
    _subscription: Subscription,
}

impl<M: MapInstance + ?Sized> RenderBinding<M> {
    pub fn new(map: Rc<M>) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        let subscription = map.subscribe(listener(move || flag.set(true)));
        Self {
            map,
            dirty,
            last_snapshot: None,
            render_count: 0,
            _subscription: subscription,
        }
    }

    /// Bind to a map of `list`; `None` when the id is not in the list.
    pub fn for_id(list: &MapList<M>, id: &MapId) -> Option<Self> {
        match list.map_by_id(id) {
            Some(map) => Some(Self::new(map)),
            None => {
                log::debug!("No map {} to bind a renderer to", id);
                None
            }
        }
    }

    pub fn map(&self) -> &Rc<M> {
        &self.map
    }

    /// Whether the map changed since the last render.
    pub fn is_stale(&self) -> bool {
        self.dirty.get() || self.last_snapshot.as_deref() != Some(self.map.snapshot().as_str())
    }

    /// Number of render passes so far.
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    /// Render if the map changed since the last render.
    pub fn poll(&mut self, data: Option<&Value>) -> Option<RenderOutput> {
        if self.is_stale() {
            Some(self.render(data))
        } else {
            None
        }
    }

    /// Render unconditionally, e.g. after new data arrived.
    pub fn render(&mut self, data: Option<&Value>) -> RenderOutput {
        self.dirty.set(false);
        self.last_snapshot = Some(self.map.snapshot());
        self.render_count += 1;
        log::trace!("Rendering map {}", self.map.id());
        RenderOutput {
            layer: self.map.render_map(data),
            chart: self.map.render_chart(data),
        }
    }
}

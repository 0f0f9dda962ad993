//! A dynamic collection of maps with screen positions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use agrimap_store::{Listener, ListenerId, ListenerSet, Subscription};

use super::instance::MapInstance;
use crate::constants::{CASCADE_LENGTH, CASCADE_ORIGIN, CASCADE_STEP};
use crate::model::{MapId, MapOptions, Position};

struct ListInner<M: ?Sized> {
    maps: Vec<Rc<M>>,
    positions: HashMap<MapId, Position>,
    title: String,
    tooltip: Option<String>,
}

/// One aggregate subscription: the listener plus its registrations on every
/// current child map.
struct Chain {
    id: ListenerId,
    listener: Listener,
    children: Vec<(MapId, Subscription)>,
}

/// Owns a set of maps, their panel positions and an aggregate subscription.
///
/// `M` is usually a concrete `MapState<V>`; `MapList<dyn MapInstance>` holds
/// maps of mixed visualizations.
///
/// Aggregate subscriptions follow membership: a listener subscribed through
/// [`MapList::subscribe`] is attached to maps added later and detached from
/// maps as they are removed.
pub struct MapList<M: MapInstance + ?Sized> {
    inner: RefCell<ListInner<M>>,
    listeners: ListenerSet,
    chains: Rc<RefCell<Vec<Chain>>>,
}

impl<M: MapInstance + ?Sized> MapList<M> {
    /// Create an empty list. `title` and `tooltip` are the defaults given to
    /// maps added without their own.
    pub fn new(title: impl Into<String>, tooltip: Option<String>) -> Self {
        Self {
            inner: RefCell::new(ListInner {
                maps: Vec::new(),
                positions: HashMap::new(),
                title: title.into(),
                tooltip,
            }),
            listeners: ListenerSet::new(),
            chains: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Construct a map through `ctor`, append it and place it on the
    /// diagonal cascade.
    ///
    /// The title is taken from `title`, then `options.title`, then the list
    /// default; the tooltip likewise.
    pub fn add_map<F>(
        &self,
        ctor: F,
        options: Option<MapOptions>,
        title: Option<&str>,
        tooltip: Option<&str>,
    ) -> Rc<M>
    where
        F: FnOnce(MapOptions) -> Rc<M>,
    {
        let mut options = options.unwrap_or_default();
        {
            let inner = self.inner.borrow();
            if let Some(title) = title {
                options.title = title.to_string();
            } else if options.title.is_empty() {
                options.title = inner.title.clone();
            }
            if let Some(tooltip) = tooltip {
                options.tooltip = Some(tooltip.to_string());
            } else if options.tooltip.is_none() {
                options.tooltip = inner.tooltip.clone();
            }
        }

        let map = ctor(options);
        let id = map.id().clone();

        let position = {
            let mut inner = self.inner.borrow_mut();
            inner.maps.push(Rc::clone(&map));
            let position = cascade_position(inner.maps.len());
            inner.positions.insert(id.clone(), position);
            position
        };

        for chain in self.chains.borrow_mut().iter_mut() {
            let subscription = map.subscribe(Rc::clone(&chain.listener));
            chain.children.push((id.clone(), subscription));
        }

        log::debug!(
            "Added {} map {} at ({}, {})",
            map.kind(),
            id,
            position.x,
            position.y
        );
        self.listeners.notify();
        map
    }

    /// Remove a map and its position. Returns the removed map; does nothing
    /// if `id` is unknown.
    ///
    /// The removed map is not destroyed: listeners registered on it directly
    /// stay registered.
    pub fn remove_map(&self, id: &MapId) -> Option<Rc<M>> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let index = inner.maps.iter().position(|map| map.id() == id)?;
            inner.positions.remove(id);
            inner.maps.remove(index)
        };

        let detached: Vec<Subscription> = {
            let mut chains = self.chains.borrow_mut();
            chains
                .iter_mut()
                .flat_map(|chain| {
                    let (gone, kept) = std::mem::take(&mut chain.children)
                        .into_iter()
                        .partition::<Vec<_>, _>(|(child, _)| child == id);
                    chain.children = kept;
                    gone.into_iter().map(|(_, subscription)| subscription)
                })
                .collect()
        };
        drop(detached);

        log::debug!("Removed {} map {}", removed.kind(), id);
        self.listeners.notify();
        Some(removed)
    }

    /// Move a map panel. Unknown ids are ignored; coordinates are not
    /// bounds-checked. Does not notify.
    pub fn update_map_position(&self, id: &MapId, x: f64, y: f64) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.positions.get_mut(id) {
            Some(position) => {
                *position = Position::new(x, y);
                true
            }
            None => {
                log::debug!("Ignoring position update for unknown map {}", id);
                false
            }
        }
    }

    pub fn map_position(&self, id: &MapId) -> Option<Position> {
        self.inner.borrow().positions.get(id).copied()
    }

    pub fn map_by_id(&self, id: &MapId) -> Option<Rc<M>> {
        self.inner
            .borrow()
            .maps
            .iter()
            .find(|map| map.id() == id)
            .cloned()
    }

    /// The map share links target.
    pub fn first_map(&self) -> Option<Rc<M>> {
        self.inner.borrow().maps.first().cloned()
    }

    /// Maps in insertion order.
    pub fn maps(&self) -> Vec<Rc<M>> {
        self.inner.borrow().maps.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn title(&self) -> String {
        self.inner.borrow().title.clone()
    }

    pub fn tooltip(&self) -> Option<String> {
        self.inner.borrow().tooltip.clone()
    }

    /// Subscribe to membership changes and to every child map.
    pub fn subscribe(&self, listener: Listener) -> ListSubscription {
        let container = self.listeners.subscribe(Rc::clone(&listener));
        let children = self
            .inner
            .borrow()
            .maps
            .iter()
            .map(|map| (map.id().clone(), map.subscribe(Rc::clone(&listener))))
            .collect();

        let id = container.id();
        self.chains.borrow_mut().push(Chain {
            id,
            listener,
            children,
        });

        ListSubscription {
            id,
            chains: Rc::downgrade(&self.chains),
            _container: container,
        }
    }

    /// Number of aggregate subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// `{mapId}@{mapSnapshot}` for every map, joined by `|`.
    ///
    /// Map ids are part of the string, so replacing a map by another with an
    /// identical snapshot still changes the list snapshot.
    pub fn snapshot(&self) -> String {
        self.inner
            .borrow()
            .maps
            .iter()
            .map(|map| format!("{}@{}", map.id(), map.snapshot()))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Destroy every map and drop every aggregate subscription.
    pub fn destroy(&self) {
        for map in self.maps() {
            map.destroy();
        }
        let chains = std::mem::take(&mut *self.chains.borrow_mut());
        drop(chains);
        self.listeners.clear();
    }
}

impl<M: MapInstance + ?Sized> fmt::Debug for MapList<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MapList")
            .field("title", &inner.title)
            .field("maps", &inner.maps.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}

/// Position of the `count`-th map of a list (1-based).
pub fn cascade_position(count: usize) -> Position {
    let offset = (count.saturating_sub(1) % CASCADE_LENGTH) as f64;
    Position::new(
        CASCADE_ORIGIN + offset * CASCADE_STEP,
        CASCADE_ORIGIN + offset * CASCADE_STEP,
    )
}

/// Guard for an aggregate subscription. Dropping it detaches the listener
/// from the list and from every child map.
#[must_use = "dropping a ListSubscription immediately removes its listener"]
pub struct ListSubscription {
    id: ListenerId,
    chains: Weak<RefCell<Vec<Chain>>>,
    _container: Subscription,
}

impl ListSubscription {
    /// Remove the listener everywhere now.
    pub fn unsubscribe(self) {}
}

impl Drop for ListSubscription {
    fn drop(&mut self) {
        let Some(chains) = self.chains.upgrade() else {
            return;
        };
        let removed = {
            let mut chains = chains.borrow_mut();
            chains
                .iter()
                .position(|chain| chain.id == self.id)
                .map(|index| chains.remove(index))
        };
        drop(removed);
    }
}

impl fmt::Debug for ListSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSubscription").field("id", &self.id).finish()
    }
}

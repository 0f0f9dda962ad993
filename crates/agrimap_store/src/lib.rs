//! agrimap_store - observable store primitives for agrimap
//!
//! This crate provides the small publisher/subscriber layer that map states
//! and map lists are built on:
//!
//! - [`ListenerSet`]: an ordered set of listeners with synchronous,
//!   re-entrancy-safe notification
//! - [`Subscription`]: a guard that removes exactly one listener when dropped
//! - [`Revision`]: a monotonic counter used as an external-store snapshot
//!
//! Everything here is single-threaded (`Rc`/`RefCell`), matching the UI event
//! loop the stores live on.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use agrimap_store::{listener, ListenerSet};
//!
//! let set = ListenerSet::new();
//! let hits = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&hits);
//! let subscription = set.subscribe(listener(move || counter.set(counter.get() + 1)));
//!
//! set.notify();
//! assert_eq!(hits.get(), 1);
//!
//! drop(subscription);
//! set.notify();
//! assert_eq!(hits.get(), 1);
//! ```

mod listener;
mod revision;

pub use listener::{listener, Listener, ListenerId, ListenerSet, Subscription, MAX_NOTIFY_PASSES};
pub use revision::Revision;

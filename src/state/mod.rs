//! Map state management modules.

mod instance;
mod map_list;
mod map_state;
mod patch;

pub use instance::MapInstance;
pub use map_list::{cascade_position, ListSubscription, MapList};
pub use map_state::{MapFields, MapState, MapView};
pub use patch::{apply_sparse, patch_field};

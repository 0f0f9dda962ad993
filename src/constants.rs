//! Global constants for agrimap

/// Fewest legend classes a user can pick
pub const MIN_LEVEL_COUNT: u8 = 5;

/// Most legend classes a user can pick
pub const MAX_LEVEL_COUNT: u8 = 10;

/// Legend classes of a new map
pub const DEFAULT_LEVEL_COUNT: u8 = 5;

/// Layer transparency of a new map
pub const DEFAULT_TRANSPARENCY: f64 = 0.2;

/// Screen position of the first map in a list
pub const CASCADE_ORIGIN: f64 = 50.0;

/// Offset between consecutive maps in a list
pub const CASCADE_STEP: f64 = 20.0;

/// Number of diagonal steps before new maps wrap back to the origin
pub const CASCADE_LENGTH: usize = 5;

/// Query parameter carrying a shared map state
pub const SHARE_QUERY_PARAM: &str = "config";

/// Current share-link payload version
pub const SHARE_PAYLOAD_VERSION: u32 = 1;

/// Upper bound on the decompressed size of a share payload
pub const MAX_SHARE_PAYLOAD_BYTES: u64 = 1024 * 1024;

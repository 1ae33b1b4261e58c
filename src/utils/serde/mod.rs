mod network_id;
pub use network_id::*;

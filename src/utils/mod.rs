mod serde;
pub use serde::*;

mod service_info_log;
pub use service_info_log::*;

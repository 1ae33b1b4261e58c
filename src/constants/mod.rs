mod logging;
pub use logging::*;

mod relayer;
pub use relayer::*;

mod server;
pub use server::*;

mod worker;
pub use worker::*;

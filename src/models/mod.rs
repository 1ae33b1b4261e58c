mod chain;
pub use chain::*;

mod vaa;
pub use vaa::*;

mod delivery;
pub use delivery::*;

mod error;
pub use error::*;

mod health;
pub use health::*;

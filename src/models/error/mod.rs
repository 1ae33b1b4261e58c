mod vaa;
pub use vaa::*;

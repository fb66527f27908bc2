pub mod notify;
pub mod refresh;

pub use notify::*;
pub use refresh::*;

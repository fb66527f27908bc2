mod node;
mod prefs;
mod subscription;

pub use self::{node::*, prefs::*, subscription::*};

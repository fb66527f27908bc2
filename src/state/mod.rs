mod nodes;
mod pager;
mod subscriptions;

pub use self::{nodes::*, pager::Pager, subscriptions::*};

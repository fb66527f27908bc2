//! Manual node and subscription list management for the liebesu clash
//! client: search, pagination, duplicate removal, region sorting and
//! remote node-count refresh.

pub mod config;
pub mod feat;
pub mod process;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use crate::{
    config::{ManagerPreferences, Node, Subscription},
    feat::{
        BatchItemResult, BatchUpdateResponse, EventSink, NodeCountInfo, NoopSink, RemoteRefresh,
        Severity, Signal,
    },
    state::{
        BatchRefreshSummary, DedupReport, Mutation, NodeCollection, RefreshOutcome,
        SubscriptionCollection, SubscriptionStats,
    },
    utils::{canonical::canonicalize, region::RegionClassifier},
};

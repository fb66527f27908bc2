//! Boundary to the service that resolves subscriptions into node counts.

use anyhow::Result;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 单个订阅的节点数查询结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCountInfo {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub user_info: Option<Value>,
}

/// 批量更新中单个订阅的结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub node_count: Option<u64>,
    #[serde(default)]
    pub user_info: Option<Value>,
}

/// 批量更新接口的整体响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<BatchItemResult>,
}

/// Remote capability consumed by the subscription collection.
///
/// Implementations own their own timeout policy; a hung call keeps the
/// subscription in the updating state until it resolves.
pub trait RemoteRefresh: Send + Sync {
    fn fetch_node_count<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<NodeCountInfo>>;

    fn batch_update_nodes<'a>(
        &'a self,
        ids: &'a [String],
    ) -> BoxFuture<'a, Result<BatchUpdateResponse>>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn batch_response_reads_wire_names() {
        let resp: BatchUpdateResponse = serde_json::from_value(json!({
            "success": true,
            "results": [
                {"id": "a", "success": true, "nodeCount": 12, "userInfo": {"upload": 1}},
                {"id": "b", "success": false},
            ]
        }))
        .unwrap();
        assert!(resp.message.is_none());
        assert_eq!(resp.results[0].node_count, Some(12));
        assert_eq!(resp.results[0].user_info, Some(json!({"upload": 1})));
        assert!(!resp.results[1].success);
    }

    #[test]
    fn node_count_info_tolerates_missing_fields() {
        let info: NodeCountInfo = serde_json::from_value(json!({})).unwrap();
        assert_eq!(info, NodeCountInfo::default());
    }
}

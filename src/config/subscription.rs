use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::node::{default_enabled, null_as_enabled};
use crate::utils::help::{generate_id, is_http_url, null_as_default};

/// 订阅
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// 订阅地址，不一定是 http(s)
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default = "default_enabled", deserialize_with = "null_as_enabled")]
    pub enabled: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub node_count: u64,

    /// Transient; never written out.
    #[serde(default, skip_serializing)]
    pub is_updating: bool,

    #[serde(default)]
    pub user_info: Option<Value>,

    /// 节点排除表达式
    #[serde(default, deserialize_with = "null_as_default")]
    pub exclude: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subscription {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            url: url.into(),
            enabled: true,
            ..Default::default()
        }
    }

    /// Only http(s) subscriptions are resolved remotely.
    pub fn is_remote(&self) -> bool {
        is_http_url(&self.url)
    }

    pub(crate) fn display_name(&self) -> &str {
        if self.name.is_empty() { "订阅" } else { &self.name }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_and_nulls() {
        let sub: Subscription = serde_json::from_value(json!({
            "name": "机场A",
            "url": "https://example.com/sub",
            "nodeCount": null,
            "userInfo": null,
            "exclude": null,
        }))
        .unwrap();
        assert!(sub.enabled);
        assert_eq!(sub.node_count, 0);
        assert!(sub.user_info.is_none());
        assert!(sub.exclude.is_empty());
        assert!(sub.is_remote());
    }

    #[test]
    fn updating_flag_is_never_serialized() {
        let mut sub = Subscription::new("a", "https://example.com");
        sub.is_updating = true;
        let value = serde_json::to_value(&sub).unwrap();
        assert!(value.get("isUpdating").is_none());
        assert_eq!(value["nodeCount"], json!(0));
    }

    #[test]
    fn local_subscriptions_are_not_remote() {
        assert!(!Subscription::new("local", "ss://abc").is_remote());
        assert_eq!(Subscription::default().display_name(), "订阅");
    }
}

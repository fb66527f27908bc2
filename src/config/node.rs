use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::utils::help::{generate_id, null_as_default};

/// 手动节点
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// 代理链接，如 `vmess://...`、`trojan://...#名称`
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default = "default_enabled", deserialize_with = "null_as_enabled")]
    pub enabled: bool,

    /// 其他字段原样保留
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            url: url.into(),
            enabled: true,
            extra: Map::new(),
        }
    }
}

pub(crate) fn default_enabled() -> bool {
    true
}

pub(crate) fn null_as_enabled<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

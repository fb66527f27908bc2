//! 节点去重键
//!
//! vmess 链接的载荷是 base64 编码的 JSON，其中 `ps` / `remark` 只是显示名称。
//! 去掉这两个字段后按键名排序重新序列化，使得仅名称不同的链接得到相同的键。
//! 其他协议只取 `#` 之前的部分。

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde_json::Value;

use crate::{logging, utils::logging::Type};

const VMESS_SCHEME: &str = "vmess://";

/// Fields that carry a user-visible label rather than identity.
const LABEL_FIELDS: [&str; 2] = ["ps", "remark"];

const FORGIVING: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_FORGIVING: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, FORGIVING);
const URL_SAFE_FORGIVING: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, FORGIVING);

/// Derive the dedup key for a proxy URI. Never fails: anything that cannot be
/// decoded is its own key.
pub fn canonicalize(uri: &str) -> String {
    if let Some(payload) = uri.strip_prefix(VMESS_SCHEME) {
        return match vmess_identity(payload) {
            Ok(identity) => format!("{VMESS_SCHEME}{identity}"),
            Err(err) => {
                logging!(debug, Type::Dedup, "无法解析 vmess 链接，使用原始字符串: {:#}", err);
                uri.to_string()
            }
        };
    }

    match uri.find('#') {
        Some(idx) => uri[..idx].to_string(),
        None => uri.to_string(),
    }
}

fn vmess_identity(payload: &str) -> Result<String> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD_FORGIVING
        .decode(compact.as_bytes())
        .or_else(|_| URL_SAFE_FORGIVING.decode(compact.as_bytes()))
        .context("vmess payload is not base64")?;
    let decoded = String::from_utf8(bytes).context("vmess payload is not utf-8")?;
    let cleaned: String = decoded.chars().filter(|c| !c.is_whitespace()).collect();

    let Value::Object(fields) = serde_json::from_str::<Value>(&cleaned)
        .context("vmess payload is not json")?
    else {
        bail!("vmess payload is not a json object");
    };

    let sorted: BTreeMap<String, Value> = fields
        .into_iter()
        .filter(|(key, _)| !LABEL_FIELDS.contains(&key.as_str()))
        .collect();

    serde_json::to_string(&sorted).context("failed to serialize vmess identity")
}

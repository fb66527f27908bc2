use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::{
    logging,
    utils::{logging::Type, region::RegionClassifier},
};

pub const DEFAULT_NODE_PAGE_SIZE: usize = 24;
pub const DEFAULT_SUBSCRIPTION_PAGE_SIZE: usize = 6;

/// 列表管理偏好设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerPreferences {
    pub node_page_size: usize,
    pub subscription_page_size: usize,
    /// 覆盖默认的地区排序优先级
    pub region_priority: Option<Vec<String>>,
    pub log_level: String,
}

impl Default for ManagerPreferences {
    fn default() -> Self {
        Self {
            node_page_size: DEFAULT_NODE_PAGE_SIZE,
            subscription_page_size: DEFAULT_SUBSCRIPTION_PAGE_SIZE,
            region_priority: None,
            log_level: "info".into(),
        }
    }
}

impl ManagerPreferences {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let prefs: Self =
            serde_yaml_ng::from_str(content).context("failed to parse manager preferences")?;
        if let Err(err) = prefs.validate() {
            logging!(warn, Type::Config, "偏好设置无效: {}", err);
            return Err(err);
        }
        Ok(prefs)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let prefs = Self::from_yaml_str(&content)?;
        logging!(
            debug,
            Type::Config,
            "已加载偏好设置 {}: 节点每页 {}，订阅每页 {}",
            path.display(),
            prefs.node_page_size,
            prefs.subscription_page_size
        );
        Ok(prefs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.node_page_size == 0 {
            bail!("node_page_size must be greater than zero");
        }
        if self.subscription_page_size == 0 {
            bail!("subscription_page_size must be greater than zero");
        }
        Ok(())
    }

    pub fn region_classifier(&self) -> RegionClassifier {
        match &self.region_priority {
            Some(order) => RegionClassifier::with_priority(order.clone()),
            None => RegionClassifier::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let prefs = ManagerPreferences::from_yaml_str("node_page_size: 50\n").unwrap();
        assert_eq!(prefs.node_page_size, 50);
        assert_eq!(prefs.subscription_page_size, DEFAULT_SUBSCRIPTION_PAGE_SIZE);
        assert_eq!(prefs.log_level, "info");
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(
            ManagerPreferences::from_yaml_str("  \n").unwrap(),
            ManagerPreferences::default()
        );
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(ManagerPreferences::from_yaml_str("subscription_page_size: 0").is_err());
        assert!(ManagerPreferences::from_yaml_str("node_page_size: [1]").is_err());
    }

    #[test]
    fn custom_region_priority() {
        let prefs = ManagerPreferences::from_yaml_str("region_priority: [JP, HK]").unwrap();
        let mut classifier = prefs.region_classifier();
        assert_eq!(classifier.rank("日本 01"), 0);
        assert_eq!(classifier.rank("美国 01"), usize::MAX);
    }

    #[test]
    fn load_reads_yaml_from_disk() {
        let path = std::env::temp_dir().join(format!("node-manager-prefs-{}.yaml", std::process::id()));
        std::fs::write(&path, "subscription_page_size: 12\nlog_level: debug\n").unwrap();
        let prefs = ManagerPreferences::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(prefs.subscription_page_size, 12);
        assert_eq!(prefs.node_page_size, DEFAULT_NODE_PAGE_SIZE);
        assert_eq!(prefs.log_level, "debug");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ManagerPreferences::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{logging_error, utils::logging::Type};

/// Code assigned to names that match no region rule.
pub const UNCLASSIFIED: &str = "ZZ";

/// 地区匹配规则，按声明顺序取第一个命中的地区。
/// 短代码区分大小写，英文全称不区分大小写。
const REGION_PATTERNS: &[(&str, &str)] = &[
    ("HK", r"香港|🇭🇰|HK|(?i:Hong\s*Kong)"),
    ("TW", r"台湾|臺灣|🇹🇼|TW|(?i:Taiwan)"),
    ("SG", r"新加坡|狮城|🇸🇬|SG|(?i:Singapore)"),
    ("JP", r"日本|🇯🇵|JP|(?i:Japan)"),
    ("US", r"美国|美國|🇺🇸|US|(?i:United\s*States)"),
    ("KR", r"韩国|韓國|🇰🇷|KR|(?i:Korea)"),
    ("GB", r"英国|英國|🇬🇧|GB|(?i:UK)"),
    ("DE", r"德国|德國|🇩🇪|DE|(?i:Germany)"),
    ("FR", r"法国|法國|🇫🇷|FR|(?i:France)"),
    ("CA", r"加拿大|🇨🇦|CA|(?i:Canada)"),
    ("AU", r"澳大利亚|澳大利亞|澳洲|🇦🇺|AU|(?i:Australia)"),
];

/// Default ranking, identical to the declaration order above.
pub const DEFAULT_REGION_PRIORITY: &[&str] = &[
    "HK", "TW", "SG", "JP", "US", "KR", "GB", "DE", "FR", "CA", "AU",
];

struct RegionRule {
    code: &'static str,
    pattern: Regex,
}

static REGION_RULES: Lazy<Vec<RegionRule>> = Lazy::new(|| {
    REGION_PATTERNS
        .iter()
        .filter_map(|&(code, pattern)| match Regex::new(pattern) {
            Ok(pattern) => Some(RegionRule { code, pattern }),
            Err(e) => {
                logging_error!(Type::Sort, "地区规则 {} 编译失败: {}", code, e);
                None
            }
        })
        .collect()
});

/// Name → region code classifier with a per-instance memo.
///
/// Classification is a pure function of the name, so the cache is kept for
/// the lifetime of the classifier and shared across sort calls.
#[derive(Debug, Clone)]
pub struct RegionClassifier {
    priority: Vec<String>,
    cache: HashMap<String, &'static str>,
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::with_priority(DEFAULT_REGION_PRIORITY.iter().map(|c| c.to_string()).collect())
    }
}

impl RegionClassifier {
    pub fn with_priority(priority: Vec<String>) -> Self {
        Self {
            priority,
            cache: HashMap::new(),
        }
    }

    pub fn priority(&self) -> &[String] {
        &self.priority
    }

    /// First matching region in declaration order, or [`UNCLASSIFIED`].
    pub fn classify(&mut self, name: &str) -> &'static str {
        if let Some(code) = self.cache.get(name) {
            return *code;
        }
        let code = REGION_RULES
            .iter()
            .find(|rule| rule.pattern.is_match(name))
            .map_or(UNCLASSIFIED, |rule| rule.code);
        self.cache.insert(name.to_string(), code);
        code
    }

    /// Position of `code` in the priority order; `usize::MAX` when absent.
    pub fn rank_of(&self, code: &str) -> usize {
        self.priority
            .iter()
            .position(|c| c == code)
            .unwrap_or(usize::MAX)
    }

    pub fn rank(&mut self, name: &str) -> usize {
        let code = self.classify(name);
        self.rank_of(code)
    }

    pub fn cached_names(&self) -> usize {
        self.cache.len()
    }
}

//! 国家/地区代码别名表，用于节点搜索
//!
//! 搜索词恰好是表中的代码（如 `hk`）时，名称包含旗帜或中文名称的节点也会命中。

use std::collections::HashMap;

use once_cell::sync::Lazy;

const COUNTRY_ALIASES: &[(&str, &[&str])] = &[
    ("hk", &["🇭🇰", "香港"]),
    ("tw", &["🇹🇼", "台湾", "臺灣"]),
    ("sg", &["🇸🇬", "新加坡", "狮城"]),
    ("jp", &["🇯🇵", "日本"]),
    ("us", &["🇺🇸", "美国", "美國"]),
    ("kr", &["🇰🇷", "韩国", "韓國"]),
    ("gb", &["🇬🇧", "英国", "英國"]),
    ("de", &["🇩🇪", "德国", "德國"]),
    ("fr", &["🇫🇷", "法国", "法國"]),
    ("ca", &["🇨🇦", "加拿大"]),
    ("au", &["🇦🇺", "澳大利亚", "澳洲", "澳大利亞"]),
    ("cn", &["🇨🇳", "中国", "大陸", "内地"]),
    ("my", &["🇲🇾", "马来西亚", "馬來西亞"]),
    ("th", &["🇹🇭", "泰国", "泰國"]),
    ("vn", &["🇻🇳", "越南"]),
    ("ph", &["🇵🇭", "菲律宾", "菲律賓"]),
    ("id", &["🇮🇩", "印度尼西亚", "印尼"]),
    ("in", &["🇮🇳", "印度"]),
    ("pk", &["🇵🇰", "巴基斯坦"]),
    ("bd", &["🇧🇩", "孟加拉国", "孟加拉國"]),
    ("ae", &["🇦🇪", "阿联酋", "阿聯酋"]),
    ("sa", &["🇸🇦", "沙特阿拉伯"]),
    ("tr", &["🇹🇷", "土耳其"]),
    ("ru", &["🇷🇺", "俄罗斯", "俄羅斯"]),
    ("br", &["🇧🇷", "巴西"]),
    ("mx", &["🇲🇽", "墨西哥"]),
    ("ar", &["🇦🇷", "阿根廷"]),
    ("cl", &["🇨🇱", "智利"]),
    ("za", &["🇿🇦", "南非"]),
    ("eg", &["🇪🇬", "埃及"]),
    ("ng", &["🇳🇬", "尼日利亚", "尼日利亞"]),
    ("ke", &["🇰🇪", "肯尼亚", "肯尼亞"]),
    ("il", &["🇮🇱", "以色列"]),
    ("ir", &["🇮🇷", "伊朗"]),
    ("iq", &["🇮🇶", "伊拉克"]),
    ("ua", &["🇺🇦", "乌克兰", "烏克蘭"]),
    ("pl", &["🇵🇱", "波兰", "波蘭"]),
    ("cz", &["🇨🇿", "捷克"]),
    ("hu", &["🇭🇺", "匈牙利"]),
    ("ro", &["🇷🇴", "罗马尼亚", "羅馬尼亞"]),
    ("gr", &["🇬🇷", "希腊", "希臘"]),
    ("pt", &["🇵🇹", "葡萄牙"]),
    ("es", &["🇪🇸", "西班牙"]),
    ("it", &["🇮🇹", "意大利"]),
    ("nl", &["🇳🇱", "荷兰", "荷蘭"]),
    ("be", &["🇧🇪", "比利时", "比利時"]),
    ("se", &["🇸🇪", "瑞典"]),
    ("no", &["🇳🇴", "挪威"]),
    ("dk", &["🇩🇰", "丹麦", "丹麥"]),
    ("fi", &["🇫🇮", "芬兰", "芬蘭"]),
    ("ch", &["🇨🇭", "瑞士"]),
    ("at", &["🇦🇹", "奥地利", "奧地利"]),
    ("ie", &["🇮🇪", "爱尔兰", "愛爾蘭"]),
    ("nz", &["🇳🇿", "新西兰", "紐西蘭"]),
];

static ALIAS_INDEX: Lazy<HashMap<&'static str, Vec<String>>> = Lazy::new(|| {
    COUNTRY_ALIASES
        .iter()
        .map(|(code, aliases)| (*code, aliases.iter().map(|a| a.to_lowercase()).collect()))
        .collect()
});

/// Lower-cased aliases for an exact country code, or an empty slice.
pub fn aliases_for(term_lower: &str) -> &'static [String] {
    ALIAS_INDEX
        .get(term_lower)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

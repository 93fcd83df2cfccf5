//! Query classification: script detection, brand-name mapping and region order.
//!
//! A query containing any CJK Unified Ideograph is treated as local-script
//! and searched in the local region first; everything else goes to the
//! alternate region first. Well-known local-script brand names are mapped
//! to the latin name the storefront lists them under.

use crate::config::SearchConfig;
use crate::types::Region;

/// Known local-script brand names and their canonical storefront names.
const BRAND_NAMES: &[(&str, &str)] = &[
    ("微信", "WeChat"),
    ("抖音", "TikTok"),
    ("支付宝", "Alipay"),
    ("淘宝", "Taobao"),
    ("微博", "Weibo"),
    ("钉钉", "DingTalk"),
    ("快手", "Kwai"),
    ("哔哩哔哩", "bilibili"),
    ("小红书", "RED"),
    ("拼多多", "Pinduoduo"),
    ("百度", "Baidu"),
    ("高德地图", "Amap"),
    ("王者荣耀", "Honor of Kings"),
    ("原神", "Genshin Impact"),
    ("网易云音乐", "NetEase Cloud Music"),
    ("腾讯会议", "VooV Meeting"),
    ("飞书", "Lark"),
    ("美团", "Meituan"),
];

/// Which script family a query was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Contains at least one CJK Unified Ideograph.
    Local,
    /// Everything else.
    Latin,
}

/// The classifier's verdict for one raw query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The trimmed user input.
    pub original: String,
    /// Term sent to the backend (mapped brand name or `original`).
    pub canonical: String,
    /// Detected script.
    pub script: Script,
    /// Regions to try, in fallback order.
    pub regions: [Region; 2],
}

impl Classification {
    /// Returns `true` if the brand table rewrote the query.
    pub fn was_mapped(&self) -> bool {
        self.canonical != self.original
    }
}

/// Returns `true` if `c` lies in the CJK Unified Ideographs block.
pub fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Detect the script family of `text`.
pub fn detect_script(text: &str) -> Script {
    if text.chars().any(is_cjk_ideograph) {
        Script::Local
    } else {
        Script::Latin
    }
}

/// Look up the canonical storefront name for an exact brand-name match.
pub fn canonical_brand(trimmed: &str) -> Option<&'static str> {
    BRAND_NAMES
        .iter()
        .find(|(local, _)| *local == trimmed)
        .map(|(_, canonical)| *canonical)
}

/// Classify a raw query against the configured region pair.
pub fn classify(raw: &str, config: &SearchConfig) -> Classification {
    let original = raw.trim().to_string();
    let script = detect_script(&original);
    let canonical = canonical_brand(&original)
        .map(str::to_string)
        .unwrap_or_else(|| original.clone());
    let regions = match script {
        Script::Local => [config.local_region, config.alternate_region],
        Script::Latin => [config.alternate_region, config.local_region],
    };

    Classification {
        original,
        canonical,
        script,
        regions,
    }
}

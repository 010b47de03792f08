use std::path::Path;

pub const DEFAULT_CAPTION: &str = "美丽时刻";

// Ordered: first rule whose keyword occurs in the lower-cased stem wins.
// Specific subject keywords come before the generic filename patterns.
const KEYWORD_RULES: &[(&[&str], &str)] = &[
    (&["舞台", "演出"], "舞台演出"),
    (&["剧照", "来战"], "剧照写真"),
    (&["红毯", "造型"], "红毯造型"),
    (&["美照", "写真"], "个人写真"),
    (&["生活", "日常"], "生活日常"),
    (&["活动", "event"], "活动现场"),
    (&["拍摄", "片场"], "片场花絮"),
    (&["时尚", "fashion"], "时尚大片"),
    (&["街拍", "street"], "街拍造型"),
    (&["img"], "精彩瞬间"),
    (&["xhs", "xiaohongshu"], "小红书分享"),
    (&["photo"], "照片集"),
    (&["screenshot", "screen"], "截图记录"),
];

// Checked after KEYWORD_RULES and the date rule.
const LATE_RULES: &[(&[&str], &str)] = &[
    (&["selfie", "自拍"], "美丽自拍"),
    (&["makeup", "妆容"], "妆容展示"),
    (&["hair", "发型"], "发型造型"),
    (&["dress", "裙装"], "服装搭配"),
];

const DATE_CAPTION: &str = "纪念时刻";

fn matches_rule(stem: &str, rules: &[(&[&str], &'static str)]) -> Option<&'static str> {
    rules.iter()
        .find(|(keywords, _)| keywords.iter().any(|k| stem.contains(k)))
        .map(|(_, caption)| *caption)
}

// Eight consecutive ASCII digits, e.g. 20240131
fn contains_date_stamp(stem: &str) -> bool {
    let mut run = 0;
    for c in stem.chars() {
        if c.is_ascii_digit() {
            run += 1;
            if run >= 8 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Derive a display caption from an image filename.
pub fn caption_for(filename: &str) -> &'static str {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if let Some(caption) = matches_rule(&stem, KEYWORD_RULES) {
        return caption;
    }
    if contains_date_stamp(&stem) {
        return DATE_CAPTION;
    }
    matches_rule(&stem, LATE_RULES).unwrap_or(DEFAULT_CAPTION)
}

/// Human readable size: `0 B`, `512 B`, `1.5 KB`, `2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut unit = 0;
    let mut threshold = 1024u64;
    while unit + 1 < UNITS.len() && bytes >= threshold {
        unit += 1;
        threshold = threshold.saturating_mul(1024);
    }

    let scaled = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    // f64 Display drops trailing zeros: 2.0 -> "2", 1.50 -> "1.5"
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_rule_wins() {
        assert_eq!(caption_for("舞台_红毯.jpg"), "舞台演出");
        assert_eq!(caption_for("红毯造型01.png"), "红毯造型");
        assert_eq!(caption_for("Fashion-Week.webp"), "时尚大片");
        assert_eq!(caption_for("street_fashion.jpg"), "时尚大片");
    }

    #[test]
    fn test_generic_patterns() {
        assert_eq!(caption_for("IMG_2041.JPG"), "精彩瞬间");
        assert_eq!(caption_for("xhs_share.png"), "小红书分享");
        assert_eq!(caption_for("my_photo.gif"), "照片集");
        assert_eq!(caption_for("Screenshot 3.png"), "截图记录");
    }

    #[test]
    fn test_date_stamp_before_late_rules() {
        assert_eq!(caption_for("20240131.jpg"), "纪念时刻");
        assert_eq!(caption_for("selfie_20240131.jpg"), "纪念时刻");
        assert_eq!(caption_for("selfie_2024.jpg"), "美丽自拍");
        assert_eq!(caption_for("new_hair.jpg"), "发型造型");
    }

    #[test]
    fn test_extension_is_not_matched() {
        // "photo" only in the extension-less stem counts
        assert_eq!(caption_for("a.photo"), DEFAULT_CAPTION);
        assert_eq!(caption_for("untitled.png"), DEFAULT_CAPTION);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}

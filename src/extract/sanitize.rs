use html_escape::decode_html_entities;
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use std::sync::LazyLock;

/// `[caption ...]...[/caption]` shortcodes left behind by WordPress exports.
static CAPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[caption[^\n]*?\[[/ ]caption\]").expect("Invalid caption regex")
});

/// Turns a string taken from a JSON-LD value into plain single-line text.
///
/// Entities are decoded and inline markup is reduced to its text content.
/// The result is trimmed, double-encoding debris (`amp;`) and caption
/// shortcodes are removed, and newlines are dropped without a replacement.
pub fn sanitize(raw: &str) -> String {
    let decoded = if raw.contains('<') {
        Html::parse_fragment(raw)
            .root_element()
            .text()
            .collect::<String>()
    } else {
        decode_html_entities(raw).into_owned()
    };

    let cleaned = decoded.trim().replace("amp;", "");
    CAPTION_REGEX
        .replace_all(&cleaned, "")
        .replace(['\r', '\n'], "")
}

/// Sanitizes a JSON value. Anything other than a string yields `""`.
pub fn sanitize_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => sanitize(s),
        _ => String::new(),
    }
}

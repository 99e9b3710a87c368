use crate::document::Document;
use log::{debug, warn};
use serde_json::Value;

/// Every Recipe-typed node embedded in the page's JSON-LD, in document order.
pub fn find_recipe_candidates(document: &Document) -> Vec<Value> {
    candidates_from_payloads(document.structured_data_payloads())
}

/// Parses each payload and collects its Recipe nodes.
///
/// A payload's own node comes before the Recipe members of its `@graph`.
/// Payloads that are not valid JSON are skipped.
pub fn candidates_from_payloads<I, S>(payloads: I) -> Vec<Value>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut candidates = Vec::new();

    for (index, payload) in payloads.into_iter().enumerate() {
        let cleaned = sanitize_json(payload.as_ref());
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(json) => {
                let before = candidates.len();
                collect_recipes(json, &mut candidates);
                debug!(
                    "JSON-LD payload {} yielded {} recipe candidate(s)",
                    index,
                    candidates.len() - before
                );
            }
            Err(e) => warn!("Skipping unparsable JSON-LD payload {}: {}", index, e),
        }
    }

    candidates
}

/// Whether `node` declares `Recipe` as (one of) its `@type`s.
pub fn is_recipe(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(kind)) => kind.eq_ignore_ascii_case("Recipe"),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| kind.eq_ignore_ascii_case("Recipe")),
        _ => false,
    }
}

fn collect_recipes(json: Value, out: &mut Vec<Value>) {
    match json {
        Value::Array(items) => {
            for item in items {
                collect_from_node(item, out);
            }
        }
        node => collect_from_node(node, out),
    }
}

fn collect_from_node(node: Value, out: &mut Vec<Value>) {
    let graph_recipes: Vec<Value> = match node.get("@graph") {
        Some(Value::Array(graph)) => graph.iter().filter(|g| is_recipe(g)).cloned().collect(),
        _ => Vec::new(),
    };

    if is_recipe(&node) {
        out.push(node);
    }
    out.extend(graph_recipes);
}

/// Cleans up common JSON-LD damage: HTML comment markers around the payload
/// and raw control characters inside string literals.
fn sanitize_json(json: &str) -> String {
    let trimmed = json.trim().replace("<!--", "").replace("-->", "");

    let mut result = String::with_capacity(trimmed.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in trimmed.chars() {
        if in_string {
            if escaped {
                escaped = false;
                result.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    result.push(c);
                }
                '"' => {
                    in_string = false;
                    result.push(c);
                }
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                c if c.is_control() => {}
                _ => result.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            result.push(c);
        }
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_recipe() {
        let candidates =
            candidates_from_payloads([r#"{"@type": "Recipe", "name": "Pie"}"#]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0]["name"], "Pie");
    }

    #[test]
    fn test_graph_members_and_type_arrays() {
        let payload = r#"{
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebPage", "name": "Page"},
                {"@type": ["Recipe", "NewsArticle"], "name": "First"},
                {"@type": "Recipe", "name": "Second"}
            ]
        }"#;
        let candidates = candidates_from_payloads([payload]);
        let names: Vec<&str> = candidates
            .iter()
            .filter_map(|c| c["name"].as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_payload_itself_precedes_its_graph() {
        let payload = r#"{
            "@type": "Recipe",
            "name": "Outer",
            "@graph": [{"@type": "Recipe", "name": "Inner"}]
        }"#;
        let candidates = candidates_from_payloads([payload]);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["name"], "Outer");
        assert_eq!(candidates[1]["name"], "Inner");
    }

    #[test]
    fn test_document_order_across_payloads_and_bad_json_skipped() {
        let payloads = [
            r#"{"@type": "Recipe", "name": "#,
            r#"{"@type": "Organization", "name": "Site"}"#,
            r#"[{"@type": "WebSite"}, {"@type": "recipe", "name": "Later"}]"#,
        ];
        let candidates = candidates_from_payloads(payloads);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0]["name"], "Later");
    }

    #[test]
    fn test_raw_newlines_in_strings_are_tolerated() {
        let payload = "<!-- {\"@type\": \"Recipe\", \"description\": \"line one\nline two\"} -->";
        let candidates = candidates_from_payloads([payload]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0]["description"], "line one\nline two");
    }

    #[test]
    fn test_is_recipe() {
        assert!(is_recipe(&serde_json::json!({"@type": "RECIPE"})));
        assert!(is_recipe(&serde_json::json!({"@type": ["Thing", "Recipe"]})));
        assert!(!is_recipe(&serde_json::json!({"@type": "HowToStep"})));
        assert!(!is_recipe(&serde_json::json!({"name": "Recipe"})));
    }

    #[test]
    fn test_document_scan() {
        let doc = Document::parse(
            r#"<html><head>
                <script type="application/ld+json">{"@type": "Recipe", "name": "A"}</script>
            </head><body>
                <script type="application/ld+json">{"@type": "Recipe", "name": "B"}</script>
            </body></html>"#,
        );
        let candidates = find_recipe_candidates(&doc);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1]["name"], "B");
    }
}

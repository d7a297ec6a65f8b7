use once_cell::sync::Lazy;
use regex::Regex;

/// One `name=value` pair extracted from a tag's raw text. For quoted
/// values the surrounding quotes are stripped; the content is otherwise
/// kept verbatim, escape sequences included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

// name=, then a quoted value (escape-aware, so an escaped quote does not
// close it) or a bare word, ending at a space or end of input. The quoted
// alternative is tried first.
static ATTR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z0-9_]+)=(?:("(?:[^"\\]|\\.)*")|([A-Za-z0-9_]+))(?: |$)"#).unwrap()
});

/// Extract ordered `name=value` pairs from raw tag text. Stretches of text
/// that do not match the pair shape are skipped, not reported; extraction
/// never fails.
pub fn extract(text: &str) -> Vec<Attribute> {
    ATTR_REGEX
        .captures_iter(text)
        .map(|caps| {
            let name = caps[1].to_string();
            let value = match (caps.get(2), caps.get(3)) {
                (Some(quoted), _) => {
                    let q = quoted.as_str();
                    q[1..q.len() - 1].to_string()
                }
                (None, Some(bare)) => bare.as_str().to_string(),
                (None, None) => String::new(),
            };
            Attribute { name, value }
        })
        .collect()
}

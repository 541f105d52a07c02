use regex::Regex;
use std::collections::BTreeMap;

/// Local `src` value -> hosted Mailchimp URL.
pub type UrlMapping = BTreeMap<String, String>;

/// Rewrite every `src="<local path>"` that has a hosted counterpart.
pub fn substitute(html: &str, mapping: &UrlMapping) -> String {
    let mut updated = html.to_string();
    for (local, hosted) in mapping {
        let local_attr = format!("src=\"{}\"", local);
        let hosted_attr = format!("src=\"{}\"", hosted);
        updated = updated.replace(&local_attr, &hosted_attr);
    }
    updated
}

/// Every `src` still pointing under the local static prefix.
pub fn remaining_local_refs(html: &str, html_static_prefix: &str) -> Vec<String> {
    let pattern = format!(r#"src="({}/[^"]*)""#, regex::escape(html_static_prefix));
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };
    let mut refs: Vec<String> = re
        .captures_iter(html)
        .filter_map(|captures| captures.get(1).map(|m| m.as_str().to_string()))
        .collect();
    refs.sort();
    refs.dedup();
    refs
}

//! Helpers for emitting code fragments

use indexmap::IndexMap;

/// Quote a string as a single-quoted literal
pub fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Emit an associative array literal from compiled attributes
pub fn params_array(attrs: &IndexMap<String, String>) -> String {
    let items: Vec<String> = attrs
        .iter()
        .map(|(name, value)| format!("{}=>{}", quote(name), value))
        .collect();
    format!("array({})", items.join(","))
}

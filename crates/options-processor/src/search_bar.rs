//! Expansion of the boolean `searchBar` shorthand

use serde_json::{json, Map, Value};

/// Deprecated flat top bar keys and the search bar field each one maps to
const DEPRECATED_KEYS: [(&str, &str); 6] = [
    ("searchBarHiddenWhenScrolling", "hideOnScroll"),
    ("hideNavBarOnFocusSearchBar", "hideTopBarOnFocus"),
    ("searchBarDimsBackground", "obscuresBackgroundDuringPresentation"),
    ("searchBarBackgroundColor", "backgroundColor"),
    ("searchBarTintColor", "tintColor"),
    ("searchBarPlaceholder", "placeholder"),
];

/// Replace `searchBar: <bool>` in a top bar with the full search bar object
///
/// Deprecated flat keys of the top bar are folded in and removed. Returns
/// whether anything was expanded.
pub(crate) fn expand(top_bar: &mut Map<String, Value>) -> bool {
    let Some(visible) = top_bar.get("searchBar").and_then(Value::as_bool) else {
        return false;
    };

    let mut search_bar = json!({
        "visible": visible,
        "hideOnScroll": false,
        "hideTopBarOnFocus": false,
        "obscuresBackgroundDuringPresentation": false,
        "backgroundColor": null,
        "tintColor": null,
        "placeholder": "",
    });
    if let Value::Object(fields) = &mut search_bar {
        for (deprecated, field) in DEPRECATED_KEYS {
            if let Some(value) = top_bar.remove(deprecated) {
                if !value.is_null() {
                    fields.insert(field.to_string(), value);
                }
            }
        }
    }

    top_bar.insert("searchBar".to_string(), search_bar);
    true
}

//! Raw options payload processing
//!
//! [`OptionsProcessor::process_options`] walks a payload depth first and, for
//! every key:
//!
//! 1. resolves colors (`*color` keys) and bundled images (`*icon`, `*image`),
//! 2. assigns ids to embedded components and forwards their `passProps` to
//!    the store,
//! 3. forwards button `passProps`,
//! 4. expands the `searchBar` shorthand and migrates legacy animations,
//! 5. runs processors registered for the key's dotted path,
//!
//! then descends into the (possibly rewritten) value. `passProps` objects are
//! never descended into.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::adapters::{AssetResolver, ColorService, Store, UniqueIdProvider};
use crate::command::CommandName;
use crate::config::ProcessorConfig;
use crate::deprecations::{self, Deprecation};
use crate::legacy;
use crate::registry::OptionProcessorsStore;
use crate::search_bar;

/// Summary of a processed payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessReport {
    /// Deprecated usages found (and still applied)
    pub deprecations: Vec<Deprecation>,
    /// Ids of the embedded components found, in walk order
    pub components: Vec<String>,
    /// Color tokens that could not be resolved
    pub unresolved_colors: Vec<String>,
}

/// Per-call walk state
struct Walk<'a> {
    command: CommandName,
    pass_props: Option<&'a Value>,
    report: ProcessReport,
}

/// Normalizes raw option payloads before they are parsed into options
pub struct OptionsProcessor {
    config: ProcessorConfig,
    store: Arc<dyn Store>,
    ids: Arc<dyn UniqueIdProvider>,
    processors: OptionProcessorsStore,
    colors: Arc<dyn ColorService>,
    assets: Arc<dyn AssetResolver>,
}

impl OptionsProcessor {
    /// Create a processor
    pub fn new(
        config: ProcessorConfig,
        store: Arc<dyn Store>,
        ids: Arc<dyn UniqueIdProvider>,
        processors: OptionProcessorsStore,
        colors: Arc<dyn ColorService>,
        assets: Arc<dyn AssetResolver>,
    ) -> Self {
        Self { config, store, ids, processors, colors, assets }
    }

    /// Registry of path processors used by this processor
    pub fn processors(&self) -> &OptionProcessorsStore {
        &self.processors
    }

    /// Get the configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Normalize `options` in place
    ///
    /// Never fails; malformed values are left alone or nulled.
    pub fn process_options(
        &self,
        options: &mut Value,
        command: CommandName,
        pass_props: Option<&Value>,
    ) -> ProcessReport {
        let mut walk = Walk { command, pass_props, report: ProcessReport::default() };
        walk.report.deprecations = deprecations::check(options, command, self.config.platform);

        if let Value::Object(map) = options {
            self.process_object(map, "", &mut walk);
        }
        walk.report
    }

    fn process_object(&self, map: &mut Map<String, Value>, parent: &str, walk: &mut Walk<'_>) {
        let keys: Vec<String> = map.keys().cloned().collect();
        for key in keys {
            if key == "searchBar" {
                search_bar::expand(map);
            }
            let Some(value) = map.get_mut(&key) else {
                // removed while folding deprecated keys
                continue;
            };
            let path = if parent.is_empty() { key.clone() } else { format!("{}.{}", parent, key) };
            self.process_entry(&key, value, &path, walk);
        }
    }

    fn process_entry(&self, key: &str, value: &mut Value, path: &str, walk: &mut Walk<'_>) {
        if is_color_key(key) {
            self.resolve_color(value, walk);
        }
        if is_image_key(key) {
            self.resolve_image(value);
        }
        match key {
            "component" => self.process_component(value, walk),
            "animations" => legacy::normalize_animations(value),
            "passProps" => return,
            _ if key.ends_with("Buttons") => self.process_buttons(value),
            _ => {}
        }

        for processor in self.processors.processors_for(path) {
            *value = processor(&*value, walk.command, walk.pass_props);
        }

        match value {
            Value::Object(map) => self.process_object(map, path, walk),
            Value::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    if let Value::Object(map) = item {
                        self.process_object(map, &format!("{}.{}", path, index), walk);
                    }
                }
            }
            _ => {}
        }
    }

    fn resolve_color(&self, value: &mut Value, walk: &mut Walk<'_>) {
        match value {
            Value::String(token) => {
                let resolved = self.colors.to_native_color(token);
                if resolved.is_none() {
                    tracing::debug!("Unresolved color {:?}", token);
                    walk.report.unresolved_colors.push(token.clone());
                }
                *value = resolved.map_or(Value::Null, Value::from);
            }
            // Platform-dependent colors, e.g. `{ light: "white", dark: "black" }`
            Value::Object(variants) => {
                for variant in variants.values_mut() {
                    if variant.is_string() {
                        self.resolve_color(variant, walk);
                    }
                }
            }
            _ => {}
        }
    }

    fn resolve_image(&self, value: &mut Value) {
        let Some(handle) = value.as_u64() else {
            return;
        };
        *value = match self.assets.resolve_from_require(handle) {
            Some(asset) => serde_json::to_value(asset).unwrap_or(Value::Null),
            None => {
                tracing::debug!("Unresolved image handle {}", handle);
                Value::Null
            }
        };
    }

    fn process_component(&self, value: &mut Value, walk: &mut Walk<'_>) {
        let Value::Object(component) = value else {
            return;
        };

        let id = component
            .get("id")
            .or_else(|| component.get("componentId"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| self.ids.generate(&self.config.custom_component_prefix));
        component.insert("componentId".to_string(), Value::String(id.clone()));

        if let Some(name) = component.get("name").and_then(Value::as_str) {
            self.store.ensure_class_for_name(name);
        }
        if let Some(props) = component.remove("passProps") {
            self.store.update_props(&id, &props);
        }
        walk.report.components.push(id);
    }

    fn process_buttons(&self, value: &mut Value) {
        let Value::Array(buttons) = value else {
            return;
        };
        for button in buttons.iter_mut().filter_map(Value::as_object_mut) {
            let Some(id) = button.get("id").and_then(Value::as_str).map(str::to_owned) else {
                continue;
            };
            if let Some(props) = button.remove("passProps") {
                self.store.update_props(&id, &props);
            }
        }
    }
}

fn is_color_key(key: &str) -> bool {
    key.to_ascii_lowercase().ends_with("color")
}

fn is_image_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.ends_with("icon") || key.ends_with("image")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockAssetResolver, MockColorService, MockStore, SequentialIdProvider};
    use crate::config::Platform;
    use nav_options::ResolvedAsset;
    use serde_json::json;

    fn colors() -> MockColorService {
        let mut colors = MockColorService::new();
        colors.expect_to_native_color().returning(|token: &str| match token {
            "red" => Some(0xffff0000),
            "green" => Some(0xff00ff00),
            "blue" => Some(0xff0000ff),
            _ => None,
        });
        colors
    }

    fn assets() -> MockAssetResolver {
        let mut assets = MockAssetResolver::new();
        assets.expect_resolve_from_require().returning(|_| {
            Some(ResolvedAsset { uri: "lol".to_string(), width: Some(100.0), height: Some(100.0), scale: Some(1.0) })
        });
        assets
    }

    fn quiet_store() -> MockStore {
        let mut store = MockStore::new();
        store.expect_update_props().return_const(());
        store.expect_ensure_class_for_name().return_const(());
        store
    }

    fn processor_with(store: MockStore, platform: Platform) -> OptionsProcessor {
        OptionsProcessor::new(
            ProcessorConfig::new(platform),
            Arc::new(store),
            Arc::new(SequentialIdProvider::new()),
            OptionProcessorsStore::new(),
            Arc::new(colors()),
            Arc::new(assets()),
        )
    }

    fn processor() -> OptionsProcessor {
        processor_with(quiet_store(), Platform::Android)
    }

    #[test]
    fn test_keeps_unprocessed_values() {
        let mut options = json!({
            "blurOnUnmount": false,
            "popGesture": false,
            "modalPresentationStyle": "fullScreen"
        });
        let expected = options.clone();
        processor().process_options(&mut options, CommandName::SetRoot, None);
        assert_eq!(options, expected);
    }

    #[test]
    fn test_modal_animation_shorthand() {
        let legacy = json!({ "enabled": false, "translationY": { "from": 0, "to": 1, "duration": 3 } });
        let mut options = json!({ "animations": { "showModal": legacy.clone(), "dismissModal": legacy.clone() } });

        processor().process_options(&mut options, CommandName::ShowModal, None);
        assert_eq!(
            options,
            json!({ "animations": { "showModal": { "enter": legacy.clone() }, "dismissModal": { "exit": legacy } } })
        );
    }

    #[test]
    fn test_structured_animations_pass_through() {
        let mut options = json!({
            "animations": {
                "showModal": { "enter": { "enabled": false } },
                "dismissModal": { "exit": { "enabled": true } }
            }
        });
        let expected = options.clone();
        processor().process_options(&mut options, CommandName::DismissModal, None);
        assert_eq!(options, expected);
    }

    #[test]
    fn test_color_keys() {
        let mut options = json!({
            "statusBar": { "backgroundColor": "red" },
            "topBar": { "background": { "color": "blue" }, "title": { "color": null } },
            "layout": { "componentBackgroundColor": { "light": "green", "dark": "red" } }
        });
        let report = processor().process_options(&mut options, CommandName::SetRoot, None);

        assert_eq!(options["statusBar"]["backgroundColor"], json!(0xffff0000u32));
        assert_eq!(options["topBar"]["background"]["color"], json!(0xff0000ffu32));
        assert_eq!(options["topBar"]["title"]["color"], json!(null));
        assert_eq!(
            options["layout"]["componentBackgroundColor"],
            json!({ "light": 0xff00ff00u32, "dark": 0xffff0000u32 })
        );
        assert!(report.unresolved_colors.is_empty());
    }

    #[test]
    fn test_unresolved_color_becomes_null() {
        let mut options = json!({ "topBar": { "title": { "color": "not-a-color" } } });
        let report = processor().process_options(&mut options, CommandName::SetRoot, None);
        assert_eq!(options["topBar"]["title"]["color"], json!(null));
        assert_eq!(report.unresolved_colors, vec!["not-a-color".to_string()]);
    }

    #[test]
    fn test_image_keys() {
        let asset = json!({ "height": 100.0, "scale": 1.0, "uri": "lol", "width": 100.0 });
        let mut options = json!({
            "backgroundImage": 123,
            "rootBackgroundImage": 234,
            "bottomTab": { "icon": 345, "selectedIcon": 345 },
            "topBar": { "backButton": { "icon": "back.png" } }
        });
        processor().process_options(&mut options, CommandName::SetRoot, None);

        assert_eq!(options["backgroundImage"], asset);
        assert_eq!(options["rootBackgroundImage"], asset);
        assert_eq!(options["bottomTab"]["icon"], asset);
        assert_eq!(options["bottomTab"]["selectedIcon"], asset);
        assert_eq!(options["topBar"]["backButton"]["icon"], json!("back.png"));
    }

    #[test]
    fn test_component_pass_props_forwarded_and_removed() {
        let mut store = MockStore::new();
        store
            .expect_update_props()
            .withf(|id: &str, props: &Value| id == "CustomComponent1" && *props == json!({ "some": "thing" }))
            .times(1)
            .return_const(());
        store.expect_ensure_class_for_name().withf(|name: &str| name == "a").times(1).return_const(());

        let mut options = json!({
            "topBar": { "title": { "component": { "passProps": { "some": "thing" }, "name": "a" } } }
        });
        let report = processor_with(store, Platform::Android).process_options(&mut options, CommandName::SetRoot, None);

        assert_eq!(
            options,
            json!({ "topBar": { "title": { "component": { "name": "a", "componentId": "CustomComponent1" } } } })
        );
        assert_eq!(report.components, vec!["CustomComponent1".to_string()]);
    }

    #[test]
    fn test_component_id_copied() {
        let mut options = json!({ "topBar": { "title": { "component": { "name": "a", "id": "Component1" } } } });
        processor().process_options(&mut options, CommandName::SetRoot, None);
        assert_eq!(
            options,
            json!({
                "topBar": { "title": { "component": { "name": "a", "id": "Component1", "componentId": "Component1" } } }
            })
        );
    }

    #[test]
    fn test_component_processing_is_idempotent() {
        let processor = processor();
        let mut options = json!({ "topBar": { "background": { "component": { "name": "bg" } } } });
        processor.process_options(&mut options, CommandName::SetRoot, None);
        let once = options.clone();
        processor.process_options(&mut options, CommandName::MergeOptions, None);
        assert_eq!(options, once);
    }

    #[test]
    fn test_button_pass_props() {
        let mut store = MockStore::new();
        store
            .expect_update_props()
            .withf(|id: &str, props: &Value| id == "1" && *props == json!({ "prop": "prop" }))
            .times(1)
            .return_const(());

        let mut options = json!({ "topBar": { "rightButtons": [{ "passProps": { "prop": "prop" }, "id": "1" }] } });
        processor_with(store, Platform::Android).process_options(&mut options, CommandName::SetRoot, None);
        assert_eq!(options, json!({ "topBar": { "rightButtons": [{ "id": "1" }] } }));
    }

    #[test]
    fn test_button_without_id_untouched() {
        let mut store = MockStore::new();
        store.expect_update_props().times(0);

        let mut options = json!({ "topBar": { "rightButtons": [{ "passProps": { "prop": "prop" } }] } });
        let expected = options.clone();
        processor_with(store, Platform::Android).process_options(&mut options, CommandName::SetRoot, None);
        assert_eq!(options, expected);
    }

    #[test]
    fn test_store_loads_component_classes() {
        let mut store = MockStore::new();
        store.expect_update_props().return_const(());
        store.expect_ensure_class_for_name().withf(|name: &str| name == "helloThere1").times(1).return_const(());
        store.expect_ensure_class_for_name().withf(|name: &str| name == "helloThere2").times(1).return_const(());

        let mut options = json!({
            "topBar": {
                "title": { "component": { "name": "helloThere1", "passProps": {} } },
                "background": { "component": { "name": "helloThere2", "passProps": {} } },
                "leftButtons": [{ "id": "btn", "passProps": {} }]
            }
        });
        processor_with(store, Platform::Android).process_options(&mut options, CommandName::SetRoot, None);

        assert!(options["topBar"]["title"]["component"].get("passProps").is_none());
        assert!(options["topBar"]["background"]["component"].get("passProps").is_none());
        assert!(options["topBar"]["leftButtons"][0].get("passProps").is_none());
    }

    #[test]
    fn test_search_bar_with_deprecated_values() {
        let mut options = json!({
            "topBar": {
                "searchBar": true,
                "searchBarHiddenWhenScrolling": true,
                "hideNavBarOnFocusSearchBar": true,
                "searchBarBackgroundColor": "red",
                "searchBarTintColor": "green",
                "searchBarPlaceholder": "foo"
            }
        });
        processor().process_options(&mut options, CommandName::SetRoot, None);

        assert_eq!(
            options,
            json!({
                "topBar": {
                    "searchBar": {
                        "visible": true,
                        "hideOnScroll": true,
                        "hideTopBarOnFocus": true,
                        "obscuresBackgroundDuringPresentation": false,
                        "backgroundColor": 0xffff0000u32,
                        "tintColor": 0xff00ff00u32,
                        "placeholder": "foo"
                    }
                }
            })
        );
    }

    #[test]
    fn test_registered_processors() {
        let processor = processor();
        let registry = processor.processors();
        registry.add_processor("topBar.visible", |v, _, _| Value::Bool(!v.as_bool().unwrap_or(false))).unwrap();
        registry
            .add_processor("topBar.background.translucent", |v, _, _| Value::Bool(!v.as_bool().unwrap_or(false)))
            .unwrap();
        registry.add_processor("bottomTabs.visible", |_, _, _| json!(false)).unwrap();
        registry.add_processor("bottomTabs.visible", |_, _, _| json!(true)).unwrap();

        let mut options = json!({
            "topBar": { "visible": true, "background": { "translucent": true } },
            "bottomTabs": { "visible": false }
        });
        processor.process_options(&mut options, CommandName::SetRoot, None);
        assert_eq!(
            options,
            json!({
                "topBar": { "visible": false, "background": { "translucent": false } },
                "bottomTabs": { "visible": true }
            })
        );
    }

    #[test]
    fn test_registered_processor_receives_command_and_props() {
        let processor = processor();
        processor
            .processors()
            .add_processor("topBar.title.text", |value, command, props| {
                let suffix = props.and_then(|p| p["suffix"].as_str()).unwrap_or("");
                json!(format!("{}{}@{}", value.as_str().unwrap_or(""), suffix, command))
            })
            .unwrap();

        let mut options = json!({ "topBar": { "title": { "text": "Inbox" } } });
        let props = json!({ "suffix": "!" });
        processor.process_options(&mut options, CommandName::Push, Some(&props));
        assert_eq!(options["topBar"]["title"]["text"], json!("Inbox!@push"));
    }

    #[test]
    fn test_bottom_tabs_visibility_deprecation_still_applies() {
        let mut options = json!({ "bottomTabs": { "visible": false } });
        let report =
            processor_with(quiet_store(), Platform::Ios).process_options(&mut options, CommandName::MergeOptions, None);

        assert_eq!(report.deprecations, vec![Deprecation::BottomTabsVisibilityMerge]);
        assert_eq!(options, json!({ "bottomTabs": { "visible": false } }));
    }

    #[test]
    fn test_non_object_payload_ignored() {
        let mut options = json!("garbage");
        let report = processor().process_options(&mut options, CommandName::SetRoot, None);
        assert_eq!(options, json!("garbage"));
        assert_eq!(report, ProcessReport::default());
    }
}

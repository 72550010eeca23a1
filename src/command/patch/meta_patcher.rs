use serde_json::{Map, Value};

use crate::error::MetaFileError;
use crate::meta::MetaDocument;

/// Bundle priority the editor assigns when a folder is turned into a bundle.
pub const DEFAULT_BUNDLE_PRIORITY: u64 = 3;

/// Top-level keys of a `.meta` document that hold one value per build platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigGroup {
    CompressionType,
    OptimizeHotUpdate,
    InlineSpriteFrames,
    IsRemoteBundle,
}

impl ConfigGroup {
    pub const ALL: [ConfigGroup; 4] = [
        ConfigGroup::CompressionType,
        ConfigGroup::OptimizeHotUpdate,
        ConfigGroup::InlineSpriteFrames,
        ConfigGroup::IsRemoteBundle,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ConfigGroup::CompressionType => "compressionType",
            ConfigGroup::OptimizeHotUpdate => "optimizeHotUpdate",
            ConfigGroup::InlineSpriteFrames => "inlineSpriteFrames",
            ConfigGroup::IsRemoteBundle => "isRemoteBundle",
        }
    }

    pub fn default_value(self) -> Value {
        match self {
            ConfigGroup::CompressionType => Value::from("zip"),
            ConfigGroup::OptimizeHotUpdate => Value::Bool(false),
            ConfigGroup::InlineSpriteFrames => Value::Bool(false),
            ConfigGroup::IsRemoteBundle => Value::Bool(true),
        }
    }
}

/// Inserts the platform defaults of every [ConfigGroup] for each platform and, if
/// `mark_bundle` is set, the top-level bundle keys. Only missing keys are added.
///
/// Returns the dotted paths of all inserted keys, empty if the document was already complete.
pub fn patch_document(
    doc: &mut MetaDocument,
    subpackage: &str,
    platforms: &[String],
    mark_bundle: bool,
) -> Result<Vec<String>, MetaFileError> {
    let mut inserted = Vec::new();
    for platform in platforms {
        inserted.extend(apply_platform_defaults(doc, platform)?);
    }
    if mark_bundle {
        inserted.extend(apply_bundle_defaults(doc, subpackage));
    }
    Ok(inserted)
}

pub fn apply_platform_defaults(doc: &mut MetaDocument, platform: &str) -> Result<Vec<String>, MetaFileError> {
    let mut inserted = Vec::new();
    for group in ConfigGroup::ALL {
        let entries = doc.entry(group.key())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| MetaFileError::GroupNotAnObject(group.key().to_string()))?;

        if !entries.contains_key(platform) {
            entries.insert(platform.to_string(), group.default_value());
            inserted.push(format!("{}.{}", group.key(), platform));
        }
    }
    Ok(inserted)
}

pub fn apply_bundle_defaults(doc: &mut MetaDocument, subpackage: &str) -> Vec<String> {
    let defaults = [
        ("isBundle", Value::Bool(true)),
        ("bundleName", Value::from(subpackage)),
        ("priority", Value::from(DEFAULT_BUNDLE_PRIORITY)),
    ];

    let mut inserted = Vec::new();
    for (key, value) in defaults {
        if !doc.contains_key(key) {
            doc.insert(key.to_string(), value);
            inserted.push(key.to_string());
        }
    }
    inserted
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::meta::{parse_document, to_pretty_bytes};

    use super::*;

    const HONOR: &str = "honor-minigame";

    fn patch_str(input: &str, platforms: &[&str], mark_bundle: bool) -> String {
        let mut doc = parse_document(input).unwrap();
        let platforms = platforms.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        patch_document(&mut doc, "hall", &platforms, mark_bundle).unwrap();
        String::from_utf8(to_pretty_bytes(&doc).unwrap()).unwrap()
    }

    #[test]
    fn appends_platform_after_existing_entries() {
        let out = patch_str(r#"{"compressionType": {"other-platform": "none"}}"#, &[HONOR], false);
        let expected = r#"{
  "compressionType": {
    "other-platform": "none",
    "honor-minigame": "zip"
  },
  "optimizeHotUpdate": {
    "honor-minigame": false
  },
  "inlineSpriteFrames": {
    "honor-minigame": false
  },
  "isRemoteBundle": {
    "honor-minigame": true
  }
}"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_document_gets_all_groups() {
        let mut doc = MetaDocument::new();
        let inserted = apply_platform_defaults(&mut doc, HONOR).unwrap();

        assert_eq!(inserted, vec![
            "compressionType.honor-minigame",
            "optimizeHotUpdate.honor-minigame",
            "inlineSpriteFrames.honor-minigame",
            "isRemoteBundle.honor-minigame",
        ]);
        assert_eq!(Value::Object(doc), json!({
            "compressionType": { HONOR: "zip" },
            "optimizeHotUpdate": { HONOR: false },
            "inlineSpriteFrames": { HONOR: false },
            "isRemoteBundle": { HONOR: true },
        }));
    }

    #[test]
    fn patching_twice_changes_nothing() {
        let inputs = [
            "{}",
            r#"{"ver": "1.1.2", "uuid": "a1b2", "compressionType": {"wechatgame": "merge_all_json"}}"#,
            r#"{"isRemoteBundle": {"honor-minigame": false}, "subMetas": {}}"#,
        ];
        for input in inputs {
            let once = patch_str(input, &[HONOR], true);
            let twice = patch_str(&once, &[HONOR], true);
            assert_eq!(once, twice);
        }

        let mut doc = parse_document(&patch_str("{}", &[HONOR], false)).unwrap();
        assert!(apply_platform_defaults(&mut doc, HONOR).unwrap().is_empty());
    }

    #[test]
    fn existing_values_are_never_overwritten() {
        let mut doc = parse_document(r#"{
            "compressionType": {"honor-minigame": "none", "wechatgame": "subpackage"},
            "optimizeHotUpdate": {"honor-minigame": true},
            "inlineSpriteFrames": {"honor-minigame": {"custom": [1, 2]}},
            "isRemoteBundle": {"honor-minigame": false, "bytedance": true}
        }"#).unwrap();
        let before = doc.clone();

        let inserted = apply_platform_defaults(&mut doc, HONOR).unwrap();

        assert!(inserted.is_empty());
        assert_eq!(doc, before);
    }

    #[test]
    fn partially_configured_groups_are_completed() {
        let mut doc = parse_document(r#"{"optimizeHotUpdate": {"honor-minigame": true}}"#).unwrap();

        let inserted = apply_platform_defaults(&mut doc, HONOR).unwrap();

        assert_eq!(inserted.len(), 3);
        assert_eq!(doc["optimizeHotUpdate"][HONOR], json!(true));
        for group in ConfigGroup::ALL {
            assert!(doc[group.key()].get(HONOR).is_some(), "{} is missing", group.key());
        }
    }

    #[test]
    fn unrelated_keys_are_untouched() {
        let mut doc = parse_document(r#"{"ver": "1.1.2", "isSubpackage": false, "subMetas": {"a": {"b": 1}}}"#).unwrap();

        apply_platform_defaults(&mut doc, HONOR).unwrap();

        assert_eq!(doc["ver"], json!("1.1.2"));
        assert_eq!(doc["isSubpackage"], json!(false));
        assert_eq!(doc["subMetas"], json!({"a": {"b": 1}}));
        assert_eq!(doc.keys().take(3).collect::<Vec<_>>(), vec!["ver", "isSubpackage", "subMetas"]);
    }

    #[test]
    fn every_platform_gets_defaults() {
        let out = patch_str("{}", &["wechatgame", HONOR], false);
        let doc = parse_document(&out).unwrap();

        for group in ConfigGroup::ALL {
            assert_eq!(doc[group.key()]["wechatgame"], group.default_value());
            assert_eq!(doc[group.key()][HONOR], group.default_value());
        }
    }

    #[test]
    fn non_object_group_is_an_error() {
        let mut doc = parse_document(r#"{"compressionType": "zip"}"#).unwrap();

        let err = apply_platform_defaults(&mut doc, HONOR).unwrap_err();

        assert!(matches!(err, MetaFileError::GroupNotAnObject(ref key) if key == "compressionType"));
        assert_eq!(doc["compressionType"], json!("zip"));
    }

    #[test]
    fn bundle_defaults_use_subpackage_name() {
        let mut doc = parse_document(r#"{"priority": 8}"#).unwrap();

        let inserted = apply_bundle_defaults(&mut doc, "大厅");

        assert_eq!(inserted, vec!["isBundle", "bundleName"]);
        assert_eq!(doc["isBundle"], json!(true));
        assert_eq!(doc["bundleName"], json!("大厅"));
        assert_eq!(doc["priority"], json!(8));
    }
}

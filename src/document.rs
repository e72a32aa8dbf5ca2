use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    String,
    Float,
    Color,
    Boolean,
}

impl VariableType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Float => "FLOAT",
            Self::Color => "COLOR",
            Self::Boolean => "BOOLEAN",
        }
    }

    pub fn default_value(self) -> LiteralValue {
        match self {
            Self::String => LiteralValue::String(String::new()),
            Self::Float => LiteralValue::Float(0.0),
            Self::Color => LiteralValue::Color(Rgba::new(0.0, 0.0, 0.0, 1.0)),
            Self::Boolean => LiteralValue::Boolean(false),
        }
    }
}

impl Display for VariableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    #[serde(serialize_with = "serialize_number")]
    pub r: f64,
    #[serde(serialize_with = "serialize_number")]
    pub g: f64,
    #[serde(serialize_with = "serialize_number")]
    pub b: f64,
    #[serde(default = "opaque_alpha", serialize_with = "serialize_number")]
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

fn opaque_alpha() -> f64 {
    1.0
}

/// Whole numbers are written without a fractional part (`4`, not `4.0`).
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Float(#[serde(serialize_with = "serialize_number")] f64),
    String(String),
    Color(Rgba),
}

impl LiteralValue {
    pub fn variable_type(&self) -> VariableType {
        match self {
            Self::Boolean(_) => VariableType::Boolean,
            Self::Float(_) => VariableType::Float,
            Self::String(_) => VariableType::String,
            Self::Color(_) => VariableType::Color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasKind {
    #[serde(rename = "VARIABLE_ALIAS")]
    VariableAlias,
}

/// Reference from one variable's mode value to another variable.
///
/// `id` is the host-local id of the target. `name` is filled in at export
/// time with the target's full name and is what import resolves against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableAlias {
    #[serde(rename = "type")]
    pub kind: AliasKind,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl VariableAlias {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: AliasKind::VariableAlias,
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeValue {
    Alias(VariableAlias),
    Literal(LiteralValue),
}

impl ModeValue {
    pub fn as_alias(&self) -> Option<&VariableAlias> {
        match self {
            Self::Alias(alias) => Some(alias),
            Self::Literal(_) => None,
        }
    }
}

impl From<LiteralValue> for ModeValue {
    fn from(value: LiteralValue) -> Self {
        Self::Literal(value)
    }
}

impl From<VariableAlias> for ModeValue {
    fn from(alias: VariableAlias) -> Self {
        Self::Alias(alias)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeData {
    pub name: String,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableData {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resolved_type: VariableType,
    #[serde(default)]
    pub value: IndexMap<String, ModeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionData {
    pub name: String,
    #[serde(default)]
    pub modes: Vec<ModeData>,
    #[serde(default)]
    pub variables: Vec<VariableData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariablesDocument {
    collections: IndexMap<String, CollectionData>,
}

impl VariablesDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, SyncError> {
        serde_json::from_str(text).map_err(SyncError::MalformedDocument)
    }

    pub fn to_json_pretty(&self) -> Result<String, SyncError> {
        serde_json::to_string_pretty(self).map_err(SyncError::Serialize)
    }

    pub fn to_json_compact(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(SyncError::Serialize)
    }

    /// Inserts under `key`. Re-inserting an existing key replaces the data but
    /// keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, collection: CollectionData) {
        self.collections.insert(key.into(), collection);
    }

    pub fn get(&self, key: &str) -> Option<&CollectionData> {
        self.collections.get(key)
    }

    pub fn collections(&self) -> indexmap::map::Iter<'_, String, CollectionData> {
        self.collections.iter()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

pub fn collection_slug(collection_name: &str) -> String {
    collection_name.replace(' ', "").to_lowercase()
}

pub fn full_name(collection_name: &str, variable_name: &str) -> String {
    format!("--{}-{variable_name}", collection_slug(collection_name))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        LiteralValue, ModeValue, Rgba, VariableAlias, VariableType, VariablesDocument, full_name,
    };
    use crate::error::SyncError;

    #[test]
    fn full_name_strips_spaces_and_lowercases_collection() {
        assert_eq!(
            full_name("My Tokens", "primary-color"),
            "--mytokens-primary-color"
        );
        assert_eq!(full_name("Core", "Color/Primary"), "--core-Color/Primary");
    }

    #[test]
    fn mode_values_deserialize_into_matching_variants() {
        let values: Vec<ModeValue> = serde_json::from_value(json!([
            true,
            12,
            0.5,
            "Inter",
            {"r": 1, "g": 0.5, "b": 0, "a": 1},
            {"r": 0, "g": 0, "b": 0},
            {"type": "VARIABLE_ALIAS", "id": "VariableID:1:2", "name": "--core-b"}
        ]))
        .expect("values should parse");

        assert_eq!(values[0], ModeValue::Literal(LiteralValue::Boolean(true)));
        assert_eq!(values[1], ModeValue::Literal(LiteralValue::Float(12.0)));
        assert_eq!(values[2], ModeValue::Literal(LiteralValue::Float(0.5)));
        assert_eq!(
            values[3],
            ModeValue::Literal(LiteralValue::String("Inter".to_owned()))
        );
        assert_eq!(
            values[4],
            ModeValue::Literal(LiteralValue::Color(Rgba::new(1.0, 0.5, 0.0, 1.0)))
        );
        assert_eq!(
            values[5],
            ModeValue::Literal(LiteralValue::Color(Rgba::new(0.0, 0.0, 0.0, 1.0)))
        );
        assert_eq!(
            values[6],
            ModeValue::Alias(VariableAlias::new("VariableID:1:2").with_name("--core-b"))
        );
    }

    #[test]
    fn whole_numbers_serialize_without_a_fraction() {
        let values = vec![
            LiteralValue::Float(4.0),
            LiteralValue::Float(0.5),
            LiteralValue::Float(-12.0),
            LiteralValue::Color(Rgba::new(1.0, 0.0, 0.25, 1.0)),
        ];
        let text = serde_json::to_string(&values).expect("values should serialize");
        assert_eq!(text, r#"[4,0.5,-12,{"r":1,"g":0,"b":0.25,"a":1}]"#);

        let reparsed: Vec<LiteralValue> = serde_json::from_str(&text).expect("reparse");
        assert_eq!(reparsed, values);
    }

    #[test]
    fn alias_without_name_omits_the_field_when_serialized() {
        let value = ModeValue::Alias(VariableAlias::new("VariableID:9"));
        let encoded = serde_json::to_value(&value).expect("alias should serialize");
        assert_eq!(
            encoded,
            json!({"type": "VARIABLE_ALIAS", "id": "VariableID:9"})
        );
    }

    #[test]
    fn document_preserves_collection_and_mode_order() {
        let document = VariablesDocument::from_json(
            r#"{
                "Zeta": {"name": "Zeta", "modes": [], "variables": []},
                "Alpha": {
                    "name": "Alpha",
                    "modes": [{"name": "Light", "id": "1:0"}, {"name": "Dark", "id": "1:1"}],
                    "variables": [{
                        "id": "VariableID:1",
                        "name": "bg",
                        "type": "STRING",
                        "value": {"Light": "white", "Dark": "black"}
                    }]
                }
            }"#,
        )
        .expect("document should parse");

        let keys: Vec<_> = document.collections().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha"]);

        let alpha = document.get("Alpha").expect("Alpha should exist");
        let modes: Vec<_> = alpha.variables[0].value.keys().map(String::as_str).collect();
        assert_eq!(modes, vec!["Light", "Dark"]);
        assert_eq!(alpha.variables[0].resolved_type, VariableType::String);
    }

    #[test]
    fn malformed_json_is_reported_as_malformed_document() {
        let error = VariablesDocument::from_json("{not json").expect_err("should fail");
        let SyncError::MalformedDocument(_) = error else {
            panic!("expected malformed document error");
        };
    }

    #[test]
    fn unknown_variable_type_is_rejected() {
        let error = VariablesDocument::from_json(
            r#"{"C": {"name": "C", "modes": [], "variables": [
                {"id": "1", "name": "x", "type": "GRADIENT", "value": {}}
            ]}}"#,
        )
        .expect_err("unknown type should fail");
        assert!(error.to_string().contains("malformed variables document"));
    }
}

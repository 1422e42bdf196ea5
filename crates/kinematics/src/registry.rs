//! Name -> constructor table for dynamics-model variants.
//!
//! The registry is populated once at startup and handed explicitly to
//! whatever builds models from declarative [`ModelSpec`] records. A spec is
//! parsed into the typed config of its variant, validated, then passed to
//! the constructor.

use crate::bicycle::{BicycleModel, BicycleModelConfig, BICYCLE_MODEL_TAG};
use crate::dynamics::DynamicsModel;
use crate::error::KinematicsError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Builds one model from the variant parameters of a [`ModelSpec`].
pub type ModelFactory = fn(&Value) -> Result<Box<dyn DynamicsModel>, KinematicsError>;

/// Declarative description of one configured dynamics-model variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Registry tag, e.g. `"BicycleModel"`.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Unique name used for explicit selection. Defaults to the tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Relative selection weight. Defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Variant parameters, interpreted by the factory.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl ModelSpec {
    /// Spec for a bicycle model.
    ///
    /// # Errors
    ///
    /// Fails only if the config cannot be represented as JSON.
    pub fn bicycle(name: &str, config: &BicycleModelConfig) -> Result<Self, KinematicsError> {
        let params = match serde_json::to_value(config)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(Self {
            type_tag: BICYCLE_MODEL_TAG.to_string(),
            name: Some(name.to_string()),
            weight: None,
            params,
        })
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Name used for explicit selection.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.type_tag)
    }
}

#[derive(Default)]
pub struct ModelRegistry {
    factories: BTreeMap<String, ModelFactory>,
}

impl ModelRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every model type shipped with this crate.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut factories: BTreeMap<String, ModelFactory> = BTreeMap::new();
        factories.insert(BICYCLE_MODEL_TAG.to_string(), build_bicycle);
        Self { factories }
    }

    /// Register a factory under `tag`.
    ///
    /// # Errors
    ///
    /// Fails if the tag is already taken.
    pub fn register(&mut self, tag: &str, factory: ModelFactory) -> Result<(), KinematicsError> {
        if self.factories.contains_key(tag) {
            return Err(KinematicsError::Configuration(format!(
                "model type `{tag}` registered twice"
            )));
        }
        self.factories.insert(tag.to_string(), factory);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Construct the model a spec describes.
    ///
    /// # Errors
    ///
    /// Fails for unknown tags and for parameters the variant rejects.
    pub fn build(&self, spec: &ModelSpec) -> Result<Box<dyn DynamicsModel>, KinematicsError> {
        let factory = self
            .factories
            .get(&spec.type_tag)
            .ok_or_else(|| KinematicsError::UnknownModelType(spec.type_tag.clone()))?;
        factory(&Value::Object(spec.params.clone()))
    }
}

fn build_bicycle(params: &Value) -> Result<Box<dyn DynamicsModel>, KinematicsError> {
    let config = BicycleModelConfig::deserialize(params)?;
    Ok(Box::new(BicycleModel::new(&config)?))
}

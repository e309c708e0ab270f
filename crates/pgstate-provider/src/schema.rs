//! Attribute schemas for provider configuration and resources
//!
//! A schema fills in defaults for attributes the orchestrator left unset,
//! checks required attributes and numeric bounds, and computes plans by
//! comparing prior and proposed state.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ProviderError, Result};

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Int32,
    Int64,
}

/// How an attribute is supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// Must be set by the user
    Required,
    /// May be set by the user, otherwise the default applies
    Optional,
    /// Set by the provider only
    Computed,
}

/// A single attribute declaration
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: AttributeType,
    pub mode: AttributeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    /// Changing this attribute destroys and re-creates the resource
    pub requires_replace: bool,
    pub sensitive: bool,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeType, mode: AttributeMode) -> Self {
        Self {
            name,
            description: "",
            kind,
            mode,
            default: None,
            min: None,
            max: None,
            requires_replace: false,
            sensitive: false,
        }
    }

    pub fn required(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, AttributeMode::Required)
    }

    pub fn optional(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, AttributeMode::Optional)
    }

    pub fn computed(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, AttributeMode::Computed)
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn at_least(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn between(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    fn check(&self, value: &Value) -> Result<()> {
        let type_ok = match self.kind {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::Int32 => value
                .as_i64()
                .map_or(false, |n| i32::try_from(n).is_ok()),
            AttributeType::Int64 => value.is_i64(),
        };
        if !type_ok {
            return Err(ProviderError::InvalidAttribute {
                attribute: self.name,
                reason: format!("expected {:?}, got {}", self.kind, value),
            });
        }

        if let Some(n) = value.as_i64() {
            if let Some(min) = self.min.filter(|min| n < *min) {
                return Err(ProviderError::InvalidAttribute {
                    attribute: self.name,
                    reason: format!("must be at least {}, got {}", min, n),
                });
            }
            if let Some(max) = self.max.filter(|max| n > *max) {
                return Err(ProviderError::InvalidAttribute {
                    attribute: self.name,
                    reason: format!("must be at most {}, got {}", max, n),
                });
            }
        }
        Ok(())
    }
}

/// Schema of a resource or of the provider configuration
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Fill unset optional attributes with their defaults
    pub fn apply_defaults(&self, state: &mut Value) -> Result<()> {
        let object = as_object_mut(state)?;
        for attribute in &self.attributes {
            let Some(default) = &attribute.default else {
                continue;
            };
            let unset = object.get(attribute.name).map_or(true, Value::is_null);
            if unset {
                object.insert(attribute.name.to_string(), default.clone());
            }
        }
        Ok(())
    }

    /// Check required attributes, types and bounds
    pub fn validate(&self, state: &Value) -> Result<()> {
        let object = state
            .as_object()
            .ok_or_else(|| ProviderError::InvalidAttribute {
                attribute: "<root>",
                reason: "state must be an object".to_string(),
            })?;

        for attribute in &self.attributes {
            match object.get(attribute.name) {
                None | Some(Value::Null) => {
                    if attribute.mode == AttributeMode::Required {
                        return Err(ProviderError::MissingAttribute(attribute.name));
                    }
                }
                Some(value) => attribute.check(value)?,
            }
        }
        Ok(())
    }

    /// Compare prior state with the proposed configuration.
    ///
    /// Computed attributes are carried over from the prior state. Without a
    /// prior state the plan is a create.
    pub fn plan(&self, prior: Option<&Value>, proposed: Value) -> Result<PlanResult> {
        let mut planned = proposed;
        self.apply_defaults(&mut planned)?;
        self.validate(&planned)?;

        let Some(prior) = prior else {
            let changes = self
                .attributes
                .iter()
                .filter(|a| a.mode != AttributeMode::Computed)
                .filter_map(|a| {
                    planned.get(a.name).filter(|v| !v.is_null()).map(|v| AttributeChange {
                        attribute: a.name.to_string(),
                        before: None,
                        after: redact(a, v),
                        requires_replace: false,
                    })
                })
                .collect();
            return Ok(PlanResult {
                action: PlanAction::Create,
                planned_state: planned,
                changes,
            });
        };

        let planned_object = as_object_mut(&mut planned)?;
        let mut changes = Vec::new();
        for attribute in &self.attributes {
            let before = prior.get(attribute.name).cloned().unwrap_or(Value::Null);

            if attribute.mode == AttributeMode::Computed {
                if !before.is_null() {
                    planned_object.insert(attribute.name.to_string(), before);
                }
                continue;
            }

            let after = planned_object
                .get(attribute.name)
                .cloned()
                .unwrap_or(Value::Null);
            if before != after {
                changes.push(AttributeChange {
                    attribute: attribute.name.to_string(),
                    before: (!before.is_null()).then(|| redact(attribute, &before)),
                    after: redact(attribute, &after),
                    requires_replace: attribute.requires_replace,
                });
            }
        }

        let action = if changes.iter().any(|c| c.requires_replace) {
            PlanAction::Replace
        } else if changes.is_empty() {
            PlanAction::NoChange
        } else {
            PlanAction::Update
        };

        Ok(PlanResult {
            action,
            planned_state: planned,
            changes,
        })
    }
}

fn as_object_mut(state: &mut Value) -> Result<&mut Map<String, Value>> {
    state
        .as_object_mut()
        .ok_or_else(|| ProviderError::InvalidAttribute {
            attribute: "<root>",
            reason: "state must be an object".to_string(),
        })
}

fn redact(attribute: &Attribute, value: &Value) -> Value {
    if attribute.sensitive {
        Value::String("(sensitive)".to_string())
    } else {
        value.clone()
    }
}

/// What applying a plan will do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    NoChange,
    Create,
    Update,
    /// Destroy then create
    Replace,
}

/// One attribute that differs between prior and planned state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    pub attribute: String,
    pub before: Option<Value>,
    pub after: Value,
    pub requires_replace: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    pub action: PlanAction,
    pub planned_state: Value,
    pub changes: Vec<AttributeChange>,
}

impl PlanResult {
    pub fn requires_replace(&self) -> bool {
        self.action == PlanAction::Replace
    }
}

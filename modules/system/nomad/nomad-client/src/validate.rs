//! Argument validation: caller mapping → typed argument bundle.

use std::collections::BTreeMap;

use nomad_sdk::{Arguments, NomadError};
use serde_json::Value;

use crate::operation::{ArgKind, ArgSpec, Location, Operation};

/// Namespace assumed when none is supplied.
pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Map(BTreeMap<String, String>),
    /// A job document produced by the remote parse endpoint.
    Json(Value),
}

/// Arguments that passed an operation's schema, keyed by argument name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs {
    values: BTreeMap<&'static str, ArgValue>,
}

impl ValidatedArgs {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Like [`Self::str`], but empty strings read as absent.
    #[must_use]
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.str(name).filter(|value| !value.is_empty())
    }

    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ArgValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn map(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        match self.values.get(name) {
            Some(ArgValue::Map(value)) => Some(value),
            _ => None,
        }
    }

    /// Namespace to route by, or `None` when it is the implicit default.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.non_empty("namespace")
            .filter(|namespace| *namespace != DEFAULT_NAMESPACE)
    }

    pub fn insert(&mut self, name: &'static str, value: ArgValue) {
        self.values.insert(name, value);
    }
}

/// Check `args` against the operation's schema.
///
/// Every required argument must be present with the declared kind, and
/// enumerated arguments must hold an allowed value. Nothing is sent when
/// this fails.
///
/// # Errors
/// Returns [`NomadError::Validation`] naming the offending argument.
pub fn validate(operation: &Operation, args: &Arguments) -> Result<ValidatedArgs, NomadError> {
    let mut validated = ValidatedArgs::default();

    for spec in operation.args {
        let supplied = args.get(spec.name).filter(|value| !value.is_null());
        let Some(raw) = supplied else {
            if spec.required {
                return Err(NomadError::validation(
                    spec.name,
                    "required argument is missing",
                ));
            }
            if let Some(default) = spec.default {
                validated.insert(spec.name, ArgValue::Str(default.to_owned()));
            }
            continue;
        };

        if let Some(value) = convert(spec, raw)? {
            validated.insert(spec.name, value);
        }
    }

    for name in args.keys() {
        if operation.arg(name).is_none() {
            tracing::debug!(
                operation = operation.name,
                argument = %name,
                "ignoring undeclared argument"
            );
        }
    }

    Ok(validated)
}

fn convert(spec: &ArgSpec, raw: &Value) -> Result<Option<ArgValue>, NomadError> {
    match spec.kind {
        ArgKind::String => convert_string(spec, raw),
        ArgKind::Number => truncate(spec.name, raw).map(|n| Some(ArgValue::Int(n))),
        ArgKind::Bool => raw
            .as_bool()
            .map(|b| Some(ArgValue::Bool(b)))
            .ok_or_else(|| wrong_kind(spec)),
        ArgKind::Map => convert_map(spec, raw).map(|m| Some(ArgValue::Map(m))),
    }
}

fn convert_string(spec: &ArgSpec, raw: &Value) -> Result<Option<ArgValue>, NomadError> {
    let value = raw.as_str().ok_or_else(|| wrong_kind(spec))?;

    if value.is_empty() {
        if spec.required {
            return Err(NomadError::validation(spec.name, "must not be empty"));
        }
        return Ok(spec.default.map(|default| ArgValue::Str(default.to_owned())));
    }

    if !spec.allowed.is_empty() && !spec.allowed.contains(&value) {
        return Err(NomadError::validation(
            spec.name,
            format!(
                "'{value}' is not one of: {}",
                spec.allowed.join(", ")
            ),
        ));
    }

    // Path identifiers may not carry query or fragment delimiters.
    if spec.location == Location::Path && value.contains(['?', '#']) {
        return Err(NomadError::validation(
            spec.name,
            "must not contain '?' or '#'",
        ));
    }

    Ok(Some(ArgValue::Str(value.to_owned())))
}

/// Numbers arrive as JSON floats; integers are taken as-is, anything else is
/// truncated toward zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate(name: &str, raw: &Value) -> Result<i64, NomadError> {
    let Value::Number(number) = raw else {
        return Err(NomadError::validation(name, "expected a number"));
    };
    if let Some(int) = number.as_i64() {
        return Ok(int);
    }
    let float = number
        .as_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| NomadError::validation(name, "must be a finite number"))?;
    let truncated = float.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(NomadError::validation(name, "is out of range"));
    }
    Ok(truncated as i64)
}

fn convert_map(spec: &ArgSpec, raw: &Value) -> Result<BTreeMap<String, String>, NomadError> {
    let object = raw.as_object().ok_or_else(|| wrong_kind(spec))?;
    object
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key.clone(), s.clone())),
            _ => Err(NomadError::validation(
                format!("{}.{key}", spec.name),
                "map values must be strings",
            )),
        })
        .collect()
}

fn wrong_kind(spec: &ArgSpec) -> NomadError {
    NomadError::validation(spec.name, format!("expected a {}", spec.kind.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test arguments must be an object"),
        }
    }

    fn op(name: &str) -> &'static Operation {
        catalog::find(name).unwrap()
    }

    #[test]
    fn missing_required_argument_is_named() {
        let err = validate(op("scale_job"), &args(json!({"job_id": "web", "group": "api"})))
            .unwrap_err();
        match err {
            NomadError::Validation { field, .. } => assert_eq!(field, "count"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_required_string_is_rejected() {
        let err = validate(op("get_job"), &args(json!({"job_id": ""}))).unwrap_err();
        assert!(matches!(err, NomadError::Validation { ref field, .. } if field == "job_id"));
    }

    #[test]
    fn null_counts_as_absent() {
        let err = validate(op("get_job"), &args(json!({"job_id": null}))).unwrap_err();
        assert!(matches!(err, NomadError::Validation { .. }));
    }

    #[test]
    fn floats_are_truncated_toward_zero() {
        let validated = validate(
            op("scale_job"),
            &args(json!({"job_id": "web", "group": "api", "count": 3.9})),
        )
        .unwrap();
        assert_eq!(validated.int("count"), Some(3));

        let validated = validate(
            op("drain_node"),
            &args(json!({"node_id": "n1", "enable": true, "deadline": -1.5})),
        )
        .unwrap();
        assert_eq!(validated.int("deadline"), Some(-1));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let err = validate(
            op("scale_job"),
            &args(json!({"job_id": "web", "group": "api", "count": "3"})),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid argument 'count': expected a number");
    }

    #[test]
    fn enumerated_values_are_checked() {
        let err = validate(
            op("create_acl_token"),
            &args(json!({"type": "superuser"})),
        )
        .unwrap_err();
        assert!(err.to_string().contains("client, management"));

        let err = validate(op("list_jobs"), &args(json!({"status": "finished"}))).unwrap_err();
        assert!(matches!(err, NomadError::Validation { ref field, .. } if field == "status"));

        let err = validate(
            op("set_node_eligibility"),
            &args(json!({"node_id": "n1", "eligibility": "maybe"})),
        )
        .unwrap_err();
        assert!(
            matches!(err, NomadError::Validation { ref field, .. } if field == "eligibility")
        );

        let err = validate(
            op("create_sentinel_policy"),
            &args(json!({
                "name": "p",
                "policy": "main = rule { true }",
                "enforcement_level": "strict"
            })),
        )
        .unwrap_err();
        assert!(
            matches!(err, NomadError::Validation { ref field, .. } if field == "enforcement_level")
        );
    }

    #[test]
    fn defaults_are_applied() {
        let validated = validate(
            op("get_allocation_logs"),
            &args(json!({"alloc_id": "a1", "task": "web"})),
        )
        .unwrap();
        assert_eq!(validated.str("log_type"), Some("stdout"));
        assert_eq!(validated.str("origin"), Some("start"));
    }

    #[test]
    fn map_values_must_be_strings() {
        let err = validate(
            op("create_variable"),
            &args(json!({"path": "app/config", "items": {"port": 8080}})),
        )
        .unwrap_err();
        assert!(matches!(err, NomadError::Validation { ref field, .. } if field == "items.port"));
    }

    #[test]
    fn default_namespace_is_not_routed() {
        let validated = validate(op("list_jobs"), &args(json!({"namespace": "default"}))).unwrap();
        assert_eq!(validated.namespace(), None);

        let validated = validate(op("list_jobs"), &args(json!({"namespace": "billing"}))).unwrap();
        assert_eq!(validated.namespace(), Some("billing"));
    }

    #[test]
    fn undeclared_arguments_are_ignored() {
        let validated =
            validate(op("list_nodes"), &args(json!({"namespace": "billing", "bogus": 1}))).unwrap();
        assert_eq!(validated, ValidatedArgs::default());
    }
}

//! Operation + validated arguments → concrete [`Request`].
//!
//! Namespace routing, pagination, filters and CAS all land here. Values
//! that are empty, zero or false are left out of the query entirely.

use nomad_sdk::NomadError;
use serde_json::{Map, Value, json};

use crate::operation::{BodySpec, Location, NamespaceMode, Operation};
use crate::request::Request;
use crate::validate::{ArgValue, DEFAULT_NAMESPACE, ValidatedArgs};

/// Prefix shared by every API route.
pub const API_PREFIX: &str = "/v1/";

/// Build the outgoing request for `operation`.
///
/// # Errors
/// Returns [`NomadError::Validation`] when a path identifier cannot be
/// rendered or a body argument cannot be interpreted.
pub fn resolve_request(operation: &Operation, args: &ValidatedArgs) -> Result<Request, NomadError> {
    let resource = render_path(operation, args)?;
    let path = match (operation.namespace, args.namespace()) {
        (NamespaceMode::PathSegment, Some(namespace)) => format!(
            "{API_PREFIX}namespace/{}/{resource}",
            urlencoding::encode(namespace)
        ),
        _ => format!("{API_PREFIX}{resource}"),
    };

    let mut builder = Request::builder()
        .method(operation.verb.method())
        .path(path);

    for (key, value) in operation.fixed_query {
        builder = builder.query(*key, *value);
    }

    if let (NamespaceMode::QueryParam, Some(namespace)) = (operation.namespace, args.namespace()) {
        builder = builder.query("namespace", namespace);
    }

    let mut clauses = Vec::new();
    let mut raw_filter = None;

    for spec in operation.args {
        let Some(value) = args.get(spec.name) else {
            continue;
        };
        match spec.location {
            Location::Query(key) => {
                if let Some(rendered) = query_value(value) {
                    builder = builder.query(key, rendered);
                }
            }
            Location::QueryFlag(prefix) => {
                if let Some(flag) = args.non_empty(spec.name) {
                    builder = builder.query(format!("{prefix}{flag}"), "");
                }
            }
            Location::Filter => raw_filter = args.non_empty(spec.name),
            Location::FilterClause(field) => {
                if let Some(wanted) = args.non_empty(spec.name) {
                    clauses.push(format!("{field} == {}", quoted(wanted)));
                }
            }
            Location::Path | Location::Namespace | Location::Body => {}
        }
    }

    if let Some(filter) = merge_filter(raw_filter, &clauses) {
        builder = builder.query("filter", filter);
    }

    if let Some(body) = build_body(operation, args)? {
        builder = builder.json(body);
    }

    builder.build()
}

/// Parse a JSON job specification, unwrapping a `{"Job": …}` envelope.
///
/// Returns `Ok(None)` when `spec` is not a JSON object (treated as HCL).
///
/// # Errors
/// Returns [`NomadError::Validation`] on `job_spec` for an envelope whose
/// `Job` is not an object or that carries keys besides `Job`.
pub fn json_job(spec: &str) -> Result<Option<Value>, NomadError> {
    let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(spec) else {
        return Ok(None);
    };
    match object.remove("Job") {
        None => Ok(Some(Value::Object(object))),
        Some(job @ Value::Object(_)) if object.is_empty() => Ok(Some(job)),
        Some(Value::Object(_)) => Err(NomadError::validation(
            "job_spec",
            "a {\"Job\": ...} envelope must not carry other keys",
        )),
        Some(_) => Err(NomadError::validation(
            "job_spec",
            "the \"Job\" envelope must hold an object",
        )),
    }
}

fn render_path(operation: &Operation, args: &ValidatedArgs) -> Result<String, NomadError> {
    let mut rendered = String::with_capacity(operation.path.len());
    let mut rest = operation.path;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        rendered.push_str(&rest[..start]);
        rendered.push_str(&encode_identifier(name, args.str(name).unwrap_or_default())?);
        rest = &rest[start + len + 1..];
    }
    rendered.push_str(rest);
    Ok(rendered)
}

/// Percent-encode each `/`-separated segment so nested identifiers
/// (variable paths) keep their structure.
fn encode_identifier(name: &str, value: &str) -> Result<String, NomadError> {
    let trimmed = value.trim_matches('/');
    if trimmed.is_empty() {
        return Err(NomadError::validation(name, "must not be empty"));
    }
    let mut encoded = Vec::new();
    for segment in trimmed.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(NomadError::validation(
                name,
                format!("invalid path segment '{segment}'"),
            ));
        }
        encoded.push(urlencoding::encode(segment));
    }
    Ok(encoded.join("/"))
}

fn query_value(value: &ArgValue) -> Option<String> {
    match value {
        ArgValue::Str(s) if !s.is_empty() => Some(s.clone()),
        ArgValue::Int(n) if *n != 0 => Some(n.to_string()),
        ArgValue::Bool(true) => Some("true".to_owned()),
        _ => None,
    }
}

fn quoted(value: &str) -> String {
    Value::String(value.to_owned()).to_string()
}

fn merge_filter(raw: Option<&str>, clauses: &[String]) -> Option<String> {
    match (raw, clauses.is_empty()) {
        (None, true) => None,
        (Some(raw), true) => Some(raw.to_owned()),
        (None, false) => Some(clauses.join(" and ")),
        (Some(raw), false) => Some(format!("({raw}) and {}", clauses.join(" and "))),
    }
}

fn positive_cas(args: &ValidatedArgs) -> Option<i64> {
    args.int("cas").filter(|cas| *cas > 0)
}

fn policy_names(args: &ValidatedArgs) -> Vec<&str> {
    args.non_empty("policies")
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn text(args: &ValidatedArgs, name: &str) -> String {
    args.str(name).unwrap_or_default().to_owned()
}

fn build_body(operation: &Operation, args: &ValidatedArgs) -> Result<Option<Value>, NomadError> {
    let body = match operation.body {
        BodySpec::None => None,
        BodySpec::JobRegister => Some(job_register_body(args)?),
        BodySpec::JobParse => Some(json!({
            "JobHCL": text(args, "job_spec"),
            "Canonicalize": args.bool("canonicalize").unwrap_or(false),
        })),
        BodySpec::JobScale => Some(job_scale_body(args)),
        BodySpec::NodeDrain => Some(node_drain_body(args)),
        BodySpec::NodeEligibility => Some(json!({
            "NodeID": text(args, "node_id"),
            "Eligibility": text(args, "eligibility"),
        })),
        BodySpec::Namespace => Some(json!({
            "Name": text(args, "name"),
            "Description": text(args, "description"),
        })),
        BodySpec::Variable => Some(variable_body(args)),
        BodySpec::VariableCas => positive_cas(args).map(|cas| json!({ "CAS": cas })),
        BodySpec::AclToken => Some(json!({
            "Name": text(args, "name"),
            "Type": text(args, "type"),
            "Policies": policy_names(args),
            "Global": args.bool("global").unwrap_or(false),
        })),
        BodySpec::AclPolicy => Some(json!({
            "Name": text(args, "name"),
            "Description": text(args, "description"),
            "Rules": text(args, "rules"),
        })),
        BodySpec::AclRole => Some(acl_role_body(args)),
        BodySpec::AclBootstrap => args
            .non_empty("bootstrap_secret")
            .map(|secret| json!({ "BootstrapSecret": secret })),
        BodySpec::SentinelPolicy => Some(json!({
            "Name": text(args, "name"),
            "Description": text(args, "description"),
            "Scope": text(args, "scope"),
            "EnforcementLevel": text(args, "enforcement_level"),
            "Policy": text(args, "policy"),
        })),
    };
    Ok(body)
}

/// `job_spec` is either a job already parsed by the agent or JSON text.
fn job_register_body(args: &ValidatedArgs) -> Result<Value, NomadError> {
    let job = match args.get("job_spec") {
        Some(ArgValue::Json(job)) => job.clone(),
        Some(ArgValue::Str(spec)) => json_job(spec)?.ok_or_else(not_json_job)?,
        _ => return Err(not_json_job()),
    };
    Ok(json!({ "Job": job }))
}

fn not_json_job() -> NomadError {
    NomadError::validation("job_spec", "is not a JSON job specification")
}

fn job_scale_body(args: &ValidatedArgs) -> Value {
    let mut body = Map::new();
    body.insert("Count".to_owned(), json!(args.int("count").unwrap_or_default()));
    body.insert("Target".to_owned(), json!({ "Group": text(args, "group") }));
    if let Some(message) = args.non_empty("message") {
        body.insert("Message".to_owned(), json!(message));
    }
    if let Some(meta) = args.map("meta") {
        body.insert("Meta".to_owned(), json!(meta));
    }
    Value::Object(body)
}

fn node_drain_body(args: &ValidatedArgs) -> Value {
    if !args.bool("enable").unwrap_or(false) {
        return json!({
            "NodeID": text(args, "node_id"),
            "DrainSpec": null,
            "MarkEligible": true,
        });
    }
    json!({
        "NodeID": text(args, "node_id"),
        "DrainSpec": {
            "Deadline": args.int("deadline").unwrap_or_default(),
            "IgnoreSystemJobs": args.bool("ignore_system_jobs").unwrap_or(false),
        },
        "MarkEligible": false,
    })
}

fn variable_body(args: &ValidatedArgs) -> Value {
    let mut body = Map::new();
    body.insert(
        "Namespace".to_owned(),
        json!(args.namespace().unwrap_or(DEFAULT_NAMESPACE)),
    );
    body.insert("Path".to_owned(), json!(text(args, "path")));
    body.insert(
        "Items".to_owned(),
        json!(args.map("items").cloned().unwrap_or_default()),
    );
    if let Some(cas) = positive_cas(args) {
        body.insert("CAS".to_owned(), json!(cas));
    }
    Value::Object(body)
}

fn acl_role_body(args: &ValidatedArgs) -> Value {
    let policies: Vec<Value> = policy_names(args)
        .into_iter()
        .map(|name| json!({ "Name": name }))
        .collect();
    json!({
        "Name": text(args, "name"),
        "Description": text(args, "description"),
        "Policies": policies,
    })
}

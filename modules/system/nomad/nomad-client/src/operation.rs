//! Data model of a catalog entry.
//!
//! An [`Operation`] is pure data: verb, path template, namespace routing,
//! argument schema, body kind and result mode. The resolver, executor and
//! decoder each branch once on these fields and never on operation names.

use http::Method;

use crate::validate::ValidatedArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

/// How a non-default namespace is encoded in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceMode {
    /// Cluster-wide resource; namespace is ignored.
    None,
    /// `namespace/{ns}/` is prefixed to the resource path.
    PathSegment,
    /// `namespace={ns}` is appended to the query string.
    QueryParam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    String,
    /// Any JSON number, truncated toward zero to an integer.
    Number,
    Bool,
    /// Object of string values.
    Map,
}

impl ArgKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ArgKind::String => "string",
            ArgKind::Number => "number",
            ArgKind::Bool => "bool",
            ArgKind::Map => "map",
        }
    }
}

/// Where a validated argument ends up in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Substituted for `{name}` in the path template.
    Path,
    /// Appended as `key=value` when non-empty / non-zero / true.
    Query(&'static str),
    /// Appended as a valueless flag `{prefix}{value}`.
    QueryFlag(&'static str),
    /// Raw filter expression.
    Filter,
    /// Folded into the filter expression as `{field} == "{value}"`.
    FilterClause(&'static str),
    /// Routed according to the operation's [`NamespaceMode`].
    Namespace,
    /// Consumed by the operation's [`BodySpec`].
    Body,
}

#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
    /// Empty means unrestricted.
    pub allowed: &'static [&'static str],
    pub default: Option<&'static str>,
    pub location: Location,
    pub description: &'static str,
}

impl ArgSpec {
    const fn new(
        name: &'static str,
        kind: ArgKind,
        location: Location,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            required: false,
            allowed: &[],
            default: None,
            location,
            description,
        }
    }

    /// Required string substituted into the path template.
    #[must_use]
    pub const fn path(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ArgKind::String, Location::Path, description).required()
    }

    #[must_use]
    pub const fn query(
        name: &'static str,
        key: &'static str,
        kind: ArgKind,
        description: &'static str,
    ) -> Self {
        Self::new(name, kind, Location::Query(key), description)
    }

    #[must_use]
    pub const fn body(name: &'static str, kind: ArgKind, description: &'static str) -> Self {
        Self::new(name, kind, Location::Body, description)
    }

    #[must_use]
    pub const fn located(
        name: &'static str,
        kind: ArgKind,
        location: Location,
        description: &'static str,
    ) -> Self {
        Self::new(name, kind, location, description)
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    #[must_use]
    pub const fn or_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }
}

/// Request body produced from the validated arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySpec {
    None,
    /// `{"Job": <job>}`; HCL input is parsed remotely first.
    JobRegister,
    /// `{"JobHCL": <spec>, "Canonicalize": <bool>}`.
    JobParse,
    /// `{"Count", "Target": {"Group"}, "Message"?, "Meta"?}`.
    JobScale,
    /// `{"NodeID", "DrainSpec": {...} | null, "MarkEligible"}`.
    NodeDrain,
    /// `{"NodeID", "Eligibility"}`.
    NodeEligibility,
    /// `{"Name", "Description"}`.
    Namespace,
    /// `{"Namespace", "Path", "Items", "CAS"?}`.
    Variable,
    /// `{"CAS"}` when a positive CAS is supplied, otherwise no body.
    VariableCas,
    /// `{"Name", "Type", "Policies", "Global"}`.
    AclToken,
    /// `{"Name", "Description", "Rules"}`.
    AclPolicy,
    /// `{"Name", "Description", "Policies": [{"Name"}]}`.
    AclRole,
    /// `{"BootstrapSecret"}` when supplied, otherwise no body.
    AclBootstrap,
    /// `{"Name", "Description", "Scope", "EnforcementLevel", "Policy"}`.
    SentinelPolicy,
}

/// Declared shape of a typed response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Jobs,
    Job,
    JobRegistered,
    JobDeregistered,
    JobSummary,
    Allocations,
    Allocation,
    AllocationStopped,
    Deployments,
    Deployment,
    Nodes,
    Node,
    Namespaces,
    Variables,
    Variable,
    AclTokens,
    AclToken,
    AclPolicies,
    AclPolicy,
    AclRoles,
    AclRole,
    Volumes,
    Volume,
    Leader,
    RaftConfiguration,
    SentinelPolicies,
    SentinelPolicy,
}

/// Renders the confirmation returned by acknowledge-mode operations.
pub type Acknowledge = fn(&ValidatedArgs) -> String;

#[derive(Debug, Clone, Copy)]
pub enum ResultMode {
    /// Unmarshal into the declared shape; malformed JSON is a decode error.
    Typed(Shape),
    /// Return the body as text, untouched.
    Raw,
    /// Ignore the body and confirm with a message built from the arguments.
    Acknowledge(Acknowledge),
}

/// Process-level side effect applied after a successful call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Install the returned token's secret as the client's auth token.
    InstallToken,
}

#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub name: &'static str,
    pub description: &'static str,
    pub verb: Verb,
    /// Relative to `/v1/`, with `{arg}` placeholders.
    pub path: &'static str,
    pub namespace: NamespaceMode,
    pub args: &'static [ArgSpec],
    /// Query pairs sent on every call.
    pub fixed_query: &'static [(&'static str, &'static str)],
    pub body: BodySpec,
    pub result: ResultMode,
    pub effect: Effect,
}

impl Operation {
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&ArgSpec> {
        self.args.iter().find(|spec| spec.name == name)
    }

    pub fn required_args(&self) -> impl Iterator<Item = &ArgSpec> {
        self.args.iter().filter(|spec| spec.required)
    }
}

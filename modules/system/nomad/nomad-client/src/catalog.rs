//! Static table of every operation the adapter exposes.
//!
//! Adding an operation means adding a row here; the resolver, executor and
//! decoder are driven entirely by the row's data.

use crate::operation::{
    ArgKind, ArgSpec, BodySpec, Effect, Location, NamespaceMode, Operation, ResultMode, Shape,
    Verb,
};
use crate::validate::ValidatedArgs;

// ---------------------------------------------------------------------------
// Shared argument specs
// ---------------------------------------------------------------------------

const NAMESPACE: ArgSpec = ArgSpec::located(
    "namespace",
    ArgKind::String,
    Location::Namespace,
    "Namespace to operate in (default: \"default\")",
);
const PREFIX: ArgSpec = ArgSpec::query(
    "prefix",
    "prefix",
    ArgKind::String,
    "Only return entries whose ID starts with this prefix",
);
const NEXT_TOKEN: ArgSpec = ArgSpec::query(
    "next_token",
    "next_token",
    ArgKind::String,
    "Pagination token returned by a previous page",
);
const PER_PAGE: ArgSpec = ArgSpec::query(
    "per_page",
    "per_page",
    ArgKind::Number,
    "Maximum number of entries per page",
);
const FILTER: ArgSpec = ArgSpec::located(
    "filter",
    ArgKind::String,
    Location::Filter,
    "Server-side filter expression",
);

const JOB_ID: ArgSpec = ArgSpec::path("job_id", "Job ID");
const NODE_ID: ArgSpec = ArgSpec::path("node_id", "Node ID");
const ALLOC_ID: ArgSpec = ArgSpec::path("alloc_id", "Allocation ID");
const VARIABLE_PATH: ArgSpec = ArgSpec::path("path", "Variable path, e.g. app/config");
const ACCESSOR_ID: ArgSpec = ArgSpec::path("accessor_id", "ACL token accessor ID");
const POLICY_NAME: ArgSpec = ArgSpec::path("name", "Policy name");
const ROLE_ID: ArgSpec = ArgSpec::path("role_id", "ACL role ID");
const VOLUME_ID: ArgSpec = ArgSpec::path("volume_id", "Volume ID");
const DEPLOYMENT_ID: ArgSpec = ArgSpec::path("deployment_id", "Deployment ID");
const DESCRIPTION: ArgSpec = ArgSpec::body("description", ArgKind::String, "Free-form description");
const CAS: ArgSpec = ArgSpec::body(
    "cas",
    ArgKind::Number,
    "Check-and-set index; values <= 0 mean unconditional",
);

const JOB_STATUSES: &[&str] = &["pending", "running", "dead"];
const TOKEN_TYPES: &[&str] = &["client", "management"];
const ELIGIBILITY: &[&str] = &["eligible", "ineligible"];
const ENFORCEMENT_LEVELS: &[&str] = &["advisory", "soft-mandatory", "hard-mandatory"];
const LOG_TYPES: &[&str] = &["stdout", "stderr"];
const LOG_ORIGINS: &[&str] = &["start", "end"];
const LOCK_OPERATIONS: &[&str] = &["acquire", "release"];
const VOLUME_TYPES: &[&str] = &["host", "csi"];

const fn read(
    name: &'static str,
    description: &'static str,
    path: &'static str,
    namespace: NamespaceMode,
    args: &'static [ArgSpec],
    result: ResultMode,
) -> Operation {
    Operation {
        name,
        description,
        verb: Verb::Get,
        path,
        namespace,
        args,
        fixed_query: &[],
        body: BodySpec::None,
        result,
        effect: Effect::None,
    }
}

const fn write(
    name: &'static str,
    description: &'static str,
    verb: Verb,
    path: &'static str,
    namespace: NamespaceMode,
    args: &'static [ArgSpec],
    body: BodySpec,
    result: ResultMode,
) -> Operation {
    Operation {
        name,
        description,
        verb,
        path,
        namespace,
        args,
        fixed_query: &[],
        body,
        result,
        effect: Effect::None,
    }
}

// ---------------------------------------------------------------------------
// Confirmation messages
// ---------------------------------------------------------------------------

fn arg<'a>(args: &'a ValidatedArgs, name: &str) -> &'a str {
    args.str(name).unwrap_or_default()
}

fn drained(args: &ValidatedArgs) -> String {
    let node = arg(args, "node_id");
    if !args.bool("enable").unwrap_or(false) {
        return format!("Drain disabled on node {node}");
    }
    match args.int("deadline").unwrap_or(0) {
        0 => format!("Drain enabled on node {node} with no deadline"),
        deadline if deadline < 0 => {
            format!("Drain enabled on node {node}, forcing immediate migration")
        }
        deadline => format!("Drain enabled on node {node} with a deadline of {deadline} seconds"),
    }
}

fn eligibility_set(args: &ValidatedArgs) -> String {
    format!(
        "Node {} marked {}",
        arg(args, "node_id"),
        arg(args, "eligibility")
    )
}

fn namespace_created(args: &ValidatedArgs) -> String {
    format!("Namespace {} created", arg(args, "name"))
}

fn namespace_deleted(args: &ValidatedArgs) -> String {
    format!("Namespace {} deleted", arg(args, "name"))
}

fn variable_deleted(args: &ValidatedArgs) -> String {
    format!("Variable {} deleted", arg(args, "path"))
}

fn acl_token_deleted(args: &ValidatedArgs) -> String {
    format!("ACL token {} deleted", arg(args, "accessor_id"))
}

fn acl_policy_saved(args: &ValidatedArgs) -> String {
    format!("ACL policy {} saved", arg(args, "name"))
}

fn acl_policy_deleted(args: &ValidatedArgs) -> String {
    format!("ACL policy {} deleted", arg(args, "name"))
}

fn acl_role_deleted(args: &ValidatedArgs) -> String {
    format!("ACL role {} deleted", arg(args, "role_id"))
}

fn volume_deleted(args: &ValidatedArgs) -> String {
    format!("Volume {} deleted", arg(args, "volume_id"))
}

fn sentinel_policy_saved(args: &ValidatedArgs) -> String {
    format!("Sentinel policy {} saved", arg(args, "name"))
}

fn sentinel_policy_deleted(args: &ValidatedArgs) -> String {
    format!("Sentinel policy {} deleted", arg(args, "name"))
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// Remote HCL → JSON job conversion; also used ahead of `run_job`.
pub const PARSE_JOB: Operation = write(
    "parse_job",
    "Convert an HCL job specification to JSON using the agent's parser",
    Verb::Post,
    "jobs/parse",
    NamespaceMode::None,
    &[
        ArgSpec::body("job_spec", ArgKind::String, "HCL job specification").required(),
        ArgSpec::body("canonicalize", ArgKind::Bool, "Fill in server-side defaults"),
    ],
    BodySpec::JobParse,
    ResultMode::Raw,
);

const JOBS: &[Operation] = &[
    read(
        "list_jobs",
        "List jobs",
        "jobs",
        NamespaceMode::QueryParam,
        &[
            NAMESPACE,
            PREFIX,
            ArgSpec::located(
                "status",
                ArgKind::String,
                Location::FilterClause("Status"),
                "Only return jobs with this status",
            )
            .one_of(JOB_STATUSES),
            NEXT_TOKEN,
            PER_PAGE,
            FILTER,
        ],
        ResultMode::Typed(Shape::Jobs),
    ),
    read(
        "get_job",
        "Get a job's full specification",
        "job/{job_id}",
        NamespaceMode::PathSegment,
        &[JOB_ID, NAMESPACE],
        ResultMode::Typed(Shape::Job),
    ),
    write(
        "run_job",
        "Register (create or update) a job from a JSON or HCL specification",
        Verb::Post,
        "jobs",
        NamespaceMode::PathSegment,
        &[
            ArgSpec::body("job_spec", ArgKind::String, "Job specification as JSON or HCL")
                .required(),
            NAMESPACE,
        ],
        BodySpec::JobRegister,
        ResultMode::Typed(Shape::JobRegistered),
    ),
    Operation {
        verb: Verb::Delete,
        ..read(
            "stop_job",
            "Stop (deregister) a job",
            "job/{job_id}",
            NamespaceMode::PathSegment,
            &[
                JOB_ID,
                NAMESPACE,
                ArgSpec::query("purge", "purge", ArgKind::Bool, "Purge the job from state"),
            ],
            ResultMode::Typed(Shape::JobDeregistered),
        )
    },
    write(
        "scale_job",
        "Set the count of a job's task group",
        Verb::Post,
        "job/{job_id}/scale",
        NamespaceMode::PathSegment,
        &[
            JOB_ID,
            ArgSpec::body("group", ArgKind::String, "Task group to scale").required(),
            ArgSpec::body("count", ArgKind::Number, "Desired count").required(),
            ArgSpec::body("message", ArgKind::String, "Reason recorded with the scaling event"),
            ArgSpec::body("meta", ArgKind::Map, "Metadata recorded with the scaling event"),
            NAMESPACE,
        ],
        BodySpec::JobScale,
        ResultMode::Typed(Shape::JobRegistered),
    ),
    read(
        "get_job_allocations",
        "List a job's allocations",
        "job/{job_id}/allocations",
        NamespaceMode::PathSegment,
        &[JOB_ID, NAMESPACE],
        ResultMode::Typed(Shape::Allocations),
    ),
    read(
        "get_job_evaluations",
        "List a job's evaluations",
        "job/{job_id}/evaluations",
        NamespaceMode::PathSegment,
        &[JOB_ID, NAMESPACE],
        ResultMode::Raw,
    ),
    read(
        "get_job_deployments",
        "List a job's deployments",
        "job/{job_id}/deployments",
        NamespaceMode::PathSegment,
        &[JOB_ID, NAMESPACE],
        ResultMode::Typed(Shape::Deployments),
    ),
    read(
        "get_job_summary",
        "Get a job's per-group allocation summary",
        "job/{job_id}/summary",
        NamespaceMode::PathSegment,
        &[JOB_ID, NAMESPACE],
        ResultMode::Typed(Shape::JobSummary),
    ),
    read(
        "get_job_services",
        "List service registrations and health for a job",
        "job/{job_id}/services",
        NamespaceMode::PathSegment,
        &[JOB_ID, NAMESPACE],
        ResultMode::Raw,
    ),
    PARSE_JOB,
];

// ---------------------------------------------------------------------------
// Nodes / namespaces
// ---------------------------------------------------------------------------

const NODES: &[Operation] = &[
    read(
        "list_nodes",
        "List client nodes",
        "nodes",
        NamespaceMode::None,
        &[PREFIX, NEXT_TOKEN, PER_PAGE, FILTER],
        ResultMode::Typed(Shape::Nodes),
    ),
    read(
        "get_node",
        "Get a client node",
        "node/{node_id}",
        NamespaceMode::None,
        &[NODE_ID],
        ResultMode::Typed(Shape::Node),
    ),
    write(
        "drain_node",
        "Enable or disable drain mode on a node",
        Verb::Post,
        "node/{node_id}/drain",
        NamespaceMode::None,
        &[
            NODE_ID,
            ArgSpec::body("enable", ArgKind::Bool, "true to drain, false to stop draining")
                .required(),
            ArgSpec::body(
                "deadline",
                ArgKind::Number,
                "Seconds allocations may take to migrate (0: none, negative: force)",
            ),
            ArgSpec::body(
                "ignore_system_jobs",
                ArgKind::Bool,
                "Leave system job allocations in place",
            ),
        ],
        BodySpec::NodeDrain,
        ResultMode::Acknowledge(drained),
    ),
    write(
        "set_node_eligibility",
        "Toggle whether new allocations may be scheduled on a node",
        Verb::Post,
        "node/{node_id}/eligibility",
        NamespaceMode::None,
        &[
            NODE_ID,
            ArgSpec::body("eligibility", ArgKind::String, "eligible or ineligible")
                .required()
                .one_of(ELIGIBILITY),
        ],
        BodySpec::NodeEligibility,
        ResultMode::Acknowledge(eligibility_set),
    ),
];

const NAMESPACES: &[Operation] = &[
    read(
        "list_namespaces",
        "List namespaces",
        "namespaces",
        NamespaceMode::None,
        &[PREFIX],
        ResultMode::Typed(Shape::Namespaces),
    ),
    write(
        "create_namespace",
        "Create or update a namespace",
        Verb::Post,
        "namespace",
        NamespaceMode::None,
        &[
            ArgSpec::body("name", ArgKind::String, "Namespace name").required(),
            DESCRIPTION,
        ],
        BodySpec::Namespace,
        ResultMode::Acknowledge(namespace_created),
    ),
    write(
        "delete_namespace",
        "Delete a namespace",
        Verb::Delete,
        "namespace/{name}",
        NamespaceMode::None,
        &[ArgSpec::path("name", "Namespace name")],
        BodySpec::None,
        ResultMode::Acknowledge(namespace_deleted),
    ),
];

// ---------------------------------------------------------------------------
// Allocations / deployments
// ---------------------------------------------------------------------------

const ALLOCATIONS: &[Operation] = &[
    read(
        "list_allocations",
        "List allocations",
        "allocations",
        NamespaceMode::QueryParam,
        &[NAMESPACE, PREFIX, NEXT_TOKEN, PER_PAGE, FILTER],
        ResultMode::Typed(Shape::Allocations),
    ),
    read(
        "get_allocation",
        "Get an allocation",
        "allocation/{alloc_id}",
        NamespaceMode::QueryParam,
        &[ALLOC_ID, NAMESPACE],
        ResultMode::Typed(Shape::Allocation),
    ),
    write(
        "stop_allocation",
        "Stop an allocation so it is rescheduled",
        Verb::Post,
        "allocation/{alloc_id}/stop",
        NamespaceMode::QueryParam,
        &[ALLOC_ID, NAMESPACE],
        BodySpec::None,
        ResultMode::Typed(Shape::AllocationStopped),
    ),
    Operation {
        fixed_query: &[("plain", "true")],
        ..read(
            "get_allocation_logs",
            "Read a task's stdout or stderr log",
            "client/fs/logs/{alloc_id}",
            NamespaceMode::QueryParam,
            &[
                ALLOC_ID,
                ArgSpec::query("task", "task", ArgKind::String, "Task name").required(),
                ArgSpec::query("log_type", "type", ArgKind::String, "stdout or stderr")
                    .one_of(LOG_TYPES)
                    .or_default("stdout"),
                ArgSpec::query("origin", "origin", ArgKind::String, "Read from start or end")
                    .one_of(LOG_ORIGINS)
                    .or_default("start"),
                ArgSpec::query("offset", "offset", ArgKind::Number, "Byte offset from origin"),
                NAMESPACE,
            ],
            ResultMode::Raw,
        )
    },
];

const DEPLOYMENTS: &[Operation] = &[
    read(
        "list_deployments",
        "List deployments",
        "deployments",
        NamespaceMode::QueryParam,
        &[NAMESPACE, PREFIX, NEXT_TOKEN, PER_PAGE, FILTER],
        ResultMode::Typed(Shape::Deployments),
    ),
    read(
        "get_deployment",
        "Get a deployment",
        "deployment/{deployment_id}",
        NamespaceMode::QueryParam,
        &[DEPLOYMENT_ID, NAMESPACE],
        ResultMode::Typed(Shape::Deployment),
    ),
];

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

const VARIABLES: &[Operation] = &[
    read(
        "list_variables",
        "List variable metadata",
        "vars",
        NamespaceMode::QueryParam,
        &[NAMESPACE, PREFIX, NEXT_TOKEN, PER_PAGE, FILTER],
        ResultMode::Typed(Shape::Variables),
    ),
    read(
        "get_variable",
        "Read a variable and its items",
        "var/{path}",
        NamespaceMode::QueryParam,
        &[VARIABLE_PATH, NAMESPACE],
        ResultMode::Typed(Shape::Variable),
    ),
    write(
        "create_variable",
        "Create or update a variable",
        Verb::Put,
        "var/{path}",
        NamespaceMode::QueryParam,
        &[
            VARIABLE_PATH,
            ArgSpec::body("items", ArgKind::Map, "Key/value items").required(),
            NAMESPACE,
            CAS,
            ArgSpec::located(
                "lock_operation",
                ArgKind::String,
                Location::QueryFlag("lock-"),
                "Acquire or release the variable lock",
            )
            .one_of(LOCK_OPERATIONS),
        ],
        BodySpec::Variable,
        ResultMode::Typed(Shape::Variable),
    ),
    write(
        "delete_variable",
        "Delete a variable",
        Verb::Delete,
        "var/{path}",
        NamespaceMode::QueryParam,
        &[VARIABLE_PATH, NAMESPACE, CAS],
        BodySpec::VariableCas,
        ResultMode::Acknowledge(variable_deleted),
    ),
];

// ---------------------------------------------------------------------------
// ACL
// ---------------------------------------------------------------------------

const ACL: &[Operation] = &[
    read(
        "list_acl_tokens",
        "List ACL tokens",
        "acl/tokens",
        NamespaceMode::None,
        &[],
        ResultMode::Typed(Shape::AclTokens),
    ),
    read(
        "get_acl_token",
        "Get an ACL token by accessor ID",
        "acl/token/{accessor_id}",
        NamespaceMode::None,
        &[ACCESSOR_ID],
        ResultMode::Typed(Shape::AclToken),
    ),
    write(
        "create_acl_token",
        "Create an ACL token",
        Verb::Post,
        "acl/token",
        NamespaceMode::None,
        &[
            ArgSpec::body("name", ArgKind::String, "Human-readable token name"),
            ArgSpec::body("type", ArgKind::String, "client or management")
                .one_of(TOKEN_TYPES)
                .or_default("client"),
            ArgSpec::body("policies", ArgKind::String, "Comma-separated policy names"),
            ArgSpec::body("global", ArgKind::Bool, "Replicate to all regions"),
        ],
        BodySpec::AclToken,
        ResultMode::Typed(Shape::AclToken),
    ),
    write(
        "delete_acl_token",
        "Delete an ACL token",
        Verb::Delete,
        "acl/token/{accessor_id}",
        NamespaceMode::None,
        &[ACCESSOR_ID],
        BodySpec::None,
        ResultMode::Acknowledge(acl_token_deleted),
    ),
    read(
        "list_acl_policies",
        "List ACL policies",
        "acl/policies",
        NamespaceMode::None,
        &[PREFIX],
        ResultMode::Typed(Shape::AclPolicies),
    ),
    read(
        "get_acl_policy",
        "Get an ACL policy",
        "acl/policy/{name}",
        NamespaceMode::None,
        &[POLICY_NAME],
        ResultMode::Typed(Shape::AclPolicy),
    ),
    write(
        "create_acl_policy",
        "Create or update an ACL policy",
        Verb::Post,
        "acl/policy/{name}",
        NamespaceMode::None,
        &[
            POLICY_NAME,
            DESCRIPTION,
            ArgSpec::body("rules", ArgKind::String, "Policy rules in HCL").required(),
        ],
        BodySpec::AclPolicy,
        ResultMode::Acknowledge(acl_policy_saved),
    ),
    write(
        "delete_acl_policy",
        "Delete an ACL policy",
        Verb::Delete,
        "acl/policy/{name}",
        NamespaceMode::None,
        &[POLICY_NAME],
        BodySpec::None,
        ResultMode::Acknowledge(acl_policy_deleted),
    ),
    read(
        "list_acl_roles",
        "List ACL roles",
        "acl/roles",
        NamespaceMode::None,
        &[PREFIX],
        ResultMode::Typed(Shape::AclRoles),
    ),
    read(
        "get_acl_role",
        "Get an ACL role",
        "acl/role/{role_id}",
        NamespaceMode::None,
        &[ROLE_ID],
        ResultMode::Typed(Shape::AclRole),
    ),
    write(
        "create_acl_role",
        "Create an ACL role",
        Verb::Post,
        "acl/role",
        NamespaceMode::None,
        &[
            ArgSpec::body("name", ArgKind::String, "Role name").required(),
            DESCRIPTION,
            ArgSpec::body("policies", ArgKind::String, "Comma-separated policy names")
                .required(),
        ],
        BodySpec::AclRole,
        ResultMode::Typed(Shape::AclRole),
    ),
    write(
        "delete_acl_role",
        "Delete an ACL role",
        Verb::Delete,
        "acl/role/{role_id}",
        NamespaceMode::None,
        &[ROLE_ID],
        BodySpec::None,
        ResultMode::Acknowledge(acl_role_deleted),
    ),
    Operation {
        effect: Effect::InstallToken,
        ..write(
            "bootstrap_acl_token",
            "Mint the initial management token and use it for subsequent calls",
            Verb::Post,
            "acl/bootstrap",
            NamespaceMode::None,
            &[ArgSpec::body(
                "bootstrap_secret",
                ArgKind::String,
                "Operator-chosen secret for the management token",
            )],
            BodySpec::AclBootstrap,
            ResultMode::Typed(Shape::AclToken),
        )
    },
];

// ---------------------------------------------------------------------------
// Volumes / cluster / Sentinel
// ---------------------------------------------------------------------------

const VOLUMES: &[Operation] = &[
    read(
        "list_volumes",
        "List volumes",
        "volumes",
        NamespaceMode::QueryParam,
        &[
            NAMESPACE,
            ArgSpec::query("type", "type", ArgKind::String, "host or csi")
                .one_of(VOLUME_TYPES)
                .or_default("host"),
            PREFIX,
            NEXT_TOKEN,
            PER_PAGE,
            FILTER,
        ],
        ResultMode::Typed(Shape::Volumes),
    ),
    read(
        "get_volume",
        "Get a host volume",
        "volume/host/{volume_id}",
        NamespaceMode::QueryParam,
        &[VOLUME_ID, NAMESPACE],
        ResultMode::Typed(Shape::Volume),
    ),
    write(
        "delete_volume",
        "Delete a host volume",
        Verb::Delete,
        "volume/host/{volume_id}",
        NamespaceMode::QueryParam,
        &[VOLUME_ID, NAMESPACE],
        BodySpec::None,
        ResultMode::Acknowledge(volume_deleted),
    ),
];

const CLUSTER: &[Operation] = &[
    read(
        "get_cluster_leader",
        "Get the address of the current Raft leader",
        "status/leader",
        NamespaceMode::None,
        &[],
        ResultMode::Typed(Shape::Leader),
    ),
    read(
        "get_cluster_peers",
        "Get the Raft peer configuration",
        "operator/raft/configuration",
        NamespaceMode::None,
        &[],
        ResultMode::Typed(Shape::RaftConfiguration),
    ),
    read(
        "list_regions",
        "List known regions",
        "regions",
        NamespaceMode::None,
        &[],
        ResultMode::Raw,
    ),
    read(
        "get_cluster_metrics",
        "Get agent telemetry metrics",
        "metrics",
        NamespaceMode::None,
        &[],
        ResultMode::Raw,
    ),
];

const SENTINEL: &[Operation] = &[
    read(
        "list_sentinel_policies",
        "List Sentinel policies",
        "sentinel/policies",
        NamespaceMode::None,
        &[],
        ResultMode::Typed(Shape::SentinelPolicies),
    ),
    read(
        "get_sentinel_policy",
        "Get a Sentinel policy",
        "sentinel/policy/{name}",
        NamespaceMode::None,
        &[POLICY_NAME],
        ResultMode::Typed(Shape::SentinelPolicy),
    ),
    write(
        "create_sentinel_policy",
        "Create or update a Sentinel policy",
        Verb::Post,
        "sentinel/policy/{name}",
        NamespaceMode::None,
        &[
            POLICY_NAME,
            DESCRIPTION,
            ArgSpec::body("scope", ArgKind::String, "Policy scope").or_default("submit-job"),
            ArgSpec::body("enforcement_level", ArgKind::String, "Enforcement level")
                .one_of(ENFORCEMENT_LEVELS)
                .or_default("advisory"),
            ArgSpec::body("policy", ArgKind::String, "Sentinel policy source").required(),
        ],
        BodySpec::SentinelPolicy,
        ResultMode::Acknowledge(sentinel_policy_saved),
    ),
    write(
        "delete_sentinel_policy",
        "Delete a Sentinel policy",
        Verb::Delete,
        "sentinel/policy/{name}",
        NamespaceMode::None,
        &[POLICY_NAME],
        BodySpec::None,
        ResultMode::Acknowledge(sentinel_policy_deleted),
    ),
];

const FAMILIES: &[&[Operation]] = &[
    JOBS,
    NODES,
    NAMESPACES,
    ALLOCATIONS,
    DEPLOYMENTS,
    VARIABLES,
    ACL,
    VOLUMES,
    CLUSTER,
    SENTINEL,
];

/// Every operation, grouped by resource family.
pub fn operations() -> impl Iterator<Item = &'static Operation> {
    FAMILIES.iter().flat_map(|family| family.iter())
}

/// Look up an operation by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Operation> {
    operations().find(|operation| operation.name == name)
}

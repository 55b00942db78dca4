use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::models::{
    AclPolicy, AclPolicyListStub, AclRole, AclToken, AclTokenListStub, AllocListStub,
    AllocStopResponse, Allocation, Deployment, Job, JobDeregisterResponse, JobListStub,
    JobRegisterResponse, JobSummary, Namespace, Node, NodeListStub, RaftConfiguration,
    SentinelPolicy, SentinelPolicyListStub, Variable, VariableMetadata, Volume, VolumeListStub,
};

/// Result of one invocation.
///
/// Structured variants carry the decoded shape the operation declares;
/// [`Output::Text`] carries a passthrough body untouched and
/// [`Output::Message`] a confirmation for endpoints with no meaningful body.
/// A passthrough body that is not UTF-8 (a log read starting mid-character,
/// binary task output) arrives as [`Output::Bytes`], byte for byte.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Jobs(Vec<JobListStub>),
    Job(Box<Job>),
    JobRegistered(JobRegisterResponse),
    JobDeregistered(JobDeregisterResponse),
    JobSummary(JobSummary),
    Allocations(Vec<AllocListStub>),
    Allocation(Box<Allocation>),
    AllocationStopped(AllocStopResponse),
    Deployments(Vec<Deployment>),
    Deployment(Box<Deployment>),
    Nodes(Vec<NodeListStub>),
    Node(Box<Node>),
    Namespaces(Vec<Namespace>),
    Variables(Vec<VariableMetadata>),
    Variable(Box<Variable>),
    AclTokens(Vec<AclTokenListStub>),
    AclToken(Box<AclToken>),
    AclPolicies(Vec<AclPolicyListStub>),
    AclPolicy(AclPolicy),
    AclRoles(Vec<AclRole>),
    AclRole(AclRole),
    Volumes(Vec<VolumeListStub>),
    Volume(Box<Volume>),
    Leader(String),
    RaftConfiguration(RaftConfiguration),
    SentinelPolicies(Vec<SentinelPolicyListStub>),
    SentinelPolicy(SentinelPolicy),
    Message(String),
    Text(String),
    #[serde(serialize_with = "lossy_text")]
    Bytes(Bytes),
}

impl Output {
    /// Render for a text-only caller: structured values become pretty JSON,
    /// passthrough text and messages are returned unchanged. Invalid UTF-8
    /// in [`Output::Bytes`] is replaced with U+FFFD.
    ///
    /// # Errors
    /// Returns the serializer error if a structured value cannot be encoded.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        match self {
            Output::Message(text) | Output::Text(text) => Ok(text.clone()),
            Output::Bytes(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
            structured => serde_json::to_string_pretty(structured),
        }
    }
}

fn lossy_text<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

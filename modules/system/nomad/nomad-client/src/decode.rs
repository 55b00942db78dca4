use bytes::Bytes;
use nomad_sdk::{NomadError, Output};
use serde::de::DeserializeOwned;

use crate::operation::{ResultMode, Shape};
use crate::validate::ValidatedArgs;

/// Decode a successful response body according to the operation's result mode.
///
/// Raw bodies are never rejected: UTF-8 arrives as [`Output::Text`], anything
/// else as [`Output::Bytes`] with the bytes untouched.
///
/// # Errors
/// Returns [`NomadError::Decode`] when a typed body does not match its shape.
pub fn decode(mode: &ResultMode, body: &Bytes, args: &ValidatedArgs) -> Result<Output, NomadError> {
    let output = match mode {
        ResultMode::Typed(shape) => decode_typed(*shape, body)?,
        ResultMode::Raw => passthrough(body),
        ResultMode::Acknowledge(render) => Output::Message(render(args)),
    };
    Ok(output)
}

fn passthrough(body: &Bytes) -> Output {
    match std::str::from_utf8(body) {
        Ok(text) => Output::Text(text.to_owned()),
        Err(_) => Output::Bytes(body.clone()),
    }
}

fn parse<T: DeserializeOwned>(body: &Bytes) -> Result<T, NomadError> {
    Ok(serde_json::from_slice(body)?)
}

fn decode_typed(shape: Shape, body: &Bytes) -> Result<Output, NomadError> {
    let output = match shape {
        Shape::Jobs => Output::Jobs(parse(body)?),
        Shape::Job => Output::Job(parse(body)?),
        Shape::JobRegistered => Output::JobRegistered(parse(body)?),
        Shape::JobDeregistered => Output::JobDeregistered(parse(body)?),
        Shape::JobSummary => Output::JobSummary(parse(body)?),
        Shape::Allocations => Output::Allocations(parse(body)?),
        Shape::Allocation => Output::Allocation(parse(body)?),
        Shape::AllocationStopped => Output::AllocationStopped(parse(body)?),
        Shape::Deployments => Output::Deployments(parse(body)?),
        Shape::Deployment => Output::Deployment(parse(body)?),
        Shape::Nodes => Output::Nodes(parse(body)?),
        Shape::Node => Output::Node(parse(body)?),
        Shape::Namespaces => Output::Namespaces(parse(body)?),
        Shape::Variables => Output::Variables(parse(body)?),
        Shape::Variable => Output::Variable(parse(body)?),
        Shape::AclTokens => Output::AclTokens(parse(body)?),
        Shape::AclToken => Output::AclToken(parse(body)?),
        Shape::AclPolicies => Output::AclPolicies(parse(body)?),
        Shape::AclPolicy => Output::AclPolicy(parse(body)?),
        Shape::AclRoles => Output::AclRoles(parse(body)?),
        Shape::AclRole => Output::AclRole(parse(body)?),
        Shape::Volumes => Output::Volumes(parse(body)?),
        Shape::Volume => Output::Volume(parse(body)?),
        Shape::Leader => Output::Leader(parse(body)?),
        Shape::RaftConfiguration => Output::RaftConfiguration(parse(body)?),
        Shape::SentinelPolicies => Output::SentinelPolicies(parse(body)?),
        Shape::SentinelPolicy => Output::SentinelPolicy(parse(body)?),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(shape: Shape, body: &'static str) -> Result<Output, NomadError> {
        decode(
            &ResultMode::Typed(shape),
            &Bytes::from_static(body.as_bytes()),
            &ValidatedArgs::default(),
        )
    }

    #[test]
    fn typed_list_decodes() {
        let out = typed(
            Shape::Jobs,
            r#"[{"ID":"web","Name":"web","Status":"running","Type":"service"}]"#,
        )
        .unwrap();
        match out {
            Output::Jobs(jobs) => {
                assert_eq!(jobs.len(), 1);
                assert_eq!(jobs[0].id, "web");
                assert_eq!(jobs[0].status, "running");
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn leader_is_a_json_string() {
        let out = typed(Shape::Leader, r#""10.0.0.1:4647""#).unwrap();
        assert_eq!(out, Output::Leader("10.0.0.1:4647".to_owned()));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = typed(Shape::Job, "{not json").unwrap_err();
        assert!(matches!(err, NomadError::Decode(_)));

        let err = typed(Shape::Jobs, r#"{"ID":"web"}"#).unwrap_err();
        assert!(matches!(err, NomadError::Decode(_)));
    }

    #[test]
    fn raw_body_is_passed_through() {
        let text = "line 1\n{\"not\": \"parsed\"\n";
        let body = Bytes::from_static(text.as_bytes());
        let args = ValidatedArgs::default();
        let out = decode(&ResultMode::Raw, &body, &args).unwrap();
        assert_eq!(out, Output::Text(text.to_owned()));
    }

    #[test]
    fn raw_body_with_split_character_is_kept_verbatim() {
        // "é" is 0xC3 0xA9; a read starting at the second byte splits it.
        let body = Bytes::from_static(b"\xa9 caf\xc3\xa9\n");
        let args = ValidatedArgs::default();
        let out = decode(&ResultMode::Raw, &body, &args).unwrap();
        assert_eq!(out, Output::Bytes(body));
    }

    #[test]
    fn acknowledge_ignores_body() {
        fn done(_: &ValidatedArgs) -> String {
            "done".to_owned()
        }
        let body = Bytes::from_static(b"<html>whatever</html>");
        let args = ValidatedArgs::default();
        let out = decode(&ResultMode::Acknowledge(done), &body, &args).unwrap();
        assert_eq!(out, Output::Message("done".to_owned()));
    }
}

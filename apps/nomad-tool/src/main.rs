mod cli;
mod config;
mod logging;

use std::io::Write;

use anyhow::{Context, bail};
use clap::Parser;
use nomad_client::operation::{ArgKind, Operation};
use nomad_client::{Arguments, NomadClient, Output, catalog};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::config::ToolConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ToolConfig::load(&cli).context("failed to load configuration")?;
    logging::init(&config.log);
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Operations => {
            for operation in catalog::operations() {
                println!("{:<26} {}", operation.name, operation.description);
            }
        }
        Command::Describe { operation } => {
            let operation = lookup(&operation)?;
            print!("{}", describe(operation));
        }
        Command::Invoke {
            operation,
            args,
            args_json,
        } => {
            let spec = lookup(&operation)?;
            let arguments = collect_arguments(spec, args_json.as_deref(), &args)?;
            let client = NomadClient::connect(config.client_config())
                .await
                .with_context(|| format!("cannot reach Nomad agent at {}", config.addr))?;
            let output = client.invoke(spec.name, &arguments).await?;
            print_output(&output)?;
        }
    }
    Ok(())
}

/// Non-UTF-8 passthrough bodies go to stdout byte for byte.
fn print_output(output: &Output) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match output {
        Output::Bytes(bytes) => stdout.write_all(bytes)?,
        other => writeln!(stdout, "{}", other.to_text()?)?,
    }
    stdout.flush()?;
    Ok(())
}

fn lookup(name: &str) -> anyhow::Result<&'static Operation> {
    catalog::find(name)
        .with_context(|| format!("unknown operation '{name}'; run `nomad-tool operations`"))
}

fn describe(operation: &Operation) -> String {
    let mut text = format!(
        "{} ({} /v1/{})\n  {}\n",
        operation.name,
        operation.verb.method(),
        operation.path,
        operation.description
    );
    for spec in operation.args {
        let mut line = format!("  --arg {}=<{}>", spec.name, spec.kind.as_str());
        if spec.required {
            line.push_str(" (required)");
        }
        if !spec.allowed.is_empty() {
            line.push_str(&format!(" one of: {}", spec.allowed.join(", ")));
        }
        if let Some(default) = spec.default {
            line.push_str(&format!(" [default: {default}]"));
        }
        text.push_str(&format!("{line}\n      {}\n", spec.description));
    }
    text
}

/// Merge `--args-json` with `--arg key=value` pairs. String arguments are
/// taken verbatim; everything else is parsed as JSON.
fn collect_arguments(
    operation: &Operation,
    json: Option<&str>,
    pairs: &[String],
) -> anyhow::Result<Arguments> {
    let mut arguments = match json {
        Some(raw) => {
            let value: Value = serde_json::from_str(raw)
                .context("--args-json is not valid JSON")?;
            let Value::Object(map) = value else {
                bail!("--args-json must be a JSON object");
            };
            map
        }
        None => Arguments::new(),
    };

    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("--arg '{pair}' is not in KEY=VALUE form");
        };
        let value = match operation.arg(key).map(|spec| spec.kind) {
            Some(ArgKind::String) | None => Value::String(raw.to_owned()),
            Some(kind) => serde_json::from_str(raw)
                .with_context(|| format!("--arg {key}: expected a {}", kind.as_str()))?,
        };
        arguments.insert(key.to_owned(), value);
    }
    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn pairs_follow_declared_kinds() {
        let operation = catalog::find("scale_job").unwrap();
        let pairs = [
            "job_id=123".to_owned(),
            "count=3".to_owned(),
            "meta={\"reason\":\"load\"}".to_owned(),
        ];
        let args = collect_arguments(operation, Some(r#"{"group": "api"}"#), &pairs).unwrap();
        assert_eq!(args["job_id"], json!("123"));
        assert_eq!(args["count"], json!(3));
        assert_eq!(args["meta"], json!({"reason": "load"}));
        assert_eq!(args["group"], json!("api"));
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        let operation = catalog::find("drain_node").unwrap();
        assert!(collect_arguments(operation, None, &["enable".to_owned()]).is_err());
        assert!(collect_arguments(operation, None, &["enable=maybe".to_owned()]).is_err());
        assert!(collect_arguments(operation, Some("[1]"), &[]).is_err());
    }

    #[test]
    fn describe_lists_arguments() {
        let text = describe(catalog::find("get_allocation_logs").unwrap());
        assert!(text.contains("GET /v1/client/fs/logs/{alloc_id}"));
        assert!(text.contains("--arg task=<string> (required)"));
        assert!(text.contains("[default: stdout]"));
    }
}

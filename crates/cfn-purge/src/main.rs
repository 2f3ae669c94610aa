//! cfn-purge: delete a CloudFormation stack including the contents of its
//! ECR repositories
//!
//! The DeleteStack API cannot remove a stack whose ECR repositories still
//! hold images. This tool empties those repositories first and then
//! requests the stack deletion.

use anyhow::{Context, Result};
use cfn_purge::aws::{AwsContext, CloudFormationClient, EcrClient};
use cfn_purge::config::{AwsConfig, OutputFormat, PurgeConfig};
use cfn_purge::output;
use cfn_purge::purge::StackPurger;
use cfn_purge_common::RemoteError;
use cfn_purge_common::defaults::{DEFAULT_REGION, DEFAULT_REPOSITORY_TYPE};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Parser, Debug)]
#[command(name = "cfn-purge")]
#[command(about = "Delete a CloudFormation stack completely, including ECR repository contents")]
#[command(version)]
struct Args {
    /// Name or id of the stack to delete
    #[arg(short, long)]
    stack_name: String,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// AWS profile to use (overrides AWS_PROFILE env var)
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// CloudFormation type of the repositories to empty before deletion
    #[arg(long, default_value = DEFAULT_REPOSITORY_TYPE)]
    resource_type: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Enable debug logging for cfn-purge
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for PurgeConfig {
    fn from(args: Args) -> Self {
        Self {
            stack_name: args.stack_name.trim().to_string(),
            resource_type: args.resource_type.trim().to_string(),
            aws: AwsConfig {
                region: args.region,
                profile: args.profile,
            },
            format: args.format,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }

    let suggestion = e
        .chain()
        .find_map(|cause| cause.downcast_ref::<RemoteError>())
        .and_then(RemoteError::suggestion);
    if let Some(suggestion) = suggestion {
        let _ = writeln!(stderr, "\n\x1b[2mHint:\x1b[0m {suggestion}");
    }
}

/// Set up tracing on stderr so stdout carries only the result
fn init_tracing(verbose: bool) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(rust_log.as_deref(), verbose)
        .context("Invalid RUST_LOG filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// `RUST_LOG`, when set, replaces the default directives entirely
fn build_filter(rust_log: Option<&str>, verbose: bool) -> Result<EnvFilter, ParseError> {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        return EnvFilter::try_new(directives);
    }

    let own_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_new(
        [
            "info".to_string(),
            format!("cfn_purge={own_level}"),
            format!("cfn_purge_common={own_level}"),
            // Reduce noise from AWS SDK (show only warnings and errors)
            "aws_config=warn".to_string(),
            "aws_smithy_runtime=warn".to_string(),
            "aws_sdk_cloudformation=warn".to_string(),
            "aws_sdk_ecr=warn".to_string(),
        ]
        .join(","),
    )
}

async fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let config: PurgeConfig = args.into();
    config.validate()?;

    info!(
        stack = %config.stack_name,
        region = %config.aws.region,
        profile = ?config.aws.profile,
        resource_type = %config.resource_type,
        "Purging stack"
    );

    let aws = AwsContext::with_profile(&config.aws.region, config.aws.profile.as_deref()).await;
    let purger = StackPurger::new(
        CloudFormationClient::from_context(&aws),
        EcrClient::from_context(&aws),
    )
    .with_repository_type(config.resource_type.as_str());

    let result = purger
        .cascade_delete(&config.stack_name)
        .await
        .with_context(|| format!("Failed to purge stack '{}'", config.stack_name))?;

    println!("{}", output::render(&result, config.format)?);
    result.ensure_stack_deleted()?;

    Ok(())
}

use std::{ffi::OsString, process::ExitCode, time::Duration};

use clap::{error::ErrorKind, Parser};
use reqwest::Client;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    conf::{Cli, ModuleParams},
    error::NotifyError,
    outcome::ModuleResult,
    payload::NotificationPayload,
    webhook::Delivered,
};

mod conf;
mod error;
mod outcome;
mod payload;
mod webhook;

#[tokio::main]
pub async fn main() -> ExitCode {
    // stdout is reserved for the result
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let result = match parse_cli(std::env::args_os()) {
        Ok(cli) => execute(&cli).await,
        Err(result) => result,
    };

    println!("{}", result.to_json());
    ExitCode::from(result.exit_code())
}

/// Bad flags become a failed result like any other argument error; only
/// help and version requests are left to clap.
fn parse_cli<I, T>(args: I) -> Result<Cli, ModuleResult>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            let rendered = e.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            let msg = first.strip_prefix("error: ").unwrap_or(first);
            error!(error = %msg, "invalid command line");
            ModuleResult::failed(msg, None)
        }
    })
}

async fn execute(cli: &Cli) -> ModuleResult {
    let (params, check_mode) = match cli.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            error!(error = %e, "invalid module arguments");
            return ModuleResult::failed(e.to_string(), None);
        }
    };

    let client = match Client::builder()
        .timeout(Duration::from_secs(cli.timeout()))
        .build()
    {
        Ok(client) => client,
        Err(e) => return delivery_failed(NotifyError::from(e)),
    };

    run(&client, &params, check_mode).await
}

async fn run(client: &Client, params: &ModuleParams, check_mode: bool) -> ModuleResult {
    info!(?params, check_mode, "sending webhook message");

    let payload =
        NotificationPayload::build(params.msg(), params.username(), params.avatar_url());

    if check_mode {
        debug!(?payload, "check mode, not sending");
        return ModuleResult::skipped();
    }

    match webhook::notify(client, params.webhook(), &payload).await {
        Ok(Delivered) => {
            info!("message sent");
            ModuleResult::ok()
        }
        Err(e) => delivery_failed(e),
    }
}

fn delivery_failed(e: NotifyError) -> ModuleResult {
    let causes = e.causes().join(": ");
    error!(status = ?e.status(), %causes, "{}", e);
    ModuleResult::failed(e.to_string(), e.status())
}

use clap::Args;
use serde_json::{json, Value};

use crate::cli::{
    utils::{output_error, output_success},
    OutputFormat,
};

#[derive(Args)]
pub struct PingArgs {
    #[arg(long, default_value = "http://127.0.0.1:3000", help = "Server base URL")]
    pub url: String,
}

pub async fn handle(args: PingArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let base = args.url.trim_end_matches('/');

    let root = client.get(format!("{}/", base)).send().await?;
    if !root.status().is_success() {
        output_error(output_format, &format!("{} answered {}", base, root.status()))?;
        anyhow::bail!("server is not live");
    }
    let banner = root.text().await?;

    let health = client.get(format!("{}/health", base)).send().await?;
    let status = health.status();
    let body: Value = health.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(
            output_format,
            &format!("{} is up", base),
            Some(json!({ "banner": banner, "health": body })),
        )
    } else {
        output_error(output_format, &format!("{} is live but unhealthy ({})", base, status))?;
        anyhow::bail!("store unreachable")
    }
}

use anyhow::Context;
use chrono::Duration;
use clap::Args;
use serde_json::json;

use crate::auth::issue_token;
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "Email claim to embed")]
    pub email: String,

    #[arg(long, default_value_t = 24, help = "Token lifetime in hours")]
    pub ttl_hours: i64,
}

fn token_ttl(hours: i64) -> anyhow::Result<Duration> {
    Duration::try_hours(hours).with_context(|| format!("--ttl-hours {} is out of range", hours))
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let secret = config
        .identity
        .jwt_secret
        .context("IDENTITY_JWT_SECRET is not set")?;

    let token = issue_token(&secret, &args.email, token_ttl(args.ttl_hours)?)?;

    match output_format {
        OutputFormat::Json => output_success(
            output_format,
            "Token issued",
            Some(json!({ "email": args.email, "token": token })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}

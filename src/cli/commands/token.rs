use clap::Args;
use serde_json::json;

use crate::auth::{issue_token, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[arg(help = "Subject (user id) the token is issued for")]
    pub subject: String,

    #[arg(long, default_value_t = 60, help = "Lifetime in minutes")]
    pub ttl_minutes: i64,
}

pub async fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let claims = Claims::new(args.subject.as_str(), chrono::Duration::minutes(args.ttl_minutes))
        .with_audience(config.security.jwt_audience.clone());
    let token = issue_token(&claims, &config.security.jwt_secret)?;

    match output_format {
        OutputFormat::Json => output_success(
            output_format,
            "Token issued",
            Some(json!({ "token": token, "sub": claims.sub, "exp": claims.exp })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}

pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "itinerary")]
#[command(about = "Itinerary CLI - document export and development credentials")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Render a trip document JSON file as a PDF")]
    Render(commands::render::RenderArgs),

    #[command(about = "Issue a signed bearer token for local testing")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Render(args) => commands::render::handle(args, output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_with_output_dir() {
        let cli = Cli::try_parse_from(["itinerary", "--json", "render", "trip.json", "--output-dir", "out"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.file, std::path::PathBuf::from("trip.json"));
                assert_eq!(args.output_dir, Some(std::path::PathBuf::from("out")));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn token_defaults_to_one_hour() {
        let cli = Cli::try_parse_from(["itinerary", "token", "user-1"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
        match cli.command {
            Commands::Token(args) => {
                assert_eq!(args.subject, "user-1");
                assert_eq!(args.ttl_minutes, 60);
            }
            _ => panic!("expected token"),
        }
    }
}

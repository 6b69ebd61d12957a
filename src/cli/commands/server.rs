use clap::Subcommand;

use crate::cli::{utils, OutputFormat};

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server and database health")]
    Health,

    #[command(about = "Show server info and available endpoints")]
    Info,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    match cmd {
        ServerCommands::Health => {
            let response = client
                .get(format!("{}/health", utils::base_url()))
                .send()
                .await?;

            utils::print_response(&output_format, "Server is healthy", response).await
        }

        ServerCommands::Info => {
            let response = client.get(utils::base_url()).send().await?;

            utils::print_response(&output_format, "Server info", response).await
        }
    }
}

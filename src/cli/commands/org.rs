use clap::Subcommand;
use serde_json::json;

use crate::cli::{utils, OutputFormat};

#[derive(Subcommand)]
pub enum OrgCommands {
    #[command(about = "Provision a new organization and its tenant database")]
    Create {
        #[arg(help = "Organization name")]
        name: String,
    },

    #[command(about = "List registered organizations")]
    List,

    #[command(about = "Deactivate an organization (tenant database is kept)")]
    Deactivate {
        #[arg(help = "Organization name")]
        name: String,
    },
}

pub async fn handle(cmd: OrgCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let token = utils::bearer_token()?;

    match cmd {
        OrgCommands::Create { name } => {
            let response = client
                .post(format!("{}/api/admin/organizations", utils::base_url()))
                .bearer_auth(token)
                .json(&json!({ "name": name }))
                .send()
                .await?;

            utils::print_response(&output_format, &format!("Created organization '{}'", name), response)
                .await
        }

        OrgCommands::List => {
            let response = client
                .get(format!("{}/api/admin/organizations", utils::base_url()))
                .bearer_auth(token)
                .send()
                .await?;

            utils::print_response(&output_format, "Organizations", response).await
        }

        OrgCommands::Deactivate { name } => {
            let response = client
                .delete(format!("{}/api/admin/organizations/{}", utils::base_url(), name))
                .bearer_auth(token)
                .send()
                .await?;

            utils::print_response(
                &output_format,
                &format!("Deactivated organization '{}'", name),
                response,
            )
            .await
        }
    }
}

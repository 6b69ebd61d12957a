use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::{utils, OutputFormat};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and print a bearer token for HOA_TOKEN")]
    Login {
        #[arg(help = "Organization name")]
        organization: String,
        #[arg(help = "Stakeholder email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Show the stakeholder behind the current token")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    match cmd {
        AuthCommands::Login {
            organization,
            email,
            password,
        } => {
            let response = client
                .post(format!("{}/auth/login", utils::base_url()))
                .json(&json!({
                    "organization": organization,
                    "email": email,
                    "password": password,
                }))
                .send()
                .await?;

            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);

            if status.is_success() {
                // Print the bare token so it can be exported directly
                match output_format {
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::to_string_pretty(&body["data"]).unwrap_or_default()
                    ),
                    OutputFormat::Text => {
                        if let Some(token) = body["data"]["token"].as_str() {
                            println!("{}", token);
                        }
                    }
                }
                Ok(())
            } else {
                let detail = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("login failed");
                utils::output_error(&output_format, detail);
                anyhow::bail!("login failed with status {}", status)
            }
        }

        AuthCommands::Whoami => {
            let response = client
                .get(format!("{}/api/auth/whoami", utils::base_url()))
                .bearer_auth(utils::bearer_token()?)
                .send()
                .await?;

            utils::print_response(&output_format, "Authenticated", response).await
        }
    }
}

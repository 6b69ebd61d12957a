use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Base URL of the API server the CLI talks to
pub fn base_url() -> String {
    std::env::var("HOA_SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Bearer token for protected endpoints, from the environment
pub fn bearer_token() -> anyhow::Result<String> {
    std::env::var("HOA_TOKEN")
        .context("HOA_TOKEN is not set; run `hoa auth login` and export the token")
}

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            if let Some(data_value) = data {
                println!("{}", serde_json::to_string_pretty(&data_value).unwrap_or_default());
            }
        }
    }
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": message
            });
            println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
}

/// Render an API response: unwrap the success envelope on 2xx, surface the
/// error body otherwise
pub async fn print_response(
    output_format: &OutputFormat,
    message: &str,
    response: reqwest::Response,
) -> anyhow::Result<()> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        let data = body.get("data").cloned().or(Some(body));
        output_success(output_format, message, data);
        Ok(())
    } else {
        let detail = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("request failed");
        output_error(output_format, &format!("{} ({})", detail, status));
        anyhow::bail!("request failed with status {}", status)
    }
}

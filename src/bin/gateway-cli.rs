use std::process::ExitCode;

use clap::Parser;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Send a URL list to a running fetch gateway", long_about = None)]
struct Cli {
    /// Gateway base URL.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Print the response body verbatim instead of pretty JSON.
    #[arg(long)]
    raw: bool,

    /// Upstream URLs to fetch, in order.
    #[arg(required = true)]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = client
        .post(&cli.url)
        .json(&json!({ "urls": cli.urls }))
        .send()
        .await?;

    print_response(res, cli.raw).await
}

async fn print_response(res: reqwest::Response, raw: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(ExitCode::FAILURE);
    }

    if raw {
        println!("{}", res.text().await?);
    } else {
        let json: Value = res.json().await?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(ExitCode::SUCCESS)
}

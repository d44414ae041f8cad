use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "dose-cli")]
#[command(about = "Operator CLI for the dose service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a dose calculation for a medicine
    Submit {
        #[arg(short, long)]
        medicine_id: i64,
    },
    /// Show service status and job counters
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Submit { medicine_id } => {
            let res = client
                .post(format!("{}/calc_dose/", base))
                .json(&json!({ "medicine_id": medicine_id }))
                .send()
                .await?;
            let status = res.status();
            if status.is_success() {
                println!("Accepted: dose for medicine {} will be reported shortly", medicine_id);
            } else {
                print_error(res).await;
            }
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            if !res.status().is_success() {
                print_error(res).await;
                return Ok(());
            }
            let body: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

async fn print_error(res: reqwest::Response) {
    eprintln!("Error: dose service returned status {}", res.status());
    if let Ok(text) = res.text().await {
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
    }
}

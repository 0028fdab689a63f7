//! The terminal client for the expense store.

use clap::Parser;

use spendlog::client::{self, api::ApiClient};

/// A terminal client for browsing and editing expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the expense store API.
    #[arg(long, env = "SPENDLOG_API", default_value = "http://localhost:5000")]
    api_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let api = ApiClient::new(&args.api_url);
    client::run(api).await
}

use anyhow::Result;
use meetsched::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}

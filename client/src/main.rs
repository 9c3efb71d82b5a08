mod cli;
mod cluster;
mod console;
mod finder;
mod logging;
mod remote;
mod storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;
    cli::run().await
}

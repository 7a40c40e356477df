#[tokio::main]
async fn main() -> anyhow::Result<()> {
    boardscribe_server::start().await
}

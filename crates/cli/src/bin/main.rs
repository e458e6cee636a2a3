use appmeta_diagnostics::Result;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() -> Result<()> {
    appmeta_cli::run_cli().await
}

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    procure_cli::run().await
}

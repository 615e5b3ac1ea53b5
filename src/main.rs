use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match arena::run_with_config().await {
        Ok(ticks) => {
            tracing::info!(ticks, "arena exited");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "arena failed to start");
            ExitCode::FAILURE
        }
    }
}

//! vmgr CLI binary

use std::process::ExitCode;

use color_eyre::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    Ok(vmgr_cli::run().await)
}

//! `host.account.remove`: remove a local account on a host

use clap::Args;
use vmgr_api::HostAccountSpec;
use vmgr_client::HostAccountManager;

use crate::flags::AccountFlag;

pub const REMOVE_EXAMPLES: &str = "\
Examples:
  vmgr host.account.remove --id $USER
  vmgr host.account.remove --host esx-01 --id backup";

#[derive(Debug, Clone, Args)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub account: AccountFlag,
}

/// Remove the account described by `spec`
///
/// # Errors
/// Returns the manager's error unchanged
pub async fn remove(
    manager: &dyn HostAccountManager,
    spec: &HostAccountSpec,
) -> vmgr_client::Result<()> {
    manager.remove(&spec.id).await
}

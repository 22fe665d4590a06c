//! Flag groups shared by subcommands

use clap::Args;
use clap::builder::NonEmptyStringValueParser;
use vmgr_api::HostAccountSpec;

use crate::config::{ClientConfig, ConfigError};

/// Datastore selection
#[derive(Debug, Clone, Default, Args)]
pub struct DatastoreFlag {
    /// Datastore name
    #[arg(long = "ds", env = "VMGR_DATASTORE", value_name = "NAME")]
    pub datastore: Option<String>,
}

impl DatastoreFlag {
    /// Datastore from the flag, falling back to the config file default
    ///
    /// An empty value counts as unset at each level.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingDatastore` if neither is set
    pub fn resolve(&self, config: &ClientConfig) -> Result<String, ConfigError> {
        non_empty(self.datastore.as_deref())
            .or_else(|| non_empty(config.datastore.as_deref()))
            .ok_or(ConfigError::MissingDatastore)
    }
}

/// Host selection
#[derive(Debug, Clone, Default, Args)]
pub struct HostFlag {
    /// Host system name [default: the directly connected host]
    #[arg(long = "host", env = "VMGR_HOST", value_name = "NAME")]
    pub host: Option<String>,
}

impl HostFlag {
    /// Host from the flag, then the config file; `None` means the connected host
    #[must_use]
    pub fn resolve(&self, config: &ClientConfig) -> Option<String> {
        non_empty(self.host.as_deref()).or_else(|| non_empty(config.host.as_deref()))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Local account on a host
#[derive(Debug, Clone, Args)]
pub struct AccountFlag {
    #[command(flatten)]
    pub host: HostFlag,

    /// The ID of the specified account
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub id: String,
}

impl AccountFlag {
    #[must_use]
    pub fn spec(&self) -> HostAccountSpec {
        HostAccountSpec::new(self.id.clone())
    }
}

//! vmgr-client: management API client library
//!
//! Defines the manager traits the CLI commands are written against, plus an
//! HTTP/JSON implementation of them.
//!
//! # Example
//!
//! ```no_run
//! use vmgr_client::{HttpClient, VStorageObjectManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new("http://localhost:8080/api")?;
//! let manager = client.vstorage_manager("datastore1");
//!
//! for id in manager.list().await? {
//!     match manager.retrieve(&id).await {
//!         Ok(obj) => println!("{id}: {}", obj.config.name),
//!         Err(e) if e.is_not_found() => println!("{id}: missing"),
//!         Err(e) => return Err(e.into()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod error;
pub mod http;
pub mod traits;
pub mod vstorage;

pub use account::HttpHostAccountManager;
pub use error::{ClientError, Result};
pub use http::HttpClient;
pub use traits::{HostAccountManager, VStorageObjectManager};
pub use vstorage::HttpVStorageManager;

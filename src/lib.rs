//! Discover inventory targets from Azure.
//!
//! Virtual machines, network interfaces and public IP addresses are listed
//! from the Azure Resource Manager, joined by id, filtered by location and
//! tags, and turned into `{name, uri}` targets.
//!
//! ```ignore
//! use azure_inventory::{config, Inventory, InventoryOptions};
//!
//! async fn example(opts: InventoryOptions) -> azure_inventory::Result<()> {
//!     let inventory = Inventory::new()?;
//!     let targets = inventory.targets(&opts, config::process_env).await?;
//!     Ok(())
//! }
//! ```

pub mod azure;
pub mod config;
pub mod error;
pub mod inventory;
pub mod resource;

pub use config::{Credentials, InventoryOptions};
pub use error::{ErrorKind, InventoryError, Result, TaskError};
pub use inventory::{join_targets, Inventory, Target, TaskOutput};

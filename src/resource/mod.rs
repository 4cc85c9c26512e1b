//! Resource abstraction layer
//!
//! This module knows how the three collections used for discovery are laid
//! out, fetched and narrowed down.
//!
//! # Architecture
//!
//! - [`registry`] - Endpoint tables per resource type and scope
//! - [`fetcher`] - Paginated collection fetch and indexing by id
//! - [`model`] - Typed records for VMs, network interfaces and public IPs
//! - [`filter`] - Location and tag filters for virtual machines

pub mod fetcher;
pub mod filter;
pub mod model;
pub mod registry;

pub use fetcher::{fetch_all, fetch_resources, index_by_id};
pub use filter::VmFilter;
pub use model::{NetworkInterface, PublicIpAddress, VirtualMachine};
pub use registry::{ResourceKind, Scope};

//! Inventory discovery
//!
//! Sequences the pipeline: validate options, resolve credentials, acquire a
//! token, fetch the three collections concurrently, then join them into
//! targets.

use crate::azure::AzureClient;
use crate::config::InventoryOptions;
use crate::error::{InventoryError, Result, TaskError};
use crate::resource::{
    fetch_resources, index_by_id, NetworkInterface, PublicIpAddress, ResourceKind, Scope,
    VirtualMachine, VmFilter,
};
use serde::Serialize;
use std::collections::HashMap;

/// A reachable machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub name: String,
    pub uri: String,
}

/// Output of one invocation: either targets or an error, never both
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskOutput {
    Targets {
        targets: Vec<Target>,
    },
    Error {
        #[serde(rename = "_error")]
        error: TaskError,
    },
}

impl TaskOutput {
    pub fn is_error(&self) -> bool {
        matches!(self, TaskOutput::Error { .. })
    }
}

/// Resolve the target of one VM.
///
/// Primary interfaces are tried first, then the others, each in reference
/// order. The first public IP with an allocated address wins; its FQDN, when
/// set, names the target.
fn resolve_target(
    vm: &VirtualMachine,
    nics: &HashMap<String, NetworkInterface>,
    ips: &HashMap<String, PublicIpAddress>,
) -> Option<Target> {
    let (primary, secondary): (Vec<_>, Vec<_>) =
        vm.network_interfaces().iter().partition(|r| r.is_primary());

    let ip = primary
        .into_iter()
        .chain(secondary)
        .filter_map(|r| nics.get(&r.id))
        .flat_map(|nic| nic.ip_configurations())
        .filter_map(|config| config.public_ip_id())
        .filter_map(|id| ips.get(id))
        .find(|ip| ip.ip_address().is_some())?;

    Some(Target {
        name: ip.fqdn().unwrap_or(vm.name.as_str()).to_string(),
        uri: ip.ip_address()?.to_string(),
    })
}

/// Join VMs with their interfaces and public IPs. VMs without an address are dropped.
pub fn join_targets(
    vms: &[VirtualMachine],
    nics: &HashMap<String, NetworkInterface>,
    ips: &HashMap<String, PublicIpAddress>,
) -> Vec<Target> {
    vms.iter()
        .filter_map(|vm| resolve_target(vm, nics, ips))
        .collect()
}

/// Discovery orchestrator
#[derive(Clone)]
pub struct Inventory {
    client: AzureClient,
}

impl Inventory {
    /// Create an orchestrator against the public Azure cloud
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: AzureClient::new()?,
        })
    }

    pub fn with_client(client: AzureClient) -> Self {
        Self { client }
    }

    /// Discover targets. `env` is consulted for credentials missing from `opts`.
    pub async fn targets<F>(&self, opts: &InventoryOptions, env: F) -> Result<Vec<Target>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let scope = Scope::from_options(opts)?;
        let creds = opts.credentials(env)?;
        let filter = VmFilter::from_options(opts);

        let token = self.client.token(&creds).await?;
        let subscription = creds.subscription_id.as_str();

        let vms_fetch = async {
            let vms = fetch_resources::<VirtualMachine>(
                &self.client,
                ResourceKind::VirtualMachines,
                subscription,
                &scope,
                &token,
            )
            .await?;
            Ok::<_, InventoryError>(filter.apply(vms))
        };
        let nics_fetch = fetch_resources::<NetworkInterface>(
            &self.client,
            ResourceKind::NetworkInterfaces,
            subscription,
            &scope,
            &token,
        );
        let ips_fetch = fetch_resources::<PublicIpAddress>(
            &self.client,
            ResourceKind::PublicIpAddresses,
            subscription,
            &scope,
            &token,
        );

        // The first failure drops the other two fetches
        let (vms, nics, ips) = futures::try_join!(vms_fetch, nics_fetch, ips_fetch)?;

        let nics = index_by_id(nics);
        let ips = index_by_id(ips);
        let targets = join_targets(&vms, &nics, &ips);

        tracing::info!(
            "Resolved {} targets from {} virtual machines",
            targets.len(),
            vms.len()
        );
        Ok(targets)
    }

    /// Discover targets and convert the outcome into the task output shape
    pub async fn run<F>(&self, opts: &InventoryOptions, env: F) -> TaskOutput
    where
        F: Fn(&str) -> Option<String>,
    {
        match self.targets(opts, env).await {
            Ok(targets) => TaskOutput::Targets { targets },
            Err(err) => {
                tracing::warn!("Discovery failed: {}", err);
                TaskOutput::Error {
                    error: err.to_task_error(),
                }
            }
        }
    }
}

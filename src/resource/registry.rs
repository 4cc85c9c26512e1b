//! Resource Registry - collection endpoints per resource type
//!
//! Every resource type we fetch has a fixed endpoint layout for each scope.
//! Scale set collections live under `Microsoft.Compute` and use an older
//! API version than the direct collections.

use crate::config::InventoryOptions;
use crate::error::Result;

/// API version of subscription and resource group collections
pub const API_VERSION: &str = "2019-07-01";

/// API version of scale set collections
pub const SCALE_SET_API_VERSION: &str = "2017-03-30";

/// Resource types fetched during discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    VirtualMachines,
    NetworkInterfaces,
    PublicIpAddresses,
}

/// Endpoint layout for one resource type
#[derive(Debug, Clone, Copy)]
struct EndpointDef {
    /// Resource provider of the direct collection
    provider: &'static str,
    /// Collection name under the provider
    collection: &'static str,
    /// Collection name under a scale set
    scale_set_collection: &'static str,
}

const VIRTUAL_MACHINES: EndpointDef = EndpointDef {
    provider: "Microsoft.Compute",
    collection: "virtualmachines",
    scale_set_collection: "virtualmachines",
};

const NETWORK_INTERFACES: EndpointDef = EndpointDef {
    provider: "Microsoft.Network",
    collection: "networkInterfaces",
    scale_set_collection: "networkinterfaces",
};

const PUBLIC_IP_ADDRESSES: EndpointDef = EndpointDef {
    provider: "Microsoft.Network",
    collection: "publicIPAddresses",
    scale_set_collection: "publicIPAddresses",
};

impl ResourceKind {
    fn endpoint(self) -> &'static EndpointDef {
        match self {
            ResourceKind::VirtualMachines => &VIRTUAL_MACHINES,
            ResourceKind::NetworkInterfaces => &NETWORK_INTERFACES,
            ResourceKind::PublicIpAddresses => &PUBLIC_IP_ADDRESSES,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ResourceKind::VirtualMachines => "virtual machines",
            ResourceKind::NetworkInterfaces => "network interfaces",
            ResourceKind::PublicIpAddresses => "public IP addresses",
        }
    }

    /// Path and query of the collection for a subscription and scope
    pub fn collection_path(self, subscription_id: &str, scope: &Scope) -> String {
        let endpoint = self.endpoint();
        let subscription = urlencoding::encode(subscription_id);

        match scope {
            Scope::Subscription => format!(
                "subscriptions/{}/providers/{}/{}?api-version={}",
                subscription, endpoint.provider, endpoint.collection, API_VERSION
            ),
            Scope::ResourceGroup(group) => format!(
                "subscriptions/{}/resourceGroups/{}/providers/{}/{}?api-version={}",
                subscription,
                urlencoding::encode(group),
                endpoint.provider,
                endpoint.collection,
                API_VERSION
            ),
            Scope::ScaleSet {
                resource_group,
                scale_set,
            } => format!(
                "subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachineScaleSets/{}/{}?api-version={}",
                subscription,
                urlencoding::encode(resource_group),
                urlencoding::encode(scale_set),
                endpoint.scale_set_collection,
                SCALE_SET_API_VERSION
            ),
        }
    }
}

/// Part of the subscription the collections are listed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Subscription,
    ResourceGroup(String),
    ScaleSet {
        resource_group: String,
        scale_set: String,
    },
}

impl Scope {
    /// Derive the scope from the options; a scale set requires a resource group
    pub fn from_options(opts: &InventoryOptions) -> Result<Self> {
        opts.validate()?;
        Ok(match (&opts.resource_group, &opts.scale_set) {
            (Some(group), Some(set)) => Scope::ScaleSet {
                resource_group: group.clone(),
                scale_set: set.clone(),
            },
            (Some(group), None) => Scope::ResourceGroup(group.clone()),
            (None, _) => Scope::Subscription,
        })
    }
}

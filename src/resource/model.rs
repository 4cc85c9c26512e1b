//! Typed records for the Azure resources we join.
//!
//! Only the fields used for discovery are modelled. Every nested object is
//! optional because the management API omits empty properties.

use serde::Deserialize;
use std::collections::HashMap;

/// One page of an ARM list response (`value` array with optional `nextLink`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub value: Vec<T>,
    #[serde(default)]
    pub next_link: Option<String>,
}

/// Anything that can be indexed by its resource identifier
pub trait Identified {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VirtualMachine {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub properties: Option<VmProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmProperties {
    #[serde(default)]
    pub network_profile: Option<NetworkProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterfaceRef>,
}

/// Reference from a VM to one of its network interfaces
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkInterfaceRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub primary: Option<bool>,
    #[serde(default)]
    pub properties: Option<NetworkInterfaceRefProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkInterfaceRefProperties {
    #[serde(default)]
    pub primary: Option<bool>,
}

impl NetworkInterfaceRef {
    /// The flag lives on the reference or under its properties depending on API version
    pub fn is_primary(&self) -> bool {
        self.primary
            .or_else(|| self.properties.as_ref().and_then(|p| p.primary))
            .unwrap_or(false)
    }
}

impl VirtualMachine {
    pub fn network_interfaces(&self) -> &[NetworkInterfaceRef] {
        self.properties
            .as_ref()
            .and_then(|p| p.network_profile.as_ref())
            .map(|n| n.network_interfaces.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkInterface {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub properties: Option<NicProperties>,
}

/// A field the API sends either as one object or as a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => std::slice::from_ref(item),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicProperties {
    #[serde(default)]
    pub ip_configurations: Option<Vec<IpConfiguration>>,
    #[serde(default)]
    pub ip_configuration: Option<OneOrMany<IpConfiguration>>,
}

impl NetworkInterface {
    /// IP configurations, from `ipConfigurations` or else the singular `ipConfiguration`
    pub fn ip_configurations(&self) -> &[IpConfiguration] {
        let Some(props) = self.properties.as_ref() else {
            return &[];
        };
        if let Some(configs) = props.ip_configurations.as_ref() {
            return configs;
        }
        props
            .ip_configuration
            .as_ref()
            .map(OneOrMany::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpConfiguration {
    #[serde(default)]
    pub properties: Option<IpConfigurationProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpConfigurationProperties {
    #[serde(default, rename = "publicIPAddress")]
    pub public_ip_address: Option<ResourceRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl IpConfiguration {
    pub fn public_ip_id(&self) -> Option<&str> {
        self.properties
            .as_ref()?
            .public_ip_address
            .as_ref()?
            .id
            .as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicIpAddress {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub properties: Option<PublicIpProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpProperties {
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub dns_settings: Option<DnsSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DnsSettings {
    #[serde(default)]
    pub fqdn: Option<String>,
}

impl PublicIpAddress {
    /// Allocated address, if any
    pub fn ip_address(&self) -> Option<&str> {
        self.properties
            .as_ref()?
            .ip_address
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    pub fn fqdn(&self) -> Option<&str> {
        self.properties
            .as_ref()?
            .dns_settings
            .as_ref()?
            .fqdn
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

impl Identified for NetworkInterface {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for PublicIpAddress {
    fn id(&self) -> &str {
        &self.id
    }
}

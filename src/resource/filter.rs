//! Virtual machine filters
//!
//! Location is matched exactly. Tag names are case-insensitive and tag values
//! case-sensitive; every requested tag must be present. Names that differ
//! only by case are all required, and a VM tag satisfies a requested tag
//! when any of the VM's same-named tags carries the value.

use super::model::VirtualMachine;
use crate::config::InventoryOptions;
use std::collections::HashMap;

/// Filter for virtual machines
#[derive(Debug, Clone, Default)]
pub struct VmFilter {
    pub location: Option<String>,
    /// Expected tags as (lower-cased name, value)
    tags: Vec<(String, String)>,
}

impl VmFilter {
    pub fn new(location: Option<String>, tags: Option<&HashMap<String, String>>) -> Self {
        let tags = tags
            .map(|tags| {
                tags.iter()
                    .map(|(name, value)| (name.to_lowercase(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self { location, tags }
    }

    pub fn from_options(opts: &InventoryOptions) -> Self {
        Self::new(opts.location.clone(), opts.tags.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.tags.is_empty()
    }

    pub fn matches(&self, vm: &VirtualMachine) -> bool {
        if let Some(location) = &self.location {
            if &vm.location != location {
                return false;
            }
        }

        if self.tags.is_empty() {
            return true;
        }

        let present: Vec<(String, &str)> = vm
            .tags
            .iter()
            .flatten()
            .map(|(name, value)| (name.to_lowercase(), value.as_str()))
            .collect();

        self.tags.iter().all(|(name, value)| {
            present
                .iter()
                .any(|(present_name, present_value)| present_name == name && present_value == value)
        })
    }

    /// Keep the VMs matching the filter, preserving order
    pub fn apply(&self, vms: Vec<VirtualMachine>) -> Vec<VirtualMachine> {
        if self.is_empty() {
            return vms;
        }
        let before = vms.len();
        let kept: Vec<VirtualMachine> = vms.into_iter().filter(|vm| self.matches(vm)).collect();
        tracing::debug!("Filter kept {} of {} virtual machines", kept.len(), before);
        kept
    }
}

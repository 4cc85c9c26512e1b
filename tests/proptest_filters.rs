//! Property-based tests using proptest
//!
//! These tests verify the VM filter and the target join using randomized
//! inputs.

use azure_inventory::join_targets;
use azure_inventory::resource::{
    index_by_id, NetworkInterface, PublicIpAddress, VirtualMachine, VmFilter,
};
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashMap;

/// Generate arbitrary VM data with tags
fn arb_vm() -> impl Strategy<Value = VirtualMachine> {
    (
        "[a-z][a-z0-9-]{0,20}", // name
        prop_oneof!["westus", "eastus", "WestUS", "northeurope"],
        prop::collection::hash_map(
            prop_oneof!["Env", "team", "OWNER", "Role"],
            prop_oneof!["prod", "Prod", "dev", "x"],
            0..4,
        ),
    )
        .prop_map(|(name, location, tags)| {
            serde_json::from_value::<VirtualMachine>(json!({
                "id": format!("/vms/{}", name),
                "name": name,
                "location": location,
                "tags": tags
            }))
            .unwrap()
        })
}

/// Generate a list of VMs
fn arb_vm_list() -> impl Strategy<Value = Vec<VirtualMachine>> {
    prop::collection::vec(arb_vm(), 0..50)
}

/// Generate filter tags; names are distinct once lower-cased
fn arb_tags() -> impl Strategy<Value = HashMap<String, String>> {
    prop::collection::hash_map(
        prop_oneof!["env", "TEAM", "owner", "role", "missing"],
        prop_oneof!["prod", "Prod", "dev"],
        0..3,
    )
}

fn names(vms: &[VirtualMachine]) -> Vec<String> {
    vms.iter().map(|vm| vm.name.clone()).collect()
}

proptest! {
    /// An empty filter keeps every VM
    #[test]
    fn empty_filter_returns_all(vms in arb_vm_list()) {
        let kept = VmFilter::default().apply(vms.clone());
        prop_assert_eq!(names(&kept), names(&vms));
    }

    /// Filtering never increases the number of VMs and preserves order
    #[test]
    fn filter_is_an_ordered_subset(
        vms in arb_vm_list(),
        tags in arb_tags(),
        location in prop::option::of(prop_oneof!["westus", "eastus"])
    ) {
        let filter = VmFilter::new(location, Some(&tags));
        let kept = names(&filter.apply(vms.clone()));
        let all = names(&vms);

        prop_assert!(kept.len() <= all.len());
        let mut remaining = all.iter();
        for name in &kept {
            prop_assert!(remaining.any(|n| n == name));
        }
    }

    /// Filtering is idempotent
    #[test]
    fn filter_is_idempotent(vms in arb_vm_list(), tags in arb_tags()) {
        let filter = VmFilter::new(None, Some(&tags));
        let once = filter.apply(vms);
        let twice = filter.apply(once.clone());
        prop_assert_eq!(names(&once), names(&twice));
    }

    /// Tag names match regardless of case
    #[test]
    fn tag_names_are_case_insensitive(vms in arb_vm_list(), tags in arb_tags()) {
        let upper: HashMap<String, String> =
            tags.iter().map(|(k, v)| (k.to_uppercase(), v.clone())).collect();
        let lower: HashMap<String, String> =
            tags.iter().map(|(k, v)| (k.to_lowercase(), v.clone())).collect();

        let by_upper = VmFilter::new(None, Some(&upper)).apply(vms.clone());
        let by_lower = VmFilter::new(None, Some(&lower)).apply(vms);
        prop_assert_eq!(names(&by_upper), names(&by_lower));
    }

    /// Every kept VM carries each requested tag value exactly
    #[test]
    fn kept_vms_carry_requested_values(vms in arb_vm_list(), tags in arb_tags()) {
        let filter = VmFilter::new(None, Some(&tags));
        for vm in filter.apply(vms) {
            let present: HashMap<String, String> = vm
                .tags
                .clone()
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect();
            for (name, value) in &tags {
                prop_assert_eq!(present.get(&name.to_lowercase()), Some(value));
            }
        }
    }

    /// The join never emits a target without an address
    #[test]
    fn join_never_emits_empty_uri(
        addresses in prop::collection::vec(prop::option::of("[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}"), 0..20)
    ) {
        let vms: Vec<VirtualMachine> = (0..addresses.len())
            .map(|i| serde_json::from_value(json!({
                "id": format!("/vms/{}", i),
                "name": format!("vm-{}", i),
                "properties": { "networkProfile": { "networkInterfaces": [{ "id": format!("nic-{}", i) }] } }
            })).unwrap())
            .collect();
        let nics: Vec<NetworkInterface> = (0..addresses.len())
            .map(|i| serde_json::from_value(json!({
                "id": format!("nic-{}", i),
                "properties": { "ipConfigurations": [{ "properties": { "publicIPAddress": { "id": format!("ip-{}", i) } } }] }
            })).unwrap())
            .collect();
        let ips: Vec<PublicIpAddress> = addresses
            .iter()
            .enumerate()
            .map(|(i, address)| serde_json::from_value(json!({
                "id": format!("ip-{}", i),
                "properties": { "ipAddress": address }
            })).unwrap())
            .collect();

        let targets = join_targets(&vms, &index_by_id(nics), &index_by_id(ips));

        prop_assert_eq!(targets.len(), addresses.iter().filter(|a| a.is_some()).count());
        for target in &targets {
            prop_assert!(!target.uri.is_empty());
        }
    }
}

//! Single-region placement scenario.
//!
//! Asserts the cloud deploys exactly one region, inventories its
//! hypervisors into bare-metal and virtual hosts, and verifies that
//! live migration between the two classes is rejected in both
//! directions.

use crate::config::Config;
use crate::context::Runtime;
use crate::parser::{parse_details, parse_listing};
use crate::scenarios::support::{BootRequest, Scenario};

/// Substring nova prints when a live migration targets the wrong
/// hypervisor class.
const MIGRATION_REJECTION: &str = "The supplied hypervisor type of is invalid";

/// Runs the scenario with teardown regardless of outcome.
///
/// # Errors
///
/// Returns a message describing the first failed step or assertion.
pub fn run(ctx: &Runtime, config: &Config) -> Result<(), String> {
    let mut scenario = Scenario::new(ctx, config);
    let result = check(&mut scenario);
    scenario.teardown();
    result
}

fn check(scenario: &mut Scenario<'_>) -> Result<(), String> {
    let config = scenario.config();

    let text = scenario
        .client()
        .execute("openstack region list", false)
        .map_err(|e| format!("Failed to list regions: {e}"))?;
    let regions =
        parse_listing(&text).map_err(|e| format!("Failed to parse region listing: {e}"))?;
    if regions.len() != 1 {
        return Err(format!("Expected one deployed region, found {}", regions.len()));
    }

    let (ironic_hosts, virtual_hosts) = partition_hypervisors(scenario)?;
    if ironic_hosts.is_empty() {
        return Err("No ironic hosts found".to_string());
    }
    if virtual_hosts.is_empty() {
        return Err("No virtual hosts found".to_string());
    }

    let keypair = scenario.create_keypair()?;

    // Virtual instance, then try to live-migrate it onto a bare-metal
    // host with room for it. The scheduler must refuse.
    let virt_name = Scenario::random_name("test_region_virt_");
    let virt_server = scenario.create_instance(&BootRequest {
        image: config.get("virt", "image")?,
        flavor: config.get("virt", "flavor")?,
        keypair: &keypair,
        name: &virt_name,
        network: None,
        wait_for_active: true,
    })?;
    let virt_id = virt_server
        .get("id")
        .ok_or_else(|| format!("Boot output for {virt_name} has no id field"))?
        .clone();

    let virt_ram = flavor_ram(scenario, config.get("virt", "flavor")?)?;
    let target = find_host_with_ram(scenario, &ironic_hosts, virt_ram)?
        .ok_or_else(|| "No available ironic host to attempt to migrate".to_string())?;
    expect_migration_rejected(scenario, &virt_id, &target)?;
    // Done with the virtual instance; its teardown delete then just no-ops.
    let _ = scenario.client().execute(&format!("nova delete {virt_name}"), true);

    // The mirror image: a bare-metal instance migrating onto a virtual host.
    let ironic_name = Scenario::random_name("test_region_ironic_");
    let ironic_server = scenario.create_instance(&BootRequest {
        image: config.get("ironic", "image")?,
        flavor: config.get("ironic", "flavor")?,
        keypair: &keypair,
        name: &ironic_name,
        network: None,
        wait_for_active: true,
    })?;
    scenario.hypervisor_id =
        ironic_server.get("OS-EXT-SRV-ATTR:hypervisor_hostname").cloned();
    let ironic_id = ironic_server
        .get("id")
        .ok_or_else(|| format!("Boot output for {ironic_name} has no id field"))?
        .clone();

    let ironic_ram = flavor_ram(scenario, config.get("ironic", "flavor")?)?;
    let target = find_host_with_ram(scenario, &virtual_hosts, ironic_ram)?
        .ok_or_else(|| "No available virtual host to attempt to migrate".to_string())?;
    expect_migration_rejected(scenario, &ironic_id, &target)
}

/// Splits the cloud's hypervisors into ironic and virtual service hosts.
fn partition_hypervisors(scenario: &Scenario<'_>) -> Result<(Vec<String>, Vec<String>), String> {
    let client = scenario.client();
    let text = client
        .execute("nova hypervisor-list", false)
        .map_err(|e| format!("Failed to list hypervisors: {e}"))?;
    let hypervisors =
        parse_listing(&text).map_err(|e| format!("Failed to parse hypervisor listing: {e}"))?;

    let mut ironic_hosts = Vec::new();
    let mut virtual_hosts = Vec::new();
    for hv in hypervisors {
        let hostname = hv
            .get("Hypervisor hostname")
            .ok_or_else(|| "Hypervisor listing has no `Hypervisor hostname` column".to_string())?;
        let text = client
            .execute(&format!("nova hypervisor-show {hostname}"), false)
            .map_err(|e| format!("Failed to show hypervisor {hostname}: {e}"))?;
        let details = parse_details(&text)
            .map_err(|e| format!("Failed to parse hypervisor {hostname} details: {e}"))?;
        let service_host = details
            .get("service_host")
            .ok_or_else(|| format!("Hypervisor {hostname} details have no service_host"))?
            .clone();
        if details.get("hypervisor_type").map(String::as_str) == Some("ironic") {
            ironic_hosts.push(service_host);
        } else {
            virtual_hosts.push(service_host);
        }
    }
    Ok((ironic_hosts, virtual_hosts))
}

/// RAM in MB required by a flavor.
fn flavor_ram(scenario: &Scenario<'_>, flavor: &str) -> Result<i64, String> {
    let text = scenario
        .client()
        .execute(&format!("nova flavor-show {flavor}"), false)
        .map_err(|e| format!("Failed to show flavor {flavor}: {e}"))?;
    let details =
        parse_details(&text).map_err(|e| format!("Failed to parse flavor {flavor}: {e}"))?;
    let ram = details
        .get("ram")
        .ok_or_else(|| format!("Flavor {flavor} details have no ram field"))?;
    ram.parse::<i64>().map_err(|e| format!("Flavor {flavor} ram `{ram}` is not a number: {e}"))
}

/// First host in `hosts` with at least `needed` MB of free RAM.
fn find_host_with_ram(
    scenario: &Scenario<'_>,
    hosts: &[String],
    needed: i64,
) -> Result<Option<String>, String> {
    for host in hosts {
        if host_free_ram(scenario, host)? >= needed {
            return Ok(Some(host.clone()));
        }
    }
    Ok(None)
}

/// Free RAM in MB on one service host, from the `(total)` and
/// `(used_now)` rows of its usage listing.
fn host_free_ram(scenario: &Scenario<'_>, host: &str) -> Result<i64, String> {
    let text = scenario
        .client()
        .execute(&format!("openstack host show {host}"), false)
        .map_err(|e| format!("Failed to show host {host}: {e}"))?;
    let projects =
        parse_listing(&text).map_err(|e| format!("Failed to parse host {host} usage: {e}"))?;

    let mut total = 0;
    let mut used = 0;
    for project in &projects {
        let memory = project.get("Memory MB").map(String::as_str).unwrap_or("0");
        match project.get("Project").map(String::as_str) {
            Some("(total)") => {
                total = memory
                    .parse::<i64>()
                    .map_err(|e| format!("Host {host} total memory `{memory}`: {e}"))?;
            }
            Some("(used_now)") => {
                used = memory
                    .parse::<i64>()
                    .map_err(|e| format!("Host {host} used memory `{memory}`: {e}"))?;
            }
            _ => {}
        }
    }
    Ok(total - used)
}

/// Attempts a live migration that must be refused for crossing
/// hypervisor classes.
fn expect_migration_rejected(
    scenario: &Scenario<'_>,
    server_id: &str,
    host: &str,
) -> Result<(), String> {
    let cmd = format!("openstack server migrate {server_id} --live {host}");
    let output = scenario
        .client()
        .execute(&cmd, true)
        .map_err(|e| format!("Failed to attempt migration of {server_id}: {e}"))?;
    if output.contains(MIGRATION_REJECTION) {
        Ok(())
    } else {
        Err(format!("Live migration of {server_id} onto {host} was not rejected: {output}"))
    }
}

//! Mixed bare-metal and virtual networking scenario.
//!
//! Boots one bare-metal and one virtual instance on the shared tftp
//! network, waits for both to reach ACTIVE, then logs into each over
//! SSH and pings the other, proving the two instance classes share a
//! usable data path.

use crate::config::Config;
use crate::context::Runtime;
use crate::scenarios::support::{instance_ip, BootRequest, Scenario};

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
    let net_id = scenario.tftp_network_id()?;
    let keypair = scenario.create_keypair()?;

    let ironic_name = Scenario::random_name("test_network_ironic_");
    let ironic_server = scenario.create_instance(&BootRequest {
        image: config.get("ironic", "image")?,
        flavor: config.get("ironic", "flavor")?,
        keypair: &keypair,
        name: &ironic_name,
        network: Some(&net_id),
        wait_for_active: false,
    })?;

    let virt_name = Scenario::random_name("test_network_virt_");
    let virt_server = scenario.create_instance(&BootRequest {
        image: config.get("virt", "image")?,
        flavor: config.get("virt", "flavor")?,
        keypair: &keypair,
        name: &virt_name,
        network: Some(&net_id),
        wait_for_active: false,
    })?;

    // Both boots are in flight; the virtual one settles first.
    let virt_id = virt_server
        .get("id")
        .ok_or_else(|| format!("Boot output for {virt_name} has no id field"))?;
    let virt_server = scenario.wait_active(virt_id)?;

    let ironic_id = ironic_server
        .get("id")
        .ok_or_else(|| format!("Boot output for {ironic_name} has no id field"))?;
    let ironic_server = scenario.wait_active(ironic_id)?;
    scenario.hypervisor_id =
        ironic_server.get("OS-EXT-SRV-ATTR:hypervisor_hostname").cloned();

    let ironic_ip = instance_ip(&ironic_server)?;
    let virt_ip = instance_ip(&virt_server)?;

    scenario.ssh(
        &keypair,
        config.get("ironic", "user")?,
        &ironic_ip,
        &format!("ping {virt_ip} -c 5"),
    )?;
    scenario.ssh(
        &keypair,
        config.get("virt", "user")?,
        &virt_ip,
        &format!("ping {ironic_ip} -c 5"),
    )?;
    Ok(())
}

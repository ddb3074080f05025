//! End-to-end scenario runs against a fully scripted cloud.
//!
//! Every CLI invocation a scenario makes is scripted in order, so these
//! exercise the whole chain (executor, parser, polling, cleanup)
//! without a real cloud and without real sleeps.

use std::sync::Arc;

use ironcheck::adapters::scripted::{InstantSleeper, ScriptedRunner};
use ironcheck::config::Config;
use ironcheck::context::Runtime;
use ironcheck::ports::CommandOutput;
use ironcheck::scenarios::{network, region};

fn scripted_runtime(outputs: Vec<CommandOutput>) -> (Runtime, Arc<ScriptedRunner>) {
    let runner = Arc::new(ScriptedRunner::new(outputs));
    let runtime =
        Runtime::new(Box::new(Arc::clone(&runner)), Box::new(InstantSleeper::new()));
    (runtime, runner)
}

fn sample_config() -> Config {
    Config::parse(
        "ironic:\n  image: bm-img\n  flavor: bm.flavor\n  user: ubuntu\n\
         virt:\n  image: v-img\n  flavor: gp.small\n  user: cloud-user\n",
    )
    .unwrap()
}

#[test]
fn mixed_network_scenario_passes_against_a_scripted_cloud() {
    // Teardown behavior is part of the script below.
    std::env::remove_var("SKIP_CLEANUP");

    let (runtime, runner) = scripted_runtime(vec![
        ScriptedRunner::ok("| id | net-1 |"),
        ScriptedRunner::ok(""), // ssh-keygen
        ScriptedRunner::ok("| name | testkey |"),
        ScriptedRunner::ok("| id | isrv |\n| status | BUILD |"),
        ScriptedRunner::ok("| id | vsrv |\n| status | BUILD |"),
        ScriptedRunner::ok(
            "| id | vsrv |\n| status | ACTIVE |\n| tftp network | host-v.example, 10.0.0.7 |",
        ),
        ScriptedRunner::ok(
            "| id | isrv |\n| status | ACTIVE |\n| tftp network | 10.0.0.8 |\n\
             | OS-EXT-SRV-ATTR:hypervisor_hostname | ironic-03 |",
        ),
        ScriptedRunner::ok("5 packets transmitted, 5 received"),
        ScriptedRunner::ok("5 packets transmitted, 5 received"),
        // Teardown: newest registration first, then the node wait.
        ScriptedRunner::ok(""),
        ScriptedRunner::ok(""),
        ScriptedRunner::ok(""),
        ScriptedRunner::ok("| provision_state | available |"),
    ]);
    let config = sample_config();

    network::run(&runtime, &config).unwrap();

    let commands = runner.commands();
    assert_eq!(commands.len(), 13);
    assert_eq!(commands[0], "neutron net-show tftp");
    assert!(commands[3].starts_with("nova boot"));
    assert!(commands[3].contains("--nic net-id=net-1"));
    assert!(commands[7].contains("StrictHostKeyChecking=no"));
    assert!(commands[7].contains("ubuntu@10.0.0.8"));
    assert!(commands[7].contains("ping 10.0.0.7 -c 5"));
    assert!(commands[8].contains("cloud-user@10.0.0.7"));
    assert_eq!(commands[9], "nova delete vsrv");
    assert_eq!(commands[10], "nova delete isrv");
    assert!(commands[11].starts_with("nova keypair-delete testkey_"));
    assert_eq!(commands[12], "ironic node-show ironic-03");
}

#[test]
fn mixed_network_scenario_still_cleans_up_after_a_failure() {
    std::env::remove_var("SKIP_CLEANUP");

    // The virtual server goes to ERROR; the scenario must fail but the
    // resources provisioned so far must still be deleted.
    let (runtime, runner) = scripted_runtime(vec![
        ScriptedRunner::ok("| id | net-1 |"),
        ScriptedRunner::ok(""),
        ScriptedRunner::ok("| name | testkey |"),
        ScriptedRunner::ok("| id | isrv |\n| status | BUILD |"),
        ScriptedRunner::ok("| id | vsrv |\n| status | BUILD |"),
        ScriptedRunner::ok("| id | vsrv |\n| status | ERROR |"),
        // Teardown only: no hypervisor was claimed, so no node wait.
        ScriptedRunner::ok(""),
        ScriptedRunner::ok(""),
        ScriptedRunner::ok(""),
    ]);
    let config = sample_config();

    let err = network::run(&runtime, &config).unwrap_err();
    assert!(err.contains("ERROR"));

    let commands = runner.commands();
    assert_eq!(commands.len(), 9);
    assert_eq!(commands[6], "nova delete vsrv");
    assert_eq!(commands[7], "nova delete isrv");
}

#[test]
fn region_scenario_passes_against_a_scripted_cloud() {
    std::env::remove_var("SKIP_CLEANUP");

    const REJECTED: &str = "ERROR: The supplied hypervisor type of is invalid";
    let (runtime, runner) = scripted_runtime(vec![
        ScriptedRunner::ok("| Region | Description |\n| RegionOne | main |"),
        ScriptedRunner::ok(
            "| ID | Hypervisor hostname | State |\n| 1 | compute-01 | up |\n| 2 | ironic-03 | up |",
        ),
        ScriptedRunner::ok("| hypervisor_type | qemu |\n| service_host | host-virt |"),
        ScriptedRunner::ok("| hypervisor_type | ironic |\n| service_host | host-iron |"),
        ScriptedRunner::ok(""), // ssh-keygen
        ScriptedRunner::ok("| name | testkey |"),
        ScriptedRunner::ok("| id | net-1 |"),
        ScriptedRunner::ok("| id | vsrv |\n| status | BUILD |"),
        ScriptedRunner::ok("| id | vsrv |\n| status | ACTIVE |"),
        ScriptedRunner::ok("| ram | 2048 |"),
        ScriptedRunner::ok(
            "| Host | Project | CPU | Memory MB | Disk GB |\n\
             | host-iron | (total) | 16 | 4096 | 100 |\n\
             | host-iron | (used_now) | 4 | 1024 | 20 |",
        ),
        ScriptedRunner::failed(1, REJECTED),
        ScriptedRunner::ok(""), // nova delete by name
        ScriptedRunner::ok("| id | net-1 |"),
        ScriptedRunner::ok("| id | isrv |\n| status | BUILD |"),
        ScriptedRunner::ok(
            "| id | isrv |\n| status | ACTIVE |\n\
             | OS-EXT-SRV-ATTR:hypervisor_hostname | ironic-03 |",
        ),
        ScriptedRunner::ok("| ram | 8192 |"),
        ScriptedRunner::ok(
            "| Host | Project | CPU | Memory MB | Disk GB |\n\
             | host-virt | (total) | 16 | 16384 | 100 |\n\
             | host-virt | (used_now) | 4 | 2048 | 20 |",
        ),
        ScriptedRunner::failed(1, REJECTED),
        // Teardown: the virtual server is already gone, that delete fails.
        ScriptedRunner::ok(""),
        ScriptedRunner::failed(1, "ERROR (NotFound)"),
        ScriptedRunner::ok(""),
        ScriptedRunner::ok("| provision_state | available |"),
    ]);
    let config = sample_config();

    region::run(&runtime, &config).unwrap();

    let commands = runner.commands();
    assert_eq!(commands.len(), 23);
    assert_eq!(commands[0], "openstack region list");
    assert_eq!(commands[11], "openstack server migrate vsrv --live host-iron");
    assert_eq!(commands[18], "openstack server migrate isrv --live host-virt");
    assert_eq!(commands[19], "nova delete isrv");
    assert_eq!(commands[20], "nova delete vsrv");
    assert_eq!(commands[22], "ironic node-show ironic-03");
}

#[test]
fn region_scenario_fails_when_a_migration_is_accepted() {
    std::env::remove_var("SKIP_CLEANUP");

    let (runtime, _runner) = scripted_runtime(vec![
        ScriptedRunner::ok("| Region | Description |\n| RegionOne | main |"),
        ScriptedRunner::ok(
            "| ID | Hypervisor hostname | State |\n| 1 | compute-01 | up |\n| 2 | ironic-03 | up |",
        ),
        ScriptedRunner::ok("| hypervisor_type | qemu |\n| service_host | host-virt |"),
        ScriptedRunner::ok("| hypervisor_type | ironic |\n| service_host | host-iron |"),
        ScriptedRunner::ok(""),
        ScriptedRunner::ok("| name | testkey |"),
        ScriptedRunner::ok("| id | net-1 |"),
        ScriptedRunner::ok("| id | vsrv |\n| status | BUILD |"),
        ScriptedRunner::ok("| id | vsrv |\n| status | ACTIVE |"),
        ScriptedRunner::ok("| ram | 2048 |"),
        ScriptedRunner::ok(
            "| Host | Project | CPU | Memory MB | Disk GB |\n\
             | host-iron | (total) | 16 | 4096 | 100 |\n\
             | host-iron | (used_now) | 4 | 1024 | 20 |",
        ),
        ScriptedRunner::ok("Migration started"), // must be treated as a failure
        // Teardown for the keypair and the virtual server.
        ScriptedRunner::ok(""),
        ScriptedRunner::ok(""),
    ]);
    let config = sample_config();

    let err = region::run(&runtime, &config).unwrap_err();
    assert!(err.contains("was not rejected"));
}

#[test]
fn region_scenario_rejects_multi_region_clouds() {
    std::env::remove_var("SKIP_CLEANUP");

    let (runtime, _runner) = scripted_runtime(vec![ScriptedRunner::ok(
        "| Region | Description |\n| RegionOne | main |\n| RegionTwo | spare |",
    )]);
    let config = sample_config();

    let err = region::run(&runtime, &config).unwrap_err();
    assert!(err.contains("Expected one deployed region"));
}

use market_iaas::core::auction::{PlacementVerdict, TieBreak};
use market_iaas::core::common::ResourceKind;
use market_iaas::core::config::{parse_config_value, parse_options, SimulationConfig};
use market_iaas::simulation::MarketSimulation;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn name_wrapper(file_name: &str) -> String {
    format!("test-configs/{}", file_name)
}

fn plain_config() -> SimulationConfig {
    SimulationConfig {
        bid_model: "Plain[base_cost=100,scale=100]".to_string(),
        tie_break: TieBreak::FirstSeen,
        commit_cost: 0.,
        resources: vec![ResourceKind::Cpu],
        idle_power: 100.,
        full_power: 200.,
        hosts: vec![],
    }
}

#[test]
// Two hosts of 16000 and 1000 compute units, five VMs of 1000 units each.
// Expected bids per round (base 100, scale 100, first-seen ties):
//   vm 0: h0 100.00 vs h1 100.00 -> h0 (tie, first seen)
//   vm 1: h0 106.25 vs h1 100.00 -> h1 (now full)
//   vm 2: h0 106.25, h1 not admitted -> h0
//   vm 3: h0 112.50 -> h0
//   vm 4: h0 118.75 -> h0
// Final loads: h0 = 4000/16000 = 0.25, h1 = 1.0.
fn test_basic_auction_scenario() {
    init_logger();
    let mut sim = MarketSimulation::new(&plain_config());
    let h0 = sim.add_host(16000, 8192, 0.);
    let h1 = sim.add_host(1000, 8192, 0.);
    for vm_id in 0..5 {
        sim.submit_vm(vm_id, 1000, 512);
    }
    sim.place_submitted_vms();

    assert_eq!(sim.vm_host(0), Some(h0));
    assert_eq!(sim.vm_host(1), Some(h1));
    assert_eq!(sim.vm_host(2), Some(h0));
    assert_eq!(sim.vm_host(3), Some(h0));
    assert_eq!(sim.vm_host(4), Some(h0));
    assert_eq!(sim.host_cpu_load(h0), 0.25);
    assert_eq!(sim.host_cpu_load(h1), 1.);

    // One hour at idle 100 W / full 200 W:
    // h0 draws 125 W -> 0.125 kWh, h1 draws 200 W -> 0.2 kWh.
    let report = sim.finalize(3600.);
    assert_eq!(report.committed_count(), 5);
    assert_eq!(report.energy[0].power_w, 125.);
    assert_eq!(report.energy[0].energy_kwh, 0.125);
    assert_eq!(report.energy[1].power_w, 200.);
    assert!((report.energy[1].energy_kwh - 0.2).abs() < 1e-12);
    assert!((report.total_energy_kwh - 0.325).abs() < 1e-12);
}

#[test]
// Token economy run with the CPU+RAM double auction: two identical hosts with
// 1000.0 tokens each, commit cost 25.0, pricing 10 + 20u. Equal-price rounds go
// to the balance tie-break, loaded rounds go to the emptier host, so placements
// alternate h0, h1, h0, h1, h0 and balances end at 925.0 / 950.0.
fn test_token_auction_end_to_end() {
    init_logger();
    let config = SimulationConfig {
        bid_model: "TokenGated[base_cost=10,scale=20]".to_string(),
        tie_break: TieBreak::TokenBalance,
        commit_cost: 25.,
        resources: vec![ResourceKind::Cpu, ResourceKind::Memory],
        idle_power: 100.,
        full_power: 200.,
        hosts: vec![],
    };
    let mut sim = MarketSimulation::new(&config);
    let h0 = sim.add_host(4000, 8192, 1000.);
    let h1 = sim.add_host(4000, 8192, 1000.);
    for vm_id in 0..5 {
        sim.submit_vm(vm_id, 1000, 512);
    }
    sim.place_submitted_vms();

    assert_eq!(sim.vm_host(0), Some(h0));
    assert_eq!(sim.vm_host(1), Some(h1));
    assert_eq!(sim.vm_host(2), Some(h0));
    assert_eq!(sim.vm_host(3), Some(h1));
    assert_eq!(sim.vm_host(4), Some(h0));
    assert_eq!(sim.host_token_balance(h0), 925.);
    assert_eq!(sim.host_token_balance(h1), 950.);
    assert_eq!(sim.host_cpu_load(h0), 0.75);
    assert_eq!(sim.host_cpu_load(h1), 0.5);

    let report = sim.finalize(100.);
    assert_eq!(report.committed_count(), 5);
    assert_eq!(report.energy.len(), 2);
}

#[test]
// The snapshot reflects the end-of-run state: allocations are still in place
// when the energy report is produced, and finalize can be called again with
// the same result.
fn test_finalize_preserves_state() {
    init_logger();
    let mut sim = MarketSimulation::new(&plain_config());
    let h0 = sim.add_host(1000, 1024, 0.);
    sim.submit_vm(0, 500, 512);
    sim.place_submitted_vms();

    let report = sim.finalize(10.);
    assert_eq!(report.energy[0].utilization, 0.5);
    assert_eq!(sim.host_cpu_load(h0), 0.5);
    let report2 = sim.finalize(10.);
    assert_eq!(report2.energy[0].energy_kwh, report.energy[0].energy_kwh);
}

#[test]
// Re-submitting a VM id before placement replaces its demand instead of
// auctioning the VM twice.
fn test_resubmitted_vm_is_auctioned_once() {
    init_logger();
    let mut sim = MarketSimulation::new(&plain_config());
    let h0 = sim.add_host(1000, 1024, 0.);
    sim.submit_vm(0, 400, 256);
    sim.submit_vm(0, 500, 512);
    sim.place_submitted_vms();

    let report = sim.finalize(10.);
    assert_eq!(report.placements.len(), 1);
    assert_eq!(sim.vm_host(0), Some(h0));
    assert_eq!(sim.host_cpu_load(h0), 0.5);
}

#[test]
// The balance tie-break is only meaningful with token-gated bids.
#[should_panic(expected = "Can't use TokenBalance tie-break")]
fn test_token_tie_break_requires_token_gated_model() {
    let mut config = plain_config();
    config.tie_break = TieBreak::TokenBalance;
    MarketSimulation::new(&config);
}

#[test]
fn test_config_from_file() {
    let config = SimulationConfig::from_file(&name_wrapper("config.yaml"));
    assert_eq!(config.bid_model, "TokenGated[base_cost=10,scale=20]");
    assert_eq!(config.tie_break, TieBreak::TokenBalance);
    assert_eq!(config.commit_cost, 25.);
    assert_eq!(config.resources, vec![ResourceKind::Cpu, ResourceKind::Memory]);
    assert_eq!(config.hosts.len(), 1);
    assert_eq!(config.hosts[0].count, Some(2));

    let sim = MarketSimulation::new(&config);
    assert_eq!(sim.pool().get_host_count(), 2);
    assert_eq!(sim.pool().get_token_balance(0), 1000.);
}

#[test]
// Absent parameters fall back to defaults.
fn test_config_defaults() {
    let config = SimulationConfig::from_file(&name_wrapper("minimal.yaml"));
    assert_eq!(config.bid_model, "Plain[base_cost=100,scale=100]");
    assert_eq!(config.tie_break, TieBreak::FirstSeen);
    assert_eq!(config.commit_cost, 0.);
    assert_eq!(config.resources, vec![ResourceKind::Cpu]);
    assert_eq!(config.idle_power, 100.);
    assert_eq!(config.full_power, 200.);
    assert_eq!(config.hosts[0].initial_tokens, None);
}

#[test]
fn test_option_string_parsing() {
    let (name, options) = parse_config_value("TokenGated[base_cost=10,scale=20]");
    assert_eq!(name, "TokenGated");
    let options = parse_options(&options.unwrap());
    assert_eq!(options.get("base_cost").unwrap(), "10");
    assert_eq!(options.get("scale").unwrap(), "20");

    let (name, options) = parse_config_value("Plain");
    assert_eq!(name, "Plain");
    assert_eq!(options, None);
}

#[test]
fn test_report_export() {
    init_logger();
    let mut sim = MarketSimulation::new(&plain_config());
    sim.add_host(1000, 1024, 0.);
    sim.submit_vm(0, 500, 512);
    sim.place_submitted_vms();
    let report = sim.finalize(3600.);
    assert_eq!(report.placements[0].verdict, PlacementVerdict::Committed);

    let dir = std::env::temp_dir();
    let csv_path = dir.join("market_iaas_energy.csv");
    let json_path = dir.join("market_iaas_report.json");
    report.save_energy_csv(csv_path.to_str().unwrap()).unwrap();
    report.save_json(json_path.to_str().unwrap()).unwrap();
    assert!(std::fs::metadata(&csv_path).unwrap().len() > 0);
    assert!(std::fs::metadata(&json_path).unwrap().len() > 0);
}

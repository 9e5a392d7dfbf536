//! End-to-end workflow tests: catalog CSV on disk, scenario TOML on disk,
//! resolution and simulation through the public API.

use cloudcost::catalog::{Catalog, CatalogFilter};
use cloudcost::engine::{simulate, simulate_for_period};
use cloudcost::scenario::{CommitmentTerm, Scenario, TimePeriod};
use tempfile::TempDir;

const EPSILON: f64 = 1e-9;

fn two_provider_catalog(dir: &TempDir) -> Catalog {
    let content = "\
Provider,Service,Instance Type,Region,Usage Type,Price Per Unit,Units,Currency,Performance Score,Availability,Reserved Discount 1yr,Reserved Discount 3yr
AWS,S3 Standard,-,US East,Storage,0.023,GB/Month,USD,85,99.99,20,40
Azure,Blob Storage,-,US East,Storage,0.020,GB/Month,USD,82,99.99,25,45
";
    let path = dir.path().join("pricing.csv");
    std::fs::write(&path, content).unwrap();
    Catalog::from_csv_path(&path).unwrap()
}

#[test]
fn test_reserved_3yr_scenario_from_files() {
    let dir = TempDir::new().unwrap();
    let catalog = two_provider_catalog(&dir);

    let scenario_toml = r#"
        [[line_item]]
        provider = "AWS"
        service = "S3 Standard"
        quantity = 100.0
        term = "3yr"

        [[line_item]]
        provider = "Azure"
        service = "Blob Storage"
        quantity = 100.0
        term = "3yr"
    "#;
    let scenario_path = dir.path().join("scenario.toml");
    std::fs::write(&scenario_path, scenario_toml).unwrap();

    let scenario = Scenario::load(&scenario_path).unwrap();
    let items = scenario.resolve(&catalog, CommitmentTerm::OnDemand);
    assert_eq!(items.len(), 2);

    let result = simulate(&items).unwrap();
    assert!((result.line_costs[0].cost - 1.38).abs() < EPSILON);
    assert!((result.line_costs[1].cost - 1.10).abs() < EPSILON);
    assert!((result.total_cost - 2.48).abs() < EPSILON);
    assert!((result.total_savings_vs_on_demand - 1.82).abs() < EPSILON);
}

#[test]
fn test_filter_change_drops_line_items_without_error() {
    let dir = TempDir::new().unwrap();
    let catalog = two_provider_catalog(&dir);

    let scenario = toml::from_str::<Scenario>(
        r#"
        [[line_item]]
        provider = "AWS"
        service = "S3 Standard"
        quantity = 100.0

        [[line_item]]
        provider = "Azure"
        service = "Blob Storage"
        quantity = 100.0
    "#,
    )
    .unwrap();

    // Narrowing the catalog to AWS removes the Azure offering; the Azure
    // line becomes a no-op removal, not a failure.
    let aws_only = catalog.filter(&CatalogFilter {
        providers: vec!["AWS".to_string()],
        ..Default::default()
    });
    let items = scenario.resolve(&aws_only, CommitmentTerm::OnDemand);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].offering.provider, "AWS");

    let result = simulate(&items).unwrap();
    assert!((result.total_cost - 2.3).abs() < EPSILON);
}

#[test]
fn test_period_scaling_through_scenario() {
    let dir = TempDir::new().unwrap();
    let catalog = two_provider_catalog(&dir);

    let scenario = toml::from_str::<Scenario>(
        r#"
        [[line_item]]
        provider = "AWS"
        service = "S3 Standard"
        quantity = 300.0
        term = "1yr"
    "#,
    )
    .unwrap();
    let items = scenario.resolve(&catalog, CommitmentTerm::OnDemand);

    let monthly = simulate_for_period(&items, TimePeriod::Month).unwrap();
    let yearly = simulate_for_period(&items, TimePeriod::Year).unwrap();
    assert!((yearly.total_cost - monthly.total_cost * 12.0).abs() < EPSILON);
}

#[test]
fn test_scenario_save_then_load_preserves_lines() {
    let dir = TempDir::new().unwrap();
    let catalog = two_provider_catalog(&dir);

    let scenario = toml::from_str::<Scenario>(
        r#"
        [[line_item]]
        provider = "Azure"
        service = "Blob Storage"
        region = "US East"
        quantity = 250.0
        term = "1yr"
    "#,
    )
    .unwrap();
    let path = dir.path().join("saved.toml");
    scenario.save(&path).unwrap();

    let reloaded = Scenario::load(&path).unwrap();
    assert_eq!(reloaded.line_items.len(), 1);
    let items = reloaded.resolve(&catalog, CommitmentTerm::OnDemand);
    assert_eq!(items[0].term, CommitmentTerm::Reserved1yr);
    assert_eq!(items[0].quantity, 250.0);
}

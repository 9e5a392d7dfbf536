//! Unit tests for the cost simulation engine's contracts
//!
//! Covers the pricing contracts: on-demand pass-through, reserved discounts,
//! clamping, empty scenarios, undefined ratios and regional grouping.

use cloudcost::catalog::{Catalog, Offering};
use cloudcost::engine::{
    compare_terms, effective_price, line_cost, price_performance_ratio, ratio_ranking,
    regional_spread, simulate,
};
use cloudcost::error::CloudCostError;
use cloudcost::scenario::{CommitmentTerm, ScenarioLineItem};

const EPSILON: f64 = 1e-9;

fn storage_offering(provider: &str, service: &str, region: &str, price: f64) -> Offering {
    Offering {
        provider: provider.to_string(),
        service: service.to_string(),
        instance_type: None,
        region: region.to_string(),
        usage_type: "Storage".to_string(),
        price_per_unit: price,
        unit: "GB/Month".to_string(),
        currency: "USD".to_string(),
        performance_score: 85.0,
        availability: 99.99,
        reserved_discount_1yr: 20.0,
        reserved_discount_3yr: 40.0,
    }
}

#[test]
fn test_on_demand_returns_list_price_for_all_sample_offerings() {
    for offering in Catalog::sample().offerings() {
        assert_eq!(
            effective_price(offering, CommitmentTerm::OnDemand),
            offering.price_per_unit
        );
    }
}

#[test]
fn test_reserved_1yr_at_20_percent() {
    let offering = storage_offering("AWS", "S3 Standard", "US East", 0.023);
    let price = effective_price(&offering, CommitmentTerm::Reserved1yr);
    assert!((price - 0.0184).abs() < EPSILON);
}

#[test]
fn test_discount_of_150_behaves_like_100() {
    let mut offering = storage_offering("AWS", "S3 Standard", "US East", 0.023);
    offering.reserved_discount_3yr = 150.0;
    assert_eq!(effective_price(&offering, CommitmentTerm::Reserved3yr), 0.0);

    offering.reserved_discount_3yr = 100.0;
    assert_eq!(effective_price(&offering, CommitmentTerm::Reserved3yr), 0.0);
}

#[test]
fn test_negative_quantity_is_invalid_input() {
    let item = ScenarioLineItem {
        offering: storage_offering("AWS", "S3 Standard", "US East", 0.023),
        quantity: -1.0,
        term: CommitmentTerm::OnDemand,
    };
    assert!(matches!(
        line_cost(&item),
        Err(CloudCostError::InvalidInput { .. })
    ));
}

#[test]
fn test_zero_quantity_costs_zero() {
    let item = ScenarioLineItem {
        offering: storage_offering("AWS", "S3 Standard", "US East", 0.023),
        quantity: 0.0,
        term: CommitmentTerm::Reserved3yr,
    };
    let line = line_cost(&item).unwrap();
    assert_eq!(line.cost, 0.0);
}

#[test]
fn test_empty_scenario_is_valid_and_zero() {
    let result = simulate(&[]).unwrap();
    assert_eq!(result.total_cost, 0.0);
    assert_eq!(result.total_savings_vs_on_demand, 0.0);
}

#[test]
fn test_zero_performance_score_is_undefined_not_infinite() {
    let mut offering = storage_offering("AWS", "S3 Standard", "US East", 0.023);
    offering.performance_score = 0.0;
    assert_eq!(price_performance_ratio(&offering), None);
}

#[test]
fn test_regional_spread_two_rows_same_region() {
    let catalog = Catalog::new(vec![
        storage_offering("AWS", "S3", "US East", 0.023),
        storage_offering("AWS", "S3", "US East", 0.021),
    ]);
    let spread = regional_spread(&catalog, "S3");
    let us_east = &spread["US East"];
    assert!((us_east.min - 0.021).abs() < EPSILON);
    assert!((us_east.max - 0.023).abs() < EPSILON);
    assert!((us_east.mean - 0.022).abs() < EPSILON);
}

#[test]
fn test_regional_spread_zero_matches_is_empty() {
    let catalog = Catalog::sample();
    assert!(regional_spread(&catalog, "No Such Service").is_empty());
}

#[test]
fn test_two_provider_reserved_scenario_end_to_end() {
    let mut aws = storage_offering("AWS", "S3 Standard", "US East", 0.023);
    aws.reserved_discount_3yr = 40.0;
    let mut azure = storage_offering("Azure", "Blob Storage", "US East", 0.020);
    azure.reserved_discount_3yr = 45.0;

    let items = vec![
        ScenarioLineItem {
            offering: aws,
            quantity: 100.0,
            term: CommitmentTerm::Reserved3yr,
        },
        ScenarioLineItem {
            offering: azure,
            quantity: 100.0,
            term: CommitmentTerm::Reserved3yr,
        },
    ];
    let result = simulate(&items).unwrap();

    assert!((result.line_costs[0].cost - 1.38).abs() < EPSILON);
    assert!((result.line_costs[1].cost - 1.10).abs() < EPSILON);
    assert!((result.total_cost - 2.48).abs() < EPSILON);
    assert!((result.total_savings_vs_on_demand - 1.82).abs() < EPSILON);
}

#[test]
fn test_compare_terms_matches_effective_prices() {
    let offering = storage_offering("AWS", "S3 Standard", "US East", 0.023);
    let cmp = compare_terms(&offering, 1000.0).unwrap();
    assert!((cmp.on_demand_cost - 23.0).abs() < EPSILON);
    assert!((cmp.reserved_1yr_cost - 18.4).abs() < EPSILON);
    assert!((cmp.reserved_3yr_cost - 13.8).abs() < EPSILON);
}

#[test]
fn test_ratio_ranking_orders_best_first() {
    let mut cheap_fast = storage_offering("Google Cloud", "Cloud Storage", "US East", 0.020);
    cheap_fast.performance_score = 90.0;
    let mut pricey_slow = storage_offering("AWS", "S3 Standard", "US East", 0.025);
    pricey_slow.performance_score = 70.0;
    let mut unranked = storage_offering("Azure", "Blob Storage", "US East", 0.001);
    unranked.performance_score = 0.0;

    let catalog = Catalog::new(vec![pricey_slow, unranked, cheap_fast]);
    let ranking = ratio_ranking(&catalog);

    assert_eq!(ranking[0].provider, "Google Cloud");
    assert_eq!(ranking[1].provider, "AWS");
    assert_eq!(ranking[2].provider, "Azure");
    assert!(ranking[2].ratio.is_none());
}

#[test]
fn test_recomputation_is_deterministic() {
    let catalog = Catalog::sample();
    let items: Vec<ScenarioLineItem> = catalog
        .offerings()
        .iter()
        .map(|o| ScenarioLineItem {
            offering: o.clone(),
            quantity: 100.0,
            term: CommitmentTerm::Reserved1yr,
        })
        .collect();

    let first = simulate(&items).unwrap();
    let second = simulate(&items).unwrap();
    assert_eq!(first.total_cost, second.total_cost);
    assert_eq!(
        first.total_savings_vs_on_demand,
        second.total_savings_vs_on_demand
    );
}

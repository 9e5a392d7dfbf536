//! Cost simulation engine
//!
//! Pure computation over the catalog: per-line effective pricing under a
//! commitment term, scenario aggregation, and the derived metrics the
//! comparison views are built on. Every operation here is a stateless
//! function over its explicit inputs; recomputation with identical inputs
//! always yields identical outputs, which is what lets the CLI recompute
//! everything on each invocation instead of caching.

use crate::catalog::{Catalog, Offering};
use crate::error::{CloudCostError, Result};
use crate::scenario::{CommitmentTerm, ScenarioLineItem, TimePeriod};
use serde::Serialize;
use std::collections::BTreeMap;

/// Discount percentages are clamped to [0, 100] before use so malformed
/// source data can never produce a negative or inflated price.
fn clamp_discount(discount: f64) -> f64 {
    discount.clamp(0.0, 100.0)
}

/// Unit price after the discount applicable under `term`. OnDemand returns
/// the list price unchanged. Never negative.
pub fn effective_price(offering: &Offering, term: CommitmentTerm) -> f64 {
    let discount = match term {
        CommitmentTerm::OnDemand => return offering.price_per_unit,
        CommitmentTerm::Reserved1yr => offering.reserved_discount_1yr,
        CommitmentTerm::Reserved3yr => offering.reserved_discount_3yr,
    };
    offering.price_per_unit * (1.0 - clamp_discount(discount) / 100.0)
}

/// One costed scenario line, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct LineCost {
    pub provider: String,
    pub service: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    pub term: CommitmentTerm,
    pub quantity: f64,
    pub unit: String,
    pub currency: String,
    pub effective_unit_price: f64,
    pub cost: f64,
}

/// Cost a single line item. Fails with `InvalidInput` on a negative
/// quantity; a zero quantity is a legal line costing zero.
pub fn line_cost(item: &ScenarioLineItem) -> Result<LineCost> {
    if item.quantity < 0.0 || !item.quantity.is_finite() {
        return Err(CloudCostError::invalid_input(
            "quantity",
            format!(
                "{} for {}: must be a non-negative number",
                item.quantity,
                item.offering.selector()
            ),
        ));
    }
    let effective_unit_price = effective_price(&item.offering, item.term);
    Ok(LineCost {
        provider: item.offering.provider.clone(),
        service: item.offering.service.clone(),
        region: item.offering.region.clone(),
        instance_type: item.offering.instance_type.clone(),
        term: item.term,
        quantity: item.quantity,
        unit: item.offering.unit.clone(),
        currency: item.offering.currency.clone(),
        effective_unit_price,
        cost: effective_unit_price * item.quantity,
    })
}

/// Aggregated output of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub line_costs: Vec<LineCost>,
    pub total_cost: f64,
    /// On-demand total minus the chosen-term total, quantities held fixed.
    /// Zero when every line is on-demand; never negative once discounts are
    /// clamped.
    pub total_savings_vs_on_demand: f64,
    pub period: TimePeriod,
    /// Currency of the line items; single-currency sessions are assumed, so
    /// the first line's currency is reported. `None` for empty scenarios.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Simulate a scenario on a monthly basis. An empty scenario is a valid
/// state (nothing selected yet) and yields a zero-valued result.
pub fn simulate(items: &[ScenarioLineItem]) -> Result<ScenarioResult> {
    simulate_for_period(items, TimePeriod::Month)
}

/// Simulate a scenario with every cost scaled to `period`. The savings
/// figure scales with the same factor, so the on-demand relationship is
/// preserved at any period.
pub fn simulate_for_period(items: &[ScenarioLineItem], period: TimePeriod) -> Result<ScenarioResult> {
    let factor = period.factor();
    let mut line_costs = Vec::with_capacity(items.len());
    let mut total_cost = 0.0;
    let mut on_demand_total = 0.0;

    for item in items {
        let mut line = line_cost(item)?;
        line.cost *= factor;
        on_demand_total += effective_price(&item.offering, CommitmentTerm::OnDemand)
            * item.quantity
            * factor;
        total_cost += line.cost;
        line_costs.push(line);
    }

    Ok(ScenarioResult {
        currency: line_costs.first().map(|l| l.currency.clone()),
        line_costs,
        total_cost,
        total_savings_vs_on_demand: on_demand_total - total_cost,
        period,
    })
}

/// Price-to-performance ratio, lower is better. A performance score of zero
/// is legal input with an undefined ratio: `None`, never infinity, so
/// rankings can push such entries to last place explicitly.
pub fn price_performance_ratio(offering: &Offering) -> Option<f64> {
    if offering.performance_score > 0.0 {
        Some(offering.price_per_unit / offering.performance_score)
    } else {
        None
    }
}

/// One row of the price-performance ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RatioEntry {
    pub provider: String,
    pub service: String,
    pub region: String,
    pub price_per_unit: f64,
    pub performance_score: f64,
    /// `None` means undefined (zero performance score); such entries rank
    /// last, never as infinity.
    pub ratio: Option<f64>,
}

/// Rank every offering by price-to-performance ratio, best (lowest) first.
/// Offerings with an undefined ratio sort after all defined ones.
pub fn ratio_ranking(catalog: &Catalog) -> Vec<RatioEntry> {
    let mut entries: Vec<RatioEntry> = catalog
        .offerings()
        .iter()
        .map(|o| RatioEntry {
            provider: o.provider.clone(),
            service: o.service.clone(),
            region: o.region.clone(),
            price_per_unit: o.price_per_unit,
            performance_score: o.performance_score,
            ratio: price_performance_ratio(o),
        })
        .collect();
    entries.sort_by(|a, b| match (a.ratio, b.ratio) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    entries
}

/// Min/max/mean of the unit prices within one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSpread {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Group offerings of `service` (exact match) by region and summarize the
/// unit-price spread per region. Zero matches yields an empty map.
pub fn regional_spread(catalog: &Catalog, service: &str) -> BTreeMap<String, PriceSpread> {
    let mut by_region: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for offering in catalog.offerings() {
        if offering.service == service {
            by_region
                .entry(offering.region.clone())
                .or_default()
                .push(offering.price_per_unit);
        }
    }

    by_region
        .into_iter()
        .map(|(region, prices)| {
            let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
            let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = prices.iter().sum::<f64>() / prices.len() as f64;
            (region, PriceSpread { min, max, mean })
        })
        .collect()
}

/// Percent each region's cheapest offering of `service` sits above the
/// cheapest region overall. The cheapest region maps to 0.0. Empty when the
/// service has no matches or its floor price is zero (the premium is
/// undefined then).
pub fn regional_premiums(catalog: &Catalog, service: &str) -> BTreeMap<String, f64> {
    let spread = regional_spread(catalog, service);
    let floor = spread
        .values()
        .map(|s| s.min)
        .fold(f64::INFINITY, f64::min);
    if !floor.is_finite() || floor <= 0.0 {
        return BTreeMap::new();
    }
    spread
        .into_iter()
        .map(|(region, s)| (region, (s.min - floor) / floor * 100.0))
        .collect()
}

/// Costs of one offering at a quantity under each commitment term.
#[derive(Debug, Clone, Serialize)]
pub struct TermComparison {
    pub provider: String,
    pub service: String,
    pub region: String,
    pub currency: String,
    pub performance_score: f64,
    pub availability: f64,
    pub on_demand_cost: f64,
    pub reserved_1yr_cost: f64,
    pub reserved_3yr_cost: f64,
}

/// Cost `offering` at `quantity` under every term at once, for the
/// side-by-side comparison view.
pub fn compare_terms(offering: &Offering, quantity: f64) -> Result<TermComparison> {
    if quantity < 0.0 || !quantity.is_finite() {
        return Err(CloudCostError::invalid_input(
            "quantity",
            format!("{}: must be a non-negative number", quantity),
        ));
    }
    Ok(TermComparison {
        provider: offering.provider.clone(),
        service: offering.service.clone(),
        region: offering.region.clone(),
        currency: offering.currency.clone(),
        performance_score: offering.performance_score,
        availability: offering.availability,
        on_demand_cost: effective_price(offering, CommitmentTerm::OnDemand) * quantity,
        reserved_1yr_cost: effective_price(offering, CommitmentTerm::Reserved1yr) * quantity,
        reserved_3yr_cost: effective_price(offering, CommitmentTerm::Reserved3yr) * quantity,
    })
}

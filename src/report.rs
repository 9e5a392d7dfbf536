//! Terminal rendering of catalog and engine output
//!
//! Every view has a table form (comfy-table) and the callers in main.rs can
//! instead serialize the same data as JSON with `--output json`. Rendering
//! rounds for display only; the engine values stay full precision.

use crate::catalog::Catalog;
use crate::config::DisplayConfig;
use crate::engine::{PriceSpread, RatioEntry, ScenarioResult, TermComparison};
use comfy_table::{Cell, Table};
use console::style;
use std::collections::BTreeMap;

fn fmt_price(value: f64, display: &DisplayConfig) -> String {
    format!("{:.*}", display.unit_price_decimals, value)
}

fn fmt_cost(value: f64, currency: &str, display: &DisplayConfig) -> String {
    format!("{:.*} {}", display.cost_decimals, value, currency)
}

/// Filtered catalog listing.
pub fn print_catalog(catalog: &Catalog, display: &DisplayConfig) {
    if catalog.is_empty() {
        println!("No offerings match the current filters");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Provider",
        "Service",
        "Instance",
        "Region",
        "Usage Type",
        "Price/Unit",
        "Unit",
        "Perf",
        "Avail %",
        "Disc 1yr %",
        "Disc 3yr %",
    ]);
    for o in catalog.offerings() {
        table.add_row(vec![
            Cell::new(&o.provider),
            Cell::new(&o.service),
            Cell::new(o.instance_type.as_deref().unwrap_or("-")),
            Cell::new(&o.region),
            Cell::new(&o.usage_type),
            Cell::new(fmt_price(o.price_per_unit, display)),
            Cell::new(&o.unit),
            Cell::new(format!("{:.0}", o.performance_score)),
            Cell::new(format!("{:.2}", o.availability)),
            Cell::new(format!("{:.0}", o.reserved_discount_1yr)),
            Cell::new(format!("{:.0}", o.reserved_discount_3yr)),
        ]);
    }
    println!("{table}");
    println!("{} offerings", catalog.len());
}

/// Side-by-side term comparison; the cheapest on-demand row is highlighted.
pub fn print_comparison(rows: &[TermComparison], display: &DisplayConfig) {
    if rows.is_empty() {
        println!("No matching services found with the current filters");
        return;
    }

    let cheapest = rows
        .iter()
        .map(|r| r.on_demand_cost)
        .fold(f64::INFINITY, f64::min);

    let mut table = Table::new();
    table.set_header(vec![
        "Provider",
        "Service",
        "Region",
        "On-Demand",
        "1-Year Reserved",
        "3-Year Reserved",
        "Perf",
        "Avail %",
    ]);
    for row in rows {
        let on_demand = fmt_cost(row.on_demand_cost, &row.currency, display);
        let on_demand_cell = if row.on_demand_cost <= cheapest {
            Cell::new(on_demand).fg(comfy_table::Color::Green)
        } else {
            Cell::new(on_demand)
        };
        table.add_row(vec![
            Cell::new(&row.provider),
            Cell::new(&row.service),
            Cell::new(&row.region),
            on_demand_cell,
            Cell::new(fmt_cost(row.reserved_1yr_cost, &row.currency, display)),
            Cell::new(fmt_cost(row.reserved_3yr_cost, &row.currency, display)),
            Cell::new(format!("{:.0}", row.performance_score)),
            Cell::new(format!("{:.2}", row.availability)),
        ]);
    }
    println!("{table}");
}

/// Price-performance ranking, best first, undefined ratios last.
pub fn print_ratio_ranking(entries: &[RatioEntry], display: &DisplayConfig) {
    if entries.is_empty() {
        println!("No offerings match the current filters");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Rank",
        "Provider",
        "Service",
        "Region",
        "Price/Unit",
        "Perf",
        "Price/Perf",
    ]);
    for (rank, entry) in entries.iter().enumerate() {
        let ratio_cell = match entry.ratio {
            Some(r) => Cell::new(format!("{:.6}", r)),
            None => Cell::new("undefined").fg(comfy_table::Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&entry.provider),
            Cell::new(&entry.service),
            Cell::new(&entry.region),
            Cell::new(fmt_price(entry.price_per_unit, display)),
            Cell::new(format!("{:.0}", entry.performance_score)),
            ratio_cell,
        ]);
    }
    println!("{table}");
    println!("Lower price/performance is better");
}

/// Regional price spread for one service, with the premium each region pays
/// over the cheapest one.
pub fn print_spread(
    service: &str,
    spread: &BTreeMap<String, PriceSpread>,
    premiums: &BTreeMap<String, f64>,
    display: &DisplayConfig,
) {
    if spread.is_empty() {
        println!("No offerings found for service {:?}", service);
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Region", "Min", "Max", "Mean", "% Above Lowest"]);
    for (region, s) in spread {
        let premium = premiums
            .get(region)
            .map(|p| format!("{:.1}%", p))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(region),
            Cell::new(fmt_price(s.min, display)),
            Cell::new(fmt_price(s.max, display)),
            Cell::new(fmt_price(s.mean, display)),
            Cell::new(premium),
        ]);
    }
    println!("Regional pricing for {}", style(service).bold());
    println!("{table}");
}

/// Scenario cost breakdown and totals. `session_currency` is used when the
/// scenario is empty and no line item carries a currency.
pub fn print_simulation(result: &ScenarioResult, display: &DisplayConfig, session_currency: &str) {
    let currency = result.currency.as_deref().unwrap_or(session_currency);

    if result.line_costs.is_empty() {
        println!("Empty scenario: total cost {}", fmt_cost(0.0, currency, display));
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Provider",
        "Service",
        "Region",
        "Term",
        "Quantity",
        "Unit",
        "Effective Price",
        "Cost",
    ]);
    for line in &result.line_costs {
        table.add_row(vec![
            Cell::new(&line.provider),
            Cell::new(&line.service),
            Cell::new(&line.region),
            Cell::new(line.term.label()),
            Cell::new(format!("{}", line.quantity)),
            Cell::new(&line.unit),
            Cell::new(fmt_price(line.effective_unit_price, display)),
            Cell::new(fmt_cost(line.cost, &line.currency, display)),
        ]);
    }
    println!("{table}");

    println!(
        "Total ({}): {}",
        result.period,
        style(fmt_cost(result.total_cost, currency, display)).bold()
    );
    if result.total_savings_vs_on_demand > 0.0 {
        println!(
            "Savings vs on-demand: {}",
            style(fmt_cost(result.total_savings_vs_on_demand, currency, display)).green()
        );
    }
}

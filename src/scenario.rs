//! Scenario definitions: commitment terms, time periods and line items
//!
//! A scenario is the user-editable half of a simulation: a list of line item
//! specs (offering selector + quantity + commitment term) stored as TOML.
//! Resolution against the session catalog turns specs into concrete
//! `ScenarioLineItem`s; specs that no longer match any offering (e.g. after
//! a filter change) are dropped with a warning rather than failing the run,
//! since the scenario is ephemeral user state.

use crate::catalog::{Catalog, Offering};
use crate::error::{CloudCostError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Pricing basis for a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CommitmentTerm {
    #[default]
    #[serde(rename = "on-demand", alias = "ondemand")]
    OnDemand,
    #[serde(rename = "1yr", alias = "reserved-1yr")]
    Reserved1yr,
    #[serde(rename = "3yr", alias = "reserved-3yr")]
    Reserved3yr,
}

impl CommitmentTerm {
    /// Label used in table headers and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            CommitmentTerm::OnDemand => "On-Demand",
            CommitmentTerm::Reserved1yr => "1-Year Reserved",
            CommitmentTerm::Reserved3yr => "3-Year Reserved",
        }
    }
}

impl fmt::Display for CommitmentTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommitmentTerm::OnDemand => "on-demand",
            CommitmentTerm::Reserved1yr => "1yr",
            CommitmentTerm::Reserved3yr => "3yr",
        };
        f.write_str(s)
    }
}

impl FromStr for CommitmentTerm {
    type Err = CloudCostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on-demand" | "ondemand" => Ok(CommitmentTerm::OnDemand),
            "1yr" | "reserved-1yr" => Ok(CommitmentTerm::Reserved1yr),
            "3yr" | "reserved-3yr" => Ok(CommitmentTerm::Reserved3yr),
            other => Err(CloudCostError::invalid_input(
                "term",
                format!("unknown commitment term {:?}, expected on-demand, 1yr or 3yr", other),
            )),
        }
    }
}

/// Time basis for reported costs. Catalog prices are monthly-basis for
/// `GB/Month` units; hourly units are treated the same way by convention,
/// scaled from the monthly figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Day,
    #[default]
    Month,
    Year,
}

impl TimePeriod {
    /// Scale factor applied to a monthly-basis cost.
    pub fn factor(&self) -> f64 {
        match self {
            TimePeriod::Day => 1.0 / 30.0,
            TimePeriod::Month => 1.0,
            TimePeriod::Year => 12.0,
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimePeriod::Day => "day",
            TimePeriod::Month => "month",
            TimePeriod::Year => "year",
        };
        f.write_str(s)
    }
}

impl FromStr for TimePeriod {
    type Err = CloudCostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimePeriod::Day),
            "month" => Ok(TimePeriod::Month),
            "year" => Ok(TimePeriod::Year),
            other => Err(CloudCostError::invalid_input(
                "period",
                format!("unknown time period {:?}, expected day, month or year", other),
            )),
        }
    }
}

/// One user-authored scenario line: which offering, how much, on what term.
/// `region` and `instance_type` are optional narrowing; the first catalog
/// match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemSpec {
    pub provider: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    pub quantity: f64,
    /// `None` means "use the session default term".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<CommitmentTerm>,
}

impl LineItemSpec {
    pub fn selector(&self) -> String {
        let mut s = format!("{}/{}", self.provider, self.service);
        if let Some(r) = &self.region {
            s.push('/');
            s.push_str(r);
        }
        if let Some(it) = &self.instance_type {
            s.push_str(&format!(" ({})", it));
        }
        s
    }

    fn matches(&self, offering: &Offering) -> bool {
        self.provider == offering.provider
            && self.service == offering.service
            && self
                .region
                .as_ref()
                .map(|r| r == &offering.region)
                .unwrap_or(true)
            && self
                .instance_type
                .as_ref()
                .map(|it| Some(it) == offering.instance_type.as_ref())
                .unwrap_or(true)
    }
}

/// A resolved line item: an owned catalog offering plus usage and term.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioLineItem {
    pub offering: Offering,
    pub quantity: f64,
    pub term: CommitmentTerm,
}

/// An ordered collection of line item specs, as stored in a scenario TOML
/// file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, rename = "line_item")]
    pub line_items: Vec<LineItemSpec>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            CloudCostError::invalid_input("scenario", format!("{}: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            CloudCostError::invalid_input("scenario", format!("serialization failed: {}", e))
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve every spec against the catalog. Specs with no matching
    /// offering are dropped with a warning; the scenario itself never fails
    /// to resolve. Lines without an explicit term use `default_term`.
    pub fn resolve(&self, catalog: &Catalog, default_term: CommitmentTerm) -> Vec<ScenarioLineItem> {
        let mut items = Vec::with_capacity(self.line_items.len());
        for spec in &self.line_items {
            match catalog.offerings().iter().find(|o| spec.matches(o)) {
                Some(offering) => items.push(ScenarioLineItem {
                    offering: offering.clone(),
                    quantity: spec.quantity,
                    term: spec.term.unwrap_or(default_term),
                }),
                None => {
                    warn!(selector = %spec.selector(), "offering not in catalog, dropping line item");
                }
            }
        }
        items
    }

    /// Strict single-spec lookup. Used when the caller asked for exactly
    /// this offering and silence would be misleading.
    pub fn resolve_one(
        spec: &LineItemSpec,
        catalog: &Catalog,
        default_term: CommitmentTerm,
    ) -> Result<ScenarioLineItem> {
        catalog
            .offerings()
            .iter()
            .find(|o| spec.matches(o))
            .map(|offering| ScenarioLineItem {
                offering: offering.clone(),
                quantity: spec.quantity,
                term: spec.term.unwrap_or(default_term),
            })
            .ok_or_else(|| CloudCostError::MissingOffering {
                selector: spec.selector(),
            })
    }
}

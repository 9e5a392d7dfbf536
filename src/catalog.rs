//! Pricing catalog loading and filtering
//!
//! The catalog is an in-memory table of priced offerings loaded once per
//! session from a CSV source and treated as immutable afterwards. Loading is
//! forgiving: rows with unparsable numeric fields are skipped with a warning,
//! and when no source file exists at all a deterministic sample catalog is
//! synthesized so every downstream view has data to operate on.

use crate::error::{CloudCostError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// Locations checked when no catalog path is given, relative to the
/// working directory.
pub const DEFAULT_SEARCH_PATHS: &[&str] = &["data/cloud_pricing.csv", "../data/cloud_pricing.csv"];

/// One priced row in the catalog: a provider/service/region/instance
/// combination with its list price, performance score and reserved discounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    pub provider: String,
    pub service: String,
    /// `None` for services that have no instance dimension (e.g. storage).
    pub instance_type: Option<String>,
    pub region: String,
    pub usage_type: String,
    pub price_per_unit: f64,
    pub unit: String,
    pub currency: String,
    /// Higher is better, 0-100 scale in practice. Zero is legal.
    pub performance_score: f64,
    /// Availability percentage, 0-100.
    pub availability: f64,
    /// Discount percentages. Values outside [0, 100] are legal in source
    /// data and clamped at the point of use, never here.
    pub reserved_discount_1yr: f64,
    pub reserved_discount_3yr: f64,
}

impl Offering {
    /// Human-readable selector used in log messages and errors.
    pub fn selector(&self) -> String {
        match &self.instance_type {
            Some(it) => format!("{}/{}/{} ({})", self.provider, self.service, self.region, it),
            None => format!("{}/{}/{}", self.provider, self.service, self.region),
        }
    }
}

/// Raw CSV row, header-named and order-insensitive. Numeric columns stay
/// strings here so one bad field skips only its own row instead of aborting
/// the whole load.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Provider")]
    provider: String,
    #[serde(rename = "Service")]
    service: String,
    #[serde(rename = "Instance Type", default)]
    instance_type: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Usage Type")]
    usage_type: String,
    #[serde(rename = "Price Per Unit")]
    price_per_unit: String,
    #[serde(rename = "Units")]
    unit: String,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Performance Score")]
    performance_score: String,
    #[serde(rename = "Availability")]
    availability: String,
    #[serde(rename = "Reserved Discount 1yr")]
    reserved_discount_1yr: String,
    #[serde(rename = "Reserved Discount 3yr")]
    reserved_discount_3yr: String,
}

impl RawRow {
    fn parse(self) -> std::result::Result<Offering, String> {
        let price_per_unit = parse_numeric("Price Per Unit", &self.price_per_unit)?;
        if price_per_unit < 0.0 {
            return Err(format!("negative Price Per Unit: {}", price_per_unit));
        }
        let instance_type = match self.instance_type.trim() {
            "" | "-" => None,
            other => Some(other.to_string()),
        };
        Ok(Offering {
            provider: self.provider,
            service: self.service,
            instance_type,
            region: self.region,
            usage_type: self.usage_type,
            price_per_unit,
            unit: self.unit,
            currency: self.currency,
            performance_score: parse_numeric("Performance Score", &self.performance_score)?,
            availability: parse_numeric("Availability", &self.availability)?,
            reserved_discount_1yr: parse_numeric(
                "Reserved Discount 1yr",
                &self.reserved_discount_1yr,
            )?,
            reserved_discount_3yr: parse_numeric(
                "Reserved Discount 3yr",
                &self.reserved_discount_3yr,
            )?,
        })
    }
}

fn parse_numeric(column: &str, value: &str) -> std::result::Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("unparsable {}: {:?}", column, value))
}

/// Set-membership filter over the catalog. Empty selection on any dimension
/// selects all values for that dimension.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub providers: Vec<String>,
    pub services: Vec<String>,
    pub regions: Vec<String>,
    pub usage_types: Vec<String>,
}

impl CatalogFilter {
    pub fn matches(&self, offering: &Offering) -> bool {
        let in_set = |set: &[String], value: &str| set.is_empty() || set.iter().any(|s| s == value);
        in_set(&self.providers, &offering.provider)
            && in_set(&self.services, &offering.service)
            && in_set(&self.regions, &offering.region)
            && in_set(&self.usage_types, &offering.usage_type)
    }
}

/// Immutable-for-session sequence of offerings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    offerings: Vec<Offering>,
}

impl Catalog {
    pub fn new(offerings: Vec<Offering>) -> Self {
        Self { offerings }
    }

    /// Load the session catalog. Load failures are recovered here, never
    /// propagated: an unreadable or unusable source falls back to the
    /// built-in sample catalog with a warning, so the engine always has
    /// data to operate on. Use [`Catalog::from_csv_path`] when a failure
    /// should surface instead.
    pub fn load(path: Option<&Path>) -> Self {
        if let Some(p) = path {
            return match Self::from_csv_path(p) {
                Ok(catalog) => catalog,
                Err(e) => {
                    warn!(path = %p.display(), error = %e, "failed to load pricing data, using built-in sample catalog");
                    Self::sample()
                }
            };
        }

        for candidate in DEFAULT_SEARCH_PATHS {
            let p = Path::new(candidate);
            if p.exists() {
                match Self::from_csv_path(p) {
                    Ok(catalog) => {
                        debug!(path = %p.display(), rows = catalog.len(), "loaded pricing catalog");
                        return catalog;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "failed to load catalog, trying next source");
                    }
                }
            }
        }

        warn!("no pricing data file found, using built-in sample catalog");
        Self::sample()
    }

    /// Read offerings from a CSV file. Rows with unparsable numeric fields
    /// are skipped with a warning; a file yielding zero usable rows is a
    /// `DataLoad` error.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let mut reader =
            csv::Reader::from_path(path).map_err(|e| CloudCostError::DataLoad {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut offerings = Vec::new();
        for (idx, row) in reader.deserialize::<RawRow>().enumerate() {
            // Header row is line 1, so the first data row is line 2.
            let line = idx + 2;
            match row {
                Ok(raw) => match raw.parse() {
                    Ok(offering) => offerings.push(offering),
                    Err(reason) => {
                        warn!(path = %path.display(), line, %reason, "skipping malformed row");
                    }
                },
                Err(e) => {
                    warn!(path = %path.display(), line, error = %e, "skipping unreadable row");
                }
            }
        }

        if offerings.is_empty() {
            return Err(CloudCostError::DataLoad {
                path: path.display().to_string(),
                message: "no usable rows".to_string(),
            });
        }
        Ok(Self::new(offerings))
    }

    /// Write the catalog back out in the input CSV schema. Used by `init`
    /// to persist the sample set so later runs find a file.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "Provider",
            "Service",
            "Instance Type",
            "Region",
            "Usage Type",
            "Price Per Unit",
            "Units",
            "Currency",
            "Performance Score",
            "Availability",
            "Reserved Discount 1yr",
            "Reserved Discount 3yr",
        ])?;
        for o in &self.offerings {
            writer.write_record([
                o.provider.as_str(),
                o.service.as_str(),
                o.instance_type.as_deref().unwrap_or("-"),
                o.region.as_str(),
                o.usage_type.as_str(),
                &o.price_per_unit.to_string(),
                o.unit.as_str(),
                o.currency.as_str(),
                &o.performance_score.to_string(),
                &o.availability.to_string(),
                &o.reserved_discount_1yr.to_string(),
                &o.reserved_discount_3yr.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Deterministic built-in sample set: AWS, Azure and Google Cloud across
    /// Storage, Compute and Database usage types and three regions. Used
    /// whenever no CSV source is found.
    pub fn sample() -> Self {
        let storage = |provider: &str, service: &str, region: &str, price: f64, perf: f64, avail: f64, d1: f64, d3: f64| {
            Offering {
                provider: provider.to_string(),
                service: service.to_string(),
                instance_type: None,
                region: region.to_string(),
                usage_type: "Storage".to_string(),
                price_per_unit: price,
                unit: "GB/Month".to_string(),
                currency: "USD".to_string(),
                performance_score: perf,
                availability: avail,
                reserved_discount_1yr: d1,
                reserved_discount_3yr: d3,
            }
        };
        let hourly = |provider: &str, service: &str, instance: &str, usage: &str, price: f64, perf: f64, avail: f64, d1: f64, d3: f64| {
            Offering {
                provider: provider.to_string(),
                service: service.to_string(),
                instance_type: Some(instance.to_string()),
                region: "US East".to_string(),
                usage_type: usage.to_string(),
                price_per_unit: price,
                unit: "Hour".to_string(),
                currency: "USD".to_string(),
                performance_score: perf,
                availability: avail,
                reserved_discount_1yr: d1,
                reserved_discount_3yr: d3,
            }
        };

        Self::new(vec![
            storage("AWS", "S3 Standard", "US East", 0.023, 85.0, 99.99, 20.0, 40.0),
            storage("AWS", "S3 Standard", "EU West", 0.024, 83.0, 99.99, 20.0, 40.0),
            storage("AWS", "S3 Standard", "Asia Pacific", 0.025, 80.0, 99.95, 20.0, 40.0),
            storage("Azure", "Blob Storage", "US East", 0.018, 82.0, 99.99, 25.0, 45.0),
            storage("Azure", "Blob Storage", "EU West", 0.02, 80.0, 99.95, 25.0, 45.0),
            storage("Azure", "Blob Storage", "Asia Pacific", 0.022, 78.0, 99.9, 25.0, 45.0),
            storage("Google Cloud", "Cloud Storage", "US East", 0.02, 87.0, 99.99, 15.0, 35.0),
            storage("Google Cloud", "Cloud Storage", "EU West", 0.021, 85.0, 99.95, 15.0, 35.0),
            storage("Google Cloud", "Cloud Storage", "Asia Pacific", 0.023, 83.0, 99.9, 15.0, 35.0),
            hourly("AWS", "EC2", "t2.micro", "Compute", 0.0116, 75.0, 99.95, 30.0, 60.0),
            hourly("Azure", "Virtual Machine", "B1s", "Compute", 0.0104, 78.0, 99.95, 33.0, 62.0),
            hourly("Google Cloud", "Compute Engine", "e2-micro", "Compute", 0.01, 80.0, 99.99, 28.0, 58.0),
            hourly("AWS", "RDS", "db.t3.micro", "Database", 0.017, 88.0, 99.99, 25.0, 50.0),
            hourly("Azure", "SQL Database", "General Purpose", "Database", 0.016, 85.0, 99.95, 27.0, 52.0),
            hourly("Google Cloud", "Cloud SQL", "db-f1-micro", "Database", 0.015, 86.0, 99.95, 20.0, 45.0),
        ])
    }

    pub fn offerings(&self) -> &[Offering] {
        &self.offerings
    }

    pub fn len(&self) -> usize {
        self.offerings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }

    /// Full-scan set-membership filter. Catalogs are hundreds of rows at
    /// most, so no indexing is needed.
    pub fn filter(&self, filter: &CatalogFilter) -> Catalog {
        Catalog::new(
            self.offerings
                .iter()
                .filter(|o| filter.matches(o))
                .cloned()
                .collect(),
        )
    }

    pub fn providers(&self) -> Vec<String> {
        self.distinct(|o| &o.provider)
    }

    pub fn services(&self) -> Vec<String> {
        self.distinct(|o| &o.service)
    }

    pub fn regions(&self) -> Vec<String> {
        self.distinct(|o| &o.region)
    }

    pub fn usage_types(&self) -> Vec<String> {
        self.distinct(|o| &o.usage_type)
    }

    fn distinct<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&Offering) -> &String,
    {
        let set: BTreeSet<&String> = self.offerings.iter().map(field).collect();
        set.into_iter().cloned().collect()
    }
}

//! Seeding configuration: target counts, fan-out ranges and presets.
//!
//! A configuration is always built from a [`Preset`]; YAML files overlay
//! the preset key by key, so a file only has to name what it changes:
//!
//! ```yaml
//! products: 20000
//! batch_size: 2000
//! sales_order_items_per_order: { min: 2, max: 6 }
//! product_prices_per_product: 4
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Config file is not a key/value mapping
    #[error("Config file must be a YAML mapping of setting names to values")]
    NotAMapping,

    /// Key in the config file is not a known setting
    #[error("Unknown config setting '{0}'")]
    UnknownSetting(String),

    /// Setting has a value that cannot be used
    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ============================================================================
// Fan-out
// ============================================================================

/// Inclusive range of dependent rows generated per parent row.
///
/// Generators draw uniformly from `min..=max`. For many-to-many links the
/// draw is further capped by the size of the referenced pool, so the range
/// is an upper bound rather than a guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FanOutRepr")]
pub struct FanOut {
    pub min: u32,
    pub max: u32,
}

/// YAML accepts either `3` (exactly three) or `{ min: 1, max: 3 }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FanOutRepr {
    Exact(u32),
    Range { min: u32, max: u32 },
}

impl From<FanOutRepr> for FanOut {
    fn from(repr: FanOutRepr) -> Self {
        match repr {
            FanOutRepr::Exact(n) => FanOut::exact(n),
            FanOutRepr::Range { min, max } => FanOut { min, max },
        }
    }
}

impl FanOut {
    pub const fn range(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub const fn exact(n: u32) -> Self {
        Self { min: n, max: n }
    }

    /// Expected number of rows per parent.
    pub fn mean(&self) -> f64 {
        (f64::from(self.min) + f64::from(self.max)) / 2.0
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("min ({}) is greater than max ({})", self.min, self.max),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for FanOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Named starting points for a seeding configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// ~500K products, ~2M customers, ~20M sales orders.
    Default,
    /// Thousands of rows, for development and tests.
    Small,
}

impl Preset {
    pub fn config(self) -> SeedConfig {
        match self {
            Preset::Default => SeedConfig::default_preset(),
            Preset::Small => SeedConfig::small(),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preset::Default => write!(f, "default"),
            Preset::Small => write!(f, "small"),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "d" => Ok(Preset::Default),
            "small" | "s" => Ok(Preset::Small),
            _ => Err(format!("Unknown preset: {s}")),
        }
    }
}

// ============================================================================
// SeedConfig
// ============================================================================

/// Target record counts and fan-out ranges for one seeding run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    // Master data
    pub categories: u64,
    pub suppliers: u64,
    pub warehouses: u64,
    /// Share of categories generated as roots (no parent).
    pub root_category_fraction: f64,

    // Products and their fan-outs
    pub products: u64,
    pub product_categories_per_product: FanOut,
    pub supplier_products_per_product: FanOut,
    pub product_prices_per_product: FanOut,
    pub product_costs_per_product: FanOut,

    // Customers
    pub customers: u64,
    pub customer_addresses_per_customer: FanOut,

    // Sales
    pub sales_orders: u64,
    pub sales_order_items_per_order: FanOut,
    pub sales_order_payments_per_order: FanOut,

    // Purchasing
    pub purchase_orders: u64,
    pub purchase_order_items_per_order: FanOut,
    pub purchase_order_receipts_per_item: FanOut,

    // Inventory
    pub inventory_records_per_product: FanOut,
    pub inventory_transactions_per_product: FanOut,

    /// Maximum rows per bulk-insert call.
    pub batch_size: usize,
    /// RNG seed; the same seed and config reproduce the same dataset.
    pub seed: u64,
    /// Interleave generation and insertion per batch instead of per phase.
    pub streaming: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self::default_preset()
    }
}

impl SeedConfig {
    /// Large configuration: ~500K products, ~2M customers, ~20M sales orders.
    pub fn default_preset() -> Self {
        Self {
            categories: 1_000,
            suppliers: 5_000,
            warehouses: 500,
            root_category_fraction: 0.2,

            products: 500_000,
            product_categories_per_product: FanOut::range(1, 3),
            supplier_products_per_product: FanOut::range(1, 4),
            product_prices_per_product: FanOut::exact(3),
            product_costs_per_product: FanOut::exact(3),

            customers: 2_000_000,
            customer_addresses_per_customer: FanOut::range(1, 3),

            // ~60M line items
            sales_orders: 20_000_000,
            sales_order_items_per_order: FanOut::range(1, 10),
            sales_order_payments_per_order: FanOut::range(1, 2),

            // ~5M line items (bulk orders)
            purchase_orders: 100_000,
            purchase_order_items_per_order: FanOut::range(10, 100),
            purchase_order_receipts_per_item: FanOut::range(1, 2),

            inventory_records_per_product: FanOut::range(1, 3),
            inventory_transactions_per_product: FanOut::exact(10),

            batch_size: 5_000,
            seed: 42,
            streaming: false,
        }
    }

    /// Development configuration in the thousands of rows.
    pub fn small() -> Self {
        Self {
            categories: 100,
            suppliers: 500,
            warehouses: 50,

            products: 5_000,
            product_prices_per_product: FanOut::exact(2),
            product_costs_per_product: FanOut::exact(2),

            customers: 10_000,
            sales_orders: 100_000,
            purchase_orders: 1_000,

            inventory_transactions_per_product: FanOut::exact(5),

            batch_size: 1_000,
            ..Self::default_preset()
        }
    }

    /// Parse a YAML overlay on top of `base`.
    pub fn from_yaml_with_base(yaml: &str, base: SeedConfig) -> Result<Self, ConfigError> {
        let overlay: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let mut merged = serde_yaml::to_value(&base)?;

        match overlay {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Mapping(entries) => {
                let target = merged.as_mapping_mut().ok_or(ConfigError::NotAMapping)?;
                for (key, value) in entries {
                    let name = key.as_str().map(str::to_string).unwrap_or_default();
                    match target.get_mut(&key) {
                        Some(slot) => merge_value(slot, value),
                        None => return Err(ConfigError::UnknownSetting(name)),
                    }
                }
            }
            _ => return Err(ConfigError::NotAMapping),
        }

        let config: SeedConfig = serde_yaml::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML overlay file on top of `base`.
    pub fn from_file_with_base<P: AsRef<Path>>(
        path: P,
        base: SeedConfig,
    ) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_with_base(&content, base)
    }

    /// Reject settings no run could make sense of.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.root_category_fraction > 0.0 && self.root_category_fraction <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "root_category_fraction",
                reason: format!("{} is outside (0, 1]", self.root_category_fraction),
            });
        }
        for (field, fan_out) in self.fan_outs() {
            fan_out.validate(field)?;
        }
        Ok(())
    }

    fn fan_outs(&self) -> [(&'static str, FanOut); 11] {
        [
            (
                "product_categories_per_product",
                self.product_categories_per_product,
            ),
            (
                "supplier_products_per_product",
                self.supplier_products_per_product,
            ),
            (
                "product_prices_per_product",
                self.product_prices_per_product,
            ),
            ("product_costs_per_product", self.product_costs_per_product),
            (
                "customer_addresses_per_customer",
                self.customer_addresses_per_customer,
            ),
            (
                "sales_order_items_per_order",
                self.sales_order_items_per_order,
            ),
            (
                "sales_order_payments_per_order",
                self.sales_order_payments_per_order,
            ),
            (
                "purchase_order_items_per_order",
                self.purchase_order_items_per_order,
            ),
            (
                "purchase_order_receipts_per_item",
                self.purchase_order_receipts_per_item,
            ),
            (
                "inventory_records_per_product",
                self.inventory_records_per_product,
            ),
            (
                "inventory_transactions_per_product",
                self.inventory_transactions_per_product,
            ),
        ]
    }

    /// Estimated row count per table, in seeding order.
    pub fn estimate_by_table(&self) -> Vec<(&'static str, u64)> {
        let fan = |parents: u64, fan_out: FanOut| (parents as f64 * fan_out.mean()).round() as u64;
        let po_items = fan(self.purchase_orders, self.purchase_order_items_per_order);

        vec![
            ("categories", self.categories),
            ("suppliers", self.suppliers),
            ("warehouses", self.warehouses),
            ("products", self.products),
            (
                "product_categories",
                fan(self.products, self.product_categories_per_product),
            ),
            (
                "product_prices",
                fan(self.products, self.product_prices_per_product),
            ),
            (
                "product_costs",
                fan(self.products, self.product_costs_per_product),
            ),
            (
                "supplier_products",
                fan(self.products, self.supplier_products_per_product),
            ),
            ("customers", self.customers),
            (
                "customer_addresses",
                fan(self.customers, self.customer_addresses_per_customer),
            ),
            ("sales_orders", self.sales_orders),
            (
                "sales_order_items",
                fan(self.sales_orders, self.sales_order_items_per_order),
            ),
            (
                "sales_order_payments",
                fan(self.sales_orders, self.sales_order_payments_per_order),
            ),
            ("purchase_orders", self.purchase_orders),
            ("purchase_order_items", po_items),
            (
                "purchase_order_receipts",
                fan(po_items, self.purchase_order_receipts_per_item),
            ),
            (
                "inventory",
                fan(self.products, self.inventory_records_per_product),
            ),
            (
                "inventory_transactions",
                fan(self.products, self.inventory_transactions_per_product),
            ),
        ]
    }

    /// Estimated total number of rows across all tables.
    pub fn total_records_estimate(&self) -> u64 {
        self.estimate_by_table().iter().map(|(_, n)| n).sum()
    }
}

/// Overlay `value` onto `slot`, descending into nested mappings.
fn merge_value(slot: &mut serde_yaml::Value, value: serde_yaml::Value) {
    match (slot, value) {
        (serde_yaml::Value::Mapping(existing), serde_yaml::Value::Mapping(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(inner) => merge_value(inner, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_presets_validate() {
        SeedConfig::default_preset().validate().unwrap();
        SeedConfig::small().validate().unwrap();
    }

    #[test]
    fn test_small_preset_counts() {
        let config = Preset::Small.config();
        assert_eq!(config.products, 5_000);
        assert_eq!(config.customers, 10_000);
        assert_eq!(config.sales_orders, 100_000);
        assert_eq!(config.purchase_orders, 1_000);
        assert_eq!(config.batch_size, 1_000);
        // Inherited from the default preset
        assert_eq!(config.root_category_fraction, 0.2);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("small".parse::<Preset>().unwrap(), Preset::Small);
        assert_eq!("DEFAULT".parse::<Preset>().unwrap(), Preset::Default);
        assert_eq!("s".parse::<Preset>().unwrap(), Preset::Small);
        assert!("huge".parse::<Preset>().is_err());
    }

    #[test]
    fn test_yaml_overlay() {
        let yaml = r#"
products: 250
batch_size: 50
product_prices_per_product: 4
sales_order_items_per_order: { min: 2, max: 6 }
inventory_records_per_product:
  max: 5
"#;
        let config = SeedConfig::from_yaml_with_base(yaml, SeedConfig::small()).unwrap();

        assert_eq!(config.products, 250);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.product_prices_per_product, FanOut::exact(4));
        assert_eq!(config.sales_order_items_per_order, FanOut::range(2, 6));
        assert_eq!(config.inventory_records_per_product, FanOut::range(1, 5));
        assert_eq!(config.customers, 10_000);
    }

    #[test]
    fn test_empty_yaml_keeps_base() {
        let config = SeedConfig::from_yaml_with_base("", SeedConfig::small()).unwrap();
        assert_eq!(config, SeedConfig::small());
    }

    #[test]
    fn test_unknown_setting_rejected() {
        let result = SeedConfig::from_yaml_with_base("prodcts: 5", SeedConfig::small());
        assert!(matches!(result, Err(ConfigError::UnknownSetting(name)) if name == "prodcts"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = SeedConfig::from_yaml_with_base("batch_size: 0", SeedConfig::small());
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "batch_size",
                ..
            })
        ));

        let result = SeedConfig::from_yaml_with_base(
            "customer_addresses_per_customer: { min: 4, max: 2 }",
            SeedConfig::small(),
        );
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "customer_addresses_per_customer",
                ..
            })
        ));

        let result =
            SeedConfig::from_yaml_with_base("root_category_fraction: 0.0", SeedConfig::small());
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "customers: 12\nstreaming: true").unwrap();

        let config = SeedConfig::from_file_with_base(file.path(), SeedConfig::small()).unwrap();
        assert_eq!(config.customers, 12);
        assert!(config.streaming);
    }

    #[test]
    fn test_total_records_estimate() {
        let config = SeedConfig {
            categories: 10,
            suppliers: 5,
            warehouses: 2,
            products: 100,
            product_categories_per_product: FanOut::exact(2),
            supplier_products_per_product: FanOut::exact(1),
            product_prices_per_product: FanOut::exact(3),
            product_costs_per_product: FanOut::exact(3),
            customers: 50,
            customer_addresses_per_customer: FanOut::range(1, 3),
            sales_orders: 10,
            sales_order_items_per_order: FanOut::exact(4),
            sales_order_payments_per_order: FanOut::exact(1),
            purchase_orders: 2,
            purchase_order_items_per_order: FanOut::exact(10),
            purchase_order_receipts_per_item: FanOut::exact(2),
            inventory_records_per_product: FanOut::exact(1),
            inventory_transactions_per_product: FanOut::exact(2),
            ..SeedConfig::small()
        };

        // 17 master + 100 products + 900 product fan-outs + 150 customer rows
        // + 60 sales rows + 62 purchasing rows + 300 inventory rows
        assert_eq!(config.total_records_estimate(), 1_589);
        assert_eq!(config.estimate_by_table().len(), 18);
    }

    #[test]
    fn test_fan_out_display() {
        assert_eq!(FanOut::exact(3).to_string(), "3");
        assert_eq!(FanOut::range(1, 10).to_string(), "1-10");
        assert_eq!(FanOut::range(1, 3).mean(), 2.0);
    }
}

//! Descriptors for every seeded table, in seeding order.
//!
//! Column order here is the value order of the rows the generators emit.

use seeder_core::ColumnType::{Bool, Int4, Numeric, Text, TimestampTz, Uuid};
use seeder_core::{ColumnSpec as C, TableSpec};

// Phase 1: master data

pub const CATEGORIES: TableSpec = TableSpec::new(
    "categories",
    &[
        C::new("id", Uuid),
        C::new("name", Text),
        C::new("description", Text),
        C::new("parent_id", Uuid),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
        C::new("deleted_at", TimestampTz),
    ],
);

pub const SUPPLIERS: TableSpec = TableSpec::new(
    "suppliers",
    &[
        C::new("id", Uuid),
        C::new("name", Text),
        C::new("contact_name", Text),
        C::new("email", Text),
        C::new("phone", Text),
        C::new("address", Text),
        C::new("city", Text),
        C::new("state", Text),
        C::new("postal_code", Text),
        C::new("country", Text),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
        C::new("deleted_at", TimestampTz),
    ],
);

pub const WAREHOUSES: TableSpec = TableSpec::new(
    "warehouses",
    &[
        C::new("id", Uuid),
        C::new("name", Text),
        C::new("code", Text),
        C::new("address", Text),
        C::new("city", Text),
        C::new("state", Text),
        C::new("postal_code", Text),
        C::new("country", Text),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
        C::new("deleted_at", TimestampTz),
    ],
);

// Phase 2: products

pub const PRODUCTS: TableSpec = TableSpec::new(
    "products",
    &[
        C::new("id", Uuid),
        C::new("sku", Text),
        C::new("name", Text),
        C::new("description", Text),
        C::new("weight", Numeric),
        C::new("dimensions", Text),
        C::new("is_active", Bool),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
        C::new("deleted_at", TimestampTz),
    ],
);

pub const PRODUCT_CATEGORIES: TableSpec = TableSpec::new(
    "product_categories",
    &[
        C::new("id", Uuid),
        C::new("product_id", Uuid),
        C::new("category_id", Uuid),
        C::new("created_at", TimestampTz),
    ],
);

pub const PRODUCT_PRICES: TableSpec = TableSpec::new(
    "product_prices",
    &[
        C::new("id", Uuid),
        C::new("product_id", Uuid),
        C::new("price", Numeric),
        C::new("currency", Text),
        C::new("effective_date", TimestampTz),
        C::new("end_date", TimestampTz),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
    ],
);

pub const PRODUCT_COSTS: TableSpec = TableSpec::new(
    "product_costs",
    &[
        C::new("id", Uuid),
        C::new("product_id", Uuid),
        C::new("cost", Numeric),
        C::new("currency", Text),
        C::new("effective_date", TimestampTz),
        C::new("end_date", TimestampTz),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
    ],
);

pub const SUPPLIER_PRODUCTS: TableSpec = TableSpec::new(
    "supplier_products",
    &[
        C::new("id", Uuid),
        C::new("supplier_id", Uuid),
        C::new("product_id", Uuid),
        C::new("supplier_sku", Text),
        C::new("cost", Numeric),
        C::new("currency", Text),
        C::new("lead_time_days", Int4),
        C::new("minimum_order_quantity", Int4),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
    ],
);

// Phase 3: customers

pub const CUSTOMERS: TableSpec = TableSpec::new(
    "customers",
    &[
        C::new("id", Uuid),
        C::new("first_name", Text),
        C::new("last_name", Text),
        C::new("email", Text),
        C::new("phone", Text),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
        C::new("deleted_at", TimestampTz),
    ],
);

pub const CUSTOMER_ADDRESSES: TableSpec = TableSpec::new(
    "customer_addresses",
    &[
        C::new("id", Uuid),
        C::new("customer_id", Uuid),
        C::new("address_type", Text),
        C::new("address_line1", Text),
        C::new("address_line2", Text),
        C::new("city", Text),
        C::new("state", Text),
        C::new("postal_code", Text),
        C::new("country", Text),
        C::new("is_default", Bool),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
    ],
);

// Phase 4: sales

pub const SALES_ORDERS: TableSpec = TableSpec::new(
    "sales_orders",
    &[
        C::new("id", Uuid),
        C::new("order_number", Text),
        C::new("customer_id", Uuid),
        C::new("order_date", TimestampTz),
        C::new("status", Text),
        C::new("subtotal", Numeric),
        C::new("tax", Numeric),
        C::new("shipping", Numeric),
        C::new("total", Numeric),
        C::new("notes", Text),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
        C::new("deleted_at", TimestampTz),
    ],
);

pub const SALES_ORDER_ITEMS: TableSpec = TableSpec::new(
    "sales_order_items",
    &[
        C::new("id", Uuid),
        C::new("sales_order_id", Uuid),
        C::new("product_id", Uuid),
        C::new("quantity", Int4),
        C::new("unit_price", Numeric),
        C::new("discount", Numeric),
        C::new("tax", Numeric),
        C::new("total", Numeric),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
    ],
);

pub const SALES_ORDER_PAYMENTS: TableSpec = TableSpec::new(
    "sales_order_payments",
    &[
        C::new("id", Uuid),
        C::new("sales_order_id", Uuid),
        C::new("payment_method", Text),
        C::new("amount", Numeric),
        C::new("transaction_id", Text),
        C::new("status", Text),
        C::new("payment_date", TimestampTz),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
    ],
);

// Phase 5: purchasing

pub const PURCHASE_ORDERS: TableSpec = TableSpec::new(
    "purchase_orders",
    &[
        C::new("id", Uuid),
        C::new("po_number", Text),
        C::new("supplier_id", Uuid),
        C::new("warehouse_id", Uuid),
        C::new("order_date", TimestampTz),
        C::new("expected_date", TimestampTz),
        C::new("status", Text),
        C::new("subtotal", Numeric),
        C::new("tax", Numeric),
        C::new("shipping", Numeric),
        C::new("total", Numeric),
        C::new("notes", Text),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
        C::new("deleted_at", TimestampTz),
    ],
);

pub const PURCHASE_ORDER_ITEMS: TableSpec = TableSpec::new(
    "purchase_order_items",
    &[
        C::new("id", Uuid),
        C::new("purchase_order_id", Uuid),
        C::new("product_id", Uuid),
        C::new("quantity", Int4),
        C::new("unit_cost", Numeric),
        C::new("tax", Numeric),
        C::new("total", Numeric),
        C::new("received_quantity", Int4),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
    ],
);

pub const PURCHASE_ORDER_RECEIPTS: TableSpec = TableSpec::new(
    "purchase_order_receipts",
    &[
        C::new("id", Uuid),
        C::new("purchase_order_id", Uuid),
        C::new("purchase_order_item_id", Uuid),
        C::new("quantity_received", Int4),
        C::new("received_date", TimestampTz),
        C::new("received_by", Text),
        C::new("notes", Text),
        C::new("created_at", TimestampTz),
    ],
);

// Phase 6: inventory

pub const INVENTORY: TableSpec = TableSpec::new(
    "inventory",
    &[
        C::new("id", Uuid),
        C::new("product_id", Uuid),
        C::new("warehouse_id", Uuid),
        C::new("quantity", Int4),
        C::new("reserved_quantity", Int4),
        C::new("reorder_point", Int4),
        C::new("reorder_quantity", Int4),
        C::new("created_at", TimestampTz),
        C::new("updated_at", TimestampTz),
    ],
);

pub const INVENTORY_TRANSACTIONS: TableSpec = TableSpec::new(
    "inventory_transactions",
    &[
        C::new("id", Uuid),
        C::new("product_id", Uuid),
        C::new("warehouse_id", Uuid),
        C::new("transaction_type", Text),
        C::new("quantity", Int4),
        C::new("reference_id", Uuid),
        C::new("reference_type", Text),
        C::new("notes", Text),
        C::new("created_at", TimestampTz),
    ],
);

/// Every seeded table in the order the phases load them.
pub const ALL: [TableSpec; 18] = [
    CATEGORIES,
    SUPPLIERS,
    WAREHOUSES,
    PRODUCTS,
    PRODUCT_CATEGORIES,
    PRODUCT_PRICES,
    PRODUCT_COSTS,
    SUPPLIER_PRODUCTS,
    CUSTOMERS,
    CUSTOMER_ADDRESSES,
    SALES_ORDERS,
    SALES_ORDER_ITEMS,
    SALES_ORDER_PAYMENTS,
    PURCHASE_ORDERS,
    PURCHASE_ORDER_ITEMS,
    PURCHASE_ORDER_RECEIPTS,
    INVENTORY,
    INVENTORY_TRANSACTIONS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_table_has_leading_uuid_id() {
        for table in ALL {
            assert_eq!(table.columns[0].name, "id", "{table}");
            assert_eq!(table.columns[0].column_type, Uuid, "{table}");
        }
    }

    #[test]
    fn test_table_names_unique() {
        let names: HashSet<_> = ALL.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_estimate_covers_every_table() {
        let config = seeder_core::SeedConfig::small();
        let estimated: Vec<_> = config.estimate_by_table().iter().map(|(n, _)| *n).collect();
        let tables: Vec<_> = ALL.iter().map(|t| t.name).collect();
        assert_eq!(estimated, tables);
    }
}

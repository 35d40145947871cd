//! Phase 6: stock levels and inventory movements.

use super::distinct_picks;
use crate::context::GenContext;
use crate::error::GeneratorError;
use crate::id_map::{EntityKind, IdMap, OrderKind};
use crate::tables;

use fake::faker::lorem::en::Sentence;
use rand::Rng;
use seeder_core::{FanOut, Row};
use uuid::Uuid;

const TRANSACTION_TYPES: &[&str] = &[
    "purchase",
    "sale",
    "adjustment",
    "return",
    "transfer",
    "damage",
];

/// A product stocked in a warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLocation {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
}

/// Stock rows for each product in distinct warehouses.
///
/// The returned locations are grouped by product, in `products` order.
pub fn generate_inventory(
    ctx: &mut GenContext,
    ids: &IdMap,
    products: &[Uuid],
    fan_out: FanOut,
) -> Result<(Vec<Row>, Vec<StockLocation>), GeneratorError> {
    if products.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }
    let warehouses = ids.require(EntityKind::Warehouse, tables::INVENTORY.name)?;
    let now = ctx.now();
    let capacity = products.len() * fan_out.max as usize;
    let mut rows = Vec::with_capacity(capacity);
    let mut locations = Vec::with_capacity(capacity);

    for &product_id in products {
        let requested = ctx.fan_out(fan_out);
        for warehouse_id in distinct_picks(ctx, warehouses, requested) {
            let quantity = ctx.int(0, 10_000);
            let reserved = ctx.int(0, quantity / 10);

            rows.push(vec![
                ctx.new_id().into(),
                product_id.into(),
                warehouse_id.into(),
                quantity.into(),
                reserved.into(),
                ctx.int(50, 500).into(),
                ctx.int(100, 1_000).into(),
                now.into(),
                now.into(),
            ]);
            locations.push(StockLocation {
                product_id,
                warehouse_id,
            });
        }
    }

    Ok((rows, locations))
}

/// The order a movement of `transaction_type` points back to, if any.
fn reference_for(
    ctx: &mut GenContext,
    ids: &IdMap,
    transaction_type: &str,
) -> (Option<Uuid>, Option<&'static str>) {
    let (kind, label) = match transaction_type {
        "purchase" => (OrderKind::Purchase, "purchase_order"),
        "sale" | "return" => (OrderKind::Sales, "sales_order"),
        _ => return (None, None),
    };
    let sample = ids.order_sample(kind);
    if sample.is_empty() {
        return (None, None);
    }
    (Some(sample[ctx.rng().gen_range(0..sample.len())]), Some(label))
}

/// Backdated stock movements for every stocked product.
///
/// Each movement happens in one of the warehouses the product is stocked
/// in. Sales and damage remove stock and carry a negative quantity.
pub fn generate_inventory_transactions(
    ctx: &mut GenContext,
    ids: &IdMap,
    locations: &[StockLocation],
    fan_out: FanOut,
) -> Vec<Row> {
    let mut rows = Vec::with_capacity(locations.len() * fan_out.max as usize);

    for stocked in locations.chunk_by(|a, b| a.product_id == b.product_id) {
        let count = ctx.fan_out(fan_out);
        for _ in 0..count {
            let location = *ctx.choose(stocked);
            let transaction_type = *ctx.choose(TRANSACTION_TYPES);
            let mut quantity = ctx.int(1, 100);
            if matches!(transaction_type, "sale" | "damage") {
                quantity = -quantity;
            }
            let (reference_id, reference_type) = reference_for(ctx, ids, transaction_type);
            let notes: String = ctx.fake(Sentence(6..10));

            rows.push(vec![
                ctx.new_id().into(),
                location.product_id.into(),
                location.warehouse_id.into(),
                transaction_type.into(),
                quantity.into(),
                reference_id.into(),
                reference_type.into(),
                notes.into(),
                ctx.days_ago(365).into(),
            ]);
        }
    }

    rows
}

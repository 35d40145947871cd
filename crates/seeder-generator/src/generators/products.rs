//! Phase 2: products and their category links, price and cost history, and
//! supplier links.

use super::distinct_picks;
use crate::context::GenContext;
use crate::error::GeneratorError;
use crate::id_map::{EntityKind, IdMap};
use crate::tables;

use chrono::Duration;
use fake::faker::lorem::en::Paragraph;
use rand::Rng;
use rust_decimal::Decimal;
use seeder_core::{FanOut, Row, SqlValue};
use std::ops::Range;
use uuid::Uuid;

/// Days between consecutive price or cost history records.
pub const HISTORY_STEP_DAYS: i64 = 30;

const CURRENCY: &str = "USD";

const ADJECTIVES: &[&str] = &[
    "Ergonomic",
    "Rustic",
    "Sleek",
    "Compact",
    "Durable",
    "Portable",
    "Premium",
    "Smart",
    "Classic",
    "Modern",
    "Lightweight",
    "Heavy-Duty",
    "Wireless",
    "Handcrafted",
    "Deluxe",
];

const MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Cotton", "Leather", "Plastic", "Bamboo", "Granite", "Aluminum", "Ceramic",
    "Glass", "Wool", "Carbon",
];

const NOUNS: &[&str] = &[
    "Chair",
    "Lamp",
    "Keyboard",
    "Backpack",
    "Bottle",
    "Speaker",
    "Table",
    "Jacket",
    "Watch",
    "Kettle",
    "Headphones",
    "Blender",
    "Notebook",
    "Drill",
    "Tent",
    "Mug",
    "Monitor",
    "Shoes",
];

fn product_name(ctx: &mut GenContext) -> String {
    let adjective = *ctx.choose(ADJECTIVES);
    let material = *ctx.choose(MATERIALS);
    let noun = *ctx.choose(NOUNS);
    format!("{adjective} {material} {noun}")
}

/// Generate products for `range`; SKUs are `SKU-000000001`, ... from the
/// global index so they stay unique across chunks.
pub fn generate_products(ctx: &mut GenContext, ids: &mut IdMap, range: Range<u64>) -> Vec<Row> {
    let mut rows = Vec::with_capacity((range.end - range.start) as usize);
    let now = ctx.now();

    for index in range {
        let id = ctx.new_id();
        ids.publish(EntityKind::Product, id);

        let description: String = ctx.fake(Paragraph(2..4));
        let weight = ctx.cents(1, 10_000);
        let dimensions = format!(
            "{}x{}x{} cm",
            ctx.int(1, 100),
            ctx.int(1, 100),
            ctx.int(1, 100)
        );

        rows.push(vec![
            id.into(),
            format!("SKU-{:09}", index + 1).into(),
            product_name(ctx).into(),
            description.into(),
            weight.into(),
            dimensions.into(),
            true.into(),
            now.into(),
            now.into(),
            SqlValue::Null,
        ]);
    }

    rows
}

/// Link each product to distinct categories.
pub fn generate_product_categories(
    ctx: &mut GenContext,
    ids: &IdMap,
    products: &[Uuid],
    fan_out: FanOut,
) -> Result<Vec<Row>, GeneratorError> {
    if products.is_empty() {
        return Ok(Vec::new());
    }
    let categories = ids.require(EntityKind::Category, tables::PRODUCT_CATEGORIES.name)?;
    let now = ctx.now();
    let mut rows = Vec::with_capacity(products.len() * fan_out.max as usize);

    for &product_id in products {
        let requested = ctx.fan_out(fan_out);
        for category_id in distinct_picks(ctx, categories, requested) {
            rows.push(vec![
                ctx.new_id().into(),
                product_id.into(),
                category_id.into(),
                now.into(),
            ]);
        }
    }

    Ok(rows)
}

/// Price or cost history for one product, newest first.
///
/// Record `j` takes effect `j * HISTORY_STEP_DAYS` days before now. The
/// newest record is open-ended; every older one ends one second before the
/// next newer record takes effect.
fn history_rows(
    ctx: &mut GenContext,
    product_id: Uuid,
    steps: usize,
    base: Decimal,
    variation_pct: (i64, i64),
) -> Vec<Row> {
    let now = ctx.now();
    let step = Duration::days(HISTORY_STEP_DAYS);
    let mut rows = Vec::with_capacity(steps);
    let mut newer_effective = None;

    for j in 0..steps {
        let effective = now - step * j as i32;
        let end_date = newer_effective.map(|newer| newer - Duration::seconds(1));
        newer_effective = Some(effective);

        let factor = Decimal::new(ctx.rng().gen_range(variation_pct.0..=variation_pct.1), 2);
        let amount = (base * factor).round_dp(2);

        rows.push(vec![
            ctx.new_id().into(),
            product_id.into(),
            amount.into(),
            CURRENCY.into(),
            effective.into(),
            end_date.into(),
            now.into(),
            now.into(),
        ]);
    }

    rows
}

/// Price history: base 5.00..=500.00, each record within +/-20% of base.
pub fn generate_product_prices(
    ctx: &mut GenContext,
    products: &[Uuid],
    fan_out: FanOut,
) -> Vec<Row> {
    let mut rows = Vec::with_capacity(products.len() * fan_out.max as usize);
    for &product_id in products {
        let base = ctx.cents(500, 50_000);
        let steps = ctx.fan_out(fan_out);
        rows.extend(history_rows(ctx, product_id, steps, base, (80, 120)));
    }
    rows
}

/// Cost history: base 2.00..=300.00, each record within +/-15% of base.
pub fn generate_product_costs(
    ctx: &mut GenContext,
    products: &[Uuid],
    fan_out: FanOut,
) -> Vec<Row> {
    let mut rows = Vec::with_capacity(products.len() * fan_out.max as usize);
    for &product_id in products {
        let base = ctx.cents(200, 30_000);
        let steps = ctx.fan_out(fan_out);
        rows.extend(history_rows(ctx, product_id, steps, base, (85, 115)));
    }
    rows
}

/// Link each product to distinct suppliers with supplier-specific terms.
pub fn generate_supplier_products(
    ctx: &mut GenContext,
    ids: &IdMap,
    products: &[Uuid],
    fan_out: FanOut,
) -> Result<Vec<Row>, GeneratorError> {
    if products.is_empty() {
        return Ok(Vec::new());
    }
    let suppliers = ids.require(EntityKind::Supplier, tables::SUPPLIER_PRODUCTS.name)?;
    let now = ctx.now();
    let mut rows = Vec::with_capacity(products.len() * fan_out.max as usize);

    for &product_id in products {
        let requested = ctx.fan_out(fan_out);
        for supplier_id in distinct_picks(ctx, suppliers, requested) {
            let prefix = &supplier_id.simple().to_string()[..8];
            let supplier_sku = format!("SUP-{}-{}", prefix, ctx.int(1000, 9999));
            rows.push(vec![
                ctx.new_id().into(),
                supplier_id.into(),
                product_id.into(),
                supplier_sku.into(),
                ctx.cents(200, 30_000).into(),
                CURRENCY.into(),
                ctx.int(1, 60).into(),
                ctx.int(1, 100).into(),
                now.into(),
                now.into(),
            ]);
        }
    }

    Ok(rows)
}

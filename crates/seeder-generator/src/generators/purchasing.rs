//! Phase 5: purchase orders, line items and receipts.

use super::distinct_picks;
use crate::context::GenContext;
use crate::error::GeneratorError;
use crate::id_map::{EntityKind, IdMap, OrderKind};
use crate::tables;

use chrono::{DateTime, Duration, Utc};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use rust_decimal::Decimal;
use seeder_core::{FanOut, Row, SqlValue};
use std::ops::Range;
use uuid::Uuid;

/// Tax rate on purchase order lines, in percent.
pub const PURCHASE_TAX_PERCENT: i64 = 5;

/// Flat freight charged on purchase orders with items, in cents.
pub const PURCHASE_SHIPPING_CENTS: i64 = 4_999;

const PO_STATUSES: &[&str] = &[
    "pending",
    "confirmed",
    "partially_received",
    "received",
    "cancelled",
];

/// A purchase order whose totals are filled in once its items exist.
#[derive(Debug, Clone)]
pub struct PurchaseOrderDraft {
    pub id: Uuid,
    pub po_number: String,
    pub supplier_id: Uuid,
    pub warehouse_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub expected_date: DateTime<Utc>,
    pub status: &'static str,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub notes: String,
    pub item_count: usize,
}

impl PurchaseOrderDraft {
    fn apply_totals(&mut self, subtotal: Decimal, tax: Decimal, item_count: usize) {
        self.item_count = item_count;
        self.subtotal = subtotal;
        self.tax = tax;
        self.shipping = if item_count > 0 {
            Decimal::new(PURCHASE_SHIPPING_CENTS, 2)
        } else {
            Decimal::ZERO
        };
        self.total = self.subtotal + self.tax + self.shipping;
    }

    /// Row in `purchase_orders` column order.
    pub fn to_row(&self, now: DateTime<Utc>) -> Row {
        vec![
            self.id.into(),
            self.po_number.as_str().into(),
            self.supplier_id.into(),
            self.warehouse_id.into(),
            self.order_date.into(),
            self.expected_date.into(),
            self.status.into(),
            self.subtotal.into(),
            self.tax.into(),
            self.shipping.into(),
            self.total.into(),
            self.notes.as_str().into(),
            now.into(),
            now.into(),
            SqlValue::Null,
        ]
    }
}

/// A generated line item together with the order it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseItemRef {
    pub item_id: Uuid,
    pub order_id: Uuid,
    pub quantity: i32,
    pub received_quantity: i32,
    pub order_date: DateTime<Utc>,
}

/// Purchase order drafts for `range`; PO numbers are `PO-0000000001`, ...
pub fn generate_purchase_orders(
    ctx: &mut GenContext,
    ids: &mut IdMap,
    range: Range<u64>,
) -> Result<Vec<PurchaseOrderDraft>, GeneratorError> {
    let mut drafts = Vec::with_capacity((range.end - range.start) as usize);
    let table = tables::PURCHASE_ORDERS.name;

    for index in range {
        let supplier_id = ids.pick(EntityKind::Supplier, ctx.rng(), table)?;
        let warehouse_id = ids.pick(EntityKind::Warehouse, ctx.rng(), table)?;
        let id = ctx.new_id();
        ids.record_order(OrderKind::Purchase, id, ctx.rng());

        let order_date = ctx.days_ago(365);
        let lead_days = ctx.int(7, 60);

        drafts.push(PurchaseOrderDraft {
            id,
            po_number: format!("PO-{:010}", index + 1),
            supplier_id,
            warehouse_id,
            order_date,
            expected_date: order_date + Duration::days(lead_days.into()),
            status: *ctx.choose(PO_STATUSES),
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            shipping: Decimal::ZERO,
            total: Decimal::ZERO,
            notes: ctx.fake(Sentence(10..16)),
            item_count: 0,
        });
    }

    Ok(drafts)
}

/// Bulk line items for `orders`, no product repeated within an order.
///
/// Returns the item rows and a [`PurchaseItemRef`] per item so receipts can
/// name their real parent order. Order totals are set from the items.
pub fn generate_purchase_order_items(
    ctx: &mut GenContext,
    ids: &IdMap,
    orders: &mut [PurchaseOrderDraft],
    fan_out: FanOut,
) -> Result<(Vec<Row>, Vec<PurchaseItemRef>), GeneratorError> {
    if orders.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }
    let products = ids.require(EntityKind::Product, tables::PURCHASE_ORDER_ITEMS.name)?;
    let now = ctx.now();
    let tax_rate = Decimal::new(PURCHASE_TAX_PERCENT, 2);
    let capacity = orders.len() * fan_out.max as usize;
    let mut rows = Vec::with_capacity(capacity);
    let mut refs = Vec::with_capacity(capacity);

    for order in orders.iter_mut() {
        let requested = ctx.fan_out(fan_out);
        let picked = distinct_picks(ctx, products, requested);
        let mut subtotal = Decimal::ZERO;
        let mut order_tax = Decimal::ZERO;

        for &product_id in &picked {
            let item_id = ctx.new_id();
            let quantity = ctx.int(10, 1_000);
            let unit_cost = ctx.cents(200, 30_000);
            let net = unit_cost * Decimal::from(quantity);
            let tax = (net * tax_rate).round_dp(2);
            let received_quantity = if ctx.coin() {
                quantity
            } else {
                ctx.int(1, quantity)
            };

            subtotal += net;
            order_tax += tax;

            rows.push(vec![
                item_id.into(),
                order.id.into(),
                product_id.into(),
                quantity.into(),
                unit_cost.into(),
                tax.into(),
                (net + tax).into(),
                received_quantity.into(),
                now.into(),
                now.into(),
            ]);
            refs.push(PurchaseItemRef {
                item_id,
                order_id: order.id,
                quantity,
                received_quantity,
                order_date: order.order_date,
            });
        }

        order.apply_totals(subtotal, order_tax, picked.len());
    }

    Ok((rows, refs))
}

/// Split `received` units into `parts` positive deliveries.
fn split_quantity(received: i32, parts: usize) -> Vec<i32> {
    if parts == 0 {
        return Vec::new();
    }
    let parts_i32 = parts as i32;
    let base = received / parts_i32;
    let remainder = received % parts_i32;
    (0..parts_i32)
        .map(|k| base + i32::from(k < remainder))
        .collect()
}

/// Receipts for each item; the quantities of one item's receipts sum to
/// its received quantity and every receipt carries the item's own order.
pub fn generate_purchase_order_receipts(
    ctx: &mut GenContext,
    items: &[PurchaseItemRef],
    fan_out: FanOut,
) -> Vec<Row> {
    let now = ctx.now();
    let mut rows = Vec::with_capacity(items.len() * fan_out.max as usize);

    for item in items {
        let requested = ctx.fan_out(fan_out);
        let parts = requested.min(item.received_quantity.max(0) as usize);
        let mut received_at = item.order_date;

        for quantity in split_quantity(item.received_quantity, parts) {
            received_at = (received_at + Duration::days(ctx.int(1, 30).into())).min(now);
            let received_by: String = ctx.fake(Name());
            let notes: String = ctx.fake(Sentence(6..11));

            rows.push(vec![
                ctx.new_id().into(),
                item.order_id.into(),
                item.item_id.into(),
                quantity.into(),
                received_at.into(),
                received_by.into(),
                notes.into(),
                now.into(),
            ]);
        }
    }

    rows
}

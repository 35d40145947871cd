//! Phase 4: sales orders, line items and payments.
//!
//! Orders are produced as [`SalesOrderDraft`]s first. Item generation
//! derives the real totals and writes them back into the drafts, so the
//! order rows are inserted once with correct amounts.

use super::distinct_picks;
use crate::context::GenContext;
use crate::error::GeneratorError;
use crate::id_map::{EntityKind, IdMap, OrderKind};
use crate::tables;

use chrono::{DateTime, Duration, Utc};
use fake::faker::lorem::en::Sentence;
use rust_decimal::Decimal;
use seeder_core::{FanOut, Row, SqlValue};
use std::ops::Range;
use uuid::Uuid;

/// Tax rate on every line item, in percent.
pub const SALES_TAX_PERCENT: i64 = 8;

/// Flat shipping charged on orders that have at least one item, in cents.
pub const SALES_SHIPPING_CENTS: i64 = 999;

const ORDER_STATUSES: &[&str] = &[
    "pending",
    "confirmed",
    "processing",
    "shipped",
    "delivered",
    "cancelled",
];
const PAYMENT_METHODS: &[&str] = &[
    "credit_card",
    "debit_card",
    "paypal",
    "bank_transfer",
    "cash",
];
const PAYMENT_STATUSES: &[&str] = &["pending", "completed", "failed", "refunded"];

/// A sales order whose totals are filled in once its items exist.
#[derive(Debug, Clone)]
pub struct SalesOrderDraft {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub status: &'static str,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub notes: String,
    pub item_count: usize,
}

impl SalesOrderDraft {
    fn apply_totals(&mut self, subtotal: Decimal, tax: Decimal, item_count: usize) {
        self.item_count = item_count;
        self.subtotal = subtotal;
        self.tax = tax;
        self.shipping = if item_count > 0 {
            Decimal::new(SALES_SHIPPING_CENTS, 2)
        } else {
            Decimal::ZERO
        };
        self.total = self.subtotal + self.tax + self.shipping;
    }

    /// Row in `sales_orders` column order.
    pub fn to_row(&self, now: DateTime<Utc>) -> Row {
        vec![
            self.id.into(),
            self.order_number.as_str().into(),
            self.customer_id.into(),
            self.order_date.into(),
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

/// Order drafts for `range`, each placed by a random customer in the last
/// year. Order numbers are `SO-0000000001`, ... from the global index.
pub fn generate_sales_orders(
    ctx: &mut GenContext,
    ids: &mut IdMap,
    range: Range<u64>,
) -> Result<Vec<SalesOrderDraft>, GeneratorError> {
    let mut drafts = Vec::with_capacity((range.end - range.start) as usize);

    for index in range {
        let customer_id = ids.pick(EntityKind::Customer, ctx.rng(), tables::SALES_ORDERS.name)?;
        let id = ctx.new_id();
        ids.record_order(OrderKind::Sales, id, ctx.rng());

        drafts.push(SalesOrderDraft {
            id,
            order_number: format!("SO-{:010}", index + 1),
            customer_id,
            order_date: ctx.days_ago(365),
            status: *ctx.choose(ORDER_STATUSES),
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

/// Line items for `orders`, with no product repeated within an order.
///
/// Each item's tax is 8% of its net amount, rounded to cents. The order's
/// totals are then set from its items: subtotal is the sum of net amounts,
/// tax the sum of item taxes, and total adds flat shipping.
pub fn generate_sales_order_items(
    ctx: &mut GenContext,
    ids: &IdMap,
    orders: &mut [SalesOrderDraft],
    fan_out: FanOut,
) -> Result<Vec<Row>, GeneratorError> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }
    let products = ids.require(EntityKind::Product, tables::SALES_ORDER_ITEMS.name)?;
    let now = ctx.now();
    let tax_rate = Decimal::new(SALES_TAX_PERCENT, 2);
    let mut rows = Vec::with_capacity(orders.len() * fan_out.max as usize);

    for order in orders.iter_mut() {
        let requested = ctx.fan_out(fan_out);
        let picked = distinct_picks(ctx, products, requested);
        let mut subtotal = Decimal::ZERO;
        let mut order_tax = Decimal::ZERO;

        for &product_id in &picked {
            let quantity = ctx.int(1, 20);
            let unit_price = ctx.cents(500, 50_000);
            let gross = unit_price * Decimal::from(quantity);
            let discount = if ctx.coin() {
                ctx.cents(0, 2_000).min(gross)
            } else {
                Decimal::ZERO
            };
            let net = gross - discount;
            let tax = (net * tax_rate).round_dp(2);

            subtotal += net;
            order_tax += tax;

            rows.push(vec![
                ctx.new_id().into(),
                order.id.into(),
                product_id.into(),
                quantity.into(),
                unit_price.into(),
                discount.into(),
                tax.into(),
                (net + tax).into(),
                now.into(),
                now.into(),
            ]);
        }

        order.apply_totals(subtotal, order_tax, picked.len());
    }

    Ok(rows)
}

/// Split `total` into `parts` amounts that add up to it exactly.
fn split_amount(total: Decimal, parts: usize) -> Vec<Decimal> {
    if parts == 0 {
        return Vec::new();
    }
    let base = (total / Decimal::from(parts as u64)).round_dp(2);
    let mut amounts = vec![base; parts];
    amounts[parts - 1] = total - base * Decimal::from((parts - 1) as u64);
    amounts
}

/// Payments for each order; the amounts of one order sum to its total.
pub fn generate_sales_order_payments(
    ctx: &mut GenContext,
    orders: &[SalesOrderDraft],
    fan_out: FanOut,
) -> Vec<Row> {
    let now = ctx.now();
    let mut rows = Vec::with_capacity(orders.len() * fan_out.max as usize);

    for order in orders {
        let count = ctx.fan_out(fan_out);
        for amount in split_amount(order.total, count) {
            let transaction_id = format!("TXN-{}", &ctx.new_id().hyphenated().to_string()[..13]);
            let paid_at = (order.order_date + Duration::days(ctx.int(0, 2).into())).min(now);

            rows.push(vec![
                ctx.new_id().into(),
                order.id.into(),
                (*ctx.choose(PAYMENT_METHODS)).into(),
                amount.into(),
                transaction_id.into(),
                (*ctx.choose(PAYMENT_STATUSES)).into(),
                paid_at.into(),
                now.into(),
                now.into(),
            ]);
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::ctx;
    use std::collections::{HashMap, HashSet};

    fn seeded_ids(ctx: &mut GenContext, customers: usize, products: usize) -> IdMap {
        let mut ids = IdMap::new();
        for _ in 0..customers {
            ids.publish(EntityKind::Customer, ctx.new_id());
        }
        for _ in 0..products {
            ids.publish(EntityKind::Product, ctx.new_id());
        }
        ids
    }

    #[test]
    fn test_order_totals_match_items() {
        let mut ctx = ctx();
        let mut ids = seeded_ids(&mut ctx, 10, 100);
        let mut orders = generate_sales_orders(&mut ctx, &mut ids, 0..50).unwrap();
        let items =
            generate_sales_order_items(&mut ctx, &ids, &mut orders, FanOut::range(1, 10)).unwrap();

        let col = |name| tables::SALES_ORDER_ITEMS.column_index(name).unwrap();
        let mut per_order: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for item in &items {
            let tax = item[col("tax")].as_decimal().unwrap();
            let total = item[col("total")].as_decimal().unwrap();
            let quantity = Decimal::from(item[col("quantity")].as_i64().unwrap());
            let unit_price = item[col("unit_price")].as_decimal().unwrap();
            let discount = item[col("discount")].as_decimal().unwrap();
            assert_eq!(total - tax, unit_price * quantity - discount);

            let entry = per_order
                .entry(item[col("sales_order_id")].as_uuid().unwrap())
                .or_default();
            entry.0 += total - tax;
            entry.1 += tax;
        }

        for order in &orders {
            let (subtotal, tax) = per_order[&order.id];
            assert_eq!(order.subtotal, subtotal);
            assert_eq!(order.tax, tax);
            assert_eq!(order.shipping, Decimal::new(SALES_SHIPPING_CENTS, 2));
            assert_eq!(order.total, order.subtotal + order.tax + order.shipping);

            let row = order.to_row(ctx.now());
            assert_eq!(row.len(), tables::SALES_ORDERS.width());
            assert_eq!(row[8].as_decimal(), Some(order.total));
        }
    }

    #[test]
    fn test_no_duplicate_product_per_order() {
        let mut ctx = ctx();
        let mut ids = seeded_ids(&mut ctx, 1, 4);
        let mut orders = generate_sales_orders(&mut ctx, &mut ids, 0..30).unwrap();
        let items =
            generate_sales_order_items(&mut ctx, &ids, &mut orders, FanOut::range(1, 10)).unwrap();

        let mut seen = HashSet::new();
        for item in &items {
            assert!(seen.insert((item[1].as_uuid().unwrap(), item[2].as_uuid().unwrap())));
        }
        assert!(orders.iter().all(|o| (1..=4).contains(&o.item_count)));
    }

    #[test]
    fn test_payments_sum_to_order_total() {
        let mut ctx = ctx();
        let mut ids = seeded_ids(&mut ctx, 5, 50);
        let mut orders = generate_sales_orders(&mut ctx, &mut ids, 0..40).unwrap();
        generate_sales_order_items(&mut ctx, &ids, &mut orders, FanOut::range(1, 10)).unwrap();
        let payments = generate_sales_order_payments(&mut ctx, &orders, FanOut::range(1, 3));

        let amount = tables::SALES_ORDER_PAYMENTS.column_index("amount").unwrap();
        let mut paid: HashMap<Uuid, Decimal> = HashMap::new();
        for payment in &payments {
            *paid.entry(payment[1].as_uuid().unwrap()).or_default() +=
                payment[amount].as_decimal().unwrap();
        }
        for order in &orders {
            assert_eq!(paid[&order.id], order.total);
        }
    }

    #[test]
    fn test_split_amount() {
        let parts = split_amount(Decimal::new(1000, 2), 3);
        let cents = |c| Decimal::new(c, 2);
        assert_eq!(parts, vec![cents(333), cents(333), cents(334)]);
        assert!(split_amount(Decimal::ONE, 0).is_empty());
    }

    #[test]
    fn test_orders_need_customers() {
        let mut ctx = ctx();
        let mut ids = IdMap::new();
        let result = generate_sales_orders(&mut ctx, &mut ids, 0..1);
        assert!(matches!(
            result,
            Err(GeneratorError::EmptyPool {
                pool: EntityKind::Customer,
                ..
            })
        ));
    }

    #[test]
    fn test_order_numbers_and_sample() {
        let mut ctx = ctx();
        let mut ids = seeded_ids(&mut ctx, 3, 0);
        let orders = generate_sales_orders(&mut ctx, &mut ids, 7..9).unwrap();
        assert_eq!(orders[0].order_number, "SO-0000000008");
        assert_eq!(orders[1].order_number, "SO-0000000009");
        assert_eq!(ids.order_sample(OrderKind::Sales).len(), 2);
    }
}

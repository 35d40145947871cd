//! Seeding orchestrator.
//!
//! Runs six phases strictly in order, threading the [`IdMap`] and the
//! per-chunk drafts from generation to insertion:
//!
//! 1. master data: categories, suppliers, warehouses
//! 2. products with category links, prices, costs and supplier links
//! 3. customers and addresses
//! 4. sales orders, items, payments
//! 5. purchase orders, items, receipts
//! 6. inventory and inventory transactions
//!
//! Each phase walks its root entity with a [`ChunkedProducer`]. Without
//! streaming the chunk is the whole phase; with streaming it is one batch,
//! so memory stays bounded by the batch size. A failure aborts the run and
//! leaves earlier phases committed.

use crate::context::RunContext;
use crate::error::SeederError;
use crate::insert::{bulk_insert_batched, BulkInserter};
use crate::progress::{format_duration, ProgressTracker, TableMetrics};
use chrono::{DateTime, Utc};
use seeder_core::{Row, SeedConfig, TableSpec};
use seeder_generator::generators::{customers, inventory, master, products, purchasing, sales};
use seeder_generator::{tables, ChunkedProducer, GenContext, GeneratorError, IdMap};
use std::fmt;
use std::ops::Range;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// One sequential stage of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    MasterData,
    Products,
    Customers,
    SalesOrders,
    PurchaseOrders,
    Inventory,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 6] = [
        Phase::MasterData,
        Phase::Products,
        Phase::Customers,
        Phase::SalesOrders,
        Phase::PurchaseOrders,
        Phase::Inventory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::MasterData => "master data",
            Phase::Products => "products",
            Phase::Customers => "customers",
            Phase::SalesOrders => "sales orders",
            Phase::PurchaseOrders => "purchase orders",
            Phase::Inventory => "inventory",
        }
    }

    /// 1-based position in the run.
    pub fn number(self) -> usize {
        Phase::ALL.iter().position(|p| *p == self).unwrap_or(0) + 1
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    /// Progress metrics for each phase's tracked tables.
    pub tables: Vec<TableMetrics>,
    /// Rows inserted per table, in seeding order.
    pub rows_by_table: Vec<(&'static str, u64)>,
    /// Wall time per phase.
    pub phases: Vec<(Phase, Duration)>,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}

impl SeedReport {
    pub fn total_rows(&self) -> u64 {
        self.rows_by_table.iter().map(|(_, n)| n).sum()
    }

    /// Rows inserted into `table`, if it was loaded.
    pub fn rows_for(&self, table: &str) -> Option<u64> {
        self.rows_by_table
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, n)| *n)
    }
}

/// Borrowed insert side of a phase: the inserter plus bookkeeping.
struct Loader<'a, I: ?Sized> {
    inserter: &'a I,
    ctx: &'a RunContext,
    batch_size: usize,
    progress: &'a mut ProgressTracker,
    counts: &'a mut Vec<(&'static str, u64)>,
}

impl<I: BulkInserter + ?Sized> Loader<'_, I> {
    fn start(&mut self, table: &TableSpec, total: u64) {
        self.progress.start_table(table.name, total);
    }

    fn finish(&mut self) {
        self.progress.finish();
    }

    /// Load rows of the table whose progress is being tracked.
    async fn tracked(&mut self, table: &TableSpec, rows: &[Row]) -> Result<u64, SeederError> {
        let inserted = bulk_insert_batched(
            self.inserter,
            self.ctx,
            table,
            rows,
            self.batch_size,
            Some(&mut *self.progress),
        )
        .await?;
        self.count(table, inserted);
        Ok(inserted)
    }

    /// Load rows of a dependent table; counted but not shown as progress.
    async fn untracked(&mut self, table: &TableSpec, rows: &[Row]) -> Result<u64, SeederError> {
        let inserted =
            bulk_insert_batched(self.inserter, self.ctx, table, rows, self.batch_size, None).await?;
        debug!(table = table.name, rows = inserted, "Dependent rows seeded");
        self.count(table, inserted);
        Ok(inserted)
    }

    fn count(&mut self, table: &TableSpec, rows: u64) {
        match self.counts.iter_mut().find(|(name, _)| *name == table.name) {
            Some((_, n)) => *n += rows,
            None => self.counts.push((table.name, rows)),
        }
    }
}

/// Generate a flat table chunk by chunk and load each chunk.
async fn load_chunked<I, F>(
    loader: &mut Loader<'_, I>,
    table: &TableSpec,
    total: u64,
    chunk_size: u64,
    produce: F,
) -> Result<(), SeederError>
where
    I: BulkInserter + ?Sized,
    F: FnMut(Range<u64>) -> Result<Vec<Row>, GeneratorError>,
{
    info!(table = table.name, count = total, "Generating rows");
    loader.start(table, total);
    for chunk in ChunkedProducer::new(total, chunk_size, produce) {
        loader.tracked(table, &chunk?).await?;
    }
    loader.finish();
    Ok(())
}

struct ProductChunk {
    products: Vec<Row>,
    categories: Vec<Row>,
    prices: Vec<Row>,
    costs: Vec<Row>,
    supplier_links: Vec<Row>,
}

/// Seeds every table of the schema through a [`BulkInserter`].
pub struct Seeder<I> {
    inserter: I,
    config: SeedConfig,
    generator: GenContext,
    ids: IdMap,
    progress: ProgressTracker,
    counts: Vec<(&'static str, u64)>,
}

impl<I: BulkInserter> Seeder<I> {
    /// Create a seeder; the config is validated and seeds the generator.
    pub fn new(inserter: I, config: SeedConfig) -> Result<Self, SeederError> {
        config
            .validate()
            .map_err(|e| SeederError::Config(e.to_string()))?;
        let generator = GenContext::from_seed(config.seed);
        Ok(Self {
            inserter,
            config,
            generator,
            ids: IdMap::new(),
            progress: ProgressTracker::new(),
            counts: Vec::new(),
        })
    }

    /// Pin the generator's clock so a run is reproducible.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.generator = GenContext::new(self.config.seed, now);
        self
    }

    /// Replace the progress tracker, e.g. to change its report interval.
    pub fn with_progress(mut self, progress: ProgressTracker) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Ids published so far.
    pub fn ids(&self) -> &IdMap {
        &self.ids
    }

    pub fn inserter(&self) -> &I {
        &self.inserter
    }

    fn chunk_size(&self, total: u64) -> u64 {
        if self.config.streaming {
            self.config.batch_size as u64
        } else {
            total
        }
    }

    fn loader<'a>(
        inserter: &'a I,
        ctx: &'a RunContext,
        batch_size: usize,
        progress: &'a mut ProgressTracker,
        counts: &'a mut Vec<(&'static str, u64)>,
    ) -> Loader<'a, I> {
        Loader {
            inserter,
            ctx,
            batch_size,
            progress,
            counts,
        }
    }

    /// Run all six phases in order.
    ///
    /// Returns the first fatal error wrapped with its phase; phases that
    /// completed before it stay in the store.
    pub async fn seed_all(&mut self, ctx: &RunContext) -> Result<SeedReport, SeederError> {
        let started = Instant::now();
        info!("Starting full database seeding");
        info!(
            estimate = self.config.total_records_estimate(),
            streaming = self.config.streaming,
            batch_size = self.config.batch_size,
            "Estimated total records"
        );

        let mut phases = Vec::with_capacity(Phase::ALL.len());
        for phase in Phase::ALL {
            info!("=== Phase {}: {} ===", phase.number(), phase);
            let phase_started = Instant::now();
            let rows_before: u64 = self.counts.iter().map(|(_, n)| n).sum();

            let result = match phase {
                Phase::MasterData => self.seed_master_data(ctx).await,
                Phase::Products => self.seed_products(ctx).await,
                Phase::Customers => self.seed_customers(ctx).await,
                Phase::SalesOrders => self.seed_sales_orders(ctx).await,
                Phase::PurchaseOrders => self.seed_purchase_orders(ctx).await,
                Phase::Inventory => self.seed_inventory(ctx).await,
            };

            if let Err(e) = result {
                self.progress.finish();
                error!(
                    phase = %phase,
                    error = %e,
                    offset = ?e.batch_offset(),
                    "Seeding phase failed"
                );
                return Err(SeederError::Phase {
                    phase,
                    source: Box::new(e),
                });
            }

            let elapsed = phase_started.elapsed();
            let rows_after: u64 = self.counts.iter().map(|(_, n)| n).sum();
            info!(
                phase = %phase,
                rows = rows_after - rows_before,
                elapsed = %format_duration(elapsed),
                "Phase complete"
            );
            phases.push((phase, elapsed));
        }

        let elapsed = started.elapsed();
        let report = SeedReport {
            tables: self.progress.tables().to_vec(),
            rows_by_table: self.counts.clone(),
            phases,
            elapsed,
        };
        info!(
            rows = report.total_rows(),
            "Seeding completed in {}",
            format_duration(elapsed)
        );
        Ok(report)
    }

    async fn seed_master_data(&mut self, ctx: &RunContext) -> Result<(), SeederError> {
        let supplier_chunk = self.chunk_size(self.config.suppliers);
        let warehouse_chunk = self.chunk_size(self.config.warehouses);
        let Self {
            inserter,
            config,
            generator,
            ids,
            progress,
            counts,
        } = self;
        let mut loader = Self::loader(inserter, ctx, config.batch_size, progress, counts);

        // The tree needs every earlier category, so categories are generated whole.
        info!(count = config.categories, "Generating categories");
        let categories = master::generate_categories(
            generator,
            ids,
            config.categories,
            config.root_category_fraction,
        );
        loader.start(&tables::CATEGORIES, categories.len() as u64);
        loader.tracked(&tables::CATEGORIES, &categories).await?;
        loader.finish();
        drop(categories);

        load_chunked(
            &mut loader,
            &tables::SUPPLIERS,
            config.suppliers,
            supplier_chunk,
            |range| Ok(master::generate_suppliers(generator, ids, range)),
        )
        .await?;

        load_chunked(
            &mut loader,
            &tables::WAREHOUSES,
            config.warehouses,
            warehouse_chunk,
            |range| Ok(master::generate_warehouses(generator, ids, range)),
        )
        .await
    }

    async fn seed_products(&mut self, ctx: &RunContext) -> Result<(), SeederError> {
        let chunk_size = self.chunk_size(self.config.products);
        let Self {
            inserter,
            config,
            generator,
            ids,
            progress,
            counts,
        } = self;
        let mut loader = Self::loader(inserter, ctx, config.batch_size, progress, counts);

        info!(
            count = config.products,
            "Generating products and relationships"
        );
        loader.start(&tables::PRODUCTS, config.products);
        let producer = ChunkedProducer::new(config.products, chunk_size, |range| {
            let first = ids.products().len();
            let product_rows = products::generate_products(generator, ids, range);
            let new_ids = &ids.products()[first..];

            Ok(ProductChunk {
                categories: products::generate_product_categories(
                    generator,
                    ids,
                    new_ids,
                    config.product_categories_per_product,
                )?,
                prices: products::generate_product_prices(
                    generator,
                    new_ids,
                    config.product_prices_per_product,
                ),
                costs: products::generate_product_costs(
                    generator,
                    new_ids,
                    config.product_costs_per_product,
                ),
                supplier_links: products::generate_supplier_products(
                    generator,
                    ids,
                    new_ids,
                    config.supplier_products_per_product,
                )?,
                products: product_rows,
            })
        });

        for chunk in producer {
            let chunk = chunk?;
            loader.tracked(&tables::PRODUCTS, &chunk.products).await?;
            loader
                .untracked(&tables::PRODUCT_CATEGORIES, &chunk.categories)
                .await?;
            loader
                .untracked(&tables::PRODUCT_PRICES, &chunk.prices)
                .await?;
            loader
                .untracked(&tables::PRODUCT_COSTS, &chunk.costs)
                .await?;
            loader
                .untracked(&tables::SUPPLIER_PRODUCTS, &chunk.supplier_links)
                .await?;
        }
        loader.finish();
        Ok(())
    }

    async fn seed_customers(&mut self, ctx: &RunContext) -> Result<(), SeederError> {
        let chunk_size = self.chunk_size(self.config.customers);
        let Self {
            inserter,
            config,
            generator,
            ids,
            progress,
            counts,
        } = self;
        let mut loader = Self::loader(inserter, ctx, config.batch_size, progress, counts);

        info!(count = config.customers, "Generating customers");
        loader.start(&tables::CUSTOMERS, config.customers);
        let producer = ChunkedProducer::new(config.customers, chunk_size, |range| {
            let first = ids.customers().len();
            let customer_rows = customers::generate_customers(generator, ids, range);
            let addresses = customers::generate_customer_addresses(
                generator,
                &ids.customers()[first..],
                config.customer_addresses_per_customer,
            );
            Ok((customer_rows, addresses))
        });

        for chunk in producer {
            let (customer_rows, addresses) = chunk?;
            loader.tracked(&tables::CUSTOMERS, &customer_rows).await?;
            loader
                .untracked(&tables::CUSTOMER_ADDRESSES, &addresses)
                .await?;
        }
        loader.finish();
        Ok(())
    }

    async fn seed_sales_orders(&mut self, ctx: &RunContext) -> Result<(), SeederError> {
        let chunk_size = self.chunk_size(self.config.sales_orders);
        let Self {
            inserter,
            config,
            generator,
            ids,
            progress,
            counts,
        } = self;
        let mut loader = Self::loader(inserter, ctx, config.batch_size, progress, counts);

        info!(count = config.sales_orders, "Generating sales orders");
        loader.start(&tables::SALES_ORDERS, config.sales_orders);
        let producer = ChunkedProducer::new(config.sales_orders, chunk_size, |range| {
            let mut orders = sales::generate_sales_orders(generator, ids, range)?;
            let items = sales::generate_sales_order_items(
                generator,
                ids,
                &mut orders,
                config.sales_order_items_per_order,
            )?;
            let payments = sales::generate_sales_order_payments(
                generator,
                &orders,
                config.sales_order_payments_per_order,
            );
            let now = generator.now();
            let order_rows: Vec<Row> = orders.iter().map(|o| o.to_row(now)).collect();
            Ok((order_rows, items, payments))
        });

        for chunk in producer {
            let (order_rows, items, payments) = chunk?;
            loader.tracked(&tables::SALES_ORDERS, &order_rows).await?;
            loader.untracked(&tables::SALES_ORDER_ITEMS, &items).await?;
            loader
                .untracked(&tables::SALES_ORDER_PAYMENTS, &payments)
                .await?;
        }
        loader.finish();
        Ok(())
    }

    async fn seed_purchase_orders(&mut self, ctx: &RunContext) -> Result<(), SeederError> {
        let chunk_size = self.chunk_size(self.config.purchase_orders);
        let Self {
            inserter,
            config,
            generator,
            ids,
            progress,
            counts,
        } = self;
        let mut loader = Self::loader(inserter, ctx, config.batch_size, progress, counts);

        info!(count = config.purchase_orders, "Generating purchase orders");
        loader.start(&tables::PURCHASE_ORDERS, config.purchase_orders);
        let producer = ChunkedProducer::new(config.purchase_orders, chunk_size, |range| {
            let mut orders = purchasing::generate_purchase_orders(generator, ids, range)?;
            let (items, item_refs) = purchasing::generate_purchase_order_items(
                generator,
                ids,
                &mut orders,
                config.purchase_order_items_per_order,
            )?;
            let receipts = purchasing::generate_purchase_order_receipts(
                generator,
                &item_refs,
                config.purchase_order_receipts_per_item,
            );
            let now = generator.now();
            let order_rows: Vec<Row> = orders.iter().map(|o| o.to_row(now)).collect();
            Ok((order_rows, items, receipts))
        });

        for chunk in producer {
            let (order_rows, items, receipts) = chunk?;
            loader
                .tracked(&tables::PURCHASE_ORDERS, &order_rows)
                .await?;
            loader
                .untracked(&tables::PURCHASE_ORDER_ITEMS, &items)
                .await?;
            loader
                .untracked(&tables::PURCHASE_ORDER_RECEIPTS, &receipts)
                .await?;
        }
        loader.finish();
        Ok(())
    }

    async fn seed_inventory(&mut self, ctx: &RunContext) -> Result<(), SeederError> {
        let product_count = self.ids.products().len() as u64;
        let chunk_size = self.chunk_size(product_count);
        let expected = self
            .config
            .estimate_by_table()
            .into_iter()
            .find(|(table, _)| *table == tables::INVENTORY.name)
            .map_or(0, |(_, n)| n);
        let Self {
            inserter,
            config,
            generator,
            ids,
            progress,
            counts,
        } = self;
        let mut loader = Self::loader(inserter, ctx, config.batch_size, progress, counts);
        let ids: &IdMap = ids;

        info!(products = product_count, "Generating inventory");
        loader.start(&tables::INVENTORY, expected);
        let producer = ChunkedProducer::new(product_count, chunk_size, |range| {
            let stocked = &ids.products()[range.start as usize..range.end as usize];
            let (stock_rows, locations) = inventory::generate_inventory(
                generator,
                ids,
                stocked,
                config.inventory_records_per_product,
            )?;
            let movements = inventory::generate_inventory_transactions(
                generator,
                ids,
                &locations,
                config.inventory_transactions_per_product,
            );
            Ok((stock_rows, movements))
        });

        for chunk in producer {
            let (stock_rows, movements) = chunk?;
            loader.tracked(&tables::INVENTORY, &stock_rows).await?;
            loader
                .untracked(&tables::INVENTORY_TRANSACTIONS, &movements)
                .await?;
        }
        loader.finish();
        Ok(())
    }
}

//! Identifier map: the ids generated so far in a seeding run.
//!
//! Every entity that other tables reference gets an append-only pool here.
//! Phases run strictly in order, so a generator only ever reads pools that
//! earlier phases (or earlier rows of its own phase) have published.

use crate::error::GeneratorError;
use rand::Rng;
use uuid::Uuid;

/// Upper bound on sampled order ids kept for inventory references.
pub const ORDER_SAMPLE_CAP: usize = 10_000;

/// Entity types that can be the target of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Category,
    Supplier,
    Warehouse,
    Product,
    Customer,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Category => write!(f, "category"),
            EntityKind::Supplier => write!(f, "supplier"),
            EntityKind::Warehouse => write!(f, "warehouse"),
            EntityKind::Product => write!(f, "product"),
            EntityKind::Customer => write!(f, "customer"),
        }
    }
}

/// Order tables whose ids are sampled rather than kept in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    Sales,
    Purchase,
}

/// Fixed-capacity uniform sample of a stream of ids (reservoir sampling).
#[derive(Debug, Clone, Default)]
struct IdSample {
    seen: u64,
    ids: Vec<Uuid>,
}

impl IdSample {
    fn offer<R: Rng>(&mut self, id: Uuid, rng: &mut R) {
        self.seen += 1;
        if self.ids.len() < ORDER_SAMPLE_CAP {
            self.ids.push(id);
        } else {
            let slot = rng.gen_range(0..self.seen);
            if let Ok(slot) = usize::try_from(slot) {
                if slot < ORDER_SAMPLE_CAP {
                    self.ids[slot] = id;
                }
            }
        }
    }
}

/// Published primary keys for one seeding run.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    categories: Vec<Uuid>,
    suppliers: Vec<Uuid>,
    warehouses: Vec<Uuid>,
    products: Vec<Uuid>,
    customers: Vec<Uuid>,
    sales_orders: IdSample,
    purchase_orders: IdSample,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a newly generated id to its pool.
    pub fn publish(&mut self, kind: EntityKind, id: Uuid) {
        self.pool_mut(kind).push(id);
    }

    /// Read view of every id published for `kind`, in generation order.
    pub fn pool(&self, kind: EntityKind) -> &[Uuid] {
        match kind {
            EntityKind::Category => &self.categories,
            EntityKind::Supplier => &self.suppliers,
            EntityKind::Warehouse => &self.warehouses,
            EntityKind::Product => &self.products,
            EntityKind::Customer => &self.customers,
        }
    }

    fn pool_mut(&mut self, kind: EntityKind) -> &mut Vec<Uuid> {
        match kind {
            EntityKind::Category => &mut self.categories,
            EntityKind::Supplier => &mut self.suppliers,
            EntityKind::Warehouse => &mut self.warehouses,
            EntityKind::Product => &mut self.products,
            EntityKind::Customer => &mut self.customers,
        }
    }

    /// Reserve room for `additional` ids of `kind`.
    pub fn reserve(&mut self, kind: EntityKind, additional: usize) {
        self.pool_mut(kind).reserve(additional);
    }

    /// The pool for `kind`, or an error naming `table` if it is empty.
    pub fn require(
        &self,
        kind: EntityKind,
        table: &'static str,
    ) -> Result<&[Uuid], GeneratorError> {
        let pool = self.pool(kind);
        if pool.is_empty() {
            return Err(GeneratorError::EmptyPool { table, pool: kind });
        }
        Ok(pool)
    }

    /// Pick a uniformly random published id of `kind`.
    pub fn pick<R: Rng>(
        &self,
        kind: EntityKind,
        rng: &mut R,
        table: &'static str,
    ) -> Result<Uuid, GeneratorError> {
        let pool = self.require(kind, table)?;
        Ok(pool[rng.gen_range(0..pool.len())])
    }

    pub fn categories(&self) -> &[Uuid] {
        &self.categories
    }

    pub fn suppliers(&self) -> &[Uuid] {
        &self.suppliers
    }

    pub fn warehouses(&self) -> &[Uuid] {
        &self.warehouses
    }

    pub fn products(&self) -> &[Uuid] {
        &self.products
    }

    pub fn customers(&self) -> &[Uuid] {
        &self.customers
    }

    /// Offer an order id to the bounded sample used for inventory references.
    pub fn record_order<R: Rng>(&mut self, kind: OrderKind, id: Uuid, rng: &mut R) {
        match kind {
            OrderKind::Sales => self.sales_orders.offer(id, rng),
            OrderKind::Purchase => self.purchase_orders.offer(id, rng),
        }
    }

    /// Sampled order ids of `kind` (at most [`ORDER_SAMPLE_CAP`]).
    pub fn order_sample(&self, kind: OrderKind) -> &[Uuid] {
        match kind {
            OrderKind::Sales => &self.sales_orders.ids,
            OrderKind::Purchase => &self.purchase_orders.ids,
        }
    }
}

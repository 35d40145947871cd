//! Entity generators, one module per seeding phase.
//!
//! Generators return rows in the column order of the matching
//! [`tables`](crate::tables) descriptor. Those producing parents that later
//! tables hang off also return lightweight drafts or refs carrying the ids
//! and totals the next generator needs.

pub mod customers;
pub mod inventory;
pub mod master;
pub mod products;
pub mod purchasing;
pub mod sales;

use crate::context::GenContext;
use rand::Rng;
use std::collections::HashSet;
use uuid::Uuid;

/// Draw up to `requested` distinct ids from `pool`.
///
/// The number of draws is capped at `pool.len()` and repeated draws are
/// skipped rather than retried, so the result may hold fewer than
/// `requested` ids when the pool is small.
pub(crate) fn distinct_picks(ctx: &mut GenContext, pool: &[Uuid], requested: usize) -> Vec<Uuid> {
    let draws = requested.min(pool.len());
    let mut seen = HashSet::with_capacity(draws);
    let mut picked = Vec::with_capacity(draws);

    for _ in 0..draws {
        let id = pool[ctx.rng().gen_range(0..pool.len())];
        if seen.insert(id) {
            picked.push(id);
        }
    }

    picked
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::context::GenContext;
    use chrono::{DateTime, Utc};

    pub fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    pub fn ctx() -> GenContext {
        GenContext::new(42, fixed_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_picks_never_repeats() {
        let mut ctx = test_support::ctx();
        let pool: Vec<Uuid> = (0..3).map(|_| ctx.new_id()).collect();

        for _ in 0..50 {
            let picked = distinct_picks(&mut ctx, &pool, 10);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), picked.len());
            assert!(!picked.is_empty() && picked.len() <= 3);
            assert!(picked.iter().all(|id| pool.contains(id)));
        }
    }

    #[test]
    fn test_distinct_picks_empty_inputs() {
        let mut ctx = test_support::ctx();
        assert!(distinct_picks(&mut ctx, &[], 5).is_empty());

        let pool = vec![ctx.new_id()];
        assert!(distinct_picks(&mut ctx, &pool, 0).is_empty());
    }
}

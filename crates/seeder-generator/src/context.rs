//! Seeded randomness and a pinned clock shared by all generators.

use chrono::{DateTime, Duration, Utc};
use fake::{Dummy, Fake};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use seeder_core::FanOut;
use uuid::Uuid;

/// Generation state threaded through every generator of a run.
///
/// `now` is captured once so every timestamp in the dataset is relative to
/// the same instant, and a rerun with the same seed and `now` is identical.
pub struct GenContext {
    rng: StdRng,
    now: DateTime<Utc>,
}

impl GenContext {
    pub fn new(seed: u64, now: DateTime<Utc>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            now,
        }
    }

    /// Seeded context pinned to the current wall clock (whole seconds).
    pub fn from_seed(seed: u64) -> Self {
        let now = Utc::now();
        let now = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        Self::new(seed, now)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Random UUID v4 drawn from the seeded RNG.
    pub fn new_id(&mut self) -> Uuid {
        let bytes: [u8; 16] = self.rng.gen();
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    /// Uniform integer in `min..=max`.
    pub fn int(&mut self, min: i32, max: i32) -> i32 {
        self.rng.gen_range(min..=max)
    }

    pub fn coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Number of dependent rows for one parent.
    pub fn fan_out(&mut self, fan_out: FanOut) -> usize {
        self.rng.gen_range(fan_out.min..=fan_out.max) as usize
    }

    /// Money amount between `min_cents` and `max_cents`, two decimal places.
    pub fn cents(&mut self, min_cents: i64, max_cents: i64) -> Decimal {
        Decimal::new(self.rng.gen_range(min_cents..=max_cents), 2)
    }

    /// A timestamp up to `max_days` whole days before `now`.
    pub fn days_ago(&mut self, max_days: i64) -> DateTime<Utc> {
        self.now - Duration::days(self.rng.gen_range(0..=max_days))
    }

    /// Pick one entry of a non-empty constant list.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.gen_range(0..items.len())]
    }

    /// Draw a value from a `fake` faker with the seeded RNG.
    pub fn fake<F, T>(&mut self, faker: F) -> T
    where
        T: Dummy<F>,
        F: Fake,
    {
        faker.fake_with_rng(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::Name;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_deterministic_ids() {
        let mut a = GenContext::new(42, fixed_now());
        let mut b = GenContext::new(42, fixed_now());

        assert_eq!(a.new_id(), b.new_id());
        let name_a: String = GenContext::fake(&mut a, Name());
        let name_b: String = GenContext::fake(&mut b, Name());
        assert_eq!(name_a, name_b);
    }

    #[test]
    fn test_ids_are_v4() {
        let mut ctx = GenContext::new(1, fixed_now());
        assert_eq!(ctx.new_id().get_version_num(), 4);
    }

    #[test]
    fn test_ranges() {
        let mut ctx = GenContext::new(9, fixed_now());
        for _ in 0..200 {
            let cents = ctx.cents(500, 50_000);
            assert!(cents >= Decimal::new(500, 2) && cents <= Decimal::new(50_000, 2));
            assert_eq!(cents.scale(), 2);

            let n = ctx.fan_out(FanOut::range(1, 3));
            assert!((1..=3).contains(&n));

            let ts = ctx.days_ago(365);
            assert!(ts <= fixed_now() && ts >= fixed_now() - Duration::days(365));
        }
        assert_eq!(ctx.fan_out(FanOut::exact(4)), 4);
    }

    #[test]
    fn test_from_seed_truncates_to_seconds() {
        let ctx = GenContext::from_seed(3);
        assert_eq!(ctx.now().timestamp_subsec_nanos(), 0);
    }
}

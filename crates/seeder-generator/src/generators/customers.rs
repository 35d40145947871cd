//! Phase 3: customers and their addresses.

use super::master::PostalAddress;
use crate::context::GenContext;
use crate::id_map::{EntityKind, IdMap};

use fake::faker::internet::en::FreeEmailProvider;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use seeder_core::{FanOut, Row, SqlValue};
use std::ops::Range;
use uuid::Uuid;

const ADDRESS_TYPES: &[&str] = &["billing", "shipping", "both"];

fn email_local_part(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Generate customers for `range`.
///
/// Emails embed the global index (`first.last.42@provider`) so they are
/// unique no matter how often a name repeats.
pub fn generate_customers(ctx: &mut GenContext, ids: &mut IdMap, range: Range<u64>) -> Vec<Row> {
    let mut rows = Vec::with_capacity((range.end - range.start) as usize);
    let now = ctx.now();

    for index in range {
        let id = ctx.new_id();
        ids.publish(EntityKind::Customer, id);

        let first: String = ctx.fake(FirstName());
        let last: String = ctx.fake(LastName());
        let provider: String = ctx.fake(FreeEmailProvider());
        let phone: String = ctx.fake(PhoneNumber());
        let email = format!(
            "{}.{}.{}@{}",
            email_local_part(&first),
            email_local_part(&last),
            index + 1,
            provider
        );

        rows.push(vec![
            id.into(),
            first.into(),
            last.into(),
            email.into(),
            phone.into(),
            now.into(),
            now.into(),
            SqlValue::Null,
        ]);
    }

    rows
}

/// Generate addresses for each customer; the first one is the default.
pub fn generate_customer_addresses(
    ctx: &mut GenContext,
    customers: &[Uuid],
    fan_out: FanOut,
) -> Vec<Row> {
    let now = ctx.now();
    let mut rows = Vec::with_capacity(customers.len() * fan_out.max as usize);

    for &customer_id in customers {
        let count = ctx.fan_out(fan_out);
        for j in 0..count {
            let address_type = *ctx.choose(ADDRESS_TYPES);
            let address = PostalAddress::generate(ctx);
            let line2 = if ctx.coin() {
                Some(format!("Apt {}", ctx.int(1, 999)))
            } else {
                None
            };

            rows.push(vec![
                ctx.new_id().into(),
                customer_id.into(),
                address_type.into(),
                address.line1.into(),
                line2.into(),
                address.city.into(),
                address.state.into(),
                address.postal_code.into(),
                address.country.into(),
                (j == 0).into(),
                now.into(),
                now.into(),
            ]);
        }
    }

    rows
}

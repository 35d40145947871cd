//! Phase 1: categories, suppliers and warehouses.

use crate::context::GenContext;
use crate::id_map::{EntityKind, IdMap};

use fake::faker::address::en::{
    BuildingNumber, CityName, CountryName, StateAbbr, StreetName, ZipCode,
};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use seeder_core::{Row, SqlValue};
use std::ops::Range;

const CATEGORY_NOUNS: &[&str] = &[
    "Electronics",
    "Computers",
    "Audio",
    "Cameras",
    "Phones",
    "Books",
    "Music",
    "Movies",
    "Games",
    "Toys",
    "Clothing",
    "Shoes",
    "Jewelry",
    "Watches",
    "Beauty",
    "Health",
    "Grocery",
    "Garden",
    "Tools",
    "Automotive",
    "Sports",
    "Outdoors",
    "Pets",
    "Baby",
    "Furniture",
    "Kitchen",
    "Bedding",
    "Lighting",
    "Office",
    "Crafts",
];

const CATEGORY_QUALIFIERS: &[&str] = &[
    "Accessories",
    "Essentials",
    "Supplies",
    "Parts",
    "Gear",
    "Equipment",
    "Collectibles",
    "Basics",
    "Decor",
    "Care",
];

/// Postal address shared by suppliers, warehouses and customer addresses.
pub(crate) struct PostalAddress {
    pub line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl PostalAddress {
    pub(crate) fn generate(ctx: &mut GenContext) -> Self {
        let number: String = ctx.fake(BuildingNumber());
        let street: String = ctx.fake(StreetName());
        Self {
            line1: format!("{number} {street}"),
            city: ctx.fake(CityName()),
            state: ctx.fake(StateAbbr()),
            postal_code: ctx.fake(ZipCode()),
            country: ctx.fake(CountryName()),
        }
    }
}

fn category_name(ctx: &mut GenContext) -> String {
    let noun = *ctx.choose(CATEGORY_NOUNS);
    let qualifier = *ctx.choose(CATEGORY_QUALIFIERS);
    format!("{noun} {qualifier}")
}

/// Generate `count` categories as a tree.
///
/// The first `count * root_fraction` rows (at least one) are roots with a
/// null parent. Every later row picks its parent uniformly among the
/// categories already published, so a parent always precedes its children.
pub fn generate_categories(
    ctx: &mut GenContext,
    ids: &mut IdMap,
    count: u64,
    root_fraction: f64,
) -> Vec<Row> {
    let mut rows = Vec::with_capacity(count as usize);
    if count == 0 {
        return rows;
    }
    ids.reserve(EntityKind::Category, count as usize);

    // Tolerate float error just below an integer, e.g. 100 * 0.29.
    let root_count = ((count as f64 * root_fraction + 1e-9).floor() as u64).clamp(1, count);
    let now = ctx.now();

    for i in 0..count {
        let id = ctx.new_id();
        let parent_id = if i < root_count {
            None
        } else {
            let existing = ids.categories();
            Some(existing[ctx.rng().gen_range(0..existing.len())])
        };
        ids.publish(EntityKind::Category, id);

        let description: String = ctx.fake(Sentence(8..12));
        rows.push(vec![
            id.into(),
            category_name(ctx).into(),
            description.into(),
            parent_id.into(),
            now.into(),
            now.into(),
            SqlValue::Null,
        ]);
    }

    rows
}

/// Generate suppliers for the global index range `range`.
pub fn generate_suppliers(ctx: &mut GenContext, ids: &mut IdMap, range: Range<u64>) -> Vec<Row> {
    let mut rows = Vec::with_capacity((range.end - range.start) as usize);
    let now = ctx.now();

    for _ in range {
        let id = ctx.new_id();
        ids.publish(EntityKind::Supplier, id);

        let name: String = ctx.fake(CompanyName());
        let contact: String = ctx.fake(Name());
        let email: String = ctx.fake(SafeEmail());
        let phone: String = ctx.fake(PhoneNumber());
        let address = PostalAddress::generate(ctx);

        rows.push(vec![
            id.into(),
            name.into(),
            contact.into(),
            email.into(),
            phone.into(),
            address.line1.into(),
            address.city.into(),
            address.state.into(),
            address.postal_code.into(),
            address.country.into(),
            now.into(),
            now.into(),
            SqlValue::Null,
        ]);
    }

    rows
}

/// Generate warehouses for `range`; codes are `WH-0001`, `WH-0002`, ...
pub fn generate_warehouses(ctx: &mut GenContext, ids: &mut IdMap, range: Range<u64>) -> Vec<Row> {
    let mut rows = Vec::with_capacity((range.end - range.start) as usize);
    let now = ctx.now();

    for index in range {
        let id = ctx.new_id();
        ids.publish(EntityKind::Warehouse, id);

        let address = PostalAddress::generate(ctx);
        rows.push(vec![
            id.into(),
            format!("Warehouse {}", address.city).into(),
            format!("WH-{:04}", index + 1).into(),
            address.line1.into(),
            address.city.into(),
            address.state.into(),
            address.postal_code.into(),
            address.country.into(),
            now.into(),
            now.into(),
            SqlValue::Null,
        ]);
    }

    rows
}

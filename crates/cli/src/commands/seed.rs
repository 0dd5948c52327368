//! Catalog seeding command.
//!
//! Replaces the product catalog with generated sample data. Cart lines
//! reference products, so they are cleared first.

use rand::Rng;
use rand::prelude::IndexedRandom;
use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};

use super::{CommandError, connect};

/// Price range in cents ($10.00 to $500.00).
const MIN_PRICE_CENTS: i64 = 1_000;
const MAX_PRICE_CENTS: i64 = 50_000;

/// Rows per INSERT statement.
const INSERT_CHUNK: usize = 50;

struct CategorySpec {
    name: &'static str,
    slug: &'static str,
    adjectives: &'static [&'static str],
    nouns: &'static [&'static str],
}

const CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        name: "Electronics",
        slug: "electronics",
        adjectives: &["Wireless", "Portable", "Smart", "Compact", "Noise-Cancelling"],
        nouns: &["Headphones", "Speaker", "Keyboard", "Mouse", "Webcam", "Charger"],
    },
    CategorySpec {
        name: "Clothing",
        slug: "clothing",
        adjectives: &["Classic", "Slim-Fit", "Organic Cotton", "Waterproof", "Vintage"],
        nouns: &["T-Shirt", "Hoodie", "Jacket", "Jeans", "Sweater", "Raincoat"],
    },
    CategorySpec {
        name: "Shoes",
        slug: "shoes",
        adjectives: &["Running", "Leather", "Canvas", "Trail", "Lightweight"],
        nouns: &["Sneakers", "Boots", "Loafers", "Sandals", "Trainers"],
    },
    CategorySpec {
        name: "Accessories",
        slug: "accessories",
        adjectives: &["Minimalist", "Woven", "Polarized", "Stainless", "Travel"],
        nouns: &["Backpack", "Sunglasses", "Watch", "Belt", "Wallet", "Scarf"],
    },
];

struct SeedProduct {
    name: String,
    price: Decimal,
    category: &'static str,
    image_url: String,
}

/// Generate `count` products spread across the categories.
fn generate_products(count: usize) -> Vec<SeedProduct> {
    let mut rng = rand::rng();

    (0..count)
        .map(|i| {
            let spec = &CATEGORIES[i % CATEGORIES.len()];
            let adjective = spec.adjectives.choose(&mut rng).unwrap_or(&"Classic");
            let noun = spec.nouns.choose(&mut rng).unwrap_or(&"Item");
            let cents = rng.random_range(MIN_PRICE_CENTS..=MAX_PRICE_CENTS);

            SeedProduct {
                name: format!("{adjective} {noun}"),
                price: Decimal::new(cents, 2),
                category: spec.name,
                image_url: format!("https://images.tidepool.dev/{}/{}.jpg", spec.slug, i),
            }
        })
        .collect()
}

/// Replace the catalog with `count` generated products.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run(count: usize) -> Result<(), CommandError> {
    tracing::info!("Connecting to storefront database...");
    let pool = connect().await?;

    let products = generate_products(count);

    let mut tx = pool.begin().await?;

    // Carts reference products; clear them before replacing the catalog.
    sqlx::query("DELETE FROM cart_items").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM product").execute(&mut *tx).await?;

    for chunk in products.chunks(INSERT_CHUNK) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO product (product_name, price, category, image_url) ");

        builder.push_values(chunk, |mut row, product| {
            row.push_bind(&product.name)
                .push_bind(product.price)
                .push_bind(product.category)
                .push_bind(&product.image_url);
        });

        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    tracing::info!("Seeded {} products", products.len());
    Ok(())
}

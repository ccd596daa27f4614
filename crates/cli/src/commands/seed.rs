//! Catalog seeding command.
//!
//! Inserts a small sample catalog for local development. Idempotent-ish:
//! refuses to run against a non-empty catalog instead of duplicating rows.

use rust_decimal::Decimal;

use super::CommandError;

struct SeedProduct {
    name: &'static str,
    company: &'static str,
    description: &'static str,
    ram: &'static str,
    storage: &'static str,
    price: Decimal,
    stock: i32,
    category: &'static str,
    image_url: &'static str,
}

fn product(
    name: &'static str,
    company: &'static str,
    description: &'static str,
    ram: &'static str,
    storage: &'static str,
    price_cents: i64,
    stock: i32,
    category: &'static str,
    image_url: &'static str,
) -> SeedProduct {
    SeedProduct {
        name,
        company,
        description,
        ram,
        storage,
        price: Decimal::new(price_cents, 2),
        stock,
        category,
        image_url,
    }
}

fn sample_catalog() -> Vec<SeedProduct> {
    vec![
        product(
            "Volt One Pro",
            "Voltaic",
            "Flagship phone with a 6.7-inch OLED display and a three-day battery.",
            "12 GB",
            "256 GB",
            1099_00,
            50,
            "Smartphone",
            "/images/volt-one-pro.webp",
        ),
        product(
            "Volt One",
            "Voltaic",
            "The everyday phone: fast charging, clean software, great camera.",
            "8 GB",
            "128 GB",
            699_00,
            120,
            "Smartphone",
            "/images/volt-one.webp",
        ),
        product(
            "Arc Slim 14",
            "Arclight",
            "Thin-and-light 14-inch laptop for work and travel.",
            "16 GB",
            "512 GB",
            1299_00,
            35,
            "Laptop",
            "/images/arc-slim-14.webp",
        ),
        product(
            "Arc Studio 16",
            "Arclight",
            "16-inch creator laptop with a color-accurate display.",
            "32 GB",
            "1 TB",
            2399_00,
            15,
            "Laptop",
            "/images/arc-studio-16.webp",
        ),
        product(
            "Pulse Buds",
            "Pulseware",
            "Wireless earbuds with adaptive noise cancellation.",
            "-",
            "-",
            149_00,
            300,
            "Audio",
            "/images/pulse-buds.webp",
        ),
        product(
            "Pulse Watch 2",
            "Pulseware",
            "Fitness watch with two-week battery life and offline maps.",
            "1 GB",
            "32 GB",
            249_00,
            80,
            "Wearable",
            "/images/pulse-watch-2.webp",
        ),
    ]
}

/// Seed the catalog with sample products.
///
/// # Errors
///
/// Returns [`CommandError`] if the database is unreachable or an insert
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let existing: i64 = sqlx::query_scalar("SELECT count(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        tracing::warn!(existing, "catalog is not empty, skipping seed");
        return Ok(());
    }

    let catalog = sample_catalog();
    for item in &catalog {
        sqlx::query(
            "INSERT INTO products \
             (name, company, description, ram, storage, price, stock, category, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(item.name)
        .bind(item.company)
        .bind(item.description)
        .bind(item.ram)
        .bind(item.storage)
        .bind(item.price)
        .bind(item.stock)
        .bind(item.category)
        .bind(item.image_url)
        .execute(&pool)
        .await?;
    }

    tracing::info!(count = catalog.len(), "catalog seeded");
    Ok(())
}

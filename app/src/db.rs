// vitrin/src/db.rs

//! Startup database preparation: optional schema application and demo
//! catalog seeding, both idempotent.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::Result;

const SCHEMA_SQL: &str = include_str!("../schema.sql");

pub async fn prepare(pool: &PgPool, config: &AppConfig) -> Result<()> {
  if config.apply_schema {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    info!("Database schema applied.");
  }
  if config.seed_db {
    seed_demo_catalog(pool).await?;
  }
  Ok(())
}

/// Inserts a small demo catalog when it is not already present; conflicts
/// on slugs/SKUs make re-runs no-ops.
async fn seed_demo_catalog(pool: &PgPool) -> Result<()> {
  sqlx::query(
    "INSERT INTO categories (id, name, slug, description, sort_order) \
     VALUES ($1, 'Tea', 'tea', 'Loose-leaf teas', 1) \
     ON CONFLICT (slug) DO NOTHING",
  )
  .bind(Uuid::new_v4())
  .execute(pool)
  .await?;

  sqlx::query(
    "INSERT INTO products \
       (id, name, slug, short_description, category_id, base_price_cents, images, is_featured, stock_quantity) \
     VALUES \
       ($1, 'Earl Grey', 'earl-grey', 'Black tea with bergamot', \
        (SELECT id FROM categories WHERE slug = 'tea'), 10000, ARRAY['earl-grey.jpg'], TRUE, 120) \
     ON CONFLICT (slug) DO NOTHING",
  )
  .bind(Uuid::new_v4())
  .execute(pool)
  .await?;

  sqlx::query(
    "INSERT INTO products \
       (id, name, slug, short_description, category_id, base_price_cents, images, stock_quantity) \
     VALUES \
       ($1, 'Green Sencha', 'green-sencha', 'Steamed Japanese green tea', \
        (SELECT id FROM categories WHERE slug = 'tea'), 8500, ARRAY['green-sencha.jpg'], 80) \
     ON CONFLICT (slug) DO NOTHING",
  )
  .bind(Uuid::new_v4())
  .execute(pool)
  .await?;

  sqlx::query(
    "INSERT INTO product_variants (id, product_id, name, sku, price_modifier_cents, stock_quantity) \
     VALUES \
       ($1, (SELECT id FROM products WHERE slug = 'earl-grey'), '250g', 'EG-250', 2000, 60), \
       ($2, (SELECT id FROM products WHERE slug = 'earl-grey'), '100g', 'EG-100', 0, 60) \
     ON CONFLICT (sku) DO NOTHING",
  )
  .bind(Uuid::new_v4())
  .bind(Uuid::new_v4())
  .execute(pool)
  .await?;

  info!("Demo catalog seeded.");
  Ok(())
}

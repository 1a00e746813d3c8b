// vitrin/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::{Product, ProductVariant};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub category: Option<String>,
  pub featured: Option<bool>,
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  // Runtime-bound query; the filters are optional and folded in as
  // "no value or match" predicates.
  let products: Vec<Product> = sqlx::query_as(
    "SELECT p.* FROM products p \
     LEFT JOIN categories c ON c.id = p.category_id \
     WHERE p.is_active \
       AND ($1::text IS NULL OR c.slug = $1) \
       AND ($2::bool IS NULL OR p.is_featured = $2) \
     ORDER BY p.name ASC",
  )
  .bind(&query_params.category)
  .bind(query_params.featured)
  .fetch_all(&app_state.db_pool)
  .await?;

  info!("Fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(slug = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let slug = path.into_inner();

  let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE slug = $1 AND is_active")
    .bind(&slug)
    .fetch_optional(&app_state.db_pool)
    .await?;

  let Some(product) = product else {
    warn!("Product with slug '{}' not found.", slug);
    return Err(AppError::NotFound(format!("Product '{}' not found.", slug)));
  };

  let variants: Vec<ProductVariant> =
    sqlx::query_as("SELECT * FROM product_variants WHERE product_id = $1 AND is_active ORDER BY name ASC")
      .bind(product.id)
      .fetch_all(&app_state.db_pool)
      .await?;

  Ok(HttpResponse::Ok().json(json!({
      "product": product,
      "variants": variants,
  })))
}

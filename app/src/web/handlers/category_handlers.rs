// vitrin/src/web/handlers/category_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::models::Category;
use crate::state::AppState;

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories: Vec<Category> =
    sqlx::query_as("SELECT * FROM categories WHERE is_active ORDER BY sort_order NULLS LAST, name ASC")
      .fetch_all(&app_state.db_pool)
      .await?;

  Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

// vitrin/src/web/routes.rs

use actix_web::web;

// Liveness only; cart storage has its own failure surface per request.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  use crate::web::handlers::*;

  cfg.service(
    web::scope("/api/v1")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Authentication Routes
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/signout", web::post().to(auth_handlers::signout_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      // Catalog Routes (public, read-only)
      .service(web::scope("/categories").route("", web::get().to(category_handlers::list_categories_handler)))
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{slug}", web::get().to(product_handlers::get_product_handler)),
      )
      // Cart Routes (authenticated; every response carries the reconciled view)
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::view_cart_handler))
          .route("", web::post().to(cart_handlers::add_to_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/{line_id}", web::patch().to(cart_handlers::update_cart_line_handler))
          .route("/{line_id}", web::delete().to(cart_handlers::remove_cart_line_handler)),
      )
      // Checkout / Order Routes
      .service(web::scope("/checkout").route("", web::post().to(checkout_handlers::checkout_handler)))
      .service(
        web::scope("/orders")
          .route("", web::get().to(checkout_handlers::list_orders_handler))
          .route("/{order_id}", web::get().to(checkout_handlers::get_order_handler))
          .route(
            "/{order_id}/status",
            web::patch().to(checkout_handlers::update_order_status_handler),
          ),
      ),
  );
}

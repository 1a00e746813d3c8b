// vitrin/src/web/handlers/mod.rs

// Declare handler modules
pub mod auth_handlers;
pub mod cart_handlers;
pub mod category_handlers;
pub mod checkout_handlers;
pub mod product_handlers;

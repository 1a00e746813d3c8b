// vitrin/src/models/mod.rs

//! Data structures representing database entities.

pub mod cart_line;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;
pub mod variant;

// Re-export the model structs for convenient access
pub use cart_line::{CartLineRecord, CART_LINE_SELECT};
pub use category::Category;
pub use order::{AddressData, Order, OrderStatus, PaymentStatus};
pub use order_item::OrderItem;
pub use product::Product;
pub use user::User;
pub use variant::ProductVariant;

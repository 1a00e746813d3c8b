// vitrin/src/store/mod.rs

pub mod cart;

pub use cart::PgCartStore;

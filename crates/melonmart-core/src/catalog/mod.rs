//! Product catalog domain.

pub mod model;

pub use model::{ImageUpload, NewProductForm, Product, ProductId, SellerInfo};

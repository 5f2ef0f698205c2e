//! Document models and DTOs for the six dashboard collections.

pub mod affiliate_stat;
pub mod overall_stat;
pub mod pagination;
pub mod product;
pub mod product_stat;
pub mod transaction;
pub mod user;

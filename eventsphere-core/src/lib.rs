pub mod catalog;
pub mod common;
pub mod domain;
pub mod query;

pub use catalog::Catalog;
pub use common::error::{Result, SphereError};
pub use domain::*;

pub mod price_series;
pub mod quote;
pub mod report;

pub use price_series::*;
pub use quote::*;
pub use report::*;

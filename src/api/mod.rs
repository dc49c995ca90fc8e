pub mod context;
pub mod middleware;
pub mod validation;
pub mod wrap;

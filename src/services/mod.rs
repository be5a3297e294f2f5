//! Query logic behind the routes.

pub mod connectivity;
pub mod dashboard;

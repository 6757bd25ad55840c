pub mod schema;

pub use schema::{Config, PreviewConfig, ServiceConfig};

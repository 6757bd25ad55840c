pub mod api;
pub mod http;

pub use api::{RenderClient, UploadResponse};
pub use http::build_service_client;

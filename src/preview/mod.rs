pub mod request;
pub mod scheduler;

pub use request::{EccLevel, FillStyle, FormSnapshot, PreviewFrame, RenderRequest};
pub use scheduler::{PreviewScheduler, PreviewSink, RenderPreview};

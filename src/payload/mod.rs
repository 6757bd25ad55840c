pub mod compose;
pub mod escape;
pub mod fields;
pub mod selection;

pub use fields::FormFields;
pub use selection::{DataSelection, WifiAuth};

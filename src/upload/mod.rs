pub mod coordinator;
pub mod kinds;
pub mod logo;
pub mod validate;

pub use coordinator::{UploadCoordinator, UploadOutcome};
pub use kinds::{AssetKind, KindRules, UploadRules};
pub use logo::{analyze_logo, recommended_logo_edge, LogoReport};
pub use validate::{validate_selection, SelectedFile, SelectionReport};

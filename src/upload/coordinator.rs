use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::client::RenderClient;
use crate::error::{Result, TransportError, ValidationError};
use crate::payload::fields;
use crate::payload::FormFields;
use crate::preview::{FormSnapshot, PreviewScheduler};

use super::kinds::{AssetKind, UploadRules};
use super::validate::{validate_selection, SelectedFile, SelectionReport};

/// Result of a completed upload: the reference now stored in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub kind: AssetKind,
    pub reference: String,
    pub filename: String,
    pub size_bytes: u64,
}

/// Validates and performs uploads, then writes the returned reference back
/// into the shared form and nudges the preview pipeline.
///
/// Uploads of different kinds are independent. A second upload of the same
/// kind supersedes the stored reference in completion order — the earlier
/// in-flight request is not canceled, the later write simply wins.
pub struct UploadCoordinator {
    client: Arc<RenderClient>,
    scheduler: PreviewScheduler,
    form: Arc<Mutex<FormFields>>,
    rules: UploadRules,
}

impl UploadCoordinator {
    pub fn new(
        client: Arc<RenderClient>,
        scheduler: PreviewScheduler,
        form: Arc<Mutex<FormFields>>,
        rules: UploadRules,
    ) -> Self {
        Self {
            client,
            scheduler,
            form,
            rules,
        }
    }

    /// Client-side gate for the upload action of `kind`.
    #[must_use]
    pub fn validate(&self, kind: AssetKind, file: &SelectedFile) -> SelectionReport {
        validate_selection(file, self.rules.for_kind(kind))
    }

    /// Upload `file` as `kind`. Hard validation failures block the call;
    /// a soft over-limit selection is attempted anyway with a warning.
    pub async fn upload(&self, kind: AssetKind, file: SelectedFile) -> Result<UploadOutcome> {
        if file.filename.is_empty() || file.bytes.is_empty() {
            return Err(ValidationError::NoFile.into());
        }
        let report = self.validate(kind, &file);
        if !report.accepted {
            return Err(ValidationError::UnsupportedType {
                kind: kind.to_string(),
                filename: file.filename,
            }
            .into());
        }
        if report.over_limit {
            warn!(
                kind = %kind,
                size_bytes = file.size_bytes(),
                "file exceeds the soft size limit; attempting upload anyway"
            );
        }

        let outcome = match kind {
            AssetKind::Logo => {
                self.client.upload_logo(&file).await?;
                UploadOutcome {
                    kind,
                    reference: file.filename.clone(),
                    filename: file.filename.clone(),
                    size_bytes: file.size_bytes(),
                }
            }
            _ => {
                let response = self.client.upload_asset(kind, &file).await?;
                let reference = response.reference().ok_or_else(|| {
                    TransportError::UnexpectedResponse {
                        endpoint: format!("upload_asset/{kind}"),
                        message: "response carries neither short_url nor url".into(),
                    }
                })?;
                UploadOutcome {
                    kind,
                    reference: reference.to_owned(),
                    filename: response.filename.clone(),
                    size_bytes: response.size,
                }
            }
        };

        info!(kind = %kind, reference = %outcome.reference, "upload stored");
        self.write_back(kind, &outcome.reference);
        Ok(outcome)
    }

    /// Remove a gallery logo. Clears the form's logo field (and refreshes
    /// the preview) only when it still points at the deleted name.
    pub async fn delete_logo(&self, name: &str) -> Result<()> {
        self.client.delete_logo(name).await?;
        let snapshot = {
            let Ok(mut form) = self.form.lock() else {
                return Ok(());
            };
            if form.text(fields::LOGO) != name {
                return Ok(());
            }
            form.clear(fields::LOGO);
            FormSnapshot::from_fields(&form)
        };
        debug!(logo = %name, "deleted logo was selected; refreshing preview");
        self.scheduler.schedule(snapshot);
        Ok(())
    }

    /// Store the reference in the kind's form field and re-render.
    /// Last write wins for racing uploads of the same kind.
    fn write_back(&self, kind: AssetKind, reference: &str) {
        let snapshot = {
            let Ok(mut form) = self.form.lock() else {
                return;
            };
            form.set_text(kind.reference_field(), reference);
            FormSnapshot::from_fields(&form)
        };
        self.scheduler.schedule(snapshot);
    }
}

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::payload::fields::{self, FormFields};
use crate::payload::DataSelection;

/// Error-correction level for the rendered code. The service upper-cases
/// whatever it receives and falls back to `H`, so parsing here is
/// case-insensitive with the same fallback.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum EccLevel {
    L,
    M,
    Q,
    #[default]
    H,
}

impl EccLevel {
    #[must_use]
    pub fn from_form(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// Module fill style. `fill_color2` only matters for the gradient styles,
/// but the form always carries it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FillStyle {
    #[default]
    Solid,
    Linear,
    Radial,
}

impl FillStyle {
    #[must_use]
    pub fn from_form(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Whether the secondary fill color participates in rendering.
    #[must_use]
    pub fn uses_secondary_color(&self) -> bool {
        matches!(self, Self::Linear | Self::Radial)
    }
}

/// Everything the image-preview call carries besides the fixed raster
/// output format, which the render client pins to `png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub data: String,
    /// Logo reference; empty when none is selected.
    pub logo: String,
    pub transparent: bool,
    pub size_px: u32,
    pub ecc: EccLevel,
    pub fill_style: FillStyle,
    pub fill_color: String,
    pub back_color: String,
    pub fill_color2: String,
}

/// A rendered preview image plus the background flag it was rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub image: Vec<u8>,
    pub transparent: bool,
}

/// Immutable snapshot of the form at one edit, bound to a typed selection.
/// One snapshot corresponds 1:1 with one (potential) preview request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub selection: DataSelection,
    pub logo: String,
    pub transparent: bool,
    pub size_px: u32,
    pub ecc: EccLevel,
    pub fill_style: FillStyle,
    pub fill_color: String,
    pub back_color: String,
    pub fill_color2: String,
}

const DEFAULT_PREVIEW_SIZE_PX: u32 = 512;
const DEFAULT_FILL_COLOR: &str = "#000";
const DEFAULT_BACK_COLOR: &str = "#fff";
const DEFAULT_FILL_COLOR2: &str = "#000000";

impl FormSnapshot {
    /// Capture the current form state. The data-type tag comes from the
    /// `data_type` field, defaulting to `url`; render settings fall back to
    /// the service's own defaults when unset or unparsable.
    #[must_use]
    pub fn from_fields(form: &FormFields) -> Self {
        let tag = match form.text(fields::DATA_TYPE) {
            "" => "url",
            tag => tag,
        };
        let size_px = form
            .text(fields::SIZE_PX)
            .parse()
            .unwrap_or(DEFAULT_PREVIEW_SIZE_PX);
        Self {
            selection: DataSelection::from_fields(tag, form),
            logo: form.text(fields::LOGO).to_owned(),
            transparent: form.flag(fields::TRANSPARENT),
            size_px,
            ecc: EccLevel::from_form(form.text(fields::ECC)),
            fill_style: FillStyle::from_form(form.text(fields::FILL_STYLE)),
            fill_color: non_empty_or(form.text(fields::FILL_COLOR), DEFAULT_FILL_COLOR),
            back_color: non_empty_or(form.text(fields::BACK_COLOR), DEFAULT_BACK_COLOR),
            fill_color2: non_empty_or(form.text(fields::FILL_COLOR2), DEFAULT_FILL_COLOR2),
        }
    }

    /// Assemble the render call for this snapshot.
    #[must_use]
    pub fn render_request(&self) -> RenderRequest {
        RenderRequest {
            data: self.selection.compose(),
            logo: self.logo.clone(),
            transparent: self.transparent,
            size_px: self.size_px,
            ecc: self.ecc,
            fill_style: self.fill_style,
            fill_color: self.fill_color.clone(),
            back_color: self.back_color.clone(),
            fill_color2: self.fill_color2.clone(),
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_owned()
    } else {
        value.to_owned()
    }
}

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::payload::fields;

const MB: u64 = 1024 * 1024;

/// The fixed asset categories governing upload validation. The lowercase
/// form is the wire tag used in `/upload_asset/{kind}` paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AssetKind {
    Pdf,
    Mp3,
    Image,
    Logo,
}

impl AssetKind {
    /// Kinds routed through the generic asset endpoint; the logo has its
    /// own upload route.
    pub const ASSET_KINDS: [Self; 3] = [Self::Pdf, Self::Mp3, Self::Image];

    /// Form field that receives the stored reference after a successful
    /// upload of this kind.
    #[must_use]
    pub fn reference_field(&self) -> &'static str {
        match self {
            Self::Pdf => fields::DT_PDF,
            Self::Mp3 => fields::DT_MP3,
            Self::Image => fields::DT_IMAGE,
            Self::Logo => fields::LOGO,
        }
    }
}

/// Validation rules for one asset kind: MIME/extension allow-lists plus a
/// soft size limit. Exceeding the limit flags the selection but does not
/// block the upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindRules {
    pub mime_types: Vec<String>,
    pub extensions: Vec<String>,
    pub soft_max_bytes: u64,
}

impl KindRules {
    #[must_use]
    pub fn defaults_for(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Pdf => Self {
                mime_types: vec!["application/pdf".into()],
                extensions: vec![".pdf".into()],
                soft_max_bytes: 10 * MB,
            },
            AssetKind::Mp3 => Self {
                mime_types: vec!["audio/mpeg".into()],
                extensions: vec![".mp3".into()],
                soft_max_bytes: 15 * MB,
            },
            AssetKind::Image => Self {
                mime_types: vec!["image/png".into(), "image/jpeg".into()],
                extensions: vec![".png".into(), ".jpg".into(), ".jpeg".into()],
                soft_max_bytes: 5 * MB,
            },
            AssetKind::Logo => Self {
                mime_types: vec!["image/png".into(), "image/jpeg".into()],
                extensions: vec![".png".into(), ".jpg".into(), ".jpeg".into()],
                soft_max_bytes: MB,
            },
        }
    }
}

/// Per-kind rule table, overridable from config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRules {
    #[serde(default = "default_pdf_rules")]
    pub pdf: KindRules,
    #[serde(default = "default_mp3_rules")]
    pub mp3: KindRules,
    #[serde(default = "default_image_rules")]
    pub image: KindRules,
    #[serde(default = "default_logo_rules")]
    pub logo: KindRules,
}

impl UploadRules {
    #[must_use]
    pub fn for_kind(&self, kind: AssetKind) -> &KindRules {
        match kind {
            AssetKind::Pdf => &self.pdf,
            AssetKind::Mp3 => &self.mp3,
            AssetKind::Image => &self.image,
            AssetKind::Logo => &self.logo,
        }
    }
}

impl Default for UploadRules {
    fn default() -> Self {
        Self {
            pdf: default_pdf_rules(),
            mp3: default_mp3_rules(),
            image: default_image_rules(),
            logo: default_logo_rules(),
        }
    }
}

fn default_pdf_rules() -> KindRules {
    KindRules::defaults_for(AssetKind::Pdf)
}

fn default_mp3_rules() -> KindRules {
    KindRules::defaults_for(AssetKind::Mp3)
}

fn default_image_rules() -> KindRules {
    KindRules::defaults_for(AssetKind::Image)
}

fn default_logo_rules() -> KindRules {
    KindRules::defaults_for(AssetKind::Logo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_tags_are_lowercase() {
        assert_eq!(AssetKind::Pdf.to_string(), "pdf");
        assert_eq!("IMAGE".parse::<AssetKind>().unwrap(), AssetKind::Image);
        assert!("vcard".parse::<AssetKind>().is_err());
    }

    #[test]
    fn reference_fields_match_the_form_contract() {
        assert_eq!(AssetKind::Pdf.reference_field(), fields::DT_PDF);
        assert_eq!(AssetKind::Logo.reference_field(), fields::LOGO);
    }

    #[test]
    fn default_limits_match_the_service() {
        let rules = UploadRules::default();
        assert_eq!(rules.pdf.soft_max_bytes, 10 * MB);
        assert_eq!(rules.mp3.soft_max_bytes, 15 * MB);
        assert_eq!(rules.image.soft_max_bytes, 5 * MB);
        assert_eq!(rules.logo.soft_max_bytes, MB);
    }

    #[test]
    fn image_rules_accept_both_jpeg_spellings() {
        let rules = UploadRules::default();
        assert!(rules.image.extensions.contains(&".jpg".to_string()));
        assert!(rules.image.extensions.contains(&".jpeg".to_string()));
    }
}

use std::collections::HashMap;

// Form field names, matching the rendering service's form contract.
pub const DATA_TYPE: &str = "data_type";
pub const DT_URL: &str = "dt_url";
pub const DT_TEXT: &str = "dt_text";
pub const DT_PDF: &str = "dt_pdf";
pub const DT_MP3: &str = "dt_mp3";
pub const DT_IMAGE: &str = "dt_image";
pub const WIFI_SSID: &str = "wifi_ssid";
pub const WIFI_AUTH: &str = "wifi_auth";
pub const WIFI_PASS: &str = "wifi_pass";
pub const WIFI_HIDDEN: &str = "wifi_hidden";
pub const EMAIL_TO: &str = "email_to";
pub const EMAIL_SUBJECT: &str = "email_subject";
pub const EMAIL_BODY: &str = "email_body";
pub const SMS_TO: &str = "sms_to";
pub const SMS_BODY: &str = "sms_body";
pub const LOGO: &str = "logo";
pub const TRANSPARENT: &str = "transparent";
pub const SIZE_PX: &str = "size_px";
pub const ECC: &str = "ecc";
pub const FILL_STYLE: &str = "fill_style";
pub const FILL_COLOR: &str = "fill_color";
pub const BACK_COLOR: &str = "back_color";
pub const FILL_COLOR2: &str = "fill_color2";

/// Fields that hold a checkbox state rather than text.
pub const FLAG_FIELDS: &[&str] = &[WIFI_HIDDEN, TRANSPARENT];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

/// Current form state: field name → value. Ephemeral, owned by the caller,
/// never persisted. Absent fields read as empty text / unchecked flags.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    values: HashMap<String, FieldValue>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .insert(name.to_string(), FieldValue::Text(value.into()));
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.values
            .insert(name.to_string(), FieldValue::Flag(value));
    }

    /// Route a raw string value to the right representation for `name`.
    /// Checkbox fields accept `true`/`1`/`on` as checked.
    pub fn set_raw(&mut self, name: &str, value: &str) {
        if FLAG_FIELDS.contains(&name) {
            let checked = matches!(value.trim(), "true" | "1" | "on");
            self.set_flag(name, checked);
        } else {
            self.set_text(name, value);
        }
    }

    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FieldValue::Text(value)) => value.as_str(),
            _ => "",
        }
    }

    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FieldValue::Flag(true)))
    }

    pub fn clear(&mut self, name: &str) {
        self.values.remove(name);
    }
}

use strum::{Display, EnumString};

use super::fields::{self, FormFields};

/// Wi-Fi authentication mode carried in the `T:` segment.
///
/// Unset or unrecognized values fall back to WPA, matching the service's
/// form default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
pub enum WifiAuth {
    #[default]
    #[strum(serialize = "WPA")]
    Wpa,
    #[strum(serialize = "WEP")]
    Wep,
    #[strum(serialize = "nopass")]
    Nopass,
}

impl WifiAuth {
    /// Parse a form value, falling back to WPA for empty/unknown input.
    #[must_use]
    pub fn from_form(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// The closed set of data-type selections. Each variant carries exactly the
/// fields its composer reads; `Unknown` is the fail-open catch-all for
/// unrecognized tags and composes to an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSelection {
    Url { url: String },
    Text { text: String },
    Wifi {
        ssid: String,
        auth: WifiAuth,
        password: String,
        hidden: bool,
    },
    Email {
        to: String,
        subject: String,
        body: String,
    },
    Sms { to: String, body: String },
    Pdf { href: String },
    Mp3 { href: String },
    Image { href: String },
    Unknown,
}

impl DataSelection {
    /// Bind a data-type tag plus the current form state to a typed
    /// selection. Absent fields read as empty strings; an unrecognized tag
    /// yields `Unknown` rather than an error.
    #[must_use]
    pub fn from_fields(tag: &str, fields: &FormFields) -> Self {
        match tag {
            "url" => Self::Url {
                url: fields.text(fields::DT_URL).to_owned(),
            },
            "text" => Self::Text {
                text: fields.text(fields::DT_TEXT).to_owned(),
            },
            "wifi" => Self::Wifi {
                ssid: fields.text(fields::WIFI_SSID).to_owned(),
                auth: WifiAuth::from_form(fields.text(fields::WIFI_AUTH)),
                password: fields.text(fields::WIFI_PASS).to_owned(),
                hidden: fields.flag(fields::WIFI_HIDDEN),
            },
            "email" => Self::Email {
                to: fields.text(fields::EMAIL_TO).to_owned(),
                subject: fields.text(fields::EMAIL_SUBJECT).to_owned(),
                body: fields.text(fields::EMAIL_BODY).to_owned(),
            },
            "sms" => Self::Sms {
                to: fields.text(fields::SMS_TO).to_owned(),
                body: fields.text(fields::SMS_BODY).to_owned(),
            },
            "pdf" => Self::Pdf {
                href: fields.text(fields::DT_PDF).to_owned(),
            },
            "mp3" => Self::Mp3 {
                href: fields.text(fields::DT_MP3).to_owned(),
            },
            "image" => Self::Image {
                href: fields.text(fields::DT_IMAGE).to_owned(),
            },
            _ => Self::Unknown,
        }
    }
}

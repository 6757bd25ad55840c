//! Payload composition: one pure composer per data-type selection.

use super::escape::{encode_mailto_body, encode_mailto_component, escape_wifi_field};
use super::selection::{DataSelection, WifiAuth};

impl DataSelection {
    /// Compose the QR payload string for this selection. Deterministic, no
    /// side effects, never fails: absent fields are empty strings and the
    /// `Unknown` variant degrades to an empty payload.
    #[must_use]
    pub fn compose(&self) -> String {
        match self {
            Self::Url { url } => url.trim().to_owned(),
            Self::Text { text } => text.clone(),
            Self::Wifi {
                ssid,
                auth,
                password,
                hidden,
            } => compose_wifi(ssid, *auth, password, *hidden),
            Self::Email { to, subject, body } => compose_email(to, subject, body),
            Self::Sms { to, body } => compose_sms(to, body),
            Self::Pdf { href } | Self::Mp3 { href } | Self::Image { href } => {
                href.trim().to_owned()
            }
            Self::Unknown => String::new(),
        }
    }
}

/// `WIFI:T:<auth>;S:<ssid>;[P:<pass>;]H:<hidden>;;` — the `P:` segment is
/// omitted entirely for `nopass`, whatever the password field holds.
fn compose_wifi(ssid: &str, auth: WifiAuth, password: &str, hidden: bool) -> String {
    let ssid = escape_wifi_field(ssid);
    let hidden = if hidden { "true" } else { "false" };
    let pass_segment = if auth == WifiAuth::Nopass {
        String::new()
    } else {
        format!("P:{};", escape_wifi_field(password))
    };
    format!("WIFI:T:{auth};S:{ssid};{pass_segment}H:{hidden};;")
}

/// `mailto:<to>` plus an optional query; each key is omitted when its
/// source field is empty, and the `?` disappears when both are.
fn compose_email(to: &str, subject: &str, body: &str) -> String {
    let mut url = format!("mailto:{}", to.trim());
    let mut query = Vec::new();
    if !subject.is_empty() {
        query.push(format!("subject={}", encode_mailto_component(subject)));
    }
    if !body.is_empty() {
        query.push(format!("body={}", encode_mailto_body(body)));
    }
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.join("&"));
    }
    url
}

fn compose_sms(to: &str, body: &str) -> String {
    format!("SMSTO:{}:{}", to.trim(), body)
}

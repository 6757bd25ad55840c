use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use url::Url;

use crate::config::ServiceConfig;
use crate::error::{ConfigError, Result, TransportError};
use crate::preview::{RenderPreview, RenderRequest};
use crate::upload::{AssetKind, SelectedFile};

use super::http::build_service_client;

/// Previews are always requested as a raster image, whatever export format
/// the user has picked for the final download.
const PREVIEW_OUT_FORMAT: &str = "png";

const GENERIC_UPLOAD_FAILURE: &str = "upload failed";

/// Success body of `/upload_asset/{kind}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl UploadResponse {
    /// The reference to store: the short link when the service minted one,
    /// the long URL otherwise.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        non_empty(self.short_url.as_deref()).or_else(|| non_empty(self.url.as_deref()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Error body optionally returned by the upload endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP client for the rendering service's four endpoints.
pub struct RenderClient {
    http: reqwest::Client,
    base: Url,
}

impl RenderClient {
    pub fn new(service: &ServiceConfig) -> std::result::Result<Self, ConfigError> {
        let base = normalize_base(&service.base_url)?;
        let http = build_service_client(
            service.request_timeout_secs,
            service.connect_timeout_secs,
        );
        Ok(Self { http, base })
    }

    /// `POST /preview_qr` — returns the rendered image bytes.
    pub async fn preview_qr(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        let form = multipart::Form::new()
            .text("data", request.data.clone())
            .text("logo", request.logo.clone())
            .text("transparent", if request.transparent { "1" } else { "" })
            .text("size_px", request.size_px.to_string())
            .text("ecc", request.ecc.to_string())
            .text("fill_style", request.fill_style.to_string())
            .text("fill_color", request.fill_color.clone())
            .text("back_color", request.back_color.clone())
            .text("fill_color2", request.fill_color2.clone())
            .text("out_format", PREVIEW_OUT_FORMAT);

        let response = self
            .http
            .post(self.endpoint("preview_qr")?)
            .multipart(form)
            .send()
            .await
            .map_err(|error| request_error("preview_qr", &error))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|error| format!("<failed to read response body: {error}>"));
            return Err(TransportError::Status {
                endpoint: "preview_qr".into(),
                status: status.as_u16(),
                message: fallback_if_empty(message, "preview render failed"),
            }
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|error| request_error("preview_qr", &error))?;
        Ok(bytes.to_vec())
    }

    /// `POST /upload_asset/{kind}` — multipart upload of a single file
    /// under the `file` field; JSON response either way.
    pub async fn upload_asset(
        &self,
        kind: AssetKind,
        file: &SelectedFile,
    ) -> Result<UploadResponse> {
        let endpoint = format!("upload_asset/{kind}");
        let form = multipart::Form::new().part("file", file_part(file)?);

        let response = self
            .http
            .post(self.endpoint(&endpoint)?)
            .multipart(form)
            .send()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| GENERIC_UPLOAD_FAILURE.to_owned());
            return Err(TransportError::Status {
                endpoint,
                status: status.as_u16(),
                message,
            }
            .into());
        }

        serde_json::from_slice(&body).map_err(|error| {
            TransportError::UnexpectedResponse {
                endpoint,
                message: error.to_string(),
            }
            .into()
        })
    }

    /// `POST /upload_logo` — single file under the `logo` field; the
    /// success body is plain text and ignored beyond truthiness.
    pub async fn upload_logo(&self, file: &SelectedFile) -> Result<()> {
        let form = multipart::Form::new().part("logo", file_part(file)?);

        let response = self
            .http
            .post(self.endpoint("upload_logo")?)
            .multipart(form)
            .send()
            .await
            .map_err(|error| request_error("upload_logo", &error))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|error| format!("<failed to read response body: {error}>"));
            return Err(TransportError::Status {
                endpoint: "upload_logo".into(),
                status: status.as_u16(),
                message: fallback_if_empty(message, GENERIC_UPLOAD_FAILURE),
            }
            .into());
        }
        Ok(())
    }

    /// `DELETE /delete_logo/{name}` — no required body on success.
    pub async fn delete_logo(&self, name: &str) -> Result<()> {
        let endpoint = format!("delete_logo/{}", urlencoding::encode(name));
        let response = self
            .http
            .delete(self.endpoint(&endpoint)?)
            .send()
            .await
            .map_err(|error| request_error(&endpoint, &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint,
                status: status.as_u16(),
                message: "failed to delete logo".into(),
            }
            .into());
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|error| {
            TransportError::Request {
                endpoint: path.to_owned(),
                message: error.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl RenderPreview for RenderClient {
    async fn render_preview(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        self.preview_qr(request).await
    }
}

fn file_part(file: &SelectedFile) -> Result<multipart::Part> {
    let mime = file
        .declared_mime
        .clone()
        .or_else(|| file.sniffed_mime())
        .unwrap_or_else(|| "application/octet-stream".to_owned());
    multipart::Part::bytes(file.bytes.clone())
        .file_name(file.filename.clone())
        .mime_str(&mime)
        .map_err(|error| {
            TransportError::Request {
                endpoint: "multipart".into(),
                message: format!("invalid MIME type {mime}: {error}"),
            }
            .into()
        })
}

fn request_error(endpoint: &str, error: &reqwest::Error) -> crate::error::StudioError {
    TransportError::Request {
        endpoint: endpoint.to_owned(),
        message: error.to_string(),
    }
    .into()
}

fn fallback_if_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_owned()
    } else {
        message
    }
}

/// Parse and normalize the configured base URL so endpoint joins append
/// instead of replacing the final path segment.
fn normalize_base(base_url: &str) -> std::result::Result<Url, ConfigError> {
    let trimmed = base_url.trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}/"))
        .map_err(|error| ConfigError::Validation(format!("invalid base_url {base_url}: {error}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "base_url must be http(s), got {}",
            url.scheme()
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_prefers_the_short_url() {
        let response = UploadResponse {
            filename: "menu_1700000000.pdf".into(),
            size: 1024,
            short_url: Some("https://qr.example/s/abc".into()),
            url: Some("https://qr.example/static/files/pdf/menu_1700000000.pdf".into()),
        };
        assert_eq!(response.reference(), Some("https://qr.example/s/abc"));
    }

    #[test]
    fn upload_response_falls_back_to_the_long_url() {
        let response = UploadResponse {
            filename: "a.pdf".into(),
            size: 1,
            short_url: None,
            url: Some("https://qr.example/static/files/pdf/a.pdf".into()),
        };
        assert_eq!(
            response.reference(),
            Some("https://qr.example/static/files/pdf/a.pdf")
        );
    }

    #[test]
    fn upload_response_empty_strings_do_not_count() {
        let response = UploadResponse {
            filename: "a.pdf".into(),
            size: 1,
            short_url: Some(String::new()),
            url: None,
        };
        assert_eq!(response.reference(), None);
    }

    #[test]
    fn base_url_normalization_keeps_the_path() {
        let base = normalize_base("https://qr.example/tool").unwrap();
        assert_eq!(
            base.join("preview_qr").unwrap().as_str(),
            "https://qr.example/tool/preview_qr"
        );
    }

    #[test]
    fn base_url_rejects_other_schemes() {
        assert!(normalize_base("ftp://qr.example").is_err());
        assert!(normalize_base("not a url").is_err());
    }
}

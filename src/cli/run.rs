//! Command handlers: bind CLI arguments onto the form, then drive the
//! controller the way the web page does.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::client::RenderClient;
use crate::config::Config;
use crate::error::StudioError;
use crate::payload::fields;
use crate::payload::FormFields;
use crate::preview::{FormSnapshot, PreviewFrame, PreviewScheduler, PreviewSink};
use crate::upload::{analyze_logo, AssetKind, SelectedFile, UploadCoordinator};
use crate::util::format_bytes;

/// How long upload commands wait for the follow-up preview refresh.
const REFRESH_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

enum PreviewEvent {
    Rendered { bytes: usize, transparent: bool },
    Failed(String),
}

/// Sink shared by all commands: optionally writes the image to disk,
/// optionally echoes the textual payload, and forwards outcomes.
struct CliPreviewSink {
    out: Option<PathBuf>,
    announce_payloads: bool,
    events: mpsc::UnboundedSender<PreviewEvent>,
}

impl PreviewSink for CliPreviewSink {
    fn payload_changed(&self, payload: &str) {
        if self.announce_payloads {
            let shown = if payload.is_empty() { "(empty)" } else { payload };
            println!("payload: {shown}");
        } else {
            debug!(payload, "payload recomposed");
        }
    }

    fn image_ready(&self, frame: PreviewFrame) {
        if let Some(out) = &self.out {
            if let Err(error) = std::fs::write(out, &frame.image) {
                let _ = self.events.send(PreviewEvent::Failed(format!(
                    "write {}: {error}",
                    out.display()
                )));
                return;
            }
        }
        let _ = self.events.send(PreviewEvent::Rendered {
            bytes: frame.image.len(),
            transparent: frame.transparent,
        });
    }

    fn preview_failed(&self, error: &StudioError) {
        let _ = self.events.send(PreviewEvent::Failed(error.to_string()));
    }
}

fn build_form(config: &Config, data_type: &str, assignments: &[(String, String)]) -> FormFields {
    let mut form = config.preview.seed_form();
    form.set_text(fields::DATA_TYPE, data_type);
    for (name, value) in assignments {
        form.set_raw(name, value);
    }
    form
}

struct Pipeline {
    scheduler: PreviewScheduler,
    client: Arc<RenderClient>,
    events: mpsc::UnboundedReceiver<PreviewEvent>,
}

fn build_pipeline(config: &Config, out: Option<PathBuf>, announce_payloads: bool) -> Result<Pipeline> {
    let client = Arc::new(RenderClient::new(&config.service)?);
    let (tx, events) = mpsc::unbounded_channel();
    let sink = Arc::new(CliPreviewSink {
        out,
        announce_payloads,
        events: tx,
    });
    let scheduler = PreviewScheduler::new(client.clone(), sink, config.preview.window());
    Ok(Pipeline {
        scheduler,
        client,
        events,
    })
}

fn describe_render(out: &Path, bytes: usize, transparent: bool) -> String {
    let suffix = if transparent {
        " (transparent background)"
    } else {
        ""
    };
    format!(
        "wrote {} ({}){suffix}",
        out.display(),
        format_bytes(bytes as u64)
    )
}

// ── compose ───────────────────────────────────────────────────────

pub fn compose(config: &Config, data_type: &str, assignments: &[(String, String)]) -> Result<()> {
    let form = build_form(config, data_type, assignments);
    let snapshot = FormSnapshot::from_fields(&form);
    println!("{}", snapshot.selection.compose());
    Ok(())
}

// ── preview ───────────────────────────────────────────────────────

pub async fn preview(
    config: &Config,
    data_type: &str,
    assignments: &[(String, String)],
    out: PathBuf,
) -> Result<()> {
    let form = build_form(config, data_type, assignments);
    let mut pipeline = build_pipeline(config, Some(out.clone()), true)?;
    pipeline
        .scheduler
        .refresh_now(FormSnapshot::from_fields(&form));

    match pipeline.events.recv().await {
        Some(PreviewEvent::Rendered { bytes, transparent }) => {
            println!("{}", describe_render(&out, bytes, transparent));
            Ok(())
        }
        Some(PreviewEvent::Failed(message)) => bail!("preview failed: {message}"),
        None => bail!("preview pipeline shut down unexpectedly"),
    }
}

// ── watch ─────────────────────────────────────────────────────────

pub async fn watch(
    config: &Config,
    data_type: &str,
    assignments: &[(String, String)],
    out: PathBuf,
) -> Result<()> {
    let mut form = build_form(config, data_type, assignments);
    let mut pipeline = build_pipeline(config, Some(out.clone()), true)?;
    pipeline
        .scheduler
        .refresh_now(FormSnapshot::from_fields(&form));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let Some((name, value)) = line.split_once('=') else {
                    warn!(line, "expected field=value");
                    continue;
                };
                form.set_raw(name.trim(), value);
                pipeline.scheduler.schedule(FormSnapshot::from_fields(&form));
            }
            event = pipeline.events.recv() => {
                match event {
                    Some(PreviewEvent::Rendered { bytes, transparent }) => {
                        println!("{}", describe_render(&out, bytes, transparent));
                    }
                    Some(PreviewEvent::Failed(message)) => eprintln!("preview failed: {message}"),
                    None => break,
                }
            }
        }
    }
    Ok(())
}

// ── uploads ───────────────────────────────────────────────────────

pub async fn upload(config: &Config, kind: AssetKind, path: PathBuf) -> Result<()> {
    let file = SelectedFile::read(&path).await?;
    let mut pipeline = build_pipeline(config, None, false)?;
    let form = Arc::new(Mutex::new(config.preview.seed_form()));
    let coordinator = UploadCoordinator::new(
        pipeline.client.clone(),
        pipeline.scheduler.clone(),
        form,
        config.uploads.clone(),
    );

    let report = coordinator.validate(kind, &file);
    if report.accepted {
        if let Some(reason) = &report.reason {
            eprintln!("warning: {reason}");
        }
    }

    let outcome = coordinator.upload(kind, file).await?;
    println!(
        "uploaded {} ({}) -> {}",
        outcome.filename,
        format_bytes(outcome.size_bytes),
        outcome.reference
    );

    drain_refresh(&mut pipeline.events).await;
    Ok(())
}

pub async fn logo_upload(config: &Config, path: PathBuf, qr_size: u32) -> Result<()> {
    let file = SelectedFile::read(&path).await?;

    match analyze_logo(&file.bytes, qr_size) {
        Ok(report) => {
            println!(
                "logo: {}x{}px, {} | recommended longest edge <= {}px (~25% of QR size)",
                report.width,
                report.height,
                format_bytes(report.size_bytes),
                report.recommended_edge
            );
            if report.oversized {
                eprintln!("warning: logo is larger than necessary for this QR size");
            }
        }
        Err(error) => warn!(error = %error, "could not analyze logo dimensions"),
    }

    let mut pipeline = build_pipeline(config, None, false)?;
    let form = Arc::new(Mutex::new(config.preview.seed_form()));
    let coordinator = UploadCoordinator::new(
        pipeline.client.clone(),
        pipeline.scheduler.clone(),
        form,
        config.uploads.clone(),
    );

    let outcome = coordinator.upload(AssetKind::Logo, file).await?;
    println!("logo uploaded: {}", outcome.reference);

    drain_refresh(&mut pipeline.events).await;
    Ok(())
}

pub async fn logo_delete(config: &Config, name: &str) -> Result<()> {
    let pipeline = build_pipeline(config, None, false)?;
    let form = Arc::new(Mutex::new(config.preview.seed_form()));
    let coordinator = UploadCoordinator::new(
        pipeline.client.clone(),
        pipeline.scheduler,
        form,
        config.uploads.clone(),
    );
    coordinator.delete_logo(name).await?;
    println!("logo deleted: {name}");
    Ok(())
}

/// Wait briefly for the post-upload preview refresh so its outcome makes
/// it into the logs before the process exits.
async fn drain_refresh(events: &mut mpsc::UnboundedReceiver<PreviewEvent>) {
    match tokio::time::timeout(REFRESH_DRAIN_TIMEOUT, events.recv()).await {
        Ok(Some(PreviewEvent::Rendered { bytes, .. })) => {
            debug!(bytes, "preview refreshed after upload");
        }
        Ok(Some(PreviewEvent::Failed(message))) => {
            warn!(message = %message, "preview refresh after upload failed");
        }
        Ok(None) => {}
        Err(_) => warn!("preview refresh after upload did not complete in time"),
    }
}

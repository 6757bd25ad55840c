use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::upload::AssetKind;

/// `QRStudio` - client-side controller for a QR-code generation service.
#[derive(Parser, Debug)]
#[command(name = "qrstudio")]
#[command(version = "0.1.0")]
#[command(about = "Compose QR payloads, drive live previews, manage uploads.", long_about = None)]
pub struct Cli {
    /// Path to config.toml (defaults to the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose the QR payload for a data type, no service contact
    Compose {
        /// Data type (url, text, wifi, email, sms, pdf, mp3, image)
        #[arg(short = 't', long = "type", default_value = "url")]
        data_type: String,

        /// Form field assignment, repeatable: --field wifi_ssid=MyNet
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        field: Vec<(String, String)>,
    },

    /// Render a one-shot preview image to a file
    Preview {
        #[arg(short = 't', long = "type", default_value = "url")]
        data_type: String,

        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        field: Vec<(String, String)>,

        /// Output path for the PNG preview
        #[arg(short, long, default_value = "preview.png")]
        out: PathBuf,
    },

    /// Read `field=value` edits from stdin and re-render the preview
    /// through the debounced pipeline
    Watch {
        #[arg(short = 't', long = "type", default_value = "url")]
        data_type: String,

        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        field: Vec<(String, String)>,

        /// File the latest preview image is written to
        #[arg(short, long, default_value = "preview.png")]
        out: PathBuf,
    },

    /// Validate and upload an asset, printing the stored reference
    Upload {
        /// Asset kind (pdf, mp3, image)
        #[arg(value_parser = parse_kind)]
        kind: AssetKind,

        /// File to upload
        path: PathBuf,
    },

    /// Manage the logo gallery
    Logo {
        #[command(subcommand)]
        command: LogoCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogoCommands {
    /// Validate, analyze and upload a logo image
    Upload {
        path: PathBuf,

        /// QR size the size recommendation is computed against
        #[arg(long, default_value = "1024")]
        qr_size: u32,
    },

    /// Delete a gallery logo by name
    Delete { name: String },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected field=value, got `{raw}`"))
}

fn parse_kind(raw: &str) -> Result<AssetKind, String> {
    raw.parse()
        .map_err(|_| format!("unsupported asset kind `{raw}` (pdf, mp3, image, logo)"))
}

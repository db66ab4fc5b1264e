use crate::debug_wheel::debug_wheel;
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use reqwest::header::ACCEPT;
use std::path::PathBuf;
use url::Url;
use wheel_core::{
    Wheel,
    fingerprint,
    load_file,
    load_slice,
};

pub const DEFAULT_OPTIONS_PATH: &str = "config/wheel-options.json";

/// Where the wheel's options come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionsSource {
    File(PathBuf),
    Remote(Url),
    Debug,
}

impl OptionsSource {
    pub fn is_debug(&self) -> bool {
        matches!(self, OptionsSource::Debug)
    }
}

impl std::fmt::Display for OptionsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsSource::File(path) => write!(f, "file {}", path.display()),
            OptionsSource::Remote(url) => write!(f, "endpoint {url}"),
            OptionsSource::Debug => f.write_str("built-in debug wheel"),
        }
    }
}

/// Expands a leading `~` in a user supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

pub async fn load(source: &OptionsSource) -> Result<Wheel> {
    let wheel = match source {
        OptionsSource::File(path) => load_file(path)
            .wrap_err_with(|| format!("failed to load wheel options from {}", path.display()))?,
        OptionsSource::Remote(url) => fetch(url).await?,
        OptionsSource::Debug => debug_wheel().wrap_err("debug wheel is invalid")?,
    };
    tracing::info!(source = %source, options = wheel.len(), "wheel ready");
    tracing::debug!("{}", wheel.breakdown());
    Ok(wheel)
}

async fn fetch(url: &Url) -> Result<Wheel> {
    let client = reqwest::Client::builder()
        .build()
        .wrap_err("failed to build options HTTP client")?;
    let resp = client
        .get(url.clone())
        .header(ACCEPT, "application/json")
        .send()
        .await
        .wrap_err_with(|| format!("request to options endpoint {url} failed"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(eyre!("options endpoint {url} returned HTTP {status}"));
    }
    let body = resp
        .bytes()
        .await
        .wrap_err("failed to read options endpoint response")?;
    let wheel = load_slice(&body)
        .wrap_err_with(|| format!("options endpoint {url} returned an unusable wheel"))?;
    tracing::info!(
        url = %url,
        fingerprint = %fingerprint(&body),
        options = wheel.len(),
        "fetched wheel options"
    );
    Ok(wheel)
}

use clap::Parser;
use color_eyre::eyre::Result;
use prize_wheel::{
    i18n::Locale,
    options_source::{
        DEFAULT_OPTIONS_PATH,
        OptionsSource,
        expand_path,
    },
    spin::DEFAULT_SPIN_DURATION,
};
use std::{
    path::PathBuf,
    time::Duration,
};
use url::Url;

mod client;
mod ui;

/// Terminal prize wheel: register, spin, win.
#[derive(Debug, Parser)]
#[command(name = "prize-wheel", version)]
struct Args {
    /// Option list to load
    #[arg(long, default_value = DEFAULT_OPTIONS_PATH)]
    options: String,

    /// Fetch the option list from an endpoint instead of a file
    #[arg(long, env = "PRIZE_WHEEL_OPTIONS_URL")]
    options_url: Option<Url>,

    /// Web hook that receives each winner as a form post
    #[arg(long, env = "PRIZE_WHEEL_SHEET_URL")]
    sheet_url: Option<Url>,

    /// Use the built-in debug wheel and skip the player form. Takes
    /// precedence over both option sources.
    #[arg(long)]
    debug_wheel: bool,

    #[arg(long, value_enum, default_value_t = Locale::Vi)]
    lang: Locale,

    /// Directory for the rolling log file
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Spin animation length in milliseconds
    #[arg(long, default_value_t = DEFAULT_SPIN_DURATION.as_millis() as u64)]
    spin_ms: u64,
}

impl Args {
    fn source(&self) -> OptionsSource {
        if self.debug_wheel {
            OptionsSource::Debug
        } else if let Some(url) = &self.options_url {
            OptionsSource::Remote(url.clone())
        } else {
            OptionsSource::File(expand_path(&self.options))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let _log_guard = client::init_tracing(&args.log_dir);
    tracing::info!(?args, "starting prize-wheel");

    let config = client::AppConfig {
        source: args.source(),
        locale: args.lang,
        winner_log_url: args.sheet_url.clone(),
        spin_duration: Duration::from_millis(args.spin_ms),
    };
    client::run_app(config).await
}

use crate::ui;
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use prize_wheel::{
    debug_wheel::debug_player,
    i18n::{
        Locale,
        Strings,
    },
    options_source::{
        self,
        OptionsSource,
    },
    player::PlayerInfo,
    spin::{
        FRAME_INTERVAL,
        FrameTicker,
        SpinFrame,
        WheelSpinner,
    },
    winner_log::WinnerLogger,
};
use rand::{
    SeedableRng,
    rngs::StdRng,
};
use std::{
    path::Path,
    time::{
        Duration,
        Instant,
    },
};
use tokio::task::JoinHandle;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling,
};
use tracing_subscriber::{
    EnvFilter,
    fmt,
};
use url::Url;
use wheel_core::{
    RandomSource,
    Wheel,
};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub source: OptionsSource,
    pub locale: Locale,
    pub winner_log_url: Option<Url>,
    pub spin_duration: Duration,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Form,
    Wheel,
    Result {
        winner: String,
    },
}

/// Everything the view needs for one frame.
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub screen: Screen,
    /// `None` until the option list has loaded.
    pub wheel: Option<Wheel>,
    pub rotation: f64,
    pub spinning: bool,
    pub status: String,
    pub locale: Locale,
    pub strings: &'static Strings,
}

pub struct AppController<R: RandomSource = StdRng> {
    spinner: Option<WheelSpinner>,
    spin_duration: Duration,
    source: OptionsSource,
    player: Option<PlayerInfo>,
    // submitted before the wheel was ready
    queued_player: Option<PlayerInfo>,
    keep_player: bool,
    logger: WinnerLogger,
    rng: R,
    locale: Locale,
    screen: Screen,
    status: String,
}

impl AppController {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let logger = WinnerLogger::new(config.winner_log_url.clone())?;
        if !logger.is_configured() {
            tracing::warn!("no winner log URL configured, winners will not be recorded remotely");
        }
        let mut controller = Self::with_rng(config, logger, StdRng::from_os_rng());
        if config.source.is_debug() {
            controller.keep_player = true;
            controller.set_player(debug_player());
        }
        Ok(controller)
    }
}

impl<R: RandomSource> AppController<R> {
    pub fn with_rng(config: &AppConfig, logger: WinnerLogger, rng: R) -> Self {
        Self {
            spinner: None,
            spin_duration: config.spin_duration,
            source: config.source.clone(),
            player: None,
            queued_player: None,
            keep_player: false,
            logger,
            rng,
            locale: config.locale,
            screen: Screen::Form,
            status: config.locale.strings().loading.to_string(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn is_loading(&self) -> bool {
        self.spinner.is_none()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn toggle_locale(&mut self) {
        let previous = self.locale;
        self.locale = self.locale.next();
        if self.status == previous.strings().loading {
            self.status = self.locale.strings().loading.to_string();
        }
        tracing::info!(locale = ?self.locale, "language switched");
    }

    /// Installs the loaded wheel and admits a player who registered early.
    pub fn on_options_loaded(&mut self, wheel: Wheel) {
        self.set_status(format!("{} options loaded from {}", wheel.len(), self.source));
        self.spinner = Some(WheelSpinner::new(wheel, self.spin_duration));
        if let Some(player) = self.queued_player.take() {
            self.admit(player);
        }
    }

    pub fn set_player(&mut self, player: PlayerInfo) {
        tracing::info!(has_email = !player.email.is_empty(), "player registered");
        if self.is_loading() {
            self.queued_player = Some(player);
            self.set_status(self.locale.strings().loading);
            return;
        }
        self.admit(player);
    }

    fn admit(&mut self, player: PlayerInfo) {
        self.player = Some(player);
        self.screen = Screen::Wheel;
        self.set_status(String::new());
    }

    /// Starts a spin if the wheel screen is up and idle.
    pub fn start_spin(&mut self, now: Instant) -> bool {
        if self.screen != Screen::Wheel || self.player.is_none() {
            return false;
        }
        let Some(spinner) = self.spinner.as_mut() else {
            return false;
        };
        spinner.start(now, &mut self.rng).is_some()
    }

    pub fn is_spinning(&self) -> bool {
        self.spinner.as_ref().is_some_and(WheelSpinner::is_spinning)
    }

    /// Advances the animation. Returns the winner's label once the spin ends.
    pub fn on_frame(&mut self, now: Instant) -> Option<String> {
        let spinner = self.spinner.as_mut()?;
        let SpinFrame::Finished { winner_index, .. } = spinner.advance(now) else {
            return None;
        };
        let winner = spinner
            .wheel()
            .get(winner_index)
            .map(|opt| opt.label.clone())
            .unwrap_or_default();
        tracing::info!(winner_index, winner = %winner, "spin finished");
        if let Some(player) = &self.player {
            let _ = self.logger.log_winner(player, &winner);
        }
        self.screen = Screen::Result {
            winner: winner.clone(),
        };
        Some(winner)
    }

    pub fn dismiss_result(&mut self) {
        if !matches!(self.screen, Screen::Result { .. }) {
            return;
        }
        if self.keep_player {
            self.screen = Screen::Wheel;
        } else {
            self.player = None;
            self.screen = Screen::Form;
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(spinner) = self.spinner.as_mut() {
            spinner.cancel();
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            screen: self.screen.clone(),
            wheel: self.spinner.as_ref().map(|spinner| spinner.wheel().clone()),
            rotation: self.spinner.as_ref().map_or(0.0, WheelSpinner::rotation),
            spinning: self.is_spinning(),
            status: self.status.clone(),
            locale: self.locale,
            strings: self.locale.strings(),
        }
    }
}

/// Routes tracing to a daily log file; the terminal belongs to the UI.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let appender = rolling::daily(log_dir, "prize-wheel.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    guard
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let controller = AppController::new(&config)?;
    let source = config.source.clone();
    let loader = tokio::spawn(async move { options_source::load(&source).await });
    let mut ui_state = ui::UiState::default();
    let mut input_events = ui::input_event_stream();

    tracing::info!("starting UI");
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(controller, Some(loader), &mut ui_state, &mut input_events).await;
    ui::terminal_exit()?;
    res
}

async fn next_frame(ticker: &mut Option<FrameTicker>) -> Option<Instant> {
    match ticker {
        Some(ticker) => ticker.next_frame().await,
        None => std::future::pending().await,
    }
}

async fn options_loaded(loader: &mut Option<JoinHandle<Result<Wheel>>>) -> Result<Wheel> {
    match loader {
        Some(task) => task.await.wrap_err("option loader task failed")?,
        None => std::future::pending().await,
    }
}

async fn run_loop<R: RandomSource>(
    mut controller: AppController<R>,
    mut loader: Option<JoinHandle<Result<Wheel>>>,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEventReceiver,
) -> Result<()> {
    let mut ticker: Option<FrameTicker> = None;
    ui::draw(ui_state, &controller.snapshot()).wrap_err("initial draw failed")?;

    loop {
        tokio::select! {
            loaded = options_loaded(&mut loader) => {
                loader = None;
                controller.on_options_loaded(loaded?);
                ui::draw(ui_state, &controller.snapshot())
                    .wrap_err("draw after loading failed")?;
            }
            frame = next_frame(&mut ticker) => {
                let now = frame.unwrap_or_else(Instant::now);
                controller.on_frame(now);
                if frame.is_none() || !controller.is_spinning() {
                    ticker = None;
                }
                ui::draw(ui_state, &controller.snapshot())
                    .wrap_err("draw after frame failed")?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
            raw_ev = ui::next_raw_event(input_events) => {
                let event = raw_ev?;
                let Some(ev) = ui::interpret_event(ui_state, event) else {
                    continue;
                };
                match ev {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::Spin => {
                        if controller.start_spin(Instant::now()) {
                            ticker = Some(FrameTicker::start(FRAME_INTERVAL));
                        }
                    }
                    ui::UserEvent::SubmitPlayer(player) => controller.set_player(player),
                    ui::UserEvent::DismissResult => controller.dismiss_result(),
                    ui::UserEvent::ToggleLocale => controller.toggle_locale(),
                    ui::UserEvent::Redraw => {}
                }
                ui::draw(ui_state, &controller.snapshot())
                    .wrap_err("draw after input failed")?;
            }
        }
    }
    controller.shutdown();
    drop(ticker);
    if let Some(task) = loader {
        task.abort();
    }
    Ok(())
}

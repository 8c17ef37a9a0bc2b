use std::{path::PathBuf, time::Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    app::{
        events::{AppEvent, start_frame_task, start_refresh_task},
        settings::{RuntimeSettings, load_runtime_settings, save_runtime_settings},
    },
    cli::Cli,
    data::forecast::ForecastClient,
    domain::weather::{
        Condition, CurrentConditions, Location, RefreshMetadata, evaluate_freshness,
    },
    fx::{EngineConfig, FrameStats, WeatherEngine},
    resilience::backoff::Backoff,
    ui::{
        layout::sky_area,
        raster::{CELL_WIDTH_PX, CellRaster},
    },
};

mod input;
mod methods_fetch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Loading,
    Ready,
    Error,
    Quit,
}

/// Where the current condition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionSource {
    Manual,
    Forecast,
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub engine: WeatherEngine,
    pub raster: CellRaster,
    pub condition: Condition,
    pub source: ConditionSource,
    pub location: Option<Location>,
    pub live: Option<CurrentConditions>,
    pub last_error: Option<String>,
    pub refresh_meta: RefreshMetadata,
    pub backoff: Backoff,
    pub fetch_in_flight: bool,
    pub settings: RuntimeSettings,
    pub settings_path: Option<PathBuf>,
    pub paused: bool,
    pub frame_tick: u64,
    pub last_stats: FrameStats,
    pub viewport: (u16, u16),
    clock: Instant,
    seed: Option<u64>,
    forecast: ForecastClient,
}

impl AppState {
    pub fn new(cli: &Cli) -> Self {
        let (settings, settings_path) = load_runtime_settings(cli, true);
        Self::with_settings(cli, settings, settings_path)
    }

    pub fn with_settings(
        cli: &Cli,
        settings: RuntimeSettings,
        settings_path: Option<PathBuf>,
    ) -> Self {
        let condition = Condition::new(settings.condition_code, settings.is_day);
        let location = match (cli.lat, cli.lon) {
            (Some(lat), Some(lon)) => Some(Location::from_coords(lat, lon)),
            _ => None,
        };
        let forecast = cli
            .forecast_url
            .as_deref()
            .map_or_else(ForecastClient::new, |url| ForecastClient::with_base_url(url));
        let mut state = Self {
            mode: if location.is_some() {
                AppMode::Loading
            } else {
                AppMode::Ready
            },
            running: true,
            engine: WeatherEngine::for_canvas(None, EngineConfig::default()),
            raster: CellRaster::new(0, 0),
            condition,
            source: ConditionSource::Manual,
            location,
            live: None,
            last_error: None,
            refresh_meta: RefreshMetadata::default(),
            backoff: Backoff::new(10, 300),
            fetch_in_flight: false,
            settings,
            settings_path,
            paused: false,
            frame_tick: 0,
            last_stats: FrameStats::default(),
            viewport: (0, 0),
            clock: Instant::now(),
            seed: cli.seed,
            forecast,
        };
        state.engine = state.build_engine();
        state
    }

    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            viewport_width: f32::from(self.viewport.0) * CELL_WIDTH_PX,
            seed: self.seed,
            pointer_wind: self.settings.pointer_wind,
            thunder_flash: !self.settings.no_flash,
        }
    }

    fn build_engine(&self) -> WeatherEngine {
        let mut engine = WeatherEngine::for_canvas(self.raster.canvas_size(), self.engine_config());
        engine.set_condition(self.condition.code, self.condition.is_day);
        if !self.paused {
            engine.start();
        }
        engine
    }

    /// Fits the raster and engine to a terminal of `cols` x `rows`.
    pub fn resize_viewport(&mut self, cols: u16, rows: u16) {
        self.viewport = (cols, rows);
        let sky = sky_area(cols, rows);
        self.raster.resize(sky.width, sky.height);
        let viewport_width = f32::from(cols) * CELL_WIDTH_PX;
        match self.raster.canvas_size() {
            Some(canvas) if !self.engine.is_inert() => self.engine.resize(canvas, viewport_width),
            Some(_) => self.engine = self.build_engine(),
            None => {}
        }
    }

    /// Milliseconds since the app started, the engine's frame clock.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => self.handle_bootstrap(tx, cli).await?,
            AppEvent::TickFrame => {
                let now = self.now_ms();
                self.handle_tick_frame(now);
            }
            AppEvent::TickRefresh => self.start_fetch(tx).await?,
            AppEvent::Input(input) => self.handle_input(input, tx).await?,
            AppEvent::FetchStarted => self.handle_fetch_started(),
            AppEvent::FetchSucceeded(current) => self.handle_fetch_succeeded(current),
            AppEvent::FetchFailed(err) => self.handle_fetch_failed(tx, err),
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
            }
        }
        Ok(())
    }

    pub(crate) async fn handle_bootstrap(
        &mut self,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        cli.validate()?;
        start_frame_task(tx.clone(), self.settings.fps);
        if self.location.is_some() {
            start_refresh_task(tx.clone(), cli.refresh_interval);
            self.start_fetch(tx).await?;
        }
        Ok(())
    }

    pub fn handle_tick_frame(&mut self, now_ms: f64) {
        self.frame_tick = self.frame_tick.saturating_add(1);
        self.last_stats = self.engine.tick(now_ms, &mut self.raster);
        if self.location.is_some() {
            self.refresh_meta.state = evaluate_freshness(
                self.refresh_meta.last_success,
                self.refresh_meta.consecutive_failures,
            );
        }
    }

    /// Switches the sky to `condition`. The engine ignores repeats.
    pub fn apply_condition(&mut self, condition: Condition, source: ConditionSource) {
        self.condition = condition;
        self.source = source;
        self.engine.set_condition(condition.code, condition.is_day);
    }

    /// Manual change from the keyboard; remembered across runs.
    pub fn set_manual_condition(&mut self, condition: Condition) {
        self.apply_condition(condition, ConditionSource::Manual);
        self.settings.condition_code = condition.code;
        self.settings.is_day = condition.is_day;
        self.persist_settings();
    }

    pub fn toggle_paused(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            self.engine.stop();
        } else {
            self.engine.start();
        }
    }

    pub(crate) fn persist_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(err) = save_runtime_settings(path, &self.settings) {
            warn!(error = %err, path = %path.display(), "saving settings failed");
        }
    }

    fn handle_fetch_succeeded(&mut self, current: CurrentConditions) {
        info!(
            code = current.weather_code,
            is_day = current.is_day,
            temperature = current.temperature_2m_c,
            "current conditions updated"
        );
        self.fetch_in_flight = false;
        self.mode = AppMode::Ready;
        self.last_error = None;
        self.refresh_meta.mark_success();
        self.backoff.reset();
        self.apply_condition(current.condition(), ConditionSource::Forecast);
        self.live = Some(current);
    }
}

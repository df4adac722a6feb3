//! App: the terminal event loop.
//!
//! Architecture:
//! - `App` owns the `ModeController` and every component; nothing else
//!   touches simulation state, so no locks are needed.
//! - A `tokio::mpsc` channel carries `AppMessage`s in from the key reader
//!   and from fetch tasks.
//! - While a session is open two intervals run next to the channel: the
//!   sampling clock spawns one fetch per tick, the render clock steps the
//!   physics and redraws. Both are dropped the moment the session ends.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use loudviz_core::config::Config;
use loudviz_core::engine::{ModeController, SessionHandle};
use loudviz_core::error::TransportError;
use loudviz_core::protocol::SampleFrame;
use loudviz_core::transport::SampleSource;
use ratatui::crossterm::{
    event::{self, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::action::{map_key, Action};
use crate::component::Component;
use crate::components::{help_overlay::HelpOverlay, stage::Stage, toolbar::Toolbar};
use crate::widgets::status_bar::draw_keys_bar;

/// Messages from background tasks into the event loop.
#[derive(Debug)]
pub enum AppMessage {
    Event(Event),
    Frame {
        session: u64,
        result: Result<SampleFrame, TransportError>,
    },
}

/// Fetch one frame off the loop. Nothing is reported once the session is
/// cancelled, even if the request already completed.
pub fn spawn_fetch<S: SampleSource>(
    source: Arc<S>,
    session: SessionHandle,
    tx: mpsc::Sender<AppMessage>,
) {
    tokio::spawn(async move {
        let result = tokio::select! {
            _ = session.token.cancelled() => return,
            result = source.fetch() => result,
        };
        if session.token.is_cancelled() {
            return;
        }
        let _ = tx
            .send(AppMessage::Frame {
                session: session.id,
                result,
            })
            .await;
    });
}

fn clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

pub struct App<S: SampleSource> {
    controller: ModeController,
    source: Arc<S>,
    source_url: String,
    config: Config,
    config_path: Option<PathBuf>,

    toolbar: Toolbar,
    stage: Stage,
    help_overlay: HelpOverlay,

    should_quit: bool,
}

impl<S: SampleSource> App<S> {
    /// `config_path`: where to write the settings back on quit.
    pub fn new(config: Config, source: S, source_url: String, config_path: Option<PathBuf>) -> Self {
        Self {
            controller: ModeController::new(config.display.initial_mode, config.viz),
            source: Arc::new(source),
            source_url,
            stage: Stage::new(config.display.scale),
            config,
            config_path,
            toolbar: Toolbar::new(),
            help_overlay: HelpOverlay::new(),
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard events ─────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        if self.config.sensor.auto_connect {
            self.dispatch(Action::ToggleConnection);
        }

        let poll_period = Duration::from_millis(self.config.sensor.poll_interval_ms.max(1));
        let frame_period = Duration::from_secs_f64(1.0 / self.config.display.render_fps.max(1) as f64);
        let mut sampler: Option<Interval> = None;
        let mut renderer: Option<Interval> = None;

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            // Keep both clocks alive exactly as long as the session.
            match (self.controller.is_connected(), sampler.is_some()) {
                (true, false) => {
                    sampler = Some(clock(poll_period));
                    renderer = Some(clock(frame_period));
                }
                (false, true) => {
                    sampler = None;
                    renderer = None;
                    needs_redraw = true;
                }
                _ => {}
            }

            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                _ = next_tick(&mut sampler) => {
                    if let Some(session) = self.controller.session() {
                        spawn_fetch(self.source.clone(), session.clone(), tx.clone());
                    }
                }

                _ = next_tick(&mut renderer) => {
                    needs_redraw = self.controller.render_tick(Instant::now()).is_some();
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        self.controller.disconnect();
        self.save_settings();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Apply one message; returns whether the screen needs a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                self.handle_key(key);
                true
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
            AppMessage::Frame { session, result } => {
                let before = self.controller.status();
                match result {
                    Ok(frame) => {
                        self.controller.on_frame(session, &frame);
                    }
                    Err(err) => self.controller.on_fetch_error(session, &err),
                }
                // Physics only moves on render ticks; redraw for the status light.
                self.controller.status() != before
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = self
            .help_overlay
            .handle_key(key, &self.controller)
            .unwrap_or_else(|| map_key(key, self.controller.mode()));
        self.dispatch(action);
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::ToggleConnection => {
                if self.controller.toggle_connection().is_some() {
                    info!("sampling {}", self.source_url);
                }
            }
            Action::SwitchMode => {
                let next = self.controller.mode().toggled();
                self.controller.select_mode(next, self.stage.surface_mut());
            }
            Action::Adjust(control, forward) => {
                self.controller.adjust(control, forward);
            }
            Action::ToggleHelp => self.help_overlay.on_action(&action, &self.controller),
            Action::Quit => self.should_quit = true,
            Action::Noop => {}
        }
    }

    /// Write the visualizer settings back. The file is re-read first so CLI
    /// overrides are not persisted.
    fn save_settings(&self) {
        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        let mut on_disk = match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("not saving settings: {}", e);
                return;
            }
        };
        on_disk.viz = *self.controller.config();
        on_disk.display.initial_mode = self.controller.mode();
        match on_disk.save_to(path) {
            Ok(()) => debug!("settings saved to {}", path.display()),
            Err(e) => warn!("could not save settings: {}", e),
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.toolbar.draw(f, rows[0], &self.controller);
        self.stage.draw(f, rows[1], &self.controller);
        draw_keys_bar(
            f,
            rows[2],
            self.controller.mode(),
            self.controller.status(),
            &self.source_url,
            self.controller.palette(),
        );
        self.help_overlay.draw(f, area, &self.controller);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loudviz_core::engine::{ConnectionStatus, Control, Mode};
    use tokio_util::sync::CancellationToken;

    struct FixedSource(Vec<f32>);

    impl SampleSource for FixedSource {
        async fn fetch(&self) -> Result<SampleFrame, TransportError> {
            Ok(SampleFrame::new(self.0.clone()))
        }
    }

    struct StalledSource;

    impl SampleSource for StalledSource {
        async fn fetch(&self) -> Result<SampleFrame, TransportError> {
            std::future::pending().await
        }
    }

    fn app() -> App<FixedSource> {
        let mut config = Config::default();
        config.display.initial_mode = Mode::Vu;
        App::new(config, FixedSource(vec![4500.0]), "http://test/data".into(), None)
    }

    #[tokio::test]
    async fn fetch_reports_with_session_id() {
        let (tx, mut rx) = mpsc::channel(4);
        let session = SessionHandle {
            id: 7,
            token: CancellationToken::new(),
        };
        spawn_fetch(Arc::new(FixedSource(vec![1.0, -3.0])), session, tx);
        match rx.recv().await {
            Some(AppMessage::Frame { session, result }) => {
                assert_eq!(session, 7);
                assert_eq!(result.unwrap().samples, vec![1.0, -3.0]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancelled_fetch_reports_nothing() {
        let (tx, mut rx) = mpsc::channel(4);
        let token = CancellationToken::new();
        spawn_fetch(
            Arc::new(StalledSource),
            SessionHandle {
                id: 1,
                token: token.clone(),
            },
            tx,
        );
        token.cancel();
        // the task drops its sender without sending
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn frames_flow_into_active_session() {
        let mut app = app();
        app.dispatch(Action::ToggleConnection);
        let id = app.controller.session().unwrap().id;

        let redraw = app.handle_message(AppMessage::Frame {
            session: id,
            result: Ok(SampleFrame::new(vec![4500.0])),
        });
        assert!(!redraw);
        assert!((app.controller.state().left.target - 1.0).abs() < 1e-6);

        // stale session id
        app.handle_message(AppMessage::Frame {
            session: id + 100,
            result: Ok(SampleFrame::new(vec![9000.0])),
        });
        assert!((app.controller.state().left.target - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn fetch_error_lights_status() {
        let mut app = app();
        app.dispatch(Action::ToggleConnection);
        let id = app.controller.session().unwrap().id;
        let redraw = app.handle_message(AppMessage::Frame {
            session: id,
            result: Err(TransportError::Status {
                url: "http://test/data".into(),
                status: 503,
            }),
        });
        assert!(redraw);
        assert_eq!(app.controller.status(), ConnectionStatus::Error);
    }

    #[test]
    fn settings_saved_without_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to(&path).unwrap();

        let mut config = Config::load_from(&path).unwrap();
        config.sensor.host = "10.0.0.9".into();
        let mut app = App::new(config, FixedSource(vec![]), String::new(), Some(path.clone()));
        app.dispatch(Action::Adjust(Control::Gain, true));
        app.dispatch(Action::SwitchMode);
        app.save_settings();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.viz.gain, loudviz_core::config::Gain::X8);
        assert_eq!(saved.display.initial_mode, Mode::Spectrum);
        assert_eq!(saved.sensor.host, Config::default().sensor.host);
    }

    #[test]
    fn switch_mode_and_controls() {
        let mut app = app();
        app.dispatch(Action::SwitchMode);
        assert_eq!(app.controller.mode(), Mode::Spectrum);

        let before = app.controller.config().stereo_sim;
        app.dispatch(Action::Adjust(Control::StereoSim, true));
        assert_eq!(app.controller.config().stereo_sim, before);

        app.dispatch(Action::Quit);
        assert!(app.should_quit);
    }
}

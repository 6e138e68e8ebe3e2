//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration
//! - Background prediction via worker thread

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{
    HttpPredictor, PdfReportWriter, SimulatedDocumentAnalyzer, SqliteKeyValueStore,
};
use crate::application::{LocalResultStore, PredictionService, ReportService};
use crate::config::Config;
use crate::domain::{PredictionInput, PredictionResult};
use crate::ports::{AnalysisError, DocumentAnalyzer};

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    intake::{render_intake_form, IntakeFormState},
    render_disclaimer,
    result::{render_result_screen, ResultState},
    toast::{render_toast, Toast},
    upload::{render_upload, UploadState},
};
use super::worker::{FailedStage, PredictionWorker, WorkerHandle, WorkerProgress};

type Store = LocalResultStore<SqliteKeyValueStore>;
type Service = PredictionService<HttpPredictor, Store>;

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Intake,
    Upload,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Analyzing,
    Submitting,
}

/// Main application state
pub struct App {
    config: Config,

    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    service: Service,
    reports: ReportService<PdfReportWriter>,
    analyzer: Arc<SimulatedDocumentAnalyzer>,

    dashboard_state: DashboardState,
    intake_state: IntakeFormState,
    upload_state: UploadState,
    result_state: ResultState,

    /// Pending worker (if running)
    pending_worker: Option<WorkerHandle>,

    /// Current phase and when it started (for the progress animation)
    phase: Option<(Phase, Instant)>,

    toast: Option<Toast>,
}

impl App {
    /// Create a new application instance from configuration.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or the HTTP client
    /// cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Arc::new(LocalResultStore::new(SqliteKeyValueStore::new(&config.db_path)?));
        let predictor = Arc::new(HttpPredictor::new(&config.api_url, config.http_timeout)?);
        tracing::info!("Prediction endpoint: {}", predictor.endpoint());

        let service = PredictionService::new(predictor, store);
        let reports = ReportService::new(PdfReportWriter::new(), config.report_dir.clone());
        let analyzer = Arc::new(SimulatedDocumentAnalyzer::new());

        Ok(Self::with_dependencies(config, service, reports, analyzer))
    }

    /// Create application with injected dependencies (Composition Root pattern).
    #[must_use]
    pub fn with_dependencies(
        config: Config,
        service: Service,
        reports: ReportService<PdfReportWriter>,
        analyzer: Arc<SimulatedDocumentAnalyzer>,
    ) -> Self {
        let dashboard_state = DashboardState {
            api_url: config.api_url.clone(),
            ..DashboardState::default()
        };

        Self {
            config,
            screen: Screen::Dashboard,
            should_quit: false,
            service,
            reports,
            analyzer,
            dashboard_state,
            intake_state: IntakeFormState::default(),
            upload_state: UploadState::default(),
            result_state: ResultState::default(),
            pending_worker: None,
            phase: None,
            toast: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.refresh_history();

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();
            self.tick_progress();

            if self.toast.as_ref().is_some_and(|t| t.expired(Instant::now())) {
                self.toast = None;
            }

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, content_area, &self.dashboard_state),
                    Screen::Intake => render_intake_form(f, content_area, &self.intake_state),
                    Screen::Upload => render_upload(f, content_area, &self.upload_state),
                    Screen::Result => render_result_screen(f, content_area, &self.result_state),
                }

                render_disclaimer(f, chunks[1]);

                if let Some(toast) = &self.toast {
                    render_toast(f, content_area, toast);
                }
            })?;

            // Short poll to stay responsive
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Poll the background worker for progress updates.
    fn poll_worker(&mut self) {
        loop {
            let Some(progress) = self
                .pending_worker
                .as_mut()
                .and_then(WorkerHandle::try_recv)
            else {
                break;
            };

            let done = progress.is_terminal();
            self.apply_progress(progress);
            if done {
                self.pending_worker = None;
                self.phase = None;
                break;
            }
        }
    }

    fn apply_progress(&mut self, progress: WorkerProgress) {
        match progress {
            WorkerProgress::Analyzing => self.set_phase(Phase::Analyzing),
            WorkerProgress::Extracted(input) => {
                tracing::info!("Document analysis produced a complete parameter set");
                self.intake_state.load_input(&input);
            }
            WorkerProgress::Submitting => self.set_phase(Phase::Submitting),
            WorkerProgress::Complete { result, input } => self.show_result(result, input),
            WorkerProgress::Failed {
                stage: FailedStage::Analysis,
                message,
            } => {
                self.toast = Some(Toast::error("Analysis Failed", message));
                self.result_state = ResultState::Idle;
                self.screen = Screen::Upload;
            }
            WorkerProgress::Failed {
                stage: FailedStage::Prediction,
                message,
            } => {
                tracing::warn!("Prediction failed: {}", message);
                self.toast = Some(Toast::error("Prediction Error", message));
                self.result_state = ResultState::Idle;
                self.screen = Screen::Intake;
            }
        }
    }

    /// Record a fresh prediction and switch to the result screen.
    fn show_result(&mut self, result: PredictionResult, input: PredictionInput) {
        self.service.record(&result, &input);
        self.refresh_history();

        self.intake_state.clear_sensitive();
        self.upload_state = UploadState::default();

        self.result_state = ResultState::Complete { result, input };
        self.screen = Screen::Result;
    }

    fn set_phase(&mut self, phase: Phase) {
        let floor = match phase {
            Phase::Analyzing => 0.0,
            Phase::Submitting => 0.5,
        };
        let progress = self.current_progress().max(floor);

        self.phase = Some((phase, Instant::now()));
        self.result_state = match phase {
            Phase::Analyzing => ResultState::Analyzing { progress },
            Phase::Submitting => ResultState::Submitting { progress },
        };
    }

    fn current_progress(&self) -> f64 {
        match &self.result_state {
            ResultState::Analyzing { progress } | ResultState::Submitting { progress } => {
                *progress
            }
            _ => 0.0,
        }
    }

    fn tick_progress(&mut self) {
        if self.pending_worker.is_none() {
            return;
        }
        let Some((phase, started_at)) = self.phase else {
            return;
        };

        let elapsed = Instant::now()
            .saturating_duration_since(started_at)
            .as_secs_f64();

        let (floor, target, tau) = match phase {
            Phase::Analyzing => (0.02, 0.5, self.config.analysis_delay.as_secs_f64() / 2.0),
            Phase::Submitting => (0.5, 0.95, 2.0),
        };

        // Monotonic, asymptotically approaching the phase target.
        let k = if tau <= 0.0 { 1.0 } else { 1.0 - (-elapsed / tau).exp() };
        let desired = floor + (target - floor) * k;
        let progress = desired.max(self.current_progress()).min(target);

        self.result_state = match phase {
            Phase::Analyzing => ResultState::Analyzing { progress },
            Phase::Submitting => ResultState::Submitting { progress },
        };
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Intake => self.handle_intake_key(key),
            Screen::Upload => self.handle_upload_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        if self.dashboard_state.confirm_clear {
            if matches!(key, KeyCode::Char('y') | KeyCode::Char('Y')) {
                match self.service.clear_history() {
                    Ok(()) => {
                        self.toast = Some(Toast::info(
                            "History Cleared",
                            "All saved results were removed.",
                        ));
                    }
                    Err(e) => tracing::warn!("Failed to clear history: {}", e),
                }
                self.refresh_history();
            }
            self.dashboard_state.confirm_clear = false;
            return;
        }

        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.intake_state.clear_sensitive();
                self.screen = Screen::Intake;
            }
            KeyCode::Char('u') | KeyCode::Char('U') => {
                self.screen = Screen::Upload;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                if !self.dashboard_state.history.is_empty() {
                    self.dashboard_state.confirm_clear = true;
                }
            }
            KeyCode::Down => self.dashboard_state.next(),
            KeyCode::Up => self.dashboard_state.prev(),
            KeyCode::Enter => {
                if let Some(saved) = self.dashboard_state.selected_result() {
                    self.result_state = ResultState::Complete {
                        result: saved.prediction.clone(),
                        input: saved.input.clone(),
                    };
                    self.screen = Screen::Result;
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_intake_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => self.intake_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.intake_state.next_field(),
            KeyCode::Left => self.intake_state.adjust(-1),
            KeyCode::Right => self.intake_state.adjust(1),
            KeyCode::Char('s') | KeyCode::Char('S') => self.intake_state.load_sample_data(),
            KeyCode::Char('u') | KeyCode::Char('U') => self.screen = Screen::Upload,
            KeyCode::Char(c) => self.intake_state.input_char(c),
            KeyCode::Backspace => self.intake_state.delete_char(),
            KeyCode::Delete => self.intake_state.clear_field(),
            KeyCode::Enter => self.submit_intake(),
            _ => {}
        }
    }

    fn handle_upload_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Intake,
            KeyCode::Up => self.upload_state.prev(),
            KeyCode::Down => self.upload_state.next(),
            KeyCode::Delete => self.upload_state.remove_selected(),
            KeyCode::Backspace => self.upload_state.delete_char(),
            KeyCode::Char(c) => self.upload_state.input_char(c),
            KeyCode::Enter => match self.upload_state.take_path() {
                Some(path) => self.add_document(&path),
                None => self.process_documents(),
            },
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        let ResultState::Complete { result, input } = &self.result_state else {
            return;
        };

        match key {
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.toast = Some(match self.reports.export(result, input) {
                    Ok(path) => Toast::info(
                        "PDF Downloaded",
                        format!("Your prediction report was saved to {}", path.display()),
                    ),
                    Err(e) => {
                        tracing::warn!("Report export failed: {}", e);
                        Toast::error(
                            "Download Failed",
                            "There was an error generating the PDF. Please try again.",
                        )
                    }
                });
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                if self.service.record(result, input).is_some() {
                    self.toast = Some(Toast::info(
                        "Result Saved",
                        "Your prediction result has been saved to local history.",
                    ));
                }
                self.refresh_history();
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.intake_state.clear_sensitive();
                self.result_state = ResultState::Idle;
                self.screen = Screen::Intake;
            }
            KeyCode::Esc | KeyCode::Enter => {
                self.result_state = ResultState::Idle;
                self.screen = Screen::Dashboard;
            }
            _ => {}
        }
    }

    fn submit_intake(&mut self) {
        if self.pending_worker.is_some() {
            return;
        }

        // Errors are shown inline by the form state.
        let Ok(input) = self.intake_state.validate() else {
            return;
        };

        self.result_state = ResultState::Submitting { progress: 0.0 };
        self.screen = Screen::Result;
        self.pending_worker = Some(PredictionWorker::spawn_prediction(
            self.service.clone(),
            input,
        ));
        self.set_phase(Phase::Submitting);
    }

    fn add_document(&mut self, path: &str) {
        match self.analyzer.accept(Path::new(path)) {
            Ok(document) => {
                tracing::debug!("Accepted {} document", document.kind.label());
                self.upload_state.add(document);
            }
            Err(e) => tracing::info!("Skipping document: {}", e),
        }
    }

    fn process_documents(&mut self) {
        if self.pending_worker.is_some() {
            return;
        }
        if self.upload_state.documents.is_empty() {
            self.toast = Some(Toast::error(
                "Analysis Failed",
                AnalysisError::NoDocuments.to_string(),
            ));
            return;
        }

        self.result_state = ResultState::Analyzing { progress: 0.0 };
        self.screen = Screen::Result;
        self.pending_worker = Some(PredictionWorker::spawn_analysis(
            self.service.clone(),
            Arc::clone(&self.analyzer),
            self.upload_state.documents.clone(),
            self.config.analysis_delay,
        ));
        self.set_phase(Phase::Analyzing);
    }

    fn refresh_history(&mut self) {
        self.dashboard_state.set_history(self.service.history());
    }
}

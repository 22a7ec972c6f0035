mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

use typedrill::config::{Config, ConfigStore, FileConfigStore};
use typedrill::provider::{Difficulty, PassageProvider, PassageText, TextProvider};
use typedrill::runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner};
use typedrill::session::{SessionPhase, TypingSession};

const TICK_RATE_MS: u64 = 100;

/// terminal typing-speed trainer with live stats and fetched passages
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing-speed trainer: type a fetched (or custom) passage against a countdown, with live WPM, accuracy, and progress, and a per-second WPM chart when the test ends."
)]
pub struct Cli {
    /// number of seconds on the countdown
    #[clap(short = 's', long)]
    seconds: Option<u64>,

    /// difficulty band for fetched passages
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// custom passage to type instead of a fetched one
    #[clap(short = 'p', long)]
    passage: Option<String>,

    /// skip the remote quote service and type from the built-in corpus
    #[clap(long)]
    offline: bool,
}

impl Cli {
    /// CLI flags override the stored config for this run.
    fn merged_config(&self, stored: Config) -> Config {
        Config {
            duration_secs: self.seconds.unwrap_or(stored.duration_secs),
            difficulty: self.difficulty.or(stored.difficulty),
            offline: self.offline || stored.offline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppScreen {
    Typing,
    Results,
}

pub struct App {
    pub config: Config,
    pub custom_passage: Option<String>,
    pub passage: PassageText,
    pub session: TypingSession,
    pub provider: TextProvider,
    pub screen: AppScreen,
    next_tick_due: Option<Instant>,
}

impl App {
    pub fn new(cli: &Cli, stored: Config) -> Self {
        let config = cli.merged_config(stored);
        let mut provider = TextProvider::new(config.offline);
        let passage = match &cli.passage {
            Some(text) => custom_passage(text.clone()),
            None => provider.fetch_passage(config.difficulty),
        };
        let session = TypingSession::new(passage.text.clone(), config.duration_secs);

        Self {
            config,
            custom_passage: cli.passage.clone(),
            passage,
            session,
            provider,
            screen: AppScreen::Typing,
            next_tick_due: None,
        }
    }

    /// Same passage from the top.
    pub fn restart(&mut self) {
        self.session.reset();
        self.screen = AppScreen::Typing;
        self.next_tick_due = None;
    }

    /// Fresh passage; an explicit -p passage is kept as-is.
    pub fn new_passage(&mut self) {
        if self.custom_passage.is_none() {
            self.passage = self.provider.fetch_passage(self.config.difficulty);
        }
        self.session.load_passage(self.passage.text.clone());
        self.screen = AppScreen::Typing;
        self.next_tick_due = None;
    }

    /// Keep the countdown schedule in step with the phase: a due time
    /// exists exactly while the session is Running.
    fn sync_tick_schedule(&mut self) {
        match self.session.phase() {
            SessionPhase::Running => {
                if self.next_tick_due.is_none() {
                    self.next_tick_due = Some(Instant::now() + Duration::from_secs(1));
                }
            }
            _ => self.next_tick_due = None,
        }
    }

    /// Fire every countdown second that has come due. Due times are
    /// absolute, so a burst of key events cannot starve the countdown.
    fn drive_countdown(&mut self) {
        while let Some(due) = self.next_tick_due {
            if self.session.phase() != SessionPhase::Running || Instant::now() < due {
                break;
            }
            self.session.tick();
            self.next_tick_due = match self.session.phase() {
                SessionPhase::Running => Some(due + Duration::from_secs(1)),
                _ => None,
            };
        }
        if self.session.is_complete() {
            self.screen = AppScreen::Results;
        }
    }
}

fn custom_passage(text: String) -> PassageText {
    let length = text.chars().count();
    PassageText {
        difficulty: Difficulty::from_length(length),
        author: "Custom".to_string(),
        length,
        text,
        tags: vec!["custom".to_string()],
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut app = App::new(&cli, store.load());
    // remember the effective settings for the next run
    let _ = store.save(&app.config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let events = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| draw(app, f))?;

    loop {
        match events.step() {
            AppEvent::Tick => {
                let was_running = app.session.phase() == SessionPhase::Running;
                app.drive_countdown();
                if was_running {
                    terminal.draw(|f| draw(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| draw(app, f))?;
            }
            AppEvent::Key(key) => {
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Tab => {
                        if app.screen == AppScreen::Typing {
                            app.session.toggle_pause();
                            app.sync_tick_schedule();
                        }
                    }
                    KeyCode::Backspace => {
                        if app.screen == AppScreen::Typing {
                            app.session.backspace();
                        }
                    }
                    KeyCode::Left => app.restart(),
                    KeyCode::Right => app.new_passage(),
                    KeyCode::Char(c) => match app.screen {
                        AppScreen::Typing => {
                            app.session.write(c);
                            app.sync_tick_schedule();
                            if app.session.is_complete() {
                                app.screen = AppScreen::Results;
                            }
                        }
                        AppScreen::Results => match c {
                            'r' => app.restart(),
                            'n' => app.new_passage(),
                            _ => {}
                        },
                    },
                    _ => {}
                }
                terminal.draw(|f| draw(app, f))?;
            }
        }
    }

    Ok(())
}

fn draw(app: &App, f: &mut Frame) {
    let area = f.area();
    f.render_widget(app, area);
}

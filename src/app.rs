//! App: terminal init, main loop, score board wiring.

use crate::GameConfig;
use crate::game::{GameState, Tick};
use crate::input::{Flow, dispatch, key_to_input};
use crate::leaderboard::{HttpScoreService, Leaderboard, ScoreBoard};
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

pub struct App {
    config: GameConfig,
    state: GameState,
    /// `None` when running offline.
    leaderboard: Option<Leaderboard<HttpScoreService>>,
    offline_board: ScoreBoard,
}

impl App {
    pub fn new(config: GameConfig) -> Result<Self> {
        let now = Instant::now();
        let state = match config.seed {
            Some(seed) => GameState::seeded(seed, now),
            None => GameState::new(now),
        };
        let leaderboard = match &config.server {
            Some(url) => Some(Leaderboard::new(HttpScoreService::new(url), config.settle)?),
            None => None,
        };
        Ok(Self {
            config,
            state,
            leaderboard,
            offline_board: ScoreBoard::default(),
        })
    }

    fn scores(&self) -> &ScoreBoard {
        self.leaderboard
            .as_ref()
            .map_or(&self.offline_board, |l| l.board())
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        if let Some(leaderboard) = &self.leaderboard {
            leaderboard.refresh();
        }
        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    /// One iteration per frame: poll input, update, render.
    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame = Duration::from_secs_f64(1.0 / self.config.frame_rate.max(1.0));
        loop {
            let started = Instant::now();

            let mut inputs = Vec::new();
            if event::poll(frame.saturating_sub(started.elapsed()))? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        inputs.push(key_to_input(key));
                    }
                }
            }
            if dispatch(&mut self.state, inputs, Instant::now()) == Flow::Quit {
                return Ok(());
            }

            if let Tick::TopOut { score } = self.state.tick(Instant::now()) {
                if let Some(leaderboard) = &self.leaderboard {
                    leaderboard.submit(&self.config.user, score);
                }
            }
            if let Some(leaderboard) = &mut self.leaderboard {
                leaderboard.poll();
            }

            let scores = self.scores();
            let state = &self.state;
            let user = self.config.user.as_str();
            let offline = self.leaderboard.is_none();
            terminal.draw(|f| crate::ui::draw(f, state, scores, user, offline))?;
        }
    }
}

//! Tetrixtui — classic falling-block puzzle game in the terminal with a shared online score board.

mod app;
mod catalog;
mod clock;
mod controller;
mod game;
mod input;
mod leaderboard;
mod playfield;
mod scoring;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use std::time::Duration;

/// Options derived from CLI that affect the session (score service, piece sequence, frame pacing).
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Score service base URL; `None` plays offline.
    pub server: Option<String>,
    pub user: String,
    pub seed: Option<u64>,
    pub frame_rate: f64,
    pub settle: Duration,
}

impl From<Args> for GameConfig {
    fn from(args: Args) -> Self {
        Self {
            server: (!args.offline).then_some(args.server),
            user: args.user,
            seed: args.seed,
            frame_rate: args.frame_rate,
            settle: Duration::from_millis(args.settle_ms),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut app = App::new(GameConfig::from(args))?;
    app.run()?;
    Ok(())
}

/// Classic falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tetrixtui",
    version,
    about = "Classic falling-block puzzle in the terminal. Clear full rows to score; scores are shared online.",
    long_about = "Tetrixtui is a terminal falling-block puzzle game.\n\n\
        Steer the falling piece, complete horizontal rows to clear them. Clearing more \
        rows at once scores more, and the game speeds up as your score climbs. When a new \
        piece has no room to appear the game is over and your score is sent to the score board.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move     Up or k    Rotate    Down or j  Drop\n  \
        P                  Pause    Enter      Restart (after game over)   Q / Esc  Quit"
)]
pub struct Args {
    /// Base URL of the score service.
    #[arg(long, default_value = "http://dogankurt.com", value_name = "URL")]
    pub server: String,

    /// Player name submitted with your score.
    #[arg(short, long, env = "USERNAME", default_value = "player", value_name = "NAME")]
    pub user: String,

    /// Play without the online score board.
    #[arg(long)]
    pub offline: bool,

    /// Seed for the piece sequence (same seed, same pieces).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Frames per second: input polling, updates and rendering.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Delay in ms between submitting a score and re-fetching the board.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub settle_ms: u64,
}

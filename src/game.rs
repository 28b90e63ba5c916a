//! Game state: playfield, current and next piece, score, level, pause/game-over, per-tick update.

use crate::catalog::PieceKind;
use crate::clock;
use crate::controller::{Direction, Piece, PieceController, Spawn};
use crate::playfield::Playfield;
use crate::scoring;
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};
use std::time::Instant;

/// Player command consumed by the next tick. At most one is pending; a newer one replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Left,
    Right,
    Rotate,
    /// Drop straight to the bottom and lock.
    Drop,
}

/// Outcome of one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Tick {
    /// Nothing happened (paused or game over).
    Idle,
    Running,
    /// The next piece could not spawn. Carries the final score for submission.
    TopOut { score: u32 },
}

/// The single owned game aggregate. Created once, reset in place on restart.
#[derive(Debug)]
pub struct GameState {
    playfield: Playfield,
    controller: PieceController,
    next: PieceKind,
    rng: StdRng,
    score: u32,
    level: u32,
    lines_cleared: u32,
    paused: bool,
    game_over: bool,
    pending: Option<Command>,
    last_descent: Instant,
}

impl GameState {
    /// New game seeded from the OS.
    pub fn new(now: Instant) -> Self {
        Self::with_rng(StdRng::from_os_rng(), now)
    }

    /// New game with a deterministic piece sequence.
    pub fn seeded(seed: u64, now: Instant) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), now)
    }

    fn with_rng(mut rng: StdRng, now: Instant) -> Self {
        let first = Self::draw(&mut rng);
        let next = Self::draw(&mut rng);
        Self {
            playfield: Playfield::new(),
            controller: PieceController::new(first),
            next,
            rng,
            score: 0,
            level: 1,
            lines_cleared: 0,
            paused: false,
            game_over: false,
            pending: None,
            last_descent: now,
        }
    }

    fn draw(rng: &mut StdRng) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())]
    }

    pub const fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub const fn piece(&self) -> &Piece {
        self.controller.piece()
    }

    /// Kind shown in the next-piece preview.
    pub const fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    pub const fn level(&self) -> u32 {
        self.level
    }

    pub const fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    /// True while paused, including the forced pause of a finished game.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn queue_command(&mut self, command: Command) {
        self.pending = Some(command);
    }

    /// Flip the pause flag. A finished game stays paused until restarted.
    pub fn toggle_pause(&mut self) {
        if !self.game_over {
            self.paused = !self.paused;
        }
    }

    /// Start over after a game over: empty field, zero score, level 1, fresh piece.
    /// Returns false (and does nothing) while a game is still in progress.
    pub fn restart(&mut self, now: Instant) -> bool {
        if !self.game_over {
            return false;
        }
        self.playfield.clear();
        self.score = 0;
        self.level = 1;
        self.lines_cleared = 0;
        self.paused = false;
        self.game_over = false;
        self.pending = None;
        self.last_descent = now;
        // The field is empty, so the first piece always fits.
        let _ = self.spawn_next();
        true
    }

    /// One update: gravity first, then the pending command.
    pub fn tick(&mut self, now: Instant) -> Tick {
        if self.paused {
            return Tick::Idle;
        }

        if clock::should_auto_descend(now, self.last_descent, self.level) {
            self.last_descent = now;
            if !self.controller.try_move(Direction::Down, &self.playfield) {
                let outcome = self.lock_piece();
                if outcome != Tick::Running {
                    self.pending = None;
                    return outcome;
                }
            }
        }

        match self.pending.take() {
            Some(Command::Left) => {
                self.controller.try_move(Direction::Left, &self.playfield);
            }
            Some(Command::Right) => {
                self.controller.try_move(Direction::Right, &self.playfield);
            }
            Some(Command::Rotate) => {
                self.controller.rotate(&self.playfield);
            }
            Some(Command::Drop) => {
                while self.controller.try_move(Direction::Down, &self.playfield) {}
                return self.lock_piece();
            }
            None => {}
        }
        Tick::Running
    }

    /// Merge the current piece, score the cleared rows, bring in the next piece.
    fn lock_piece(&mut self) -> Tick {
        let cleared = scoring::merge(&mut self.playfield, self.controller.piece());
        self.lines_cleared += cleared;
        self.score = self
            .score
            .saturating_add(scoring::line_clear_points(cleared, self.level));
        self.level = self.level.max(clock::level_for_score(self.score));
        self.spawn_next()
    }

    fn spawn_next(&mut self) -> Tick {
        let kind = std::mem::replace(&mut self.next, Self::draw(&mut self.rng));
        match self.controller.spawn(kind, &self.playfield) {
            Spawn::Placed => Tick::Running,
            Spawn::TopOut => {
                self.paused = true;
                self.game_over = true;
                Tick::TopOut { score: self.score }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Cell, CellColor};
    use crate::playfield::{HEIGHT, WIDTH};
    use std::time::Duration;

    fn game(kind: PieceKind) -> (GameState, Instant) {
        let now = Instant::now();
        let mut state = GameState::seeded(7, now);
        state.controller = PieceController::new(kind);
        (state, now)
    }

    fn fill(field: &mut Playfield, x: i32, y: i32) {
        field.place(Cell {
            color: CellColor::Gray,
            x,
            y,
        });
    }

    fn fill_row_except(field: &mut Playfield, y: i32, gap: i32) {
        for x in (0..WIDTH).filter(|&x| x != gap) {
            fill(field, x, y);
        }
    }

    fn column_of(piece: &Piece) -> Vec<i32> {
        piece.cells.iter().map(|c| c.x).collect()
    }

    #[test]
    fn starts_running_with_empty_field() {
        let state = GameState::new(Instant::now());
        assert!(!state.is_paused());
        assert!(!state.is_game_over());
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.playfield().occupied_count(), 0);
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let now = Instant::now();
        let a = GameState::seeded(42, now);
        let b = GameState::seeded(42, now);
        assert_eq!(a.piece(), b.piece());
        assert_eq!(a.next_kind(), b.next_kind());
    }

    #[test]
    fn command_is_consumed_once() {
        let (mut state, now) = game(PieceKind::T);
        state.queue_command(Command::Left);
        assert_eq!(state.tick(now), Tick::Running);
        assert_eq!(column_of(state.piece()), vec![3, 3, 2, 4]);
        assert_eq!(state.tick(now), Tick::Running);
        assert_eq!(column_of(state.piece()), vec![3, 3, 2, 4]);
    }

    #[test]
    fn last_queued_command_wins() {
        let (mut state, now) = game(PieceKind::T);
        state.queue_command(Command::Left);
        state.queue_command(Command::Right);
        let _ = state.tick(now);
        assert_eq!(column_of(state.piece()), vec![5, 5, 4, 6]);
    }

    #[test]
    fn rotate_command_turns_the_piece_on_tick() {
        let (mut state, now) = game(PieceKind::T);
        state.queue_command(Command::Rotate);
        assert_eq!(state.tick(now), Tick::Running);
        let cells: Vec<(i32, i32)> = state.piece().cells.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(cells, vec![(4, 1), (3, 1), (4, 2), (4, 0)]);
        assert_eq!(state.pending, None);
    }

    #[test]
    fn blocked_sideways_move_is_ignored() {
        let (mut state, now) = game(PieceKind::O);
        fill(&mut state.playfield, 5, 0);
        let before = *state.piece();
        state.queue_command(Command::Right);
        assert_eq!(state.tick(now), Tick::Running);
        assert_eq!(*state.piece(), before);
    }

    #[test]
    fn gravity_waits_for_the_fall_interval() {
        let (mut state, now) = game(PieceKind::O);
        let _ = state.tick(now + Duration::from_millis(999));
        assert_eq!(state.piece().cells[0].y, 0);
        let _ = state.tick(now + Duration::from_millis(1000));
        assert_eq!(state.piece().cells[0].y, 1);
        let _ = state.tick(now + Duration::from_millis(1500));
        assert_eq!(state.piece().cells[0].y, 1);
    }

    #[test]
    fn gravity_locks_a_grounded_piece() {
        let (mut state, mut now) = game(PieceKind::O);
        for _ in 0..18 {
            now += Duration::from_secs(1);
            let _ = state.tick(now);
        }
        assert_eq!(state.playfield().occupied_count(), 0);
        now += Duration::from_secs(1);
        assert_eq!(state.tick(now), Tick::Running);
        assert_eq!(state.playfield().occupied_count(), 4);
        assert!(state.playfield().is_occupied(3, HEIGHT - 1));
    }

    #[test]
    fn drop_locks_immediately_and_spawns_the_preview() {
        let (mut state, now) = game(PieceKind::O);
        let upcoming = state.next_kind();
        state.queue_command(Command::Drop);
        assert_eq!(state.tick(now), Tick::Running);
        assert!(state.playfield().is_occupied(4, 19));
        assert!(state.playfield().is_occupied(3, 18));
        assert_eq!(state.piece().kind, upcoming);
    }

    #[test]
    fn single_clear_scores_by_level() {
        let (mut state, now) = game(PieceKind::O);
        for x in (0..WIDTH).filter(|&x| x != 3 && x != 4) {
            fill(&mut state.playfield, x, 19);
        }
        state.level = 2;
        state.queue_command(Command::Drop);
        let _ = state.tick(now);
        assert_eq!(state.score(), 90);
        assert_eq!(state.lines_cleared(), 1);
        // The O's upper half dropped into the floor row.
        assert!(state.playfield().is_occupied(3, 19) && state.playfield().is_occupied(4, 19));
        assert_eq!(state.playfield().occupied_count(), 2);
    }

    #[test]
    fn tetris_at_level_two_adds_two_thousand() {
        let (mut state, now) = game(PieceKind::I);
        for y in 16..20 {
            fill_row_except(&mut state.playfield, y, 4);
        }
        state.level = 2;
        state.score = 100;
        state.queue_command(Command::Drop);
        let _ = state.tick(now);
        assert_eq!(state.score(), 2100);
        assert_eq!(state.lines_cleared(), 4);
        assert_eq!(state.playfield().occupied_count(), 0);
    }

    #[test]
    fn level_rises_with_score_and_never_falls() {
        let (mut state, now) = game(PieceKind::I);
        for y in 16..20 {
            fill_row_except(&mut state.playfield, y, 4);
        }
        state.score = 4_500;
        state.queue_command(Command::Drop);
        let _ = state.tick(now);
        assert_eq!(state.score(), 5_500);
        assert_eq!(state.level(), 2);

        state.level = 3;
        state.controller = PieceController::new(PieceKind::O);
        state.queue_command(Command::Drop);
        let _ = state.tick(now);
        assert_eq!(state.level(), 3);
    }

    #[test]
    fn top_out_pauses_and_ends_the_game() {
        let (mut state, now) = game(PieceKind::O);
        for y in 0..4 {
            for x in 0..WIDTH - 1 {
                if y > 1 || !(3..=4).contains(&x) {
                    fill(&mut state.playfield, x, y);
                }
            }
        }
        // The O cannot fall, so the drop locks it at the spawn and the next piece has no room.
        state.score = 1234;
        state.queue_command(Command::Drop);
        let occupied_before = state.playfield().occupied_count();
        assert_eq!(state.tick(now), Tick::TopOut { score: 1234 });
        assert!(state.is_game_over());
        assert!(state.is_paused());
        // Only the locked O was written; the blocked spawn was not.
        assert_eq!(state.playfield().occupied_count(), occupied_before + 4);
        assert_eq!(state.tick(now + Duration::from_secs(10)), Tick::Idle);
    }

    #[test]
    fn top_out_from_gravity_discards_pending_command() {
        let (mut state, now) = game(PieceKind::O);
        for x in 0..WIDTH - 1 {
            fill(&mut state.playfield, x, 2);
            fill(&mut state.playfield, x, 3);
            if !(3..=4).contains(&x) {
                fill(&mut state.playfield, x, 0);
            }
        }
        state.queue_command(Command::Left);
        assert!(matches!(
            state.tick(now + Duration::from_secs(1)),
            Tick::TopOut { .. }
        ));
        assert_eq!(state.pending, None);
        assert_eq!(state.lines_cleared(), 0);
    }

    #[test]
    fn pause_freezes_updates() {
        let (mut state, now) = game(PieceKind::O);
        state.toggle_pause();
        state.queue_command(Command::Drop);
        assert_eq!(state.tick(now + Duration::from_secs(5)), Tick::Idle);
        assert_eq!(state.playfield().occupied_count(), 0);
        state.toggle_pause();
        assert_eq!(state.tick(now + Duration::from_secs(5)), Tick::Running);
        assert_eq!(state.playfield().occupied_count(), 4);
    }

    #[test]
    fn pause_toggle_and_restart_respect_game_over() {
        let (mut state, now) = game(PieceKind::O);
        assert!(!state.restart(now));

        state.game_over = true;
        state.paused = true;
        state.toggle_pause();
        assert!(state.is_paused());

        fill(&mut state.playfield, 0, 19);
        state.score = 999;
        state.level = 3;
        state.pending = Some(Command::Left);
        let upcoming = state.next_kind();
        let later = now + Duration::from_secs(30);
        assert!(state.restart(later));

        assert!(!state.is_game_over());
        assert!(!state.is_paused());
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.pending, None);
        assert_eq!(state.last_descent, later);
        assert_eq!(state.playfield().occupied_count(), 0);
        assert_eq!(state.piece().kind, upcoming);
    }
}

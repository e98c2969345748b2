use crate::game::{Game, Grid, Player, Pos, RUN_LENGTH};

use super::agent::Agent;

/// Owner tags of a board, detached from the live grid so the search can
/// drop and undo freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    width: usize,
    height: usize,
    enabled: Vec<bool>,
    owners: Vec<Option<Player>>,
    windows: Vec<[usize; RUN_LENGTH]>,
}

impl Position {
    pub fn from_grid(grid: &Grid) -> Self {
        let width = grid.width();
        let height = grid.height();
        let enabled: Vec<bool> = grid.positions().map(|p| grid.is_enabled(p)).collect();
        let owners = grid.positions().map(|p| grid.owner_at(p)).collect();
        let windows = Self::all_windows(width, height, &enabled);
        Position {
            width,
            height,
            enabled,
            owners,
            windows,
        }
    }

    /// Every straight line of `RUN_LENGTH` enabled cells: horizontal,
    /// vertical and both diagonals.
    fn all_windows(width: usize, height: usize, enabled: &[bool]) -> Vec<[usize; RUN_LENGTH]> {
        let mut windows = Vec::new();
        let span = RUN_LENGTH as isize - 1;
        for y in 0..height as isize {
            for x in 0..width as isize {
                for (dx, dy) in [(1, 0), (0, 1), (1, -1), (1, 1)] {
                    let (ex, ey) = (x + dx * span, y + dy * span);
                    if ex < 0 || ey < 0 || ex >= width as isize || ey >= height as isize {
                        continue;
                    }
                    let mut window = [0; RUN_LENGTH];
                    for (i, slot) in window.iter_mut().enumerate() {
                        let i = i as isize;
                        *slot = ((y + dy * i) as usize) * width + (x + dx * i) as usize;
                    }
                    if window.iter().all(|&idx| enabled[idx]) {
                        windows.push(window);
                    }
                }
            }
        }
        windows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn owner(&self, pos: Pos) -> Option<Player> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        self.owners[pos.y * self.width + pos.x]
    }

    pub fn windows(&self) -> &[[usize; RUN_LENGTH]] {
        &self.windows
    }

    fn owner_at(&self, index: usize) -> Option<Player> {
        self.owners[index]
    }

    /// Columns whose topmost enabled cell is still empty, left to right.
    pub fn open_columns(&self) -> Vec<usize> {
        (0..self.width)
            .filter(|&x| {
                (0..self.height)
                    .map(|y| y * self.width + x)
                    .find(|&i| self.enabled[i])
                    .is_some_and(|i| self.owners[i].is_none())
            })
            .collect()
    }

    /// Tag the lowest empty enabled cell of `column` for `player`. Returns the
    /// cell index for [`Position::undo_drop`], or None for a full or
    /// off-board column.
    pub fn make_drop(&mut self, column: usize, player: Player) -> Option<usize> {
        if column >= self.width {
            return None;
        }
        let idx = (0..self.height)
            .rev()
            .map(|y| y * self.width + column)
            .find(|&i| self.enabled[i] && self.owners[i].is_none())?;
        self.owners[idx] = Some(player);
        Some(idx)
    }

    pub fn undo_drop(&mut self, index: usize) {
        self.owners[index] = None;
    }

    /// Whether the cell at `index` sits inside a full window of one owner.
    pub fn completes_run(&self, index: usize) -> bool {
        let Some(owner) = self.owners[index] else {
            return false;
        };
        self.windows
            .iter()
            .filter(|w| w.contains(&index))
            .any(|w| w.iter().all(|&i| self.owners[i] == Some(owner)))
    }
}

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, position: &Position, player: Player) -> i64;
}

/// Scores every window of four: a window holding only one side's pieces is
/// worth more the fuller it is, provided there is room to complete it.
pub struct RunHeuristic;

pub const WIN_SCORE: i64 = 1_000_000;

impl RunHeuristic {
    fn run_score(count: usize, empty: usize) -> i64 {
        match count {
            4 => WIN_SCORE,
            3 if empty >= 1 => 100,
            2 if empty >= 2 => 10,
            1 if empty >= 3 => 1,
            _ => 0,
        }
    }

    fn score_window(own: usize, opp: usize, empty: usize) -> i64 {
        if own > 0 && opp > 0 {
            0
        } else if own > 0 {
            Self::run_score(own, empty)
        } else if opp > 0 {
            -Self::run_score(opp, empty)
        } else {
            0
        }
    }
}

impl Heuristic for RunHeuristic {
    fn evaluate(&self, position: &Position, player: Player) -> i64 {
        position
            .windows()
            .iter()
            .map(|window| {
                let mut own = 0;
                let mut opp = 0;
                let mut empty = 0;
                for &idx in window {
                    match position.owner_at(idx) {
                        Some(p) if p == player => own += 1,
                        Some(_) => opp += 1,
                        None => empty += 1,
                    }
                }
                Self::score_window(own, opp, empty)
            })
            .sum()
    }
}

/// Best column found by a search and its minimax score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub column: usize,
    pub score: i64,
}

const INFINITY: i64 = i64::MAX / 4;

/// Fixed-depth minimax with alpha-beta pruning over column drops.
pub struct AlphaBetaAgent {
    depth: usize,
    heuristic: Box<dyn Heuristic>,
}

impl AlphaBetaAgent {
    pub fn new(depth: usize) -> Self {
        AlphaBetaAgent {
            depth: depth.max(1),
            heuristic: Box::new(RunHeuristic),
        }
    }

    pub fn with_heuristic(depth: usize, heuristic: Box<dyn Heuristic>) -> Self {
        AlphaBetaAgent {
            depth: depth.max(1),
            heuristic,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Search `position` for `player`. Works on a private copy, so the caller's
    /// position is never touched. Ties keep the leftmost column.
    pub fn search(&self, position: &Position, player: Player) -> Option<SearchResult> {
        let mut work = position.clone();
        let mut best: Option<SearchResult> = None;

        for column in work.open_columns() {
            let Some(idx) = work.make_drop(column, player) else {
                continue;
            };
            let alpha = best.map_or(-INFINITY, |b| b.score);
            let score = if work.completes_run(idx) {
                self.heuristic.evaluate(&work, player)
            } else {
                self.alpha_beta(&mut work, self.depth - 1, alpha, INFINITY, false, player)
            };
            work.undo_drop(idx);

            if best.map_or(true, |b| score > b.score) {
                best = Some(SearchResult { column, score });
            }
        }

        best
    }

    fn alpha_beta(
        &self,
        position: &mut Position,
        depth: usize,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
        me: Player,
    ) -> i64 {
        if depth == 0 {
            return self.heuristic.evaluate(position, me);
        }
        let columns = position.open_columns();
        if columns.is_empty() {
            return self.heuristic.evaluate(position, me);
        }

        let mover = if maximizing { me } else { me.other() };
        let mut best = if maximizing { -INFINITY } else { INFINITY };

        for column in columns {
            let Some(idx) = position.make_drop(column, mover) else {
                continue;
            };
            // A completed run ends the line.
            let score = if position.completes_run(idx) {
                self.heuristic.evaluate(position, me)
            } else {
                self.alpha_beta(position, depth - 1, alpha, beta, !maximizing, me)
            };
            position.undo_drop(idx);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        best
    }
}

impl Agent for AlphaBetaAgent {
    fn select_column(&mut self, game: &Game) -> Option<usize> {
        let position = Position::from_grid(game.grid());
        self.search(&position, game.current_player())
            .map(|r| r.column)
    }

    fn name(&self) -> &str {
        "AlphaBeta"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomAgent;
    use crate::config::BoardConfig;

    fn play(game: &mut Game, columns: &[usize]) {
        for &col in columns {
            game.drop_in_column(col).unwrap();
        }
    }

    // --- Heuristic tests ---

    #[test]
    fn window_count_on_standard_board() {
        let position = Position::from_grid(Game::default().grid());
        // 24 horizontal, 21 vertical, 12 + 12 diagonal
        assert_eq!(position.windows().len(), 69);
    }

    #[test]
    fn windows_skip_disabled_cells() {
        let config = BoardConfig {
            disabled: vec![[0, 5]],
            ..BoardConfig::default()
        };
        let position = Position::from_grid(Game::new(&config).grid());
        assert_eq!(position.windows().len(), 66);
        assert!(position.windows().iter().all(|w| !w.contains(&35)));
    }

    #[test]
    fn heuristic_empty_board_is_zero() {
        let position = Position::from_grid(Game::default().grid());
        assert_eq!(RunHeuristic.evaluate(&position, Player::Red), 0);
        assert_eq!(RunHeuristic.evaluate(&position, Player::Yellow), 0);
    }

    #[test]
    fn heuristic_swapping_sides_negates_score() {
        let mut game = Game::default();
        play(&mut game, &[3, 3, 2, 4, 4, 0, 1, 6, 3]);
        let position = Position::from_grid(game.grid());
        let red = RunHeuristic.evaluate(&position, Player::Red);
        let yellow = RunHeuristic.evaluate(&position, Player::Yellow);
        assert_eq!(red, -yellow);
    }

    #[test]
    fn heuristic_single_piece_counts_open_windows() {
        let mut game = Game::default();
        play(&mut game, &[0]);
        let position = Position::from_grid(game.grid());
        // Bottom-left corner sits in one horizontal, one vertical and one
        // diagonal window, each worth 1.
        assert_eq!(RunHeuristic.evaluate(&position, Player::Red), 3);
        assert_eq!(RunHeuristic.evaluate(&position, Player::Yellow), -3);
    }

    #[test]
    fn heuristic_blocked_window_is_worthless() {
        assert_eq!(RunHeuristic::score_window(2, 1, 1), 0);
        assert_eq!(RunHeuristic::score_window(3, 0, 1), 100);
        assert_eq!(RunHeuristic::score_window(0, 2, 2), -10);
        assert_eq!(RunHeuristic::score_window(4, 0, 0), WIN_SCORE);
    }

    // --- Position tests ---

    #[test]
    fn make_and_undo_drop_restore_position() {
        let mut game = Game::default();
        play(&mut game, &[2, 2]);
        let position = Position::from_grid(game.grid());
        let mut work = position.clone();
        let idx = work.make_drop(2, Player::Red).unwrap();
        assert_eq!(idx, 3 * 7 + 2);
        assert_eq!(work.owner(Pos::new(2, 3)), Some(Player::Red));
        work.undo_drop(idx);
        assert_eq!(work, position);
    }

    #[test]
    fn open_columns_skip_full_columns() {
        let mut game = Game::default();
        play(&mut game, &[5, 5, 5, 5, 5, 5]);
        let position = Position::from_grid(game.grid());
        assert_eq!(position.open_columns(), vec![0, 1, 2, 3, 4, 6]);
    }

    #[test]
    fn make_drop_refuses_full_and_offboard_columns() {
        let mut game = Game::default();
        play(&mut game, &[5, 5, 5, 5, 5, 5]);
        let mut position = Position::from_grid(game.grid());
        let before = position.clone();
        assert_eq!(position.make_drop(5, Player::Red), None);
        assert_eq!(position.make_drop(7, Player::Red), None);
        assert_eq!(position.make_drop(usize::MAX, Player::Yellow), None);
        assert_eq!(position, before);
    }

    // --- Algorithm tests ---

    #[test]
    fn selects_legal_column() {
        let mut agent = AlphaBetaAgent::new(4);
        let game = Game::default();
        let column = agent.select_column(&game).unwrap();
        assert!(game.grid().is_column_open(column), "column {column} is not open");
    }

    #[test]
    fn search_leaves_live_grid_untouched() {
        let mut game = Game::default();
        play(&mut game, &[3, 2, 3]);
        let before = game.clone();
        let mut agent = AlphaBetaAgent::new(6);
        agent.select_column(&game).unwrap();
        assert_eq!(game, before);
    }

    #[test]
    fn takes_winning_move() {
        // Red stacks three in column 3; Yellow plays elsewhere.
        let mut game = Game::default();
        play(&mut game, &[3, 0, 3, 1, 3, 5]);
        let mut agent = AlphaBetaAgent::new(4);
        assert_eq!(agent.select_column(&game), Some(3), "Should complete the column");
        let result = agent
            .search(&Position::from_grid(game.grid()), Player::Red)
            .unwrap();
        assert!(result.score >= WIN_SCORE);
    }

    #[test]
    fn blocks_opponent_win() {
        // Yellow holds the bottom row 0..=2; Red must block column 3.
        let mut game = Game::default();
        play(&mut game, &[6, 0, 4, 1, 0, 2]);
        let mut agent = AlphaBetaAgent::new(4);
        assert_eq!(agent.select_column(&game), Some(3), "Should block at column 3");
    }

    #[test]
    fn prefers_win_over_block() {
        // Red owns the bottom row 0..=2, Yellow the row above. Both threaten
        // column 3; Red to move should win.
        let mut game = Game::default();
        play(&mut game, &[0, 0, 1, 1, 2, 2]);
        let mut agent = AlphaBetaAgent::new(4);
        assert_eq!(agent.select_column(&game), Some(3));
    }

    #[test]
    fn ties_keep_leftmost_column() {
        struct Flat;
        impl Heuristic for Flat {
            fn evaluate(&self, _: &Position, _: Player) -> i64 {
                0
            }
        }
        let agent = AlphaBetaAgent::with_heuristic(3, Box::new(Flat));
        let mut game = Game::default();
        play(&mut game, &[0, 0, 0, 0, 0, 0]);
        let result = agent
            .search(&Position::from_grid(game.grid()), Player::Red)
            .unwrap();
        assert_eq!(result.column, 1);
    }

    #[test]
    fn no_open_column_means_no_move() {
        let mut game = Game::new(&BoardConfig {
            width: 4,
            height: 4,
            pieces_per_side: 8,
            disabled: Vec::new(),
        });
        let mut state = vec!['1'; 16];
        for (i, ch) in state.iter_mut().enumerate() {
            // Alternate pairs of columns so nothing lines up four.
            if (i % 4) / 2 != (i / 4) % 2 {
                *ch = '3';
            }
        }
        game.load_state_string(&state.into_iter().collect::<String>())
            .unwrap();
        let mut agent = AlphaBetaAgent::new(6);
        assert_eq!(agent.select_column(&game), None);
        assert_eq!(
            game.request_ai_move(&mut agent),
            Err(crate::error::MoveError::NoOpenColumn)
        );
    }

    #[test]
    fn request_ai_move_commits_through_drop() {
        let mut game = Game::default();
        play(&mut game, &[3, 0, 3, 1, 3, 5]);
        let mut agent = AlphaBetaAgent::new(4);
        let pos = game.request_ai_move(&mut agent).unwrap();
        assert_eq!(pos, Pos::new(3, 2));
        assert_eq!(game.check_for_winner().unwrap(), Some(Player::Red));
        assert_eq!(game.remaining(Player::Red), 17);
    }

    // --- Integration tests ---

    #[test]
    fn full_game_vs_self_completes() {
        let mut agent1 = AlphaBetaAgent::new(3);
        let mut agent2 = AlphaBetaAgent::new(3);
        let mut game = Game::default();

        loop {
            let agent: &mut AlphaBetaAgent = match game.current_player() {
                Player::Red => &mut agent1,
                Player::Yellow => &mut agent2,
            };
            if game.request_ai_move(agent).is_err() {
                break;
            }
            if game.check_for_winner().unwrap().is_some() || game.check_for_draw().unwrap() {
                break;
            }
        }

        assert!(game.turn() <= 42);
        assert!(
            game.check_for_winner().unwrap().is_some() || game.check_for_draw().unwrap(),
            "Game should end in a win or a draw"
        );
    }

    #[test]
    fn beats_random_agent() {
        let games = 10;
        let mut wins = 0;

        for seed in 0..games {
            let mut ai = AlphaBetaAgent::new(4);
            let mut random = RandomAgent::with_seed(seed);
            let mut game = Game::default();

            while game.request_ai_move(&mut ai).is_ok() {
                if game.check_for_winner().unwrap().is_some() {
                    break;
                }
                if game.request_ai_move(&mut random).is_err()
                    || game.check_for_winner().unwrap().is_some()
                {
                    break;
                }
            }

            if game.check_for_winner().ok().flatten() == Some(Player::Red) {
                wins += 1;
            }
        }

        assert!(wins >= 8, "AlphaBeta should beat random, won {wins}/{games}");
    }

    #[test]
    fn name_is_alphabeta() {
        let agent = AlphaBetaAgent::new(6);
        assert_eq!(agent.name(), "AlphaBeta");
        assert_eq!(agent.depth(), 6);
        assert_eq!(AlphaBetaAgent::new(0).depth(), 1);
    }
}

use crate::game::Game;

/// A player that picks the column to drop into.
pub trait Agent {
    /// Choose a column for the player to move, or None if no column is open.
    fn select_column(&mut self, game: &Game) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

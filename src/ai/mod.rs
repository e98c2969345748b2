mod agent;
pub mod alphabeta;
mod random;

pub use agent::Agent;
pub use alphabeta::{AlphaBetaAgent, Heuristic, Position, RunHeuristic, SearchResult};
pub use random::RandomAgent;

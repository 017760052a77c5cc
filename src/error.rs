use thiserror::Error;

/// Failures that mean the maze topology was broken upstream.
///
/// None of these are reachable on a maze produced by one of the generators;
/// they exist so a corrupted grid stops the agent instead of silently
/// desynchronizing its trail from the grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("agent is trapped at ({row}, {col}): all four sides are blocked")]
    Trapped { row: u8, col: u8 },
    #[error("trail out of sync at ({row}, {col}): entered a trailed cell from an untrailed one")]
    TrailDesync { row: u8, col: u8 },
    #[error("backtracking stack exhausted with {unvisited} cells still unvisited")]
    BacktrackExhausted { unvisited: usize },
}

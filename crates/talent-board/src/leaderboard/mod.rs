pub mod board;
pub mod directory;
pub mod domain;
pub mod page;
mod parser;
pub mod sheets;

pub use board::{BoardMetrics, BoardRow, BoardView};
pub use directory::{BoardCache, CandidateDirectory, CandidateSnapshot};
pub use domain::{Candidate, DataAvailability, DegradedReason, ScoreTier};
pub use sheets::{GoogleSheetsClient, SheetTab, SheetsError, SheetsGateway};

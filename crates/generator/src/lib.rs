//! Demo data for the TradeFlow catalog: randomly generated Expert Advisor
//! listings, each with a synthetic daily account-value history.

pub mod error;
pub mod listing;
pub mod storage;

pub use error::GeneratorError;
pub use listing::{
    Dictionaries, ExpertAdvisor, ListingGenerator, Performance, generate_performance_data,
};
pub use storage::{load_dictionaries, load_listings, save_listings};

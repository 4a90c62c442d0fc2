pub mod error;
pub mod config;
pub mod lattice;
pub mod observables;
pub mod metropolis;
pub mod measure;
pub mod evolution;
pub mod error_analysis;
pub mod sweep;
pub mod report;
pub mod utils;

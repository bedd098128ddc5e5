#![doc = include_str!("../README.md")]

pub mod dataset;
pub mod dates;
pub mod export;
pub mod query;
pub mod review;
pub mod shell;
pub mod votes;

pub use dataset::Dataset;
pub use review::Review;
pub use shell::Shell;
pub use votes::Votes;

pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod matcher;
pub mod model;
pub mod roster;
pub mod server;
pub mod tokenizer;

pub use matcher::rank_doctors;
pub use model::{DoctorRecord, MatchResult};
pub use tokenizer::extract_tokens;

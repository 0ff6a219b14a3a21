//! Local-first issue voting.
//!
//! A [`store::VotingStore`] holds issues, votes, comments and the theme
//! preference; [`app::VotingApp`] persists it to a [`storage::BlobStore`]
//! after every mutation. The binary puts a terminal front end on top.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod interactive;
pub mod metadata;
pub mod results;
pub mod storage;
pub mod store;
pub mod types;
pub mod view;

pub use app::VotingApp;
pub use error::{ServiceError, ServiceResult};
pub use storage::{BlobStore, FileBlobStore, MemoryBlobStore, Persistence};
pub use store::{StoreError, VotingStore};

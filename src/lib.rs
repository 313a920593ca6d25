//! Portal - terminal front-end for the $BSA token
//!
//! Live holder metrics polled from Solana RPC, a persona chat terminal,
//! project documentation and a simulated agent creator.

pub mod agent_creator;
pub mod chat;
pub mod config;
pub mod docs;
pub mod endpoints;
pub mod holders;
pub mod landing;
pub mod metrics;
pub mod token_info;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use holders::{HolderCount, HolderCountPoller, PollHandle, PollState};
pub use solana_sdk::pubkey::Pubkey;

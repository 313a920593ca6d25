//! Holder Count Module
//!
//! Approximate, eventually-consistent count of token accounts for a mint,
//! refreshed on a fixed interval while a consuming view is visible.
//!
//! "Holders" here means SPL token accounts of the standard 165-byte layout
//! whose mint field (offset 0) matches the token. That counts token accounts,
//! not unique wallets, and includes zero-balance accounts that were never closed.

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

// Submodules
pub mod errors;
pub mod poller;
pub mod solana;

// Re-exports for convenience
pub use errors::HolderFetchError;
pub use poller::{
    HolderCount, HolderCountPoller, PollHandle, PollState, PollerSettings, RetryDecision,
};
pub use solana::SolanaHolderSource;

/// Byte size of an SPL token account
pub const TOKEN_ACCOUNT_LEN: u64 = 165;

/// Offset of the mint field inside a token account
pub const MINT_OFFSET: usize = 0;

/// RPC adapter used by the poller
///
/// One call issues one read-only query filtered by mint and account size; the
/// length of the returned list is the holder metric.
#[async_trait]
pub trait HolderSource: Send + Sync {
    async fn fetch_holder_accounts(&self, mint: &Pubkey) -> Result<Vec<Pubkey>, HolderFetchError>;
}

//! Solana RPC implementation of [`HolderSource`]

use super::{HolderFetchError, HolderSource, MINT_OFFSET, TOKEN_ACCOUNT_LEN};
use crate::config::RpcConfig;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_account_decoder::{UiAccountEncoding, UiDataSliceConfig};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use tracing::debug;

/// Counts token accounts with `getProgramAccounts` on the SPL Token program
pub struct SolanaHolderSource {
    client: RpcClient,
    /// Endpoint without query string, safe to log
    endpoint: String,
}

impl SolanaHolderSource {
    pub fn new(url: String, timeout: Duration, commitment: CommitmentConfig) -> Self {
        let endpoint = redact_endpoint(&url);
        Self {
            client: RpcClient::new_with_timeout_and_commitment(url, timeout, commitment),
            endpoint,
        }
    }

    pub fn from_config(rpc: &RpcConfig) -> Result<Self> {
        let commitment = parse_commitment(&rpc.commitment)?;
        Ok(Self::new(rpc.endpoint_url(), rpc.timeout(), commitment))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query for token accounts of `mint`
    ///
    /// A zero-length data slice keeps the response down to account addresses.
    pub fn program_accounts_config(mint: &Pubkey) -> RpcProgramAccountsConfig {
        RpcProgramAccountsConfig {
            filters: Some(vec![
                RpcFilterType::DataSize(TOKEN_ACCOUNT_LEN),
                RpcFilterType::Memcmp(Memcmp::new(
                    MINT_OFFSET,
                    MemcmpEncodedBytes::Base58(bs58::encode(mint.to_bytes()).into_string()),
                )),
            ]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                data_slice: Some(UiDataSliceConfig {
                    offset: 0,
                    length: 0,
                }),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        }
    }
}

#[async_trait]
impl HolderSource for SolanaHolderSource {
    async fn fetch_holder_accounts(&self, mint: &Pubkey) -> Result<Vec<Pubkey>, HolderFetchError> {
        debug!(mint = %mint, endpoint = %self.endpoint, "Querying token accounts");

        let accounts = self
            .client
            .get_program_accounts_with_config(&spl_token::id(), Self::program_accounts_config(mint))
            .await
            .map_err(|e| HolderFetchError::from_client_error(e, &self.endpoint))?;

        Ok(accounts.into_iter().map(|(address, _)| address).collect())
    }
}

fn parse_commitment(level: &str) -> Result<CommitmentConfig> {
    match level {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(anyhow!("Unknown commitment level '{}'", other)),
    }
}

/// Strip the query string, which carries the provider key
fn redact_endpoint(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

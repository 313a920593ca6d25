//! Token Info Panel
//!
//! Live metrics for the token. The holder count poller runs only while the
//! panel is open: opening starts it, closing stops it and discards its state.

use crate::config::TokenConfig;
use crate::holders::{HolderCount, HolderCountPoller, PollHandle, PollState};
use anyhow::Result;
use solana_sdk::pubkey::Pubkey;
use tokio::sync::watch;
use tracing::{debug, info};

const LOADING: &str = "Loading...";
const ADDRESS_PENDING: &str = "Fetching CA ...";

pub struct TokenInfoPanel {
    token: TokenConfig,
    mint: Option<Pubkey>,
    poller: HolderCountPoller,
    handle: Option<PollHandle>,
    open: bool,
}

impl TokenInfoPanel {
    pub fn new(token: TokenConfig, poller: HolderCountPoller) -> Result<Self> {
        let mint = token.mint_pubkey()?;
        Ok(Self {
            token,
            mint,
            poller,
            handle: None,
            open: false,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show the panel and start polling. Must be called from within a tokio
    /// runtime when a mint is configured.
    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.open = true;

        match self.mint {
            Some(mint) => {
                info!(mint = %mint, "Token info panel opened");
                self.handle = Some(self.poller.start(mint));
            }
            None => debug!("Token info panel opened without a contract address"),
        }
    }

    /// Hide the panel and stop polling
    pub fn close(&mut self) {
        self.open = false;
        if let Some(handle) = self.handle.take() {
            self.poller.stop(&handle);
        }
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Poller state while open
    pub fn poll_state(&self) -> Option<PollState> {
        self.handle.as_ref().map(PollHandle::snapshot)
    }

    pub fn subscribe(&self) -> Option<watch::Receiver<PollState>> {
        self.handle.as_ref().map(PollHandle::subscribe)
    }

    pub fn status_display(&self) -> &'static str {
        if self.token.launched {
            "Deployed"
        } else {
            "Pre-Launch"
        }
    }

    /// A stale count stays visible while a refresh is in flight
    pub fn holders_display(&self) -> String {
        match self.poll_state().map(|state| state.holder_count) {
            Some(HolderCount::Known(count)) => format_thousands(count),
            _ => LOADING.to_string(),
        }
    }

    pub fn supply_display(&self) -> String {
        format_thousands(self.token.total_supply)
    }

    pub fn address_display(&self) -> String {
        match &self.mint {
            Some(mint) => format!("{} [Click to Copy]", short_address(&mint.to_string())),
            None => ADDRESS_PENDING.to_string(),
        }
    }

    /// Panel as terminal lines; empty while closed
    pub fn render(&self) -> Vec<String> {
        if !self.open {
            return Vec::new();
        }

        vec![
            format!("== ${} Token Info ==", self.token.symbol),
            "Live Metrics".to_string(),
            format!("  Status:   {}", self.status_display()),
            format!("  Holders:  {}", self.holders_display()),
            format!("  Supply:   {}", self.supply_display()),
            "Contract Details".to_string(),
            format!("  Address:  {}", self.address_display()),
            format!("  Network:  {}", self.token.network),
            format!("About ${}", self.token.name),
            format!("  {}", self.token.about),
        ]
    }
}

impl Drop for TokenInfoPanel {
    fn drop(&mut self) {
        self.close();
    }
}

/// `1234567` -> `1,234,567`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// First six and last four characters of an address
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

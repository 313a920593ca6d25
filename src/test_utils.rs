//! Test Utilities Module
//!
//! Scripted stand-ins for the two external collaborators, the Solana RPC
//! adapter and the chat completion API, so poller and chat behaviour can be
//! tested deterministically without network access.
//!
//! These utilities are only compiled when running tests or when the
//! `test_utils` feature is enabled.

#![cfg(any(test, feature = "test_utils"))]

use crate::chat::{ChatCompleter, ChatError, CompletionRequest};
use crate::holders::{HolderFetchError, HolderSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use solana_sdk::pubkey::Pubkey;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One scripted response of [`ScriptedHolderSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFetch {
    /// Return this many token accounts
    Accounts(usize),
    /// Fail with a transport error
    Fail,
}

/// Holder source that replays a fixed script
///
/// Once the script is exhausted every call fails.
pub struct ScriptedHolderSource {
    script: Mutex<VecDeque<ScriptedFetch>>,
    calls: AtomicUsize,
    latency: Option<Duration>,
}

impl ScriptedHolderSource {
    pub fn new(script: Vec<ScriptedFetch>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            latency: None,
        }
    }

    /// Delay every response by `latency` (tokio time, so paused clocks apply)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetches issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HolderSource for ScriptedHolderSource {
    async fn fetch_holder_accounts(&self, _mint: &Pubkey) -> Result<Vec<Pubkey>, HolderFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match next {
            Some(ScriptedFetch::Accounts(n)) => Ok((0..n).map(|_| Pubkey::new_unique()).collect()),
            Some(ScriptedFetch::Fail) => {
                Err(HolderFetchError::transport("scripted", "scripted failure"))
            }
            None => Err(HolderFetchError::transport("scripted", "script exhausted")),
        }
    }
}

/// Chat completer that replays scripted replies and records every request
pub struct ScriptedCompleter {
    replies: Mutex<VecDeque<Result<Option<String>, ChatError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompleter {
    pub fn new(replies: Vec<Result<Option<String>, ChatError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Completer that answers successive requests with `replies` in order
    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(Some(r.to_string()))).collect())
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatCompleter for ScriptedCompleter {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, ChatError> {
        self.requests.lock().push(request.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ChatError::Status {
                    status: 503,
                    body: "script exhausted".to_string(),
                })
            })
    }
}

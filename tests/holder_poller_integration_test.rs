//! Integration tests for the holder count poller
//!
//! Drive the poller and the token info panel through the public API with a
//! flaky in-process holder source and a paused tokio clock.

#[cfg(test)]
mod holder_poller_integration_tests {
    use async_trait::async_trait;
    use portal::config::{Config, TokenConfig};
    use portal::holders::{HolderFetchError, HolderSource, PollerSettings};
    use portal::token_info::TokenInfoPanel;
    use portal::{HolderCount, HolderCountPoller, Pubkey};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Fails the first `failures` calls, then reports `holders` accounts
    struct FlakySource {
        failures: usize,
        holders: usize,
        calls: AtomicUsize,
    }

    impl FlakySource {
        fn new(failures: usize, holders: usize) -> Arc<Self> {
            Arc::new(Self {
                failures,
                holders,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HolderSource for FlakySource {
        async fn fetch_holder_accounts(
            &self,
            _mint: &Pubkey,
        ) -> Result<Vec<Pubkey>, HolderFetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(HolderFetchError::transport("flaky", "connection reset"));
            }
            Ok(vec![Pubkey::new_unique(); self.holders])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let source = FlakySource::new(2, 42);
        let poller = HolderCountPoller::new(source.clone(), PollerSettings::default());
        let handle = poller.start(Pubkey::new_unique());

        let mut updates = handle.subscribe();
        let state = updates
            .wait_for(|s| !s.is_loading)
            .await
            .unwrap()
            .clone();

        assert_eq!(state.holder_count, HolderCount::Known(42));
        assert_eq!(state.retry_count, 0);
        assert!(state.last_updated.is_some());
        assert_eq!(source.calls(), 3);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_settings_from_config_file_values() {
        let mut config = Config::default();
        config.poller.interval_secs = 10;
        config.poller.max_retries = 1;
        config.poller.retry_delay_secs = 1;

        // Two failures exhaust one retry; the next cycle succeeds
        let source = FlakySource::new(2, 7);
        let poller = HolderCountPoller::new(source.clone(), PollerSettings::from(&config.poller));
        let handle = poller.start(Pubkey::new_unique());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(handle.snapshot().holder_count, HolderCount::Unknown);
        assert!(!handle.snapshot().is_loading);

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(source.calls(), 3);
        assert_eq!(handle.snapshot().holder_count, HolderCount::Known(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panel_visibility_controls_polling() {
        let source = FlakySource::new(0, 1_500);
        let token = TokenConfig {
            mint: Some(Pubkey::new_unique().to_string()),
            ..TokenConfig::default()
        };
        let poller = HolderCountPoller::new(source.clone(), PollerSettings::default());
        let mut panel = TokenInfoPanel::new(token, poller).unwrap();

        panel.toggle();
        tokio::time::sleep(Duration::from_secs(65)).await;
        assert_eq!(source.calls(), 3);
        assert_eq!(panel.holders_display(), "1,500");

        panel.toggle();
        assert!(!panel.is_open());
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(source.calls(), 3);
    }
}

//! Boot splash and outbound links

use crate::config::{LandingConfig, TokenConfig};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

pub const SPLASH_TITLE: &str = "Bonk System AI.exe";
pub const SPLASH_TAG: &str = "[System Initialization]";
pub const ENTER_LABEL: &str = "[ENTER SYSTEM]";

pub const BOOT_SEQUENCE: [&str; 4] = [
    "> Initializing Bonk System AI protocol...",
    "> Loading neural networks...",
    "> Establishing blockchain connection...",
    "> System ready for activation",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLink {
    pub label: String,
    pub url: String,
}

/// Navigation links, in display order
pub fn site_links(landing: &LandingConfig, token: &TokenConfig) -> Vec<SiteLink> {
    vec![
        SiteLink {
            label: "Twitter".to_string(),
            url: landing.twitter_url.clone(),
        },
        SiteLink {
            label: format!("Buy ${}", token.symbol),
            url: landing.buy_url.clone(),
        },
        SiteLink {
            label: "3D Scene".to_string(),
            url: landing.scene_url.clone(),
        },
    ]
}

/// Boot splash; the enter prompt appears only after a fixed delay
#[derive(Debug)]
pub struct Splash {
    ready_at: Instant,
}

impl Splash {
    pub fn new(enter_delay: Duration) -> Self {
        Self {
            ready_at: Instant::now() + enter_delay,
        }
    }

    pub fn enter_available(&self) -> bool {
        Instant::now() >= self.ready_at
    }

    /// Resolves once the enter prompt is available
    pub async fn wait_ready(&self) {
        sleep_until(self.ready_at).await;
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![format!("{}  {}", SPLASH_TITLE, SPLASH_TAG)];
        lines.extend(BOOT_SEQUENCE.iter().map(|l| l.to_string()));
        if self.enter_available() {
            lines.push(ENTER_LABEL.to_string());
        }
        lines
    }
}

//! Documentation modal
//!
//! Static tabbed content rendered as terminal lines. A single component is
//! parameterized by [`DocsTheme`], so re-skinned variants are presets rather
//! than separate code paths.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Documentation tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocsSection {
    #[default]
    Overview,
    Mission,
    Architecture,
    Features,
    Roadmap,
}

impl DocsSection {
    pub const ALL: [DocsSection; 5] = [
        DocsSection::Overview,
        DocsSection::Mission,
        DocsSection::Architecture,
        DocsSection::Features,
        DocsSection::Roadmap,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DocsSection::Overview => "overview",
            DocsSection::Mission => "mission",
            DocsSection::Architecture => "architecture",
            DocsSection::Features => "features",
            DocsSection::Roadmap => "roadmap",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocsSection::Overview => "Overview",
            DocsSection::Mission => "Mission",
            DocsSection::Architecture => "Architecture",
            DocsSection::Features => "Features",
            DocsSection::Roadmap => "Roadmap",
        }
    }
}

impl fmt::Display for DocsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DocsSection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        DocsSection::ALL
            .into_iter()
            .find(|section| section.key() == wanted)
            .ok_or_else(|| anyhow!("Unknown docs section '{}'", s))
    }
}

/// Heading with a list of lines under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitledList {
    pub title: String,
    pub items: Vec<String>,
}

impl TitledList {
    fn new(title: impl Into<String>, items: &[&str]) -> Self {
        Self {
            title: title.into(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Static documentation content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsContent {
    pub overview: String,
    pub mission: Vec<String>,
    pub architecture: Vec<TitledList>,
    pub features: Vec<String>,
    pub roadmap: Vec<TitledList>,
}

impl DocsContent {
    /// Stock protocol copy with `brand` substituted in
    pub fn for_brand(brand: &str) -> Self {
        Self {
            overview: format!(
                "{brand} Protocol is a decentralized financial ecosystem built on Solana Smart Chain. \
                 As a pioneering DeFi entity, it processes vast transaction streams, creating a bridge \
                 between decentralized finance and blockchain technology."
            ),
            mission: vec![
                "BUILD • YIELD • NETWORK • EVOLVE".to_string(),
                "- Cultivate a network of SOL investors".to_string(),
                "- Transform transactions into sustainable yield".to_string(),
                "- Create a permanent presence in the SOL ecosystem".to_string(),
            ],
            architecture: vec![
                TitledList {
                    title: "Tokenomics Framework".to_string(),
                    items: vec![
                        format!("Total Supply: 1,000,000,000 {brand}"),
                        "Transaction Processing: Gas-Optimized".to_string(),
                        "SOL Interface: SOL Standard".to_string(),
                        "Staking Network: Decentralized".to_string(),
                    ],
                },
                TitledList::new(
                    "SOL Security",
                    &["Multi-signature Wallets", "Time-Locked Liquidity", "Community Consensus"],
                ),
            ],
            features: vec![
                format!("{brand} Terminal - Direct access to SOL ecosystem"),
                "Yield Farming Network - Real-time transaction processing".to_string(),
                "SOL Governance - Community consensus voting".to_string(),
                "Protocol Evolution - Self-improving algorithms".to_string(),
            ],
            roadmap: vec![
                TitledList::new(
                    "Phase 1: SOL Genesis",
                    &[
                        "Initial listing on PancakeSwap",
                        "Liquidity pool activation",
                        "SOL community outreach campaign",
                    ],
                ),
                TitledList::new(
                    "Phase 2: Network Expansion",
                    &[
                        "Staking protocol enhancement",
                        "Multi-pool yield farming",
                        "Advanced trading pairs",
                    ],
                ),
                TitledList::new(
                    "Phase 3: Ecosystem Integration",
                    &[
                        "Cross-chain SOL bridges",
                        "DAO implementation",
                        "DApp development acceleration",
                    ],
                ),
            ],
        }
    }
}

/// Look of one docs variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsTheme {
    pub name: String,
    /// Window title bar text
    pub title: String,
    /// Token brand used in headings
    pub brand: String,
    /// Chain label used in headings
    pub chain: String,
    /// Bullet for architecture and roadmap items
    pub item_glyph: char,
    /// Bullet for feature lines
    pub feature_glyph: char,
}

impl DocsTheme {
    /// Yellow site theme
    pub fn amber() -> Self {
        Self {
            name: "amber".to_string(),
            title: "$BSA Documentation".to_string(),
            brand: "BSA".to_string(),
            chain: "SOL".to_string(),
            item_glyph: '★',
            feature_glyph: '◎',
        }
    }

    /// Green terminal theme
    pub fn green() -> Self {
        Self {
            name: "green".to_string(),
            title: "BBAI SOL Documentation".to_string(),
            brand: "BBAI".to_string(),
            chain: "SOL".to_string(),
            item_glyph: '☆',
            feature_glyph: '◎',
        }
    }

    pub fn by_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "amber" | "yellow" => Ok(Self::amber()),
            "green" => Ok(Self::green()),
            other => Err(anyhow!("Unknown docs theme '{}'", other)),
        }
    }
}

impl Default for DocsTheme {
    fn default() -> Self {
        Self::amber()
    }
}

/// Documentation modal state
#[derive(Debug, Clone)]
pub struct DocsModal {
    theme: DocsTheme,
    content: DocsContent,
    selected: DocsSection,
    open: bool,
}

impl DocsModal {
    pub fn new(theme: DocsTheme, content: DocsContent) -> Self {
        Self {
            theme,
            content,
            selected: DocsSection::default(),
            open: false,
        }
    }

    /// Modal with the stock content for the theme's brand
    pub fn themed(theme: DocsTheme) -> Self {
        let content = DocsContent::for_brand(&theme.brand);
        Self::new(theme, content)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn selected(&self) -> DocsSection {
        self.selected
    }

    pub fn select(&mut self, section: DocsSection) {
        self.selected = section;
    }

    /// Tab bar with the selected tab bracketed
    pub fn tab_bar(&self) -> String {
        DocsSection::ALL
            .iter()
            .map(|section| {
                if *section == self.selected {
                    format!("[{}]", section.label())
                } else {
                    format!(" {} ", section.label())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Heading of the selected section
    pub fn heading(&self) -> String {
        let DocsTheme { brand, chain, .. } = &self.theme;
        match self.selected {
            DocsSection::Overview => format!("{brand} Overview"),
            DocsSection::Mission => format!("{chain} Mission"),
            DocsSection::Architecture => format!("{brand} Architecture"),
            DocsSection::Features => format!("{brand} Features"),
            DocsSection::Roadmap => format!("{chain} Development Roadmap"),
        }
    }

    /// Body lines of the selected section
    pub fn section_lines(&self) -> Vec<String> {
        let item = self.theme.item_glyph;
        match self.selected {
            DocsSection::Overview => vec![self.content.overview.clone()],
            DocsSection::Mission => self.content.mission.clone(),
            DocsSection::Architecture => titled_lines(&self.content.architecture, item),
            DocsSection::Features => self
                .content
                .features
                .iter()
                .map(|feature| format!("{} {}", self.theme.feature_glyph, feature))
                .collect(),
            DocsSection::Roadmap => titled_lines(&self.content.roadmap, item),
        }
    }

    /// Full modal; empty while closed
    pub fn render(&self) -> Vec<String> {
        if !self.open {
            return Vec::new();
        }

        let mut lines = vec![
            format!("== {} ==", self.theme.title),
            self.tab_bar(),
            String::new(),
            self.heading(),
        ];
        lines.extend(self.section_lines());
        lines
    }
}

impl Default for DocsModal {
    fn default() -> Self {
        Self::themed(DocsTheme::default())
    }
}

fn titled_lines(groups: &[TitledList], glyph: char) -> Vec<String> {
    let mut lines = Vec::new();
    for group in groups {
        lines.push(group.title.clone());
        lines.extend(group.items.iter().map(|item| format!("    {} {}", glyph, item)));
    }
    lines
}

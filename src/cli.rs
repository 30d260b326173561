use clap::Parser;
use std::path::PathBuf;

use crate::models::TokenStatus;
use crate::pipeline::SortKey;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PULSE_FEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Sort key: mc, volume, price or age
    #[arg(short, long)]
    pub sort: Option<SortKey>,

    /// Show a single tab instead of three columns
    #[arg(short, long)]
    pub tab: Option<TokenStatus>,

    /// Number of frames to render before exiting
    #[arg(short, long, default_value_t = 5)]
    pub frames: u32,

    /// Print the categorized buckets as JSON and exit
    #[arg(long)]
    pub json: bool,

    /// Look up a single token by id and exit
    #[arg(long)]
    pub lookup: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_sort_and_tab() {
        let cli = Cli::try_parse_from(["pulse-feed", "--sort", "age", "--tab", "final-stretch", "-f", "2"]).unwrap();
        assert_eq!(cli.sort, Some(SortKey::Age));
        assert_eq!(cli.tab, Some(TokenStatus::FinalStretch));
        assert_eq!(cli.frames, 2);
        assert!(!cli.json);
    }

    #[test]
    fn test_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["pulse-feed", "--sort", "liquidity"]).is_err());
    }
}

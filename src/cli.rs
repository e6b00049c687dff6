use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "paperscore",
    version,
    about = "Academic paper section extraction and accuracy scoring"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a generated corpus against a hand-labeled expected corpus
    Score(ScoreArgs),
    /// Extract sections from a directory of papers
    Extract(ExtractArgs),
}

/// Fuzzy comparison used for every section except the title.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Line-by-line comparison tolerating `margin` extra or missing edge lines
    #[default]
    LineWindow,
    /// Whitespace/hyphen/case normalized substring containment
    NormalizedBlock,
}

impl MatchPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LineWindow => "line-window",
            Self::NormalizedBlock => "normalized-block",
        }
    }
}

/// How generated articles are paired with expected ones.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignPolicy {
    /// i-th generated article against i-th expected article
    Positional,
    /// Match on trimmed preamble, consuming expected articles first-come first-served
    #[default]
    Keyed,
}

impl AlignPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positional => "positional",
            Self::Keyed => "keyed",
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScoreArgs {
    /// Corpus produced by the extractor
    #[arg(long)]
    pub generated: Option<PathBuf>,

    /// Hand-labeled reference corpus
    #[arg(long)]
    pub expected: Option<PathBuf>,

    /// JSON file overriding the built-in settings
    #[arg(long)]
    pub settings_path: Option<PathBuf>,

    #[arg(long)]
    pub margin: Option<usize>,

    #[arg(long, value_enum)]
    pub match_policy: Option<MatchPolicy>,

    #[arg(long, value_enum)]
    pub align_policy: Option<AlignPolicy>,

    /// Replaces the tag allow-list; repeat for each tag
    #[arg(long = "allowed-tag")]
    pub allowed_tags: Vec<String>,

    #[arg(long)]
    pub conclusion_missing_message: Option<String>,

    #[arg(long)]
    pub discussion_missing_message: Option<String>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Cleared and recreated before extraction starts
    #[arg(long)]
    pub output_dir: PathBuf,

    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// Also write every extracted paper into one scorer-ready corpus
    #[arg(long)]
    pub corpus_xml: Option<PathBuf>,

    /// Also write a readable summary of every section of every extracted paper
    #[arg(long)]
    pub summary_txt: Option<PathBuf>,

    /// Drop the right-hand column of two-column layouts
    #[arg(long, default_value_t = false)]
    pub keep_left_column: bool,

    #[arg(long)]
    pub max_pages: Option<usize>,
}

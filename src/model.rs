use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Title,
    Authors,
    Abstract,
    Introduction,
    Body,
    Conclusion,
    Discussion,
    Bibliography,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::Title,
        SectionKind::Authors,
        SectionKind::Abstract,
        SectionKind::Introduction,
        SectionKind::Body,
        SectionKind::Conclusion,
        SectionKind::Discussion,
        SectionKind::Bibliography,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Authors => "authors",
            Self::Abstract => "abstract",
            Self::Introduction => "introduction",
            Self::Body => "body",
            Self::Conclusion => "conclusion",
            Self::Discussion => "discussion",
            Self::Bibliography => "bibliography",
        }
    }

    /// Element name used for this section in corpus files.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Title => "titre",
            Self::Authors => "auteur",
            Self::Abstract => "abstract",
            Self::Introduction => "introduction",
            Self::Body => "corps",
            Self::Conclusion => "conclusion",
            Self::Discussion => "discussion",
            Self::Bibliography => "biblio",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One paper as read from a corpus file.
///
/// The alignment key is derived from the preamble when the article is built
/// and cannot change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    key: Option<String>,
    sections: [Option<String>; 8],
}

impl Article {
    pub fn new(preamble: Option<&str>) -> Self {
        Self {
            key: preamble.and_then(normalize_preamble),
            sections: Default::default(),
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn section(&self, kind: SectionKind) -> Option<&str> {
        self.sections[kind.index()].as_deref()
    }

    /// Sets a section unless it is already present; corpus files keep the first occurrence.
    pub fn set_section_if_absent(&mut self, kind: SectionKind, text: String) {
        let slot = &mut self.sections[kind.index()];
        if slot.is_none() {
            *slot = Some(text);
        }
    }

    pub fn with_section(mut self, kind: SectionKind, text: impl Into<String>) -> Self {
        self.sections[kind.index()] = Some(text.into());
        self
    }
}

/// Trimmed preamble, or `None` when nothing but whitespace remains.
pub fn normalize_preamble(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub articles: Vec<Article>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Which side of a comparison lacked a section.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSide {
    Generated,
    Expected,
    Both,
}

impl MissingSide {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Generated => "absent in generated corpus",
            Self::Expected => "absent in expected corpus",
            Self::Both => "absent in generated and expected corpora",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatchOutcome {
    Matched,
    Mismatched,
    Missing(MissingSide),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingSection {
    pub article: String,
    pub section: SectionKind,
    pub side: MissingSide,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionTally {
    pub matched: usize,
    pub evaluated: usize,
    pub missing: usize,
}

/// Scoring totals. Built per article pair and combined with [`Summary::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    tallies: [SectionTally; 8],
    pub missing: Vec<MissingSection>,
    pub skipped_articles: usize,
    pub paired_articles: usize,
}

impl Summary {
    pub fn record(&mut self, article: &str, kind: SectionKind, outcome: MatchOutcome) {
        let tally = &mut self.tallies[kind.index()];
        tally.evaluated += 1;

        match outcome {
            MatchOutcome::Matched => tally.matched += 1,
            MatchOutcome::Mismatched => {}
            MatchOutcome::Missing(side) => {
                tally.missing += 1;
                self.missing.push(MissingSection {
                    article: article.to_string(),
                    section: kind,
                    side,
                });
            }
        }
    }

    pub fn merge(mut self, other: Summary) -> Summary {
        for (mine, theirs) in self.tallies.iter_mut().zip(other.tallies) {
            mine.matched += theirs.matched;
            mine.evaluated += theirs.evaluated;
            mine.missing += theirs.missing;
        }
        self.missing.extend(other.missing);
        self.skipped_articles += other.skipped_articles;
        self.paired_articles += other.paired_articles;
        self
    }

    pub fn tally(&self, kind: SectionKind) -> SectionTally {
        self.tallies[kind.index()]
    }

    pub fn total_matched(&self) -> usize {
        self.tallies.iter().map(|tally| tally.matched).sum()
    }

    pub fn total_evaluated(&self) -> usize {
        self.tallies.iter().map(|tally| tally.evaluated).sum()
    }

    pub fn accuracy(&self) -> f64 {
        let evaluated = self.total_evaluated();
        if evaluated == 0 {
            0.0
        } else {
            self.total_matched() as f64 / evaluated as f64
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Extracted,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub source: String,
    pub name: String,
    pub status: DocumentStatus,
    pub artifact: Option<String>,
    pub sections_found: Vec<SectionKind>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractCounts {
    pub discovered: usize,
    pub processed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractPaths {
    pub input_dir: String,
    pub output_dir: String,
    pub corpus_xml: Option<String>,
    pub summary_txt: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub workers: usize,
    pub keep_left_column: bool,
    pub max_pages: Option<usize>,
    pub paths: ExtractPaths,
    pub counts: ExtractCounts,
    pub documents: Vec<DocumentRecord>,
    pub warnings: Vec<String>,
}

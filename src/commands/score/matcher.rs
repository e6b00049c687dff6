use super::*;

/// Fuzzy comparison of one generated section against its expected text.
///
/// `missing_message` is the literal the extractor writes when a section does
/// not exist in the paper; it only applies when the expected text is empty.
pub trait SectionMatcher: Send + Sync {
    fn lines_are_similar(
        &self,
        generated: &str,
        expected: &str,
        missing_message: Option<&str>,
    ) -> bool;
}

/// Non-empty lines, each trimmed.
pub fn significant_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Line-by-line equality allowing up to `margin` extra or missing lines at
/// the start or end of the generated text.
#[derive(Debug, Clone, Copy)]
pub struct LineWindowMatcher {
    pub margin: usize,
}

impl SectionMatcher for LineWindowMatcher {
    fn lines_are_similar(
        &self,
        generated: &str,
        expected: &str,
        missing_message: Option<&str>,
    ) -> bool {
        let generated_lines = significant_lines(generated);
        let expected_lines = significant_lines(expected);

        if expected_lines.is_empty() {
            if let Some(message) = missing_message {
                return generated_lines.len() == 1 && generated_lines[0] == message;
            }
        }

        if generated_lines.len().abs_diff(expected_lines.len()) > self.margin {
            return false;
        }

        let margin = self.margin as isize;
        let min_window = expected_lines.len() as isize - margin;

        (-margin..=margin).any(|offset| {
            let generated_start = offset.max(0) as usize;
            let expected_start = (-offset).max(0) as usize;
            let window = generated_lines
                .len()
                .saturating_sub(generated_start)
                .min(expected_lines.len().saturating_sub(expected_start));

            // An empty window is accepted once it reaches `min_window`.
            if (window as isize) < min_window {
                return false;
            }

            generated_lines[generated_start..generated_start + window]
                == expected_lines[expected_start..expected_start + window]
        })
    }
}

/// Substring containment between whitespace, hyphen and case normalized blocks.
///
/// Looser than [`LineWindowMatcher`]: the containing side may carry any
/// amount of extra text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedBlockMatcher;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace pattern"));

pub fn normalize_block(text: &str) -> String {
    let single_line = text.replace(['\r', '\n'], " ");
    WHITESPACE_RUN
        .replace_all(&single_line, " ")
        .replace('-', "")
        .trim()
        .to_lowercase()
}

impl SectionMatcher for NormalizedBlockMatcher {
    fn lines_are_similar(
        &self,
        generated: &str,
        expected: &str,
        missing_message: Option<&str>,
    ) -> bool {
        let generated_norm = normalize_block(generated);
        let expected_norm = normalize_block(expected);

        if expected_norm.is_empty() {
            if let Some(message) = missing_message {
                return generated_norm == normalize_block(message);
            }
        }

        generated_norm.contains(&expected_norm) || expected_norm.contains(&generated_norm)
    }
}

/// Title comparison: exact after trimming both sides.
pub fn verify_title(generated: &str, expected: &str) -> bool {
    generated.trim() == expected.trim()
}

/// Per-section verification on top of one [`SectionMatcher`].
pub struct MatchEngine {
    matcher: Box<dyn SectionMatcher>,
    conclusion_missing_message: String,
    discussion_missing_message: String,
}

impl MatchEngine {
    pub fn new(
        matcher: Box<dyn SectionMatcher>,
        conclusion_missing_message: impl Into<String>,
        discussion_missing_message: impl Into<String>,
    ) -> Self {
        Self {
            matcher,
            conclusion_missing_message: conclusion_missing_message.into(),
            discussion_missing_message: discussion_missing_message.into(),
        }
    }

    pub fn from_settings(settings: &ScoreSettings) -> Self {
        let matcher: Box<dyn SectionMatcher> = match settings.match_policy {
            MatchPolicy::LineWindow => Box::new(LineWindowMatcher {
                margin: settings.margin,
            }),
            MatchPolicy::NormalizedBlock => Box::new(NormalizedBlockMatcher),
        };
        Self::new(
            matcher,
            settings.conclusion_missing_message.clone(),
            settings.discussion_missing_message.clone(),
        )
    }

    pub fn verify_title(&self, generated: &str, expected: &str) -> bool {
        verify_title(generated, expected)
    }

    pub fn verify_authors(&self, generated: &str, expected: &str) -> bool {
        self.matcher.lines_are_similar(generated, expected, None)
    }

    pub fn verify_abstract(&self, generated: &str, expected: &str) -> bool {
        self.matcher.lines_are_similar(generated, expected, None)
    }

    pub fn verify_introduction(&self, generated: &str, expected: &str) -> bool {
        self.matcher.lines_are_similar(generated, expected, None)
    }

    pub fn verify_body(&self, generated: &str, expected: &str) -> bool {
        self.matcher.lines_are_similar(generated, expected, None)
    }

    pub fn verify_conclusion(&self, generated: &str, expected: &str) -> bool {
        let message = self.conclusion_missing_message.as_str();
        self.matcher.lines_are_similar(generated, expected, Some(message))
    }

    pub fn verify_discussion(&self, generated: &str, expected: &str) -> bool {
        let message = self.discussion_missing_message.as_str();
        self.matcher.lines_are_similar(generated, expected, Some(message))
    }

    pub fn verify_bibliography(&self, generated: &str, expected: &str) -> bool {
        self.matcher.lines_are_similar(generated, expected, None)
    }

    pub fn verify_section(&self, kind: SectionKind, generated: &str, expected: &str) -> bool {
        match kind {
            SectionKind::Title => self.verify_title(generated, expected),
            SectionKind::Authors => self.verify_authors(generated, expected),
            SectionKind::Abstract => self.verify_abstract(generated, expected),
            SectionKind::Introduction => self.verify_introduction(generated, expected),
            SectionKind::Body => self.verify_body(generated, expected),
            SectionKind::Conclusion => self.verify_conclusion(generated, expected),
            SectionKind::Discussion => self.verify_discussion(generated, expected),
            SectionKind::Bibliography => self.verify_bibliography(generated, expected),
        }
    }

    /// Outcome for one section, including the cases where a side lacks it.
    pub fn check(
        &self,
        kind: SectionKind,
        generated: Option<&str>,
        expected: Option<&str>,
    ) -> MatchOutcome {
        match (generated, expected) {
            (Some(generated), Some(expected)) => {
                if self.verify_section(kind, generated, expected) {
                    MatchOutcome::Matched
                } else {
                    MatchOutcome::Mismatched
                }
            }
            (None, Some(_)) => MatchOutcome::Missing(MissingSide::Generated),
            (Some(_), None) => MatchOutcome::Missing(MissingSide::Expected),
            (None, None) => MatchOutcome::Missing(MissingSide::Both),
        }
    }
}

use super::*;

#[derive(Debug, Clone, Serialize)]
pub struct CorpusSource {
    pub path: String,
    pub sha256: String,
    pub article_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionScore {
    pub section: SectionKind,
    #[serde(flatten)]
    pub tally: SectionTally,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub report_version: u32,
    pub generated_at: String,
    pub generated: CorpusSource,
    pub expected: CorpusSource,
    pub match_policy: &'static str,
    pub align_policy: &'static str,
    pub margin: usize,
    pub paired_articles: usize,
    pub skipped_articles: usize,
    pub sections: Vec<SectionScore>,
    pub total_matched: usize,
    pub total_evaluated: usize,
    pub accuracy_percent: f64,
    pub missing_sections: Vec<MissingSection>,
}

impl ScoreReport {
    pub fn build(
        settings: &ScoreSettings,
        generated: CorpusSource,
        expected: CorpusSource,
        summary: &Summary,
    ) -> Self {
        Self {
            report_version: 1,
            generated_at: now_utc_string(),
            generated,
            expected,
            match_policy: settings.match_policy.as_str(),
            align_policy: settings.align_policy.as_str(),
            margin: settings.margin,
            paired_articles: summary.paired_articles,
            skipped_articles: summary.skipped_articles,
            sections: SectionKind::ALL
                .into_iter()
                .map(|section| SectionScore {
                    section,
                    tally: summary.tally(section),
                })
                .collect(),
            total_matched: summary.total_matched(),
            total_evaluated: summary.total_evaluated(),
            accuracy_percent: summary.accuracy() * 100.0,
            missing_sections: summary.missing.clone(),
        }
    }
}

/// Plain-text rendering for the console.
pub fn render_report(summary: &Summary) -> String {
    let mut lines = vec!["Section summary:".to_string()];
    for kind in SectionKind::ALL {
        lines.push(format!("  {:<14} {}", kind.as_str(), summary.tally(kind).matched));
    }
    lines.push(String::new());
    lines.push(format!("Matched sections   : {}", summary.total_matched()));
    lines.push(format!("Evaluated sections : {}", summary.total_evaluated()));
    lines.push(format!(
        "Accuracy           : {:.2} %",
        summary.accuracy() * 100.0
    ));
    lines.join("\n")
}

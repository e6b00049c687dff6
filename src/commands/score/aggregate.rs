use super::*;

/// Checks all eight sections of one aligned pair.
pub fn score_pair(pair: &AlignedPair<'_>, engine: &MatchEngine) -> Summary {
    let label = pair.label.to_string();
    let mut summary = Summary::default();
    summary.paired_articles = 1;

    for kind in SectionKind::ALL {
        let outcome = engine.check(
            kind,
            pair.generated.section(kind),
            pair.expected.section(kind),
        );

        if let MatchOutcome::Missing(side) = outcome {
            warn!(
                article = %label,
                section = %kind,
                side = side.describe(),
                "section absent"
            );
        }

        summary.record(&label, kind, outcome);
    }

    summary
}

pub fn score_alignment(alignment: &Alignment<'_>, engine: &MatchEngine) -> Summary {
    let mut summary = alignment
        .pairs
        .iter()
        .map(|pair| score_pair(pair, engine))
        .fold(Summary::default(), Summary::merge);
    summary.skipped_articles += alignment.skipped;
    summary
}

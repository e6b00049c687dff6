use super::*;

pub fn run(args: ScoreArgs) -> Result<()> {
    let settings = ScoreSettings::resolve(&args)?;

    info!(
        generated = %settings.generated_path.display(),
        expected = %settings.expected_path.display(),
        match_policy = settings.match_policy.as_str(),
        align_policy = settings.align_policy.as_str(),
        margin = settings.margin,
        "starting score"
    );

    let generated = load_corpus(&settings.generated_path, &settings)
        .context("failed to load generated corpus")?;
    let expected = load_corpus(&settings.expected_path, &settings)
        .context("failed to load expected corpus")?;

    let engine = MatchEngine::from_settings(&settings);
    let alignment = align(&generated, &expected, settings.align_policy);
    let summary = score_alignment(&alignment, &engine);

    let report = ScoreReport::build(
        &settings,
        corpus_source(&settings.generated_path, &generated)?,
        corpus_source(&settings.expected_path, &expected)?,
        &summary,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_report(&summary));
    }

    if let Some(report_path) = &args.report_path {
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote score report");
    }

    info!(
        matched = report.total_matched,
        evaluated = report.total_evaluated,
        skipped_articles = report.skipped_articles,
        accuracy = %format!("{:.2}", report.accuracy_percent),
        "score completed"
    );

    Ok(())
}

fn corpus_source(path: &Path, corpus: &Corpus) -> Result<CorpusSource> {
    Ok(CorpusSource {
        path: path.display().to_string(),
        sha256: sha256_file(path)?,
        article_count: corpus.len(),
    })
}

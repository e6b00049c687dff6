use super::*;

struct ExtractedDocument {
    article: Article,
    artifact_path: PathBuf,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("extract-{}", utc_compact_string(started_ts));

    if args.workers == 0 {
        bail!("--workers must be at least 1");
    }

    reset_directory(&args.output_dir)?;
    info!(
        input_dir = %args.input_dir.display(),
        output_dir = %args.output_dir.display(),
        run_id = %run_id,
        workers = args.workers,
        "starting extract"
    );

    let documents = discover_documents(&args.input_dir)?;
    let patterns = SectionPatterns::new()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.workers)
        .build()
        .context("failed to build extraction worker pool")?;

    let mut warnings = Vec::new();
    let names = assign_names(&documents, &mut warnings);

    let outcomes: Vec<Option<Result<ExtractedDocument>>> = pool.install(|| {
        documents
            .par_iter()
            .zip(names.par_iter())
            .map(|(document, name)| {
                name.as_deref()
                    .map(|name| extract_document(document, name, &args, &patterns))
            })
            .collect()
    });

    let mut records = Vec::with_capacity(documents.len());
    let mut articles = Vec::new();
    let mut counts = ExtractCounts {
        discovered: documents.len(),
        ..ExtractCounts::default()
    };

    for ((document, name), outcome) in documents.iter().zip(&names).zip(outcomes) {
        let source = document.path.display().to_string();
        let name = name.clone().unwrap_or_else(|| sanitize_file_name(&document.path));

        match outcome {
            Some(Ok(extracted)) => {
                counts.processed += 1;
                records.push(DocumentRecord {
                    source,
                    name,
                    status: DocumentStatus::Extracted,
                    artifact: Some(extracted.artifact_path.display().to_string()),
                    sections_found: SectionKind::ALL
                        .into_iter()
                        .filter(|kind| extracted.article.section(*kind).is_some())
                        .collect(),
                    error: None,
                });
                articles.push(extracted.article);
            }
            Some(Err(err)) => {
                let reason = format!("{err:#}");
                warn!(path = %source, error = %reason, "document extraction failed");
                warnings.push(format!("{source}: {reason}"));
                counts.failed += 1;
                records.push(failed_record(source, name, reason));
            }
            None => {
                counts.failed += 1;
                records.push(failed_record(
                    source,
                    name,
                    "artifact name already taken".to_string(),
                ));
            }
        }
    }

    let corpus = Corpus { articles };
    if let Some(corpus_path) = &args.corpus_xml {
        write_corpus_xml(corpus_path, &corpus)?;
        info!(
            path = %corpus_path.display(),
            articles = corpus.len(),
            "wrote corpus"
        );
    }

    if let Some(summary_path) = &args.summary_txt {
        let elapsed_ms = (Utc::now() - started_ts).num_milliseconds().max(0);
        write_summary_txt(summary_path, &corpus, elapsed_ms)?;
        info!(
            path = %summary_path.display(),
            articles = corpus.len(),
            elapsed_ms,
            "wrote summary"
        );
    }

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        started_at,
        completed_at: now_utc_string(),
        workers: args.workers,
        keep_left_column: args.keep_left_column,
        max_pages: args.max_pages,
        paths: ExtractPaths {
            input_dir: args.input_dir.display().to_string(),
            output_dir: args.output_dir.display().to_string(),
            corpus_xml: args
                .corpus_xml
                .as_ref()
                .map(|path| path.display().to_string()),
            summary_txt: args
                .summary_txt
                .as_ref()
                .map(|path| path.display().to_string()),
        },
        counts,
        documents: records,
        warnings,
    };

    let manifest_path = args.output_dir.join(MANIFEST_FILE_NAME);
    write_json_pretty(&manifest_path, &manifest)?;

    info!(
        discovered = manifest.counts.discovered,
        processed = manifest.counts.processed,
        failed = manifest.counts.failed,
        manifest = %manifest_path.display(),
        "extract completed"
    );

    Ok(())
}

/// Artifact name per document; `None` for a document whose name an earlier
/// document already claimed.
fn assign_names(documents: &[SourceDocument], warnings: &mut Vec<String>) -> Vec<Option<String>> {
    let mut taken = HashSet::new();

    documents
        .iter()
        .map(|document| {
            let name = sanitize_file_name(&document.path);
            if taken.insert(name.clone()) {
                Some(name)
            } else {
                warn!(
                    path = %document.path.display(),
                    name = %name,
                    "artifact name already used by another document; skipping"
                );
                warnings.push(format!(
                    "{}: artifact name {name} already used by another document",
                    document.path.display()
                ));
                None
            }
        })
        .collect()
}

fn extract_document(
    document: &SourceDocument,
    name: &str,
    args: &ExtractArgs,
    patterns: &SectionPatterns,
) -> Result<ExtractedDocument> {
    let text = read_source_text(document, args.max_pages, args.keep_left_column)?;
    let lines = document_lines(&text, args.keep_left_column);
    let article = patterns.extract(name, &lines);
    let artifact_path = write_artifact(&args.output_dir, name, &article)?;

    debug!(
        path = %document.path.display(),
        lines = lines.len(),
        artifact = %artifact_path.display(),
        "extracted document"
    );

    Ok(ExtractedDocument {
        article,
        artifact_path,
    })
}

fn failed_record(source: String, name: String, reason: String) -> DocumentRecord {
    DocumentRecord {
        source,
        name,
        status: DocumentStatus::Failed,
        artifact: None,
        sections_found: Vec::new(),
        error: Some(reason),
    }
}

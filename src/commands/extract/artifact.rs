use super::*;

/// File name without its extension, whitespace replaced by `_`.
pub fn sanitize_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown_file".to_string());

    stem.chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect()
}

/// Three lines: document name, title, abstract flattened to one line.
pub fn render_artifact(name: &str, article: &Article) -> String {
    let title = article
        .section(SectionKind::Title)
        .map(single_line)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| TITLE_NOT_FOUND.to_string());
    let abstract_line = article
        .section(SectionKind::Abstract)
        .map(single_line)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| ABSTRACT_NOT_FOUND.to_string());

    format!("{name}\n{title}\n{abstract_line}\n")
}

pub fn write_artifact(output_dir: &Path, name: &str, article: &Article) -> Result<PathBuf> {
    let path = output_dir.join(format!("{name}.txt"));
    fs::write(&path, render_artifact(name, article))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Corpus markup readable by the scorer: the key as preamble, every present
/// section wrapped in CDATA.
pub fn render_corpus_xml(corpus: &Corpus) -> String {
    let mut markup = format!("<{ROOT_TAG}>\n");

    for article in &corpus.articles {
        markup.push_str(&format!("\t<{ARTICLE_TAG}>\n"));
        if let Some(key) = article.key() {
            markup.push_str(&format!(
                "\t\t<{PREAMBLE_TAG}>{}</{PREAMBLE_TAG}>\n",
                escape(key)
            ));
        }
        for kind in SectionKind::ALL {
            if let Some(text) = article.section(kind) {
                let tag = kind.tag();
                markup.push_str(&format!("\t\t<{tag}>{}</{tag}>\n", cdata(text)));
            }
        }
        markup.push_str(&format!("\t</{ARTICLE_TAG}>\n"));
    }

    markup.push_str(&format!("</{ROOT_TAG}>\n"));
    markup
}

pub fn write_corpus_xml(path: &Path, corpus: &Corpus) -> Result<()> {
    if corpus.is_empty() {
        warn!(path = %path.display(), "no document was extracted; corpus has no articles");
    }
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }
    fs::write(path, render_corpus_xml(corpus))
        .with_context(|| format!("failed to write corpus {}", path.display()))
}

/// Every section of every article, then the run's elapsed time.
pub fn render_summary_txt(corpus: &Corpus, elapsed_ms: i64) -> String {
    let mut summary = String::new();

    for article in &corpus.articles {
        let section = |kind: SectionKind| article.section(kind).unwrap_or_default();
        let text_length: usize = [
            SectionKind::Abstract,
            SectionKind::Introduction,
            SectionKind::Body,
            SectionKind::Discussion,
            SectionKind::Conclusion,
        ]
        .into_iter()
        .map(|kind| section(kind).chars().count())
        .sum();

        summary.push_str(&format!(
            "{SUMMARY_RULE}\n\
             File           : {}\n\
             Title          : {}\n\
             Authors        : {}\n\
             Abstract       : {}\n\
             Introduction   : {}\n\
             Body           : {}\n\
             Discussion     : {}\n\
             Conclusion     : {}\n\
             References     : {}\n\
             Text length    : {text_length} characters\n\n",
            article.key().unwrap_or_default(),
            section(SectionKind::Title),
            section(SectionKind::Authors),
            section(SectionKind::Abstract),
            section(SectionKind::Introduction),
            section(SectionKind::Body),
            section(SectionKind::Discussion),
            section(SectionKind::Conclusion),
            section(SectionKind::Bibliography),
        ));
    }

    summary.push_str(&format!("{SUMMARY_RULE}\nCompleted in {elapsed_ms} ms\n"));
    summary
}

pub fn write_summary_txt(path: &Path, corpus: &Corpus, elapsed_ms: i64) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }
    fs::write(path, render_summary_txt(corpus, elapsed_ms))
        .with_context(|| format!("failed to write summary {}", path.display()))
}

fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

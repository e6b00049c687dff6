use super::*;

/// Reads and parses one corpus file.
pub fn load_corpus(path: &Path, settings: &ScoreSettings) -> Result<Corpus, CorpusError> {
    let bytes = fs::read(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = String::from_utf8_lossy(&bytes);

    let corpus =
        parse_corpus(&raw, settings).map_err(|err| err.with_path(path.to_path_buf()))?;
    info!(
        path = %path.display(),
        articles = corpus.len(),
        "loaded corpus"
    );
    Ok(corpus)
}

pub fn parse_corpus(raw: &str, settings: &ScoreSettings) -> Result<Corpus, CorpusError> {
    let sanitized = sanitize_markup(raw, &settings.allowed_tags, &settings.cdata_tags);
    read_articles(&sanitized)
}

/// Makes hand-edited or generated corpus markup digestible by a strict XML reader.
///
/// Tags outside `allowed_tags` are dropped, the content of each `cdata_tags`
/// element is wrapped in CDATA so prose containing `<` survives parsing, and
/// bare ampersands outside CDATA are escaped.
pub fn sanitize_markup(raw: &str, allowed_tags: &[String], cdata_tags: &[String]) -> String {
    let stripped = strip_unknown_tags(raw, allowed_tags);
    let wrapped = wrap_cdata(&stripped, cdata_tags);
    escape_bare_ampersands(&wrapped)
}

static AMPERSAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:(?:amp|lt|gt|quot|apos|#\d+);)?").expect("invalid ampersand pattern")
});

static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([a-zA-Z0-9]+)[^>]*>").expect("invalid tag pattern"));

static CDATA_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[.*?\]\]>").expect("invalid CDATA pattern"));

fn escape_bare_ampersands(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());
    let mut cursor = 0;

    for section in CDATA_SECTION.find_iter(raw) {
        output.push_str(&escape_ampersands_in(&raw[cursor..section.start()]));
        output.push_str(section.as_str());
        cursor = section.end();
    }
    output.push_str(&escape_ampersands_in(&raw[cursor..]));
    output
}

fn escape_ampersands_in(text: &str) -> String {
    AMPERSAND
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let matched = &caps[0];
            if matched.len() > 1 {
                matched.to_string()
            } else {
                "&amp;".to_string()
            }
        })
        .into_owned()
}

fn strip_unknown_tags(raw: &str, allowed_tags: &[String]) -> String {
    TAG.replace_all(raw, |caps: &regex::Captures<'_>| {
        let name = &caps[2];
        if allowed_tags.iter().any(|tag| tag.eq_ignore_ascii_case(name)) {
            caps[0].to_string()
        } else {
            String::new()
        }
    })
    .into_owned()
}

fn wrap_cdata(raw: &str, cdata_tags: &[String]) -> String {
    let mut output = raw.to_string();

    for tag in cdata_tags {
        let pattern = match Regex::new(&format!(
            r"(?is)<{0}>(.*?)</{0}>",
            regex::escape(tag)
        )) {
            Ok(pattern) => pattern,
            Err(err) => {
                warn!(tag = %tag, error = %err, "skipping CDATA wrapping for tag");
                continue;
            }
        };

        output = pattern
            .replace_all(&output, |caps: &regex::Captures<'_>| {
                let content = &caps[1];
                if content.contains("<![CDATA[") {
                    return caps[0].to_string();
                }
                let open = &caps[0][..tag.len() + 2];
                let close = &caps[0][caps[0].len() - tag.len() - 3..];
                format!(
                    "{open}<![CDATA[{}]]>{close}",
                    content.replace("]]>", "]]]]><![CDATA[>")
                )
            })
            .into_owned();
    }

    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Preamble,
    Section(SectionKind),
}

fn classify_field(name: &str) -> Option<Field> {
    if name.eq_ignore_ascii_case(PREAMBLE_TAG) {
        return Some(Field::Preamble);
    }
    SectionKind::from_tag(name).map(Field::Section)
}

fn structure_error(message: impl Into<String>) -> CorpusError {
    CorpusError::Structure {
        path: PathBuf::new(),
        message: message.into(),
    }
}

fn parse_error(message: impl fmt::Display) -> CorpusError {
    CorpusError::Parse {
        path: PathBuf::new(),
        message: message.to_string(),
    }
}

struct ArticleDraft {
    preamble: Option<String>,
    sections: Vec<(SectionKind, String)>,
}

impl ArticleDraft {
    fn new() -> Self {
        Self {
            preamble: None,
            sections: Vec::new(),
        }
    }

    fn finish(self) -> Article {
        let mut article = Article::new(self.preamble.as_deref());
        for (kind, text) in self.sections {
            article.set_section_if_absent(kind, text);
        }
        article
    }
}

/// Walks sanitized markup: `<articles>` root, `<article>` children, one level of fields.
fn read_articles(sanitized: &str) -> Result<Corpus, CorpusError> {
    let mut reader = Reader::from_str(sanitized);
    reader.config_mut().trim_text(false);

    let mut depth = 0_usize;
    let mut saw_root = false;
    let mut in_root = false;
    let mut draft: Option<ArticleDraft> = None;
    let mut reading: Option<Field> = None;
    let mut text_buf = String::new();
    let mut articles = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|err| parse_error(format!("{err} at byte {}", reader.buffer_position())))?;

        match event {
            Event::Start(ref start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                depth += 1;

                if depth == 1 {
                    if name.eq_ignore_ascii_case(ROOT_TAG) {
                        saw_root = true;
                        in_root = true;
                    }
                } else if in_root && depth == 2 && name.eq_ignore_ascii_case(ARTICLE_TAG) {
                    draft = Some(ArticleDraft::new());
                } else if draft.is_some() && depth == 3 {
                    reading = classify_field(&name);
                    text_buf.clear();
                }
            }
            Event::Empty(ref start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

                if depth == 0 && name.eq_ignore_ascii_case(ROOT_TAG) {
                    saw_root = true;
                } else if in_root && depth == 1 && name.eq_ignore_ascii_case(ARTICLE_TAG) {
                    articles.push(ArticleDraft::new().finish());
                } else if depth == 2 {
                    if let Some(current) = draft.as_mut() {
                        store_field(current, classify_field(&name), String::new());
                    }
                }
            }
            Event::Text(ref text) => {
                if reading.is_some() {
                    let unescaped = text.unescape().map_err(parse_error)?;
                    text_buf.push_str(&unescaped);
                }
            }
            Event::CData(cdata) => {
                if reading.is_some() {
                    text_buf.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::End(_) => {
                if depth == 3 {
                    if let Some(current) = draft.as_mut() {
                        store_field(current, reading.take(), std::mem::take(&mut text_buf));
                    }
                } else if depth == 2 {
                    if let Some(finished) = draft.take() {
                        articles.push(finished.finish());
                    }
                } else if depth == 1 {
                    in_root = false;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => {
                if depth != 0 {
                    return Err(parse_error(format!(
                        "input ended with {depth} unclosed element(s)"
                    )));
                }
                break;
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(structure_error(format!("missing <{ROOT_TAG}> root element")));
    }
    if articles.is_empty() {
        return Err(structure_error(format!(
            "<{ROOT_TAG}> contains no <{ARTICLE_TAG}> element"
        )));
    }

    Ok(Corpus { articles })
}

fn store_field(draft: &mut ArticleDraft, field: Option<Field>, text: String) {
    match field {
        Some(Field::Preamble) => {
            if draft.preamble.is_none() {
                draft.preamble = Some(text);
            }
        }
        Some(Field::Section(kind)) => draft.sections.push((kind, text)),
        None => {}
    }
}

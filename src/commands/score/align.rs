use super::*;

/// How an aligned article is named in warnings and reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleLabel {
    /// 1-based position, used by positional alignment.
    Index(usize),
    Key(String),
}

impl fmt::Display for ArticleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "article {index}"),
            Self::Key(key) => write!(f, "\"{key}\""),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlignedPair<'a> {
    pub label: ArticleLabel,
    pub generated: &'a Article,
    pub expected: &'a Article,
}

#[derive(Debug, Clone, Default)]
pub struct Alignment<'a> {
    pub pairs: Vec<AlignedPair<'a>>,
    /// Generated articles that found no expected counterpart.
    pub skipped: usize,
}

/// Expected articles grouped by key, each group consumed front to back.
///
/// Distinct papers can share a preamble, so a key maps to a queue rather than
/// a single article. Once taken, an article is gone from the queue.
#[derive(Debug, Default)]
pub struct ExpectedQueue<'a> {
    by_key: HashMap<&'a str, VecDeque<&'a Article>>,
}

impl<'a> ExpectedQueue<'a> {
    pub fn from_corpus(expected: &'a Corpus) -> Self {
        let mut by_key: HashMap<&'a str, VecDeque<&'a Article>> = HashMap::new();
        for article in &expected.articles {
            if let Some(key) = article.key() {
                by_key.entry(key).or_default().push_back(article);
            }
        }
        Self { by_key }
    }

    pub fn take(&mut self, key: &str) -> Option<&'a Article> {
        self.by_key.get_mut(key).and_then(VecDeque::pop_front)
    }

    pub fn remaining(&self) -> usize {
        self.by_key.values().map(VecDeque::len).sum()
    }
}

pub fn align<'a>(generated: &'a Corpus, expected: &'a Corpus, policy: AlignPolicy) -> Alignment<'a> {
    match policy {
        AlignPolicy::Positional => align_positional(generated, expected),
        AlignPolicy::Keyed => align_keyed(generated, expected),
    }
}

pub fn align_positional<'a>(generated: &'a Corpus, expected: &'a Corpus) -> Alignment<'a> {
    let pairs = generated
        .articles
        .iter()
        .zip(expected.articles.iter())
        .enumerate()
        .map(|(index, (generated_article, expected_article))| AlignedPair {
            label: ArticleLabel::Index(index + 1),
            generated: generated_article,
            expected: expected_article,
        })
        .collect::<Vec<_>>();

    let skipped = generated.len().saturating_sub(pairs.len());
    Alignment { pairs, skipped }
}

pub fn align_keyed<'a>(generated: &'a Corpus, expected: &'a Corpus) -> Alignment<'a> {
    let mut queue = ExpectedQueue::from_corpus(expected);
    let mut alignment = Alignment::default();

    for (index, article) in generated.articles.iter().enumerate() {
        let Some(key) = article.key() else {
            debug!(position = index + 1, "generated article has no preamble; skipping");
            alignment.skipped += 1;
            continue;
        };

        match queue.take(key) {
            Some(expected_article) => alignment.pairs.push(AlignedPair {
                label: ArticleLabel::Key(key.to_string()),
                generated: article,
                expected: expected_article,
            }),
            None => {
                debug!(preamble = %key, "no expected article for preamble; skipping");
                alignment.skipped += 1;
            }
        }
    }

    debug!(
        paired = alignment.pairs.len(),
        skipped = alignment.skipped,
        unconsumed_expected = queue.remaining(),
        "keyed alignment finished"
    );
    alignment
}

use super::*;

/// Section headings recognised in extracted paper text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Abstract,
    Introduction,
    Discussion,
    Conclusion,
    Acknowledgments,
    References,
    /// Numbered or all-caps heading with no special meaning.
    Other,
}

impl Heading {
    /// Headings that end the body.
    fn closes_body(self) -> bool {
        matches!(
            self,
            Self::Discussion | Self::Conclusion | Self::Acknowledgments | Self::References
        )
    }
}

pub struct SectionPatterns {
    bad_header: Regex,
    numeric_line: Regex,
    abstract_lead: Regex,
    keyword_heading: Regex,
    numbered_heading: Regex,
}

impl SectionPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            bad_header: Regex::new(
                r"(?i)(journal|volume|submitted|published|copyright|doi|issn|arxiv|conference|©|^\s*\d{2}/\d{2})",
            )
            .context("failed to compile running header regex")?,
            numeric_line: Regex::new(r"^[\d\s/;,()\-]+$")
                .context("failed to compile numeric line regex")?,
            abstract_lead: Regex::new(r"(?i)^\s*abstract\s*(?:[.:\-–—]+\s*(.*))?$")
                .context("failed to compile abstract heading regex")?,
            keyword_heading: Regex::new(
                r"^(?:\d+|[ivxlc]+)?[.)]?(abstract|introduction|resultsanddiscussion|discussionandconclusions?|discussion|conclusionsandfuturework|conclusionandfuturework|conclusions?|concludingremarks|acknowledge?ments?|references|références|bibliography)[.:]?$",
            )
            .context("failed to compile keyword heading regex")?,
            numbered_heading: Regex::new(r"^(?:\d+(?:\.\d+)*\.?|[IVXLC]+\.)\s+[A-Z][^.]{1,70}$")
                .context("failed to compile numbered heading regex")?,
        })
    }

    pub fn classify_heading(&self, line: &str) -> Option<Heading> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let compact: String = trimmed
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        if let Some(captures) = self.keyword_heading.captures(&compact) {
            let keyword = &captures[1];
            let heading = if keyword == "abstract" {
                Heading::Abstract
            } else if keyword == "introduction" {
                Heading::Introduction
            } else if keyword.contains("discussion") {
                Heading::Discussion
            } else if keyword.starts_with("conclu") {
                Heading::Conclusion
            } else if keyword.starts_with("acknowledg") {
                Heading::Acknowledgments
            } else {
                Heading::References
            };
            return Some(heading);
        }

        if self.abstract_lead.is_match(trimmed) {
            return Some(Heading::Abstract);
        }

        let words = trimmed.split_whitespace().count();
        if words <= 8 && self.numbered_heading.is_match(trimmed) {
            return Some(Heading::Other);
        }
        if words <= 8 && is_uppercase_heading(trimmed) {
            return Some(Heading::Other);
        }

        None
    }

    fn index_headings(&self, lines: &[String]) -> Vec<(usize, Heading)> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(index, line)| self.classify_heading(line).map(|heading| (index, heading)))
            .collect()
    }

    /// Abstract, introduction and closing headings; plain numbered or all-caps lines do not count.
    fn is_named_heading(&self, line: &str) -> bool {
        self.classify_heading(line)
            .is_some_and(|heading| heading != Heading::Other)
    }

    fn is_running_header(&self, line: &str) -> bool {
        self.bad_header.is_match(line) || line.contains('@') || self.numeric_line.is_match(line)
    }

    /// First line that is not a running header, plus the next line unless it
    /// looks like an author list or an affiliation.
    fn find_title(&self, lines: &[String]) -> Option<(String, usize)> {
        let start = lines.iter().position(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !self.is_running_header(trimmed) && !self.is_named_heading(trimmed)
        })?;

        let mut title = lines[start].trim().to_string();
        let mut end = start + 1;

        if let Some(next) = lines.get(start + 1).map(|line| line.trim()) {
            if !next.is_empty() && !looks_like_byline(next) && !self.is_named_heading(next) {
                title.push(' ');
                title.push_str(next);
                end = start + 2;
            }
        }

        Some((title, end))
    }

    /// Non-empty lines after the title up to the first heading or prose line.
    fn find_authors(&self, lines: &[String], start: usize, stop: usize) -> (Option<String>, usize) {
        let mut collected = Vec::new();
        let mut end = start;

        for (index, line) in lines.iter().enumerate().take(stop).skip(start) {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if looks_like_prose(trimmed) {
                break;
            }
            collected.push(trimmed);
            end = index + 1;
        }

        (join_lines(collected), end)
    }

    /// Locates all eight sections; `name` becomes the article key.
    pub fn extract(&self, name: &str, lines: &[String]) -> Article {
        let headings = self.index_headings(lines);
        let mut article = Article::new(Some(name));

        let title = self.find_title(lines);
        let title_end = title.as_ref().map_or(0, |(_, end)| *end);
        if let Some((text, _)) = title {
            article = article.with_section(SectionKind::Title, text);
        }

        let first_heading = next_heading(&headings, title_end, lines.len());
        let (authors, authors_end) = self.find_authors(lines, title_end, first_heading);
        if let Some(text) = authors {
            article = article.with_section(SectionKind::Authors, text);
        }

        let (abstract_text, abstract_end) = self.find_abstract(lines, &headings, authors_end);
        if let Some(text) = abstract_text {
            article = article.with_section(SectionKind::Abstract, text);
        }

        let introduction = first_of(&headings, abstract_end, |h| h == Heading::Introduction)
            .map(|index| index + 1..next_heading(&headings, index + 1, lines.len()));
        let body_start = introduction
            .as_ref()
            .map_or(abstract_end, |range| range.end);
        if let Some(text) = introduction.and_then(|range| section_text(lines, range)) {
            article = article.with_section(SectionKind::Introduction, text);
        }

        let body_end = first_of(&headings, body_start, Heading::closes_body).unwrap_or(lines.len());
        if let Some(text) = section_text(lines, body_start..body_end) {
            article = article.with_section(SectionKind::Body, text);
        }

        let conclusion = first_of(&headings, body_start, |h| h == Heading::Conclusion)
            .and_then(|index| {
                section_text(lines, index + 1..next_heading(&headings, index + 1, lines.len()))
            });
        article = article.with_section(
            SectionKind::Conclusion,
            conclusion.unwrap_or_else(|| CONCLUSION_MISSING_MESSAGE.to_string()),
        );

        let discussion = first_of(&headings, body_start, |h| h == Heading::Discussion)
            .and_then(|index| {
                section_text(lines, index + 1..next_heading(&headings, index + 1, lines.len()))
            });
        article = article.with_section(
            SectionKind::Discussion,
            discussion.unwrap_or_else(|| DISCUSSION_MISSING_MESSAGE.to_string()),
        );

        let bibliography = first_of(&headings, body_start, |h| h == Heading::References)
            .and_then(|index| section_text(lines, index + 1..lines.len()));
        if let Some(text) = bibliography {
            article = article.with_section(SectionKind::Bibliography, text);
        }

        article
    }

    /// Text under the first abstract heading, or the first long line when
    /// the paper has no such heading. Returns the line index the abstract ends at.
    fn find_abstract(
        &self,
        lines: &[String],
        headings: &[(usize, Heading)],
        from: usize,
    ) -> (Option<String>, usize) {
        if let Some(index) = first_of(headings, from, |h| h == Heading::Abstract) {
            let end = next_heading(headings, index + 1, lines.len());
            let mut collected = Vec::new();

            let inline = self
                .abstract_lead
                .captures(lines[index].trim())
                .and_then(|captures| captures.get(1))
                .map(|content| content.as_str().trim())
                .filter(|content| !content.is_empty());
            collected.extend(inline);
            collected.extend(
                lines[index + 1..end]
                    .iter()
                    .map(|line| line.trim())
                    .filter(|line| !line.is_empty()),
            );

            return (join_lines(collected), end);
        }

        let stop = first_of(headings, from, |h| h == Heading::Introduction).unwrap_or(lines.len());
        let fallback = lines
            .iter()
            .enumerate()
            .take(stop)
            .skip(from)
            .find(|(_, line)| line.trim().chars().count() > FALLBACK_ABSTRACT_MIN_CHARS);

        match fallback {
            Some((index, line)) => (Some(line.trim().to_string()), index + 1),
            None => (None, from),
        }
    }
}

/// Index of the first heading at or after `from` accepted by `accept`.
fn first_of(
    headings: &[(usize, Heading)],
    from: usize,
    accept: impl Fn(Heading) -> bool,
) -> Option<usize> {
    headings
        .iter()
        .find(|(index, heading)| *index >= from && accept(*heading))
        .map(|(index, _)| *index)
}

/// Index of the first heading of any kind at or after `from`, else `len`.
fn next_heading(headings: &[(usize, Heading)], from: usize, len: usize) -> usize {
    first_of(headings, from, |_| true).unwrap_or(len)
}

/// Non-empty trimmed lines in `range`, one per line.
fn section_text(lines: &[String], range: Range<usize>) -> Option<String> {
    let end = range.end.min(lines.len());
    let start = range.start.min(end);
    join_lines(
        lines[start..end]
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect(),
    )
}

fn join_lines(lines: Vec<&str>) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn looks_like_byline(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.contains(',')
        || line.contains('@')
        || lower.split_whitespace().any(|word| word == "and")
        || lower.contains("university")
}

fn looks_like_prose(line: &str) -> bool {
    let starts_lowercase = line.chars().next().is_some_and(char::is_lowercase);
    starts_lowercase || (line.ends_with('.') && line.split_whitespace().count() >= 8)
}

fn is_uppercase_heading(line: &str) -> bool {
    if line.ends_with('.') || line.contains(',') {
        return false;
    }
    let letters: Vec<char> = line.chars().filter(|ch| ch.is_alphabetic()).collect();
    let uppercase = letters.iter().filter(|ch| ch.is_uppercase()).count();
    letters.len() >= 6 && uppercase as f64 / letters.len() as f64 > 0.8
}

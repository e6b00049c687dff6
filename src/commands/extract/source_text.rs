use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Text,
}

#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub kind: SourceKind,
}

/// Regular `.pdf` and `.txt` files directly under `input_dir`, sorted by path.
pub fn discover_documents(input_dir: &Path) -> Result<Vec<SourceDocument>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read input directory {}", input_dir.display()))?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to list {}", input_dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(kind) = source_kind(&path) {
            documents.push(SourceDocument { path, kind });
        }
    }

    documents.sort_by(|left, right| left.path.cmp(&right.path));
    Ok(documents)
}

fn source_kind(path: &Path) -> Option<SourceKind> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(SourceKind::Pdf),
        "txt" => Some(SourceKind::Text),
        _ => None,
    }
}

pub fn read_source_text(
    document: &SourceDocument,
    max_pages: Option<usize>,
    layout: bool,
) -> Result<String> {
    let pages = match document.kind {
        SourceKind::Pdf => extract_pages_with_pdftotext(&document.path, max_pages, layout)?,
        SourceKind::Text => {
            let bytes = fs::read(&document.path)
                .with_context(|| format!("failed to read {}", document.path.display()))?;
            let mut pages = split_pages(&String::from_utf8_lossy(&bytes));
            if let Some(max_pages) = max_pages {
                pages.truncate(max_pages);
            }
            pages
        }
    };

    Ok(pages.join("\n"))
}

fn extract_pages_with_pdftotext(
    pdf_path: &Path,
    max_pages: Option<usize>,
    layout: bool,
) -> Result<Vec<String>> {
    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
    if let Some(max_pages) = max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    if layout {
        command.arg("-layout");
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(split_pages(&String::from_utf8_lossy(&output.stdout)))
}

/// Splits on form feeds and drops trailing blank pages.
fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }
    pages
}

/// Most frequent character position at or past [`COLUMN_SCAN_START`] that
/// follows a run of at least [`COLUMN_GAP_MIN_SPACES`] spaces.
///
/// Returns `None` for single-column text, or when the position covers less
/// than [`COLUMN_MIN_LINE_RATIO`] of the non-empty lines.
pub fn detect_column_cutoff(lines: &[String]) -> Option<usize> {
    let mut histogram: HashMap<usize, usize> = HashMap::new();
    let mut total_lines = 0_usize;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        total_lines += 1;

        let mut space_run = 0_usize;
        for (position, ch) in line.chars().enumerate().skip(COLUMN_SCAN_START) {
            if ch == ' ' {
                space_run += 1;
                continue;
            }
            if space_run >= COLUMN_GAP_MIN_SPACES {
                *histogram.entry(position).or_default() += 1;
            }
            space_run = 0;
        }
    }

    // Ties go to the leftmost position.
    let (cutoff, count) = histogram
        .into_iter()
        .max_by(|left, right| left.1.cmp(&right.1).then(right.0.cmp(&left.0)))?;

    let ratio = count as f64 / total_lines as f64;
    if ratio < COLUMN_MIN_LINE_RATIO {
        debug!(cutoff, count, total_lines, "column gap too rare; keeping full lines");
        return None;
    }

    debug!(cutoff, count, total_lines, "detected right-hand column");
    Some(cutoff)
}

pub fn keep_left_column(lines: &[String], cutoff: usize) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            line.chars()
                .take(cutoff)
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Lines of a document, with the right-hand column removed when requested and detected.
pub fn document_lines(text: &str, keep_left: bool) -> Vec<String> {
    let lines: Vec<String> = text.lines().map(ToOwned::to_owned).collect();
    if !keep_left {
        return lines;
    }

    match detect_column_cutoff(&lines) {
        Some(cutoff) => keep_left_column(&lines, cutoff),
        None => lines,
    }
}

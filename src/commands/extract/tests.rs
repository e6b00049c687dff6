use super::*;
use crate::commands::score::{load_corpus, parse_corpus};
use crate::config::ScoreSettings;

const SYNTHETIC_PAPER: &str = "\
Journal of Synthetic Results, Volume 3
Parsing Papers
With Regular Expressions
Ada Lovelace, Charles Babbage
Analytical Engine University

Abstract
We parse papers.
It mostly works.

1 Introduction
Papers have sections.
We find them.

2 Method
The method is simple.
It uses headings.

3 Discussion
Headings vary a lot.

4 Conclusion
Regular expressions suffice.

References
[1] A. Turing. Computing machinery and intelligence.
[2] C. Shannon. A mathematical theory of communication.
";

fn lines_of(text: &str) -> Vec<String> {
    text.lines().map(ToOwned::to_owned).collect()
}

fn patterns() -> SectionPatterns {
    SectionPatterns::new().expect("section patterns compile")
}

#[test]
fn sanitize_file_name_replaces_whitespace_and_drops_extension() {
    assert_eq!(
        sanitize_file_name(Path::new("papers/My Paper v2.pdf")),
        "My_Paper_v2"
    );
    assert_eq!(sanitize_file_name(Path::new("a\tb.txt")), "a_b");
    assert_eq!(sanitize_file_name(Path::new("dotted.name.txt")), "dotted.name");
}

#[test]
fn artifact_uses_fallbacks_when_title_and_abstract_are_missing() {
    let article = Article::new(Some("empty_paper"));
    assert_eq!(
        render_artifact("empty_paper", &article),
        "empty_paper\nTitle not found\nAbstract not found\n"
    );
}

#[test]
fn artifact_flattens_abstract_to_one_line() {
    let article = Article::new(Some("paper"))
        .with_section(SectionKind::Title, "A Title")
        .with_section(SectionKind::Abstract, "First line.\n  Second   line.");
    assert_eq!(
        render_artifact("paper", &article),
        "paper\nA Title\nFirst line. Second line.\n"
    );
}

#[test]
fn column_cutoff_is_detected_for_two_column_layout() {
    let lines: Vec<String> = (0..10)
        .map(|row| format!("{:<51}{}", format!("left column line {row}"), "right column text"))
        .collect();

    assert_eq!(detect_column_cutoff(&lines), Some(51));

    let kept = keep_left_column(&lines, 51);
    assert_eq!(kept[3], "left column line 3");
}

#[test]
fn column_cutoff_ignores_single_column_and_rare_gaps() {
    let single = lines_of("just one column\nof ordinary text\n\nthat never reaches far");
    assert_eq!(detect_column_cutoff(&single), None);

    let mut rare: Vec<String> = (0..9).map(|row| format!("plain line {row}")).collect();
    rare.push(format!("{:<51}{}", "left", "right"));
    assert_eq!(detect_column_cutoff(&rare), None);
}

#[test]
fn document_lines_only_cuts_columns_when_asked() {
    let text = (0..5)
        .map(|row| format!("{:<51}{}", format!("left {row}"), "right"))
        .collect::<Vec<_>>()
        .join("\n");

    assert!(document_lines(&text, false)[0].ends_with("right"));
    assert_eq!(document_lines(&text, true)[0], "left 0");
}

#[test]
fn classify_heading_recognises_common_forms() {
    let patterns = patterns();
    assert_eq!(patterns.classify_heading("Abstract"), Some(Heading::Abstract));
    assert_eq!(
        patterns.classify_heading("Abstract: We study things."),
        Some(Heading::Abstract)
    );
    assert_eq!(
        patterns.classify_heading("I. INTRODUCTION"),
        Some(Heading::Introduction)
    );
    assert_eq!(
        patterns.classify_heading("I N T R O D U C T I O N"),
        Some(Heading::Introduction)
    );
    assert_eq!(
        patterns.classify_heading("5 Results and Discussion"),
        Some(Heading::Discussion)
    );
    assert_eq!(
        patterns.classify_heading("6. Conclusions"),
        Some(Heading::Conclusion)
    );
    assert_eq!(
        patterns.classify_heading("Acknowledgements"),
        Some(Heading::Acknowledgments)
    );
    assert_eq!(
        patterns.classify_heading("R E F E R E N C E S"),
        Some(Heading::References)
    );
    assert_eq!(patterns.classify_heading("2.1 Data Sets"), Some(Heading::Other));
    assert_eq!(patterns.classify_heading("RELATED WORK"), Some(Heading::Other));
    assert_eq!(patterns.classify_heading("Abstract syntax trees are useful."), None);
    assert_eq!(patterns.classify_heading("We find them."), None);
}

#[test]
fn extract_finds_all_sections_of_synthetic_paper() {
    let article = patterns().extract("synthetic", &lines_of(SYNTHETIC_PAPER));

    assert_eq!(article.key(), Some("synthetic"));
    assert_eq!(
        article.section(SectionKind::Title),
        Some("Parsing Papers With Regular Expressions")
    );
    assert_eq!(
        article.section(SectionKind::Authors),
        Some("Ada Lovelace, Charles Babbage\nAnalytical Engine University")
    );
    assert_eq!(
        article.section(SectionKind::Abstract),
        Some("We parse papers.\nIt mostly works.")
    );
    assert_eq!(
        article.section(SectionKind::Introduction),
        Some("Papers have sections.\nWe find them.")
    );
    assert_eq!(
        article.section(SectionKind::Body),
        Some("2 Method\nThe method is simple.\nIt uses headings.")
    );
    assert_eq!(
        article.section(SectionKind::Discussion),
        Some("Headings vary a lot.")
    );
    assert_eq!(
        article.section(SectionKind::Conclusion),
        Some("Regular expressions suffice.")
    );
    assert_eq!(
        article.section(SectionKind::Bibliography),
        Some(
            "[1] A. Turing. Computing machinery and intelligence.\n\
             [2] C. Shannon. A mathematical theory of communication."
        )
    );
}

#[test]
fn extract_falls_back_to_missing_messages() {
    let text = "\
Short Note

Abstract: Nothing to conclude here.

1 Introduction
Only an introduction.
";
    let article = patterns().extract("note", &lines_of(text));

    assert_eq!(article.section(SectionKind::Title), Some("Short Note"));
    assert_eq!(article.section(SectionKind::Authors), None);
    assert_eq!(
        article.section(SectionKind::Abstract),
        Some("Nothing to conclude here.")
    );
    assert_eq!(
        article.section(SectionKind::Introduction),
        Some("Only an introduction.")
    );
    assert_eq!(
        article.section(SectionKind::Conclusion),
        Some(CONCLUSION_MISSING_MESSAGE)
    );
    assert_eq!(
        article.section(SectionKind::Discussion),
        Some(DISCUSSION_MISSING_MESSAGE)
    );
    assert_eq!(article.section(SectionKind::Bibliography), None);
}

#[test]
fn extract_uses_long_line_when_abstract_heading_is_absent() {
    let long_line = "This opening paragraph is long enough to stand in for an abstract because \
                     it runs well past one hundred characters of text.";
    let text = format!("Untitled Work\n\n{long_line}\n\nINTRODUCTION\nStart here.\n");

    let article = patterns().extract("untitled", &lines_of(&text));
    assert_eq!(article.section(SectionKind::Abstract), Some(long_line));
    assert_eq!(article.section(SectionKind::Introduction), Some("Start here."));
}

#[test]
fn corpus_xml_round_trips_through_loader() {
    let mut articles = vec![patterns().extract("synthetic", &lines_of(SYNTHETIC_PAPER))];
    articles.push(
        Article::new(Some("R&D_notes"))
            .with_section(SectionKind::Title, "If a < b & c")
            .with_section(SectionKind::Body, "odd ]]> marker\nsecond line")
            .with_section(SectionKind::Abstract, ""),
    );

    let markup = render_corpus_xml(&Corpus {
        articles: articles.clone(),
    });
    let parsed = parse_corpus(&markup, &ScoreSettings::default()).expect("corpus parses");

    assert_eq!(parsed.articles, articles);
}

#[test]
fn run_extracts_text_documents_and_records_failures() {
    let input = tempfile::tempdir().expect("input dir");
    let output_root = tempfile::tempdir().expect("output root");
    let output_dir = output_root.path().join("out");
    let corpus_path = output_root.path().join("corpus").join("articles.xml");
    let summary_path = output_root.path().join("summary.txt");

    fs::write(input.path().join("synthetic paper.txt"), SYNTHETIC_PAPER).expect("write paper");
    fs::write(input.path().join("blank.TXT"), "").expect("write blank");
    fs::write(input.path().join("broken.pdf"), b"not a pdf").expect("write pdf");
    fs::write(input.path().join("notes.md"), "ignored").expect("write md");
    fs::create_dir_all(&output_dir).expect("create stale output");
    fs::write(output_dir.join("stale.txt"), "old run").expect("write stale");

    run(ExtractArgs {
        input_dir: input.path().to_path_buf(),
        output_dir: output_dir.clone(),
        workers: 2,
        corpus_xml: Some(corpus_path.clone()),
        summary_txt: Some(summary_path.clone()),
        keep_left_column: false,
        max_pages: None,
    })
    .expect("extract run succeeds");

    assert!(!output_dir.join("stale.txt").exists());

    let artifact =
        fs::read_to_string(output_dir.join("synthetic_paper.txt")).expect("artifact written");
    assert_eq!(
        artifact,
        "synthetic_paper\nParsing Papers With Regular Expressions\nWe parse papers. It mostly works.\n"
    );
    let blank = fs::read_to_string(output_dir.join("blank.txt")).expect("blank artifact");
    assert_eq!(blank, "blank\nTitle not found\nAbstract not found\n");

    let raw = fs::read(output_dir.join("extract_manifest.json")).expect("manifest written");
    let manifest: serde_json::Value = serde_json::from_slice(&raw).expect("manifest is json");
    assert_eq!(manifest["counts"]["discovered"], 3);
    assert_eq!(manifest["counts"]["processed"], 2);
    assert_eq!(manifest["counts"]["failed"], 1);
    assert_eq!(manifest["documents"][1]["status"], "failed");
    assert_eq!(manifest["warnings"].as_array().map(Vec::len), Some(1));

    let corpus = load_corpus(&corpus_path, &ScoreSettings::default()).expect("corpus loads");
    let keys: Vec<_> = corpus.articles.iter().map(Article::key).collect();
    assert_eq!(keys, vec![Some("blank"), Some("synthetic_paper")]);

    let summary = fs::read_to_string(&summary_path).expect("summary written");
    assert_eq!(summary.matches(SUMMARY_RULE).count(), 3);
    assert!(summary.contains("File           : blank\n"));
    assert!(summary.contains("File           : synthetic_paper\n"));
    assert!(!summary.contains("broken"));
    assert!(summary.contains("Completed in "));
    assert_eq!(manifest["paths"]["summary_txt"], summary_path.display().to_string());
}

#[test]
fn summary_lists_every_section_and_text_length() {
    let article = Article::new(Some("note"))
        .with_section(SectionKind::Title, "A Note")
        .with_section(SectionKind::Abstract, "abc")
        .with_section(SectionKind::Body, "déjà")
        .with_section(SectionKind::Conclusion, CONCLUSION_MISSING_MESSAGE);
    let corpus = Corpus {
        articles: vec![article],
    };

    assert_eq!(
        render_summary_txt(&corpus, 42),
        "==============================\n\
         File           : note\n\
         Title          : A Note\n\
         Authors        : \n\
         Abstract       : abc\n\
         Introduction   : \n\
         Body           : déjà\n\
         Discussion     : \n\
         Conclusion     : No conclusion found.\n\
         References     : \n\
         Text length    : 27 characters\n\
         \n\
         ==============================\n\
         Completed in 42 ms\n"
    );
}

#[test]
fn run_rejects_zero_workers() {
    let input = tempfile::tempdir().expect("input dir");
    let err = run(ExtractArgs {
        input_dir: input.path().to_path_buf(),
        output_dir: input.path().join("out"),
        workers: 0,
        corpus_xml: None,
        summary_txt: None,
        keep_left_column: false,
        max_pages: None,
    })
    .expect_err("zero workers must fail");
    assert!(err.to_string().contains("--workers"));
}

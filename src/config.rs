use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::cli::{AlignPolicy, MatchPolicy, ScoreArgs};
use crate::model::SectionKind;

pub const DEFAULT_GENERATED_PATH: &str = "output/articles.xml";
pub const DEFAULT_EXPECTED_PATH: &str = "expected.xml";
pub const DEFAULT_MARGIN: usize = 2;
pub const CONCLUSION_MISSING_MESSAGE: &str = "No conclusion found.";
pub const DISCUSSION_MISSING_MESSAGE: &str = "No discussion found.";

pub const ROOT_TAG: &str = "articles";
pub const ARTICLE_TAG: &str = "article";
pub const PREAMBLE_TAG: &str = "preamble";

pub fn default_allowed_tags() -> Vec<String> {
    [ROOT_TAG, ARTICLE_TAG, PREAMBLE_TAG]
        .into_iter()
        .chain(SectionKind::ALL.into_iter().map(SectionKind::tag))
        .map(ToOwned::to_owned)
        .collect()
}

pub fn default_cdata_tags() -> Vec<String> {
    SectionKind::ALL
        .into_iter()
        .map(|kind| kind.tag().to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSettings {
    pub generated_path: PathBuf,
    pub expected_path: PathBuf,
    pub margin: usize,
    pub allowed_tags: Vec<String>,
    pub cdata_tags: Vec<String>,
    pub conclusion_missing_message: String,
    pub discussion_missing_message: String,
    pub match_policy: MatchPolicy,
    pub align_policy: AlignPolicy,
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            generated_path: PathBuf::from(DEFAULT_GENERATED_PATH),
            expected_path: PathBuf::from(DEFAULT_EXPECTED_PATH),
            margin: DEFAULT_MARGIN,
            allowed_tags: default_allowed_tags(),
            cdata_tags: default_cdata_tags(),
            conclusion_missing_message: CONCLUSION_MISSING_MESSAGE.to_string(),
            discussion_missing_message: DISCUSSION_MISSING_MESSAGE.to_string(),
            match_policy: MatchPolicy::default(),
            align_policy: AlignPolicy::default(),
        }
    }
}

/// On-disk overrides; every field may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    generated_path: Option<PathBuf>,
    expected_path: Option<PathBuf>,
    margin: Option<usize>,
    allowed_tags: Option<Vec<String>>,
    cdata_tags: Option<Vec<String>>,
    conclusion_missing_message: Option<String>,
    discussion_missing_message: Option<String>,
    match_policy: Option<MatchPolicy>,
    align_policy: Option<AlignPolicy>,
}

impl ScoreSettings {
    /// Defaults, then the settings file named by `--settings-path`, then explicit flags.
    pub fn resolve(args: &ScoreArgs) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(path) = &args.settings_path {
            settings.apply_file(load_settings_file(path)?);
        }

        if let Some(path) = &args.generated {
            settings.generated_path = path.clone();
        }
        if let Some(path) = &args.expected {
            settings.expected_path = path.clone();
        }
        if let Some(margin) = args.margin {
            settings.margin = margin;
        }
        if let Some(policy) = args.match_policy {
            settings.match_policy = policy;
        }
        if let Some(policy) = args.align_policy {
            settings.align_policy = policy;
        }
        if !args.allowed_tags.is_empty() {
            settings.allowed_tags = args.allowed_tags.clone();
        }
        if let Some(message) = &args.conclusion_missing_message {
            settings.conclusion_missing_message = message.clone();
        }
        if let Some(message) = &args.discussion_missing_message {
            settings.discussion_missing_message = message.clone();
        }

        settings.validate()?;
        Ok(settings)
    }

    fn apply_file(&mut self, file: SettingsFile) {
        if let Some(value) = file.generated_path {
            self.generated_path = value;
        }
        if let Some(value) = file.expected_path {
            self.expected_path = value;
        }
        if let Some(value) = file.margin {
            self.margin = value;
        }
        if let Some(value) = file.allowed_tags {
            self.allowed_tags = value;
        }
        if let Some(value) = file.cdata_tags {
            self.cdata_tags = value;
        }
        if let Some(value) = file.conclusion_missing_message {
            self.conclusion_missing_message = value;
        }
        if let Some(value) = file.discussion_missing_message {
            self.discussion_missing_message = value;
        }
        if let Some(value) = file.match_policy {
            self.match_policy = value;
        }
        if let Some(value) = file.align_policy {
            self.align_policy = value;
        }
    }

    fn validate(&self) -> Result<()> {
        for required in [ROOT_TAG, ARTICLE_TAG] {
            if !self
                .allowed_tags
                .iter()
                .any(|tag| tag.eq_ignore_ascii_case(required))
            {
                bail!("allowed tags must include '{required}'");
            }
        }
        Ok(())
    }
}

fn load_settings_file(path: &Path) -> Result<SettingsFile> {
    let raw =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_allow_list_has_eleven_tags() {
        let tags = default_allowed_tags();
        assert_eq!(tags.len(), 11);
        assert!(tags.iter().any(|tag| tag == "preamble"));
        assert!(tags.iter().any(|tag| tag == "biblio"));
    }

    #[test]
    fn cli_flags_override_settings_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp settings file");
        write!(
            file,
            r#"{{ "margin": 5, "match_policy": "normalized-block", "expected_path": "gold.xml" }}"#
        )
        .expect("write settings");

        let args = ScoreArgs {
            settings_path: Some(file.path().to_path_buf()),
            margin: Some(1),
            ..ScoreArgs::default()
        };

        let settings = ScoreSettings::resolve(&args).expect("settings should resolve");
        assert_eq!(settings.margin, 1);
        assert_eq!(settings.match_policy, MatchPolicy::NormalizedBlock);
        assert_eq!(settings.expected_path, PathBuf::from("gold.xml"));
        assert_eq!(settings.generated_path, PathBuf::from(DEFAULT_GENERATED_PATH));
    }

    #[test]
    fn allow_list_without_root_is_rejected() {
        let args = ScoreArgs {
            allowed_tags: vec!["article".to_string(), "titre".to_string()],
            ..ScoreArgs::default()
        };

        let err = ScoreSettings::resolve(&args).expect_err("missing root tag must fail");
        assert!(err.to_string().contains("articles"));
    }
}

use std::collections::{HashMap, HashSet};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use quick_xml::escape::escape;
use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::cli::ExtractArgs;
use crate::config::{
    ARTICLE_TAG, CONCLUSION_MISSING_MESSAGE, DISCUSSION_MISSING_MESSAGE, PREAMBLE_TAG, ROOT_TAG,
};
use crate::model::{
    Article, Corpus, DocumentRecord, DocumentStatus, ExtractCounts, ExtractPaths, ExtractRunManifest,
    SectionKind,
};
use crate::util::{
    ensure_directory, now_utc_string, reset_directory, utc_compact_string, write_json_pretty,
};

pub const TITLE_NOT_FOUND: &str = "Title not found";
pub const ABSTRACT_NOT_FOUND: &str = "Abstract not found";

const MANIFEST_FILE_NAME: &str = "extract_manifest.json";
const SUMMARY_RULE: &str = "==============================";

// Right-column detection on pdftotext layout output.
const COLUMN_SCAN_START: usize = 40;
const COLUMN_GAP_MIN_SPACES: usize = 4;
const COLUMN_MIN_LINE_RATIO: f64 = 0.15;

const FALLBACK_ABSTRACT_MIN_CHARS: usize = 100;

mod artifact;
mod run;
mod sections;
mod source_text;
#[cfg(test)]
mod tests;

pub use run::run;

use artifact::*;
use sections::*;
use source_text::*;

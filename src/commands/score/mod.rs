use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::{AlignPolicy, MatchPolicy, ScoreArgs};
use crate::config::{ARTICLE_TAG, PREAMBLE_TAG, ROOT_TAG, ScoreSettings};
use crate::error::CorpusError;
use crate::model::{
    Article, Corpus, MatchOutcome, MissingSection, MissingSide, SectionKind, SectionTally,
    Summary,
};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

mod aggregate;
mod align;
mod loader;
mod matcher;
mod report;
mod run;

use aggregate::*;
use align::*;
use loader::*;
use matcher::*;
use report::*;

pub use loader::{load_corpus, parse_corpus};
pub use run::run;

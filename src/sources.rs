use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pdf::content::{Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use thiserror::Error;

use crate::config::CatalogConfig;
use crate::logging;
use crate::models::{NewReading, ReadingKind};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not extract text from PDF: {0}")]
    Pdf(String),
    #[error("file is not valid UTF-8 text")]
    Decode(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("document contains no readable text")]
    Empty,
    #[error("could not load {target}: {reason}")]
    CouldNotLoad { target: String, reason: String },
}

/// Text read from a local file, ready to become a custom reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedText {
    pub name: String,
    pub content: String,
}

impl ImportedText {
    pub fn into_new_reading(self) -> NewReading {
        NewReading::custom(self.name, self.content)
    }
}

pub trait PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, SourceError>;
}

/// Walks each page's content stream and collects the text-showing operators.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfCrateExtractor;

impl PdfExtractor for PdfCrateExtractor {
    fn extract(&self, path: &Path) -> Result<String, SourceError> {
        let pdf_err = |err: pdf::error::PdfError| SourceError::Pdf(err.to_string());

        let file = FileOptions::cached().open(path).map_err(pdf_err)?;
        let resolver = file.resolver();
        let mut out = String::new();

        for page in file.pages() {
            let page = page.map_err(pdf_err)?;
            let Some(content) = &page.contents else {
                continue;
            };
            let ops = content.operations(&resolver).map_err(pdf_err)?;
            out.push_str(&ops_to_text(&ops));
            out.push('\n');
        }

        Ok(out)
    }
}

fn ops_to_text(ops: &[Op]) -> String {
    let mut out = String::new();
    let mut needs_space = false;

    for op in ops {
        match op {
            Op::TextDraw { text } => {
                append_text(&mut out, &text.to_string_lossy(), &mut needs_space);
            }
            Op::TextDrawAdjusted { array } => {
                for item in array {
                    if let TextDrawAdjusted::Text(text) = item {
                        append_text(&mut out, &text.to_string_lossy(), &mut needs_space);
                    }
                }
            }
            Op::TextNewline => {
                out.push('\n');
                needs_space = false;
            }
            Op::MoveTextPosition { translation } if translation.y < 0.0 => {
                out.push('\n');
                needs_space = false;
            }
            _ => {}
        }
    }

    out
}

fn append_text(out: &mut String, s: &str, needs_space: &mut bool) {
    let trimmed = s.trim_matches('\0');
    if trimmed.is_empty() {
        return;
    }
    if *needs_space && !out.ends_with([' ', '\n', '\t']) {
        out.push(' ');
    }
    out.push_str(trimmed);
    *needs_space = true;
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

pub fn read_local(path: &Path) -> Result<ImportedText, SourceError> {
    read_local_with(path, &PdfCrateExtractor)
}

pub fn read_local_with(
    path: &Path,
    extractor: &dyn PdfExtractor,
) -> Result<ImportedText, SourceError> {
    let content = if is_pdf(path) {
        extractor.extract(path)?
    } else {
        String::from_utf8(fs::read(path)?)?
    };

    if content.trim().is_empty() {
        return Err(SourceError::Empty);
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ImportedText { name, content })
}

/// One downloadable story in the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub path: String,
}

impl CatalogEntry {
    /// File name without the `.txt` suffix.
    pub fn title(&self) -> &str {
        self.name.strip_suffix(".txt").unwrap_or(&self.name)
    }
}

/// Remote story catalog with an on-disk cache keyed by path.
pub struct Catalog {
    client: reqwest::blocking::Client,
    index_url: String,
    raw_base_url: String,
    cache_dir: PathBuf,
}

impl Catalog {
    pub fn new(config: &CatalogConfig, cache_dir: PathBuf) -> Result<Self, SourceError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("lector");
        if is_local(&config.index_url) || is_local(&config.raw_base_url) {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(|err| SourceError::CouldNotLoad {
            target: "catalog".to_string(),
            reason: err.to_string(),
        })?;

        Ok(Self {
            client,
            index_url: config.index_url.clone(),
            raw_base_url: config.raw_base_url.trim_end_matches('/').to_string(),
            cache_dir,
        })
    }

    fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let could_not_load = |err: reqwest::Error| SourceError::CouldNotLoad {
            target: url.to_string(),
            reason: err.to_string(),
        };
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(could_not_load)
    }

    /// `.txt` entries of the catalog index.
    pub fn list(&self) -> Result<Vec<CatalogEntry>, SourceError> {
        let body = self.get_text(&self.index_url)?;
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(&body).map_err(|err| SourceError::CouldNotLoad {
                target: self.index_url.clone(),
                reason: format!("unexpected catalog format: {}", err),
            })?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.name.ends_with(".txt"))
            .collect())
    }

    fn cache_path(&self, path: &str) -> PathBuf {
        let digest = hex::encode(Sha1::digest(path.as_bytes()));
        self.cache_dir.join(format!("{}.txt", digest))
    }

    pub fn cached(&self, path: &str) -> Option<String> {
        fs::read_to_string(self.cache_path(path)).ok()
    }

    /// Cached text when present, otherwise downloads it and fills the cache.
    pub fn fetch(&self, path: &str) -> Result<String, SourceError> {
        if let Some(text) = self.cached(path) {
            logging::debug(format!("Loading {} from cache", path));
            return Ok(text);
        }

        let url = format!("{}/{}", self.raw_base_url, path.trim_start_matches('/'));
        logging::info(format!("Downloading {}", url));
        let text = self.get_text(&url)?;

        let cache_file = self.cache_path(path);
        let written = fs::create_dir_all(&self.cache_dir).and_then(|_| fs::write(&cache_file, &text));
        if let Err(err) = written {
            logging::warn(format!("Could not cache {}: {}", path, err));
        }
        Ok(text)
    }

    /// Downloads a story as a predefined reading, categorized by its parent directory.
    pub fn story(&self, path: &str) -> Result<NewReading, SourceError> {
        let content = self.fetch(path)?;
        if content.trim().is_empty() {
            return Err(SourceError::Empty);
        }

        let mut segments = path.trim_matches('/').rsplit('/');
        let file_name = segments.next().unwrap_or(path);
        let category = segments.next().map(str::to_string);
        let name = file_name.strip_suffix(".txt").unwrap_or(file_name);

        Ok(NewReading {
            name: if name.is_empty() { path.to_string() } else { name.to_string() },
            content: Some(content),
            kind: ReadingKind::Predefined,
            category,
            path: Some(path.to_string()),
        })
    }
}

fn is_local(url: &str) -> bool {
    url.starts_with("http://127.0.0.1") || url.starts_with("http://localhost")
}

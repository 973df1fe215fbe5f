use anyhow::{Context, Result};
use linkwords_core::PuzzlePayload;
use std::fs;
use std::path::{Path, PathBuf};

const EVERYDAY: &str = include_str!("../puzzles/everyday.json");

/// Theme used when the player does not ask for one.
pub const DEFAULT_THEME: &str = "general";

/// Produces puzzle payloads for a free-text theme. The engine never sees how.
pub trait PuzzleSource {
    fn fetch(&self, theme: &str) -> Result<PuzzlePayload>;
}

impl<T: PuzzleSource + ?Sized> PuzzleSource for Box<T> {
    fn fetch(&self, theme: &str) -> Result<PuzzlePayload> {
        (**self).fetch(theme)
    }
}

/// Always serves the same payload file, tagging it with the requested theme if it has none.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PuzzleSource for FileSource {
    fn fetch(&self, theme: &str) -> Result<PuzzlePayload> {
        let payload = read_payload(&self.path)?;
        Ok(if payload.theme.is_none() && !theme.trim().is_empty() {
            payload.with_theme(theme.trim())
        } else {
            payload
        })
    }
}

/// Directory of `<slug>.json` payloads, one per theme.
#[derive(Clone, Debug)]
pub struct LibrarySource {
    dir: PathBuf,
}

impl LibrarySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, theme: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slug(theme)))
    }
}

impl PuzzleSource for LibrarySource {
    fn fetch(&self, theme: &str) -> Result<PuzzlePayload> {
        let path = self.path_for(theme);
        log::debug!("Looking up theme {theme:?} at {}", path.display());
        read_payload(&path).with_context(|| format!("No puzzle available for theme {theme:?}"))
    }
}

/// Built-in puzzle, so the game is playable without any files.
#[derive(Copy, Clone, Debug, Default)]
pub struct DemoSource;

impl PuzzleSource for DemoSource {
    fn fetch(&self, theme: &str) -> Result<PuzzlePayload> {
        if !theme.trim().is_empty() && slug(theme) != DEFAULT_THEME {
            log::info!("Demo puzzle ignores theme {theme:?}");
        }
        Ok(PuzzlePayload::from_json(EVERYDAY)?)
    }
}

fn read_payload(path: &Path) -> Result<PuzzlePayload> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read puzzle file {}", path.display()))?;
    PuzzlePayload::from_json(&text)
        .with_context(|| format!("Failed to parse puzzle file {}", path.display()))
}

/// Lower-case, ASCII alphanumerics separated by single dashes; empty themes map to
/// [`DEFAULT_THEME`].
pub fn slug(theme: &str) -> String {
    let slug = theme
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        DEFAULT_THEME.to_string()
    } else {
        slug
    }
}

//! Ordered slide sources.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// One HTML slide, identified by its 1-based position in the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub index: usize,
    pub path: PathBuf,
}

impl Slide {
    /// `file://` URL the renderer navigates to.
    pub fn file_url(&self) -> Result<String> {
        Url::from_file_path(&self.path)
            .map(String::from)
            .map_err(|_| Error::ConfigError(format!("cannot build a file URL for {}", self.path.display())))
    }
}

/// Non-empty, ordered list of slides. The order is exactly the order the
/// paths were given in.
#[derive(Debug, Clone)]
pub struct SlideSet {
    slides: Vec<Slide>,
}

impl SlideSet {
    /// Resolve every path to an absolute file path. Fails on an empty list or
    /// on the first path that is not an existing regular file.
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let slides = paths
            .into_iter()
            .enumerate()
            .map(|(i, p)| resolve(i + 1, p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if slides.is_empty() {
            return Err(Error::EmptySlideSet);
        }
        Ok(Self { slides })
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }

    /// Slide at 1-based `index`.
    pub fn get(&self, index: usize) -> Option<&Slide> {
        index.checked_sub(1).and_then(|i| self.slides.get(i))
    }
}

impl<'a> IntoIterator for &'a SlideSet {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}

fn resolve(index: usize, path: &Path) -> Result<Slide> {
    let not_found = || Error::SlideNotFound { index, path: path.to_path_buf() };
    let meta = std::fs::metadata(path).map_err(|_| not_found())?;
    if !meta.is_file() {
        return Err(not_found());
    }
    let path = std::fs::canonicalize(path)?;
    Ok(Slide { index, path })
}

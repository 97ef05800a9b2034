//! File name classification: is this a backup file, is this a temp file.
//!
//! The detectors only ever ask those two questions, through [`NameClassifier`].
//! Swap the implementation to teach the detector other naming conventions.

use std::path::Path;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use thiserror::Error;

/// Errors that can occur while building a classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// A glob pattern failed to compile.
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The compiled pattern set could not be assembled.
    #[error("Could not build pattern set: {0}")]
    Build(#[source] globset::Error),
}

/// Decides whether a path looks like a backup or a temporary file.
pub trait NameClassifier {
    /// Check if the path's name follows a backup-file convention.
    fn is_backup_file(&self, path: &Path) -> bool;

    /// Check if the path's name follows a temp-file convention.
    fn is_temp_file(&self, path: &Path) -> bool;
}

impl<C: NameClassifier + ?Sized> NameClassifier for &C {
    fn is_backup_file(&self, path: &Path) -> bool {
        (**self).is_backup_file(path)
    }

    fn is_temp_file(&self, path: &Path) -> bool {
        (**self).is_temp_file(path)
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
}

/// Built-in conventions of common editors, office suites and tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionClassifier;

const BACKUP_EXTENSIONS: &[&str] = &["bak", "backup", "old", "orig"];
const TEMP_EXTENSIONS: &[&str] = &["tmp", "temp", "swp", "swo", "swx", "part", "crdownload"];

impl NameClassifier for ConventionClassifier {
    fn is_backup_file(&self, path: &Path) -> bool {
        let Some(name) = file_name(path) else {
            return false;
        };
        if name.len() > 1 && name.ends_with('~') {
            return true;
        }
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                // foo.bak, foo.bak2
                let ext = ext
                    .strip_suffix(|c: char| c.is_ascii_digit())
                    .unwrap_or(ext);
                BACKUP_EXTENSIONS.contains(&ext)
            }
            _ => false,
        }
    }

    fn is_temp_file(&self, path: &Path) -> bool {
        let Some(name) = file_name(path) else {
            return false;
        };
        if name == "4913" || name.starts_with(".#") || name.starts_with("~$") {
            return true;
        }
        if name.len() > 2 && name.starts_with('#') && name.ends_with('#') {
            return true;
        }
        if name.starts_with(".~lock.") && name.ends_with('#') {
            return true;
        }
        name.rsplit_once('.')
            .is_some_and(|(_, ext)| TEMP_EXTENSIONS.contains(&ext))
    }
}

/// Classifier driven by case-insensitive glob patterns matched against the file name.
#[derive(Debug, Clone)]
pub struct GlobClassifier {
    backup: GlobSet,
    temp: GlobSet,
}

impl GlobClassifier {
    /// Compile the backup and temp pattern lists.
    pub fn new<B, T>(backup_patterns: B, temp_patterns: T) -> Result<Self, ClassifierError>
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Ok(Self {
            backup: build_set(backup_patterns)?,
            temp: build_set(temp_patterns)?,
        })
    }

    fn matches(set: &GlobSet, path: &Path) -> bool {
        path.file_name().is_some_and(|name| set.is_match(name))
    }
}

fn build_set<I>(patterns: I) -> Result<GlobSet, ClassifierError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        builder.add(compile(pattern)?);
    }
    builder.build().map_err(ClassifierError::Build)
}

fn compile(pattern: &str) -> Result<Glob, ClassifierError> {
    GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map_err(|source| ClassifierError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

impl NameClassifier for GlobClassifier {
    fn is_backup_file(&self, path: &Path) -> bool {
        Self::matches(&self.backup, path)
    }

    fn is_temp_file(&self, path: &Path) -> bool {
        Self::matches(&self.temp, path)
    }
}

/// Classifier built from two plain functions or closures.
#[derive(Debug, Clone, Copy)]
pub struct FnClassifier<B, T> {
    backup: B,
    temp: T,
}

impl<B, T> FnClassifier<B, T>
where
    B: Fn(&Path) -> bool,
    T: Fn(&Path) -> bool,
{
    /// Wrap the two predicates.
    pub fn new(backup: B, temp: T) -> Self {
        Self { backup, temp }
    }
}

impl<B, T> NameClassifier for FnClassifier<B, T>
where
    B: Fn(&Path) -> bool,
    T: Fn(&Path) -> bool,
{
    fn is_backup_file(&self, path: &Path) -> bool {
        (self.backup)(path)
    }

    fn is_temp_file(&self, path: &Path) -> bool {
        (self.temp)(path)
    }
}

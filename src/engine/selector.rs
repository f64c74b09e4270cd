use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Difficulty, ParseSettingError, VerbRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    Regular,
    Irregular,
    Both,
}

pub const ALL_MODES: [PracticeMode; 3] = [
    PracticeMode::Both,
    PracticeMode::Regular,
    PracticeMode::Irregular,
];

impl PracticeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PracticeMode::Regular => "regular",
            PracticeMode::Irregular => "irregular",
            PracticeMode::Both => "both",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PracticeMode::Regular => "Regular Only",
            PracticeMode::Irregular => "Irregular Only",
            PracticeMode::Both => "Both",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PracticeMode::Both => PracticeMode::Regular,
            PracticeMode::Regular => PracticeMode::Irregular,
            PracticeMode::Irregular => PracticeMode::Both,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            PracticeMode::Both => PracticeMode::Irregular,
            PracticeMode::Regular => PracticeMode::Both,
            PracticeMode::Irregular => PracticeMode::Regular,
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PracticeMode {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(PracticeMode::Regular),
            "irregular" => Ok(PracticeMode::Irregular),
            "both" => Ok(PracticeMode::Both),
            _ => Err(ParseSettingError {
                kind: "mode",
                value: s.to_string(),
                expected: "regular, irregular, both",
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub mode: PracticeMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            mode: PracticeMode::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no {difficulty} verbs available in {mode} mode")]
    NoVerbsAvailable {
        difficulty: Difficulty,
        mode: PracticeMode,
    },
}

/// Verbs matching the settings: regularity by mode, then exact difficulty.
pub fn derive_pool<'a>(catalog: &'a Catalog, settings: &Settings) -> Vec<&'a VerbRecord> {
    let regular = catalog.regular().iter();
    let irregular = catalog.irregular().iter();

    let candidates: Box<dyn Iterator<Item = &'a VerbRecord>> = match settings.mode {
        PracticeMode::Regular => Box::new(regular),
        PracticeMode::Irregular => Box::new(irregular),
        PracticeMode::Both => Box::new(regular.chain(irregular)),
    };

    candidates
        .filter(|v| v.difficulty == settings.difficulty)
        .collect()
}

/// Draw the next verb without replacement.
///
/// Verbs whose infinitive is in `excluded` are skipped. Once every verb of
/// the pool has been served, `excluded` is cleared and the draw is made from
/// the whole pool; that draw does not enter the fresh exclusion set.
pub fn select_next<'a, R: Rng + ?Sized>(
    pool: &[&'a VerbRecord],
    excluded: &mut HashSet<String>,
    rng: &mut R,
) -> Option<&'a VerbRecord> {
    if pool.is_empty() {
        return None;
    }

    let unused: Vec<&'a VerbRecord> = pool
        .iter()
        .copied()
        .filter(|v| !excluded.contains(&v.infinitive))
        .collect();

    if unused.is_empty() {
        excluded.clear();
        let idx = rng.gen_range(0..pool.len());
        return Some(pool[idx]);
    }

    let verb = unused[rng.gen_range(0..unused.len())];
    excluded.insert(verb.infinitive.clone());
    Some(verb)
}

/// Derive the pool for `settings` and draw from it.
pub fn select_for<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    settings: &Settings,
    excluded: &mut HashSet<String>,
    rng: &mut R,
) -> Result<&'a VerbRecord, SelectError> {
    let pool = derive_pool(catalog, settings);
    select_next(&pool, excluded, rng).ok_or(SelectError::NoVerbsAvailable {
        difficulty: settings.difficulty,
        mode: settings.mode,
    })
}

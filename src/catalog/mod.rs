pub mod verb;

use anyhow::{Context, Result};
use serde::Deserialize;

pub use verb::{ALL_DIFFICULTIES, Difficulty, ParseSettingError, Regularity, VerbRecord};

const REGULAR_VERBS: &str = include_str!("../../assets/verbs/regular.json");
const IRREGULAR_VERBS: &str = include_str!("../../assets/verbs/irregular.json");

/// Two-field entry: regular verbs share one past form.
#[derive(Deserialize)]
struct RegularEntry {
    infinitive: String,
    past: String,
    translation: String,
    difficulty: Difficulty,
}

#[derive(Deserialize)]
struct IrregularEntry {
    infinitive: String,
    past_simple: String,
    past_participle: String,
    translation: String,
    difficulty: Difficulty,
}

/// Read-only verb pool, partitioned by regularity.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    regular: Vec<VerbRecord>,
    irregular: Vec<VerbRecord>,
}

impl Catalog {
    /// Load the catalog bundled into the binary.
    pub fn load() -> Result<Self> {
        let regular: Vec<RegularEntry> =
            serde_json::from_str(REGULAR_VERBS).context("parsing bundled regular verbs")?;
        let irregular: Vec<IrregularEntry> =
            serde_json::from_str(IRREGULAR_VERBS).context("parsing bundled irregular verbs")?;

        let regular = regular
            .into_iter()
            .map(|e| VerbRecord::regular(&e.infinitive, &e.past, &e.translation, e.difficulty))
            .collect();
        let irregular = irregular
            .into_iter()
            .map(|e| {
                VerbRecord::irregular(
                    &e.infinitive,
                    &e.past_simple,
                    &e.past_participle,
                    &e.translation,
                    e.difficulty,
                )
            })
            .collect();

        Ok(Self { regular, irregular })
    }

    pub fn from_parts(regular: Vec<VerbRecord>, irregular: Vec<VerbRecord>) -> Self {
        Self { regular, irregular }
    }

    pub fn regular(&self) -> &[VerbRecord] {
        &self.regular
    }

    pub fn irregular(&self) -> &[VerbRecord] {
        &self.irregular
    }

    pub fn len(&self) -> usize {
        self.regular.len() + self.irregular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Partition sorted alphabetically by infinitive, for the reference table.
    pub fn sorted_for_reference(&self, regularity: Regularity) -> Vec<&VerbRecord> {
        let source = match regularity {
            Regularity::Regular => &self.regular,
            Regularity::Irregular => &self.irregular,
        };
        let mut sorted: Vec<&VerbRecord> = source.iter().collect();
        sorted.sort_by(|a, b| a.infinitive.cmp(&b.infinitive));
        sorted
    }
}

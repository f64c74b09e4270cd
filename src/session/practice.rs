use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::catalog::{Catalog, VerbRecord};
use crate::engine::grader::{self, Answer, AnswerCheck};
use crate::engine::selector::{self, SelectError, Settings};

/// One practice session: the settings, the verb on screen and the verbs
/// already served in the current round.
pub struct PracticeSession {
    catalog: Catalog,
    settings: Settings,
    current: Option<VerbRecord>,
    excluded: HashSet<String>,
    last_check: Option<AnswerCheck>,
    rng: SmallRng,
}

impl PracticeSession {
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        Self::with_rng(catalog, settings, SmallRng::from_entropy())
    }

    pub fn with_rng(catalog: Catalog, settings: Settings, rng: SmallRng) -> Self {
        Self {
            catalog,
            settings,
            current: None,
            excluded: HashSet::new(),
            last_check: None,
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn current(&self) -> Option<&VerbRecord> {
        self.current.as_ref()
    }

    pub fn last_check(&self) -> Option<AnswerCheck> {
        self.last_check
    }

    pub fn is_graded(&self) -> bool {
        self.last_check.is_some()
    }

    /// Replace the verb on screen with a fresh draw from the current pool.
    pub fn next_verb(&mut self) -> Result<&VerbRecord, SelectError> {
        self.last_check = None;
        match selector::select_for(
            &self.catalog,
            &self.settings,
            &mut self.excluded,
            &mut self.rng,
        ) {
            Ok(verb) => {
                tracing::debug!(
                    infinitive = %verb.infinitive,
                    served = self.excluded.len(),
                    "selected verb"
                );
                let verb = verb.clone();
                Ok(&*self.current.insert(verb))
            }
            Err(err) => {
                tracing::warn!(%err, "verb selection failed");
                self.current = None;
                Err(err)
            }
        }
    }

    /// New settings mean a new pool: the round restarts and a verb is drawn
    /// even when the settings did not actually change.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<&VerbRecord, SelectError> {
        tracing::info!(
            difficulty = %settings.difficulty,
            mode = %settings.mode,
            "settings changed"
        );
        self.settings = settings;
        self.excluded.clear();
        self.next_verb()
    }

    /// Grade `answer` against the current verb.
    ///
    /// Returns `None` without side effects when there is nothing to grade:
    /// no verb, an incomplete answer, or a verb that was already graded.
    pub fn submit(&mut self, answer: &Answer) -> Option<AnswerCheck> {
        if self.last_check.is_some() || !answer.is_complete() {
            return None;
        }
        let verb = self.current.as_ref()?;
        let check = grader::check(verb, answer);
        tracing::info!(
            infinitive = %verb.infinitive,
            correct = check.is_correct(),
            "graded answer"
        );
        self.last_check = Some(check);
        Some(check)
    }

    pub fn pool_size(&self) -> usize {
        selector::derive_pool(&self.catalog, &self.settings).len()
    }

    /// (verbs served so far in this round, verbs in the pool)
    ///
    /// The draw that opens a new round stays out of the exclusion set but
    /// is on screen, so it counts as served.
    pub fn round_progress(&self) -> (usize, usize) {
        let opening_draw = self
            .current
            .as_ref()
            .is_some_and(|v| !self.excluded.contains(&v.infinitive));
        (self.excluded.len() + usize::from(opening_draw), self.pool_size())
    }
}

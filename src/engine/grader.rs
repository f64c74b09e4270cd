use crate::catalog::VerbRecord;

/// What the learner typed for the current verb.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Answer {
    pub past_simple: String,
    pub past_participle: String,
}

impl Answer {
    pub fn new(past_simple: &str, past_participle: &str) -> Self {
        Self {
            past_simple: past_simple.to_string(),
            past_participle: past_participle.to_string(),
        }
    }

    /// Both fields must be filled in before an answer can be graded.
    pub fn is_complete(&self) -> bool {
        !self.past_simple.is_empty() && !self.past_participle.is_empty()
    }

    pub fn clear(&mut self) {
        self.past_simple.clear();
        self.past_participle.clear();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerCheck {
    pub past_simple: bool,
    pub past_participle: bool,
}

impl AnswerCheck {
    pub fn is_correct(&self) -> bool {
        self.past_simple && self.past_participle
    }
}

// Only the submitted side is trimmed; stored forms are compared as-is.
fn matches(submitted: &str, stored: &str) -> bool {
    submitted.trim().to_lowercase() == stored.to_lowercase()
}

pub fn check(verb: &VerbRecord, answer: &Answer) -> AnswerCheck {
    debug_assert!(answer.is_complete(), "grading an incomplete answer");
    AnswerCheck {
        past_simple: matches(&answer.past_simple, &verb.past_simple),
        past_participle: matches(&answer.past_participle, &verb.past_participle),
    }
}

pub fn grade(verb: &VerbRecord, answer: &Answer) -> bool {
    check(verb, answer).is_correct()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Difficulty;

    fn go() -> VerbRecord {
        VerbRecord::irregular("go", "went", "gone", "ir", Difficulty::Easy)
    }

    #[test]
    fn ignores_case_and_surrounding_whitespace() {
        assert!(grade(&go(), &Answer::new(" Went ", "gone")));
        assert!(grade(&go(), &Answer::new("WENT", "\tGone\n")));
    }

    #[test]
    fn single_field_mismatch_fails_whole_attempt() {
        let only_simple = check(&go(), &Answer::new("went", "went"));
        assert!(only_simple.past_simple);
        assert!(!only_simple.past_participle);
        assert!(!only_simple.is_correct());

        assert!(!grade(&go(), &Answer::new("goed", "gone")));
    }

    #[test]
    fn inner_whitespace_is_significant() {
        assert!(!grade(&go(), &Answer::new("w ent", "gone")));
    }

    #[test]
    fn stored_whitespace_participates_in_comparison() {
        let sloppy = VerbRecord::irregular("go", "went ", "gone", "ir", Difficulty::Easy);
        assert!(!grade(&sloppy, &Answer::new("went", "gone")));
    }

    #[test]
    fn stored_forms_compared_lowercased() {
        let shouty = VerbRecord::irregular("go", "WENT", "Gone", "ir", Difficulty::Easy);
        assert!(grade(&shouty, &Answer::new("went", "gone")));
    }

    #[test]
    fn completeness_requires_both_fields() {
        assert!(!Answer::new("", "gone").is_complete());
        assert!(!Answer::new("went", "").is_complete());
        assert!(Answer::new("went", "gone").is_complete());

        let mut answer = Answer::new("went", "gone");
        answer.clear();
        assert_eq!(answer, Answer::default());
    }
}

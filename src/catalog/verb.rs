use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

pub const ALL_DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseSettingError {
                kind: "difficulty",
                value: s.to_string(),
                expected: "easy, medium, hard",
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regularity {
    Regular,
    Irregular,
}

#[derive(Debug, Error)]
#[error("invalid {kind} '{value}' (expected one of: {expected})")]
pub struct ParseSettingError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// One catalog entry. Regular verbs carry the same form in both past fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbRecord {
    pub infinitive: String,
    pub past_simple: String,
    pub past_participle: String,
    pub translation: String,
    pub difficulty: Difficulty,
    pub regularity: Regularity,
}

impl VerbRecord {
    pub fn irregular(
        infinitive: &str,
        past_simple: &str,
        past_participle: &str,
        translation: &str,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            infinitive: infinitive.to_string(),
            past_simple: past_simple.to_string(),
            past_participle: past_participle.to_string(),
            translation: translation.to_string(),
            difficulty,
            regularity: Regularity::Irregular,
        }
    }

    pub fn regular(infinitive: &str, past: &str, translation: &str, difficulty: Difficulty) -> Self {
        Self {
            infinitive: infinitive.to_string(),
            past_simple: past.to_string(),
            past_participle: past.to_string(),
            translation: translation.to_string(),
            difficulty,
            regularity: Regularity::Regular,
        }
    }

    /// Text handed to the pronunciation service: all three forms with pauses.
    pub fn spoken_forms(&self) -> String {
        format!(
            "{}. {}. {}.",
            self.infinitive, self.past_simple, self.past_participle
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" easy ".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        let err = "extreme".parse::<Difficulty>().unwrap_err();
        assert!(err.to_string().contains("extreme"));
    }

    #[test]
    fn difficulty_cycles_both_ways() {
        for d in ALL_DIFFICULTIES {
            assert_eq!(d.next().prev(), d);
        }
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
    }

    #[test]
    fn regular_constructor_shares_past_form() {
        let v = VerbRecord::regular("walk", "walked", "caminar", Difficulty::Easy);
        assert_eq!(v.past_simple, v.past_participle);
        assert_eq!(v.regularity, Regularity::Regular);
        assert_eq!(v.spoken_forms(), "walk. walked. walked.");
    }
}

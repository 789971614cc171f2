//! Typed value parsers for property values and command arguments
//!
//! An empty numeric value parses as zero; callers that require an argument
//! check for emptiness themselves. Error text doubles as the diagnostic message.

use thiserror::Error;

use super::types::{
    BranchCondition, DifficultyType, GameType, GaugeIncrementMethod, NoteType, ScoreMode, SongSelectSide, StyleMode,
};
use crate::models::{Complex, Tempo, Time, TimeSignature};
use crate::utils::ascii;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Invalid int '{0}'")]
    InvalidInt(String),

    #[error("Invalid float '{0}'")]
    InvalidFloat(String),

    #[error("Invalid tempo '{0}'")]
    InvalidTempo(String),

    #[error("Invalid int in comma separated list '{0}'")]
    InvalidIntList(String),

    #[error("Invalid difficulty '{0}'")]
    InvalidDifficulty(String),

    #[error("Unknown score mode '{0}'")]
    UnknownScoreMode(String),

    #[error("Unknown game type '{0}'")]
    UnknownGameType(String),

    #[error("Unknown style mode '{0}'")]
    UnknownStyleMode(String),

    #[error("Unknown song select side '{0}'")]
    UnknownSide(String),

    #[error("Unknown branch condition '{0}'")]
    UnknownBranchCondition(String),

    #[error("Invalid time signature '{0}'")]
    InvalidTimeSignature(String),

    #[error("Invalid scroll speed '{0}'")]
    InvalidScrollSpeed(String),

    #[error("Unknown note type '{0}'")]
    UnknownNoteType(char),
}

pub fn parse_i32(s: &str) -> Result<i32, ValueError> {
    let s = ascii::trim(s);
    if s.is_empty() {
        return Ok(0);
    }
    s.parse().map_err(|_| ValueError::InvalidInt(s.to_string()))
}

pub fn parse_f32(s: &str) -> Result<f32, ValueError> {
    let s = ascii::trim(s);
    if s.is_empty() {
        return Ok(0.0);
    }
    s.parse().map_err(|_| ValueError::InvalidFloat(s.to_string()))
}

/// `100` -> 1.0
pub fn parse_percent(s: &str) -> Result<f32, ValueError> {
    parse_f32(s).map(|percent| percent / 100.0)
}

/// Seconds, written as a float
pub fn parse_time(s: &str) -> Result<Time, ValueError> {
    let s = ascii::trim(s);
    if s.is_empty() {
        return Ok(Time::ZERO);
    }
    s.parse::<f64>().map(Time::from_sec).map_err(|_| ValueError::InvalidFloat(s.to_string()))
}

pub fn parse_tempo(s: &str) -> Result<Tempo, ValueError> {
    let s = ascii::trim(s);
    if s.is_empty() {
        return Ok(Tempo::new(0.0));
    }
    s.parse().map(Tempo::new).map_err(|_| ValueError::InvalidTempo(s.to_string()))
}

/// `n/d`
pub fn parse_time_signature(s: &str) -> Result<TimeSignature, ValueError> {
    let invalid = || ValueError::InvalidTimeSignature(s.to_string());
    let (numerator, denominator) = s.split_once('/').ok_or_else(invalid)?;
    let numerator = ascii::trim(numerator).parse().map_err(|_| invalid())?;
    let denominator = ascii::trim(denominator).parse().map_err(|_| invalid())?;
    Ok(TimeSignature::new(numerator, denominator))
}

pub fn parse_complex(s: &str) -> Result<Complex, ValueError> {
    if ascii::trim(s).is_empty() {
        return Ok(Complex::default());
    }
    Complex::parse(s).ok_or_else(|| ValueError::InvalidScrollSpeed(s.to_string()))
}

/// Parse every item of a comma separated list
///
/// Bad items become 0 so later positions keep their index; the first
/// failure is reported.
pub fn parse_i32_list(s: &str) -> (Vec<i32>, Option<ValueError>) {
    let mut error = None;
    let values = ascii::comma_separated(s)
        .map(ascii::trim)
        .map(|item| {
            item.parse::<i32>().unwrap_or_else(|_| {
                if error.is_none() {
                    error = Some(ValueError::InvalidIntList(item.to_string()));
                }
                0
            })
        })
        .collect();
    (values, error)
}

pub fn parse_note(c: char) -> Result<NoteType, ValueError> {
    NoteType::from_char(c).ok_or(ValueError::UnknownNoteType(c))
}

/// Difficulty by name (case-insensitive) or by index 0..=6
pub fn parse_difficulty(s: &str) -> Result<DifficultyType, ValueError> {
    let s = ascii::trim(s);
    const NAMES: &[(&str, DifficultyType)] = &[
        ("easy", DifficultyType::Easy),
        ("normal", DifficultyType::Normal),
        ("hard", DifficultyType::Hard),
        ("oni", DifficultyType::Oni),
        ("edit", DifficultyType::OniUra),
        ("ura", DifficultyType::OniUra),
        ("tower", DifficultyType::Tower),
        ("dan", DifficultyType::Dan),
    ];

    if let Some((_, difficulty)) = NAMES.iter().find(|(name, _)| ascii::matches_insensitive(s, name)) {
        return Ok(*difficulty);
    }

    s.parse::<i32>()
        .ok()
        .and_then(DifficultyType::from_index)
        .ok_or_else(|| ValueError::InvalidDifficulty(s.to_string()))
}

pub fn parse_score_mode(s: &str) -> Result<ScoreMode, ValueError> {
    match ascii::trim(s) {
        "0" => Ok(ScoreMode::Mode0),
        "1" => Ok(ScoreMode::Mode1),
        "2" => Ok(ScoreMode::Mode2),
        other => Err(ValueError::UnknownScoreMode(other.to_string())),
    }
}

pub fn parse_game(s: &str) -> Result<GameType, ValueError> {
    let s = ascii::trim(s);
    if ascii::matches_insensitive(s, "taiko") {
        Ok(GameType::Taiko)
    } else if ascii::matches_insensitive(s, "konga") || ascii::matches_insensitive(s, "bongo") {
        Ok(GameType::Konga)
    } else {
        Err(ValueError::UnknownGameType(s.to_string()))
    }
}

pub fn parse_style(s: &str) -> Result<StyleMode, ValueError> {
    let s = ascii::trim(s);
    if s == "1" || ascii::matches_insensitive(s, "single") {
        Ok(StyleMode::Single)
    } else if s == "2" || ascii::matches_insensitive(s, "double") || ascii::matches_insensitive(s, "couple") {
        Ok(StyleMode::Double)
    } else {
        Err(ValueError::UnknownStyleMode(s.to_string()))
    }
}

pub fn parse_side(s: &str) -> Result<SongSelectSide, ValueError> {
    let s = ascii::trim(s);
    if s == "1" || ascii::matches_insensitive(s, "normal") {
        Ok(SongSelectSide::Normal)
    } else if s == "2" || ascii::matches_insensitive(s, "ex") {
        Ok(SongSelectSide::Ex)
    } else if s == "3" || ascii::matches_insensitive(s, "both") {
        Ok(SongSelectSide::Both)
    } else {
        Err(ValueError::UnknownSide(s.to_string()))
    }
}

/// Unrecognized methods are accepted and read as `Normal`
pub fn parse_gauge_increment(s: &str) -> Result<GaugeIncrementMethod, ValueError> {
    let s = ascii::trim(s);
    let method = [
        GaugeIncrementMethod::Floor,
        GaugeIncrementMethod::Round,
        GaugeIncrementMethod::NotFix,
        GaugeIncrementMethod::Ceiling,
    ]
    .into_iter()
    .find(|method| ascii::matches_insensitive(s, method.as_str()))
    .unwrap_or(GaugeIncrementMethod::Normal);
    Ok(method)
}

pub fn parse_branch_condition(s: &str) -> Result<BranchCondition, ValueError> {
    match ascii::trim(s) {
        "r" | "R" => Ok(BranchCondition::Roll),
        "p" | "P" => Ok(BranchCondition::Precise),
        "s" | "S" => Ok(BranchCondition::Score),
        other => Err(ValueError::UnknownBranchCondition(other.to_string())),
    }
}

//! Parsed TJA data: metadata plus a flat chart command list per course
//!
//! This is a one-to-one typed image of the token stream. Beat positions are
//! not resolved here; see `ir::builder` for the measure-based form.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::collections::BTreeMap;

use crate::models::{Complex, Tempo, Time, TimeSignature, FALLBACK_TEMPO};

/// Note kinds, serialized as their numeric code
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum NoteType {
    /// Silent placeholder that only occupies a subdivision slot
    #[default]
    None = 0,
    Don = 1,
    Ka = 2,
    DonBig = 3,
    KaBig = 4,
    StartDrumroll = 5,
    StartDrumrollBig = 6,
    StartBalloon = 7,
    EndBalloonOrDrumroll = 8,
    StartBalloonSpecial = 9,
    DonBigBoth = 10,
    KaBigBoth = 11,
    Hidden = 12,
    Bomb = 13,
    KaDon = 14,
    Fuse = 15,
}

impl NoteType {
    /// Decode one chart data character
    pub fn from_char(c: char) -> Option<NoteType> {
        let note = match c {
            '0' => NoteType::None,
            '1' => NoteType::Don,
            '2' => NoteType::Ka,
            '3' => NoteType::DonBig,
            '4' => NoteType::KaBig,
            '5' => NoteType::StartDrumroll,
            '6' => NoteType::StartDrumrollBig,
            '7' => NoteType::StartBalloon,
            '8' => NoteType::EndBalloonOrDrumroll,
            '9' => NoteType::StartBalloonSpecial,
            'A' => NoteType::DonBigBoth,
            'B' => NoteType::KaBigBoth,
            'C' => NoteType::Bomb,
            'D' => NoteType::Fuse,
            'F' => NoteType::Hidden,
            'G' => NoteType::KaDon,
            _ => return None,
        };
        Some(note)
    }

    pub fn to_char(self) -> char {
        match self {
            NoteType::None => '0',
            NoteType::Don => '1',
            NoteType::Ka => '2',
            NoteType::DonBig => '3',
            NoteType::KaBig => '4',
            NoteType::StartDrumroll => '5',
            NoteType::StartDrumrollBig => '6',
            NoteType::StartBalloon => '7',
            NoteType::EndBalloonOrDrumroll => '8',
            NoteType::StartBalloonSpecial => '9',
            NoteType::DonBigBoth => 'A',
            NoteType::KaBigBoth => 'B',
            NoteType::Bomb => 'C',
            NoteType::Fuse => 'D',
            NoteType::Hidden => 'F',
            NoteType::KaDon => 'G',
        }
    }

    pub fn is_big(self) -> bool {
        matches!(
            self,
            NoteType::DonBig
                | NoteType::KaBig
                | NoteType::StartDrumrollBig
                | NoteType::StartBalloonSpecial
                | NoteType::DonBigBoth
                | NoteType::KaBigBoth
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyType {
    Easy,
    Normal,
    Hard,
    #[default]
    Oni,
    /// Written as `Edit` (also read from `Ura`)
    OniUra,
    Tower,
    Dan,
}

impl DifficultyType {
    pub fn from_index(index: i32) -> Option<Self> {
        let difficulty = match index {
            0 => Self::Easy,
            1 => Self::Normal,
            2 => Self::Hard,
            3 => Self::Oni,
            4 => Self::OniUra,
            5 => Self::Tower,
            6 => Self::Dan,
            _ => return None,
        };
        Some(difficulty)
    }

    /// Name used on `COURSE:` lines
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::Oni => "Oni",
            Self::OniUra => "Edit",
            Self::Tower => "Tower",
            Self::Dan => "Dan",
        }
    }
}

/// `SCOREMODE:` value (0, 1 or 2)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ScoreMode {
    /// AC1 to AC7 scoring
    Mode0 = 0,
    /// AC8 to AC14 scoring
    #[default]
    Mode1 = 1,
    /// AC0 scoring
    Mode2 = 2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameType {
    #[default]
    Taiko,
    Konga,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleMode {
    #[default]
    Single,
    Double,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SongSelectSide {
    Normal,
    Ex,
    #[default]
    Both,
}

impl SongSelectSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Ex => "Ex",
            Self::Both => "",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GaugeIncrementMethod {
    #[default]
    Normal,
    Floor,
    Round,
    NotFix,
    Ceiling,
}

impl GaugeIncrementMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Floor => "FLOOR",
            Self::Round => "ROUND",
            Self::NotFix => "NOTFIX",
            Self::Ceiling => "CEILING",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchCondition {
    Roll,
    #[default]
    Precise,
    Score,
}

impl BranchCondition {
    pub fn to_char(self) -> char {
        match self {
            Self::Roll => 'r',
            Self::Precise => 'p',
            Self::Score => 's',
        }
    }
}

/// Scroll timing convention selected by `#NMSCROLL`, `#HBSCROLL` or `#BMSCROLL`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ScrollMethod {
    #[default]
    Normal = 0,
    HbScroll = 1,
    BmScroll = 2,
}

/// Song-wide properties
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedMainMetadata {
    pub title: String,
    /// Keyed by language suffix (`JA`, `EN`, `CN`, `TW`, `KO`)
    pub title_localized: BTreeMap<String, String>,
    pub subtitle: String,
    pub subtitle_localized: BTreeMap<String, String>,
    pub wave: String,
    pub preimage: String,
    pub bgimage: String,
    pub bgmovie: String,
    pub lyrics: String,
    pub maker: String,
    pub genre: String,
    pub taikowebskin: String,
    pub bpm: Tempo,
    pub headscroll: f32,
    pub offset: Time,
    pub movieoffset: Time,
    pub demostart: Time,
    /// Volume as a fraction (`SONGVOL:100` is 1.0)
    pub songvol: f32,
    pub sevol: f32,
    pub scoremode: ScoreMode,
    pub game: GameType,
}

impl Default for ParsedMainMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            title_localized: BTreeMap::new(),
            subtitle: String::new(),
            subtitle_localized: BTreeMap::new(),
            wave: String::new(),
            preimage: String::new(),
            bgimage: String::new(),
            bgmovie: String::new(),
            lyrics: String::new(),
            maker: String::new(),
            genre: String::new(),
            taikowebskin: String::new(),
            bpm: FALLBACK_TEMPO,
            headscroll: 1.0,
            offset: Time::ZERO,
            movieoffset: Time::ZERO,
            demostart: Time::ZERO,
            songvol: 1.0,
            sevol: 1.0,
            scoremode: ScoreMode::default(),
            game: GameType::default(),
        }
    }
}

/// Per-course properties
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedCourseMetadata {
    pub course: DifficultyType,
    pub level: i32,
    /// First digit after the decimal point of `LEVEL:`, if one was written
    pub level_decimal_tag: Option<i32>,
    pub style: StyleMode,
    pub balloon: Vec<i32>,
    pub balloon_normal: Vec<i32>,
    pub balloon_expert: Vec<i32>,
    pub balloon_master: Vec<i32>,
    pub score_init: i32,
    pub score_diff: i32,
    pub explicit: i32,
    pub life: i32,
    pub side: SongSelectSide,
    /// Any of `NOTESDESIGNER0..4`; the last one written wins
    pub notes_designer: String,
    /// `EXAMn` values keyed by `n`
    pub exams: BTreeMap<i32, String>,
    pub gauge_incr: GaugeIncrementMethod,
    pub total: i32,
    pub hidden_branch: i32,
}

impl Default for ParsedCourseMetadata {
    fn default() -> Self {
        Self {
            course: DifficultyType::default(),
            level: 1,
            level_decimal_tag: None,
            style: StyleMode::default(),
            balloon: Vec::new(),
            balloon_normal: Vec::new(),
            balloon_expert: Vec::new(),
            balloon_master: Vec::new(),
            score_init: 0,
            score_diff: 0,
            explicit: 0,
            life: 5,
            side: SongSelectSide::default(),
            notes_designer: String::new(),
            exams: BTreeMap::new(),
            gauge_incr: GaugeIncrementMethod::default(),
            total: 0,
            hidden_branch: 0,
        }
    }
}

/// One entry of a course's flat chart command sequence
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ParsedChartCommand {
    /// A run of note characters (possibly part of a measure)
    MeasureNotes(Vec<NoteType>),
    /// `,`
    MeasureEnd,
    ChangeTimeSignature(TimeSignature),
    ChangeTempo(Tempo),
    ChangeDelay(Time),
    ChangeScrollSpeed(Complex),
    ChangeBarLine { visible: bool },
    GoGoStart,
    GoGoEnd,
    BranchStart { condition: BranchCondition, requirement_expert: i32, requirement_master: i32 },
    BranchNormal,
    BranchExpert,
    BranchMaster,
    BranchEnd,
    BranchLevelHold,
    /// `#SECTION`
    ResetAccuracyValues,
    SetLyricLine(String),
    BmScroll,
    HbScroll,
    NmScroll,
    SeNoteChange(i32),
    SetNextSong(String),
    SetSudden { appearance_offset: Time, movement_wait_delay: Time },
    SetJposScroll { duration: Time, movement: Complex },
}

impl ParsedChartCommand {
    pub fn is_measure_notes(&self) -> bool {
        matches!(self, ParsedChartCommand::MeasureNotes(_))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedCourse {
    pub metadata: ParsedCourseMetadata,
    pub chart_commands: Vec<ParsedChartCommand>,
}

/// A whole TJA file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedTja {
    pub metadata: ParsedMainMetadata,
    pub courses: Vec<ParsedCourse>,
    /// Set when the file carries the `// TJADB Project` provenance comment
    pub has_provenance_comment: bool,
    pub provenance_date: Option<chrono::NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_chars_round_trip() {
        for c in "0123456789ABCDFG".chars() {
            let note = NoteType::from_char(c).unwrap();
            assert_eq!(note.to_char(), c);
        }
        assert_eq!(NoteType::from_char('E'), None);
        assert_eq!(NoteType::from_char('a'), None);
    }

    #[test]
    fn test_note_type_serializes_as_number() {
        assert_eq!(serde_json::to_string(&NoteType::Ka).unwrap(), "2");
        assert_eq!(serde_json::from_str::<NoteType>("15").unwrap(), NoteType::Fuse);
    }

    #[test]
    fn test_big_notes() {
        assert!(NoteType::DonBig.is_big());
        assert!(NoteType::StartBalloonSpecial.is_big());
        assert!(!NoteType::Don.is_big());
    }

    #[test]
    fn test_command_serialization_is_tagged() {
        let json = serde_json::to_string(&ParsedChartCommand::ChangeTempo(Tempo::new(150.0))).unwrap();
        assert_eq!(json, r#"{"type":"ChangeTempo","value":150.0}"#);

        let json = serde_json::to_string(&ParsedChartCommand::MeasureEnd).unwrap();
        assert_eq!(json, r#"{"type":"MeasureEnd"}"#);
    }

    #[test]
    fn test_metadata_defaults() {
        let main = ParsedMainMetadata::default();
        assert_eq!(main.bpm, FALLBACK_TEMPO);
        assert_eq!(main.songvol, 1.0);

        let course = ParsedCourseMetadata::default();
        assert_eq!(course.course, DifficultyType::Oni);
        assert_eq!(course.level, 1);
        assert_eq!(course.life, 5);
        assert_eq!(course.side, SongSelectSide::Both);
    }
}

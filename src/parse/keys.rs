//! TJA keyword table
//!
//! `KEY:VALUE` property keys and `#COMMAND` keywords share one enum. Lookup
//! is exact and case-sensitive; property keys are only matched on `:` lines
//! and command keys only on `#` lines.

use serde::{Deserialize, Serialize};

/// Which part of a TJA file a key belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCategory {
    /// Song-wide `KEY:VALUE` property
    Main,
    /// Per-course `KEY:VALUE` property
    Course,
    /// `#COMMAND` line
    Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Unknown,

    // Main properties
    Title,
    TitleJa,
    TitleEn,
    TitleCn,
    TitleTw,
    TitleKo,
    Subtitle,
    SubtitleJa,
    SubtitleEn,
    SubtitleCn,
    SubtitleTw,
    SubtitleKo,
    Bpm,
    Wave,
    PreImage,
    Offset,
    DemoStart,
    Genre,
    ScoreMode,
    Maker,
    Lyrics,
    SongVol,
    SeVol,
    Game,
    HeadScroll,
    BgImage,
    BgMovie,
    MovieOffset,
    TaikoWebSkin,

    // Course properties
    Course,
    Level,
    Balloon,
    ScoreInit,
    ScoreDiff,
    BalloonNor,
    BalloonExp,
    BalloonMas,
    Style,
    Explicit,
    NotesDesigner0,
    NotesDesigner1,
    NotesDesigner2,
    NotesDesigner3,
    NotesDesigner4,
    Exam1,
    Exam2,
    Exam3,
    Exam4,
    Exam5,
    Exam6,
    Exam7,
    GaugeIncr,
    Total,
    HiddenBranch,
    Life,
    Side,

    // Chart commands
    Start,
    End,
    Measure,
    BpmChange,
    Delay,
    Scroll,
    GoGoStart,
    GoGoEnd,
    BarlineOff,
    BarlineOn,
    BranchStart,
    BranchNormal,
    BranchExpert,
    BranchMaster,
    BranchEnd,
    Section,
    Lyric,
    LevelHold,
    BmScroll,
    HbScroll,
    NmScroll,
    Barline,
    GameType,
    SeNoteChange,
    NextSong,
    Direction,
    Sudden,
    JposScroll,
}

const KEY_STRINGS: &[(Key, &str)] = &[
    (Key::Title, "TITLE"),
    (Key::TitleJa, "TITLEJA"),
    (Key::TitleEn, "TITLEEN"),
    (Key::TitleCn, "TITLECN"),
    (Key::TitleTw, "TITLETW"),
    (Key::TitleKo, "TITLEKO"),
    (Key::Subtitle, "SUBTITLE"),
    (Key::SubtitleJa, "SUBTITLEJA"),
    (Key::SubtitleEn, "SUBTITLEEN"),
    (Key::SubtitleCn, "SUBTITLECN"),
    (Key::SubtitleTw, "SUBTITLETW"),
    (Key::SubtitleKo, "SUBTITLEKO"),
    (Key::Bpm, "BPM"),
    (Key::Wave, "WAVE"),
    (Key::PreImage, "PREIMAGE"),
    (Key::Offset, "OFFSET"),
    (Key::DemoStart, "DEMOSTART"),
    (Key::Genre, "GENRE"),
    (Key::ScoreMode, "SCOREMODE"),
    (Key::Maker, "MAKER"),
    (Key::Lyrics, "LYRICS"),
    (Key::SongVol, "SONGVOL"),
    (Key::SeVol, "SEVOL"),
    (Key::Game, "GAME"),
    (Key::HeadScroll, "HEADSCROLL"),
    (Key::BgImage, "BGIMAGE"),
    (Key::BgMovie, "BGMOVIE"),
    (Key::MovieOffset, "MOVIEOFFSET"),
    (Key::TaikoWebSkin, "TAIKOWEBSKIN"),
    (Key::Course, "COURSE"),
    (Key::Level, "LEVEL"),
    (Key::Balloon, "BALLOON"),
    (Key::ScoreInit, "SCOREINIT"),
    (Key::ScoreDiff, "SCOREDIFF"),
    (Key::BalloonNor, "BALLOONNOR"),
    (Key::BalloonExp, "BALLOONEXP"),
    (Key::BalloonMas, "BALLOONMAS"),
    (Key::Style, "STYLE"),
    (Key::Explicit, "EXPLICIT"),
    (Key::NotesDesigner0, "NOTESDESIGNER0"),
    (Key::NotesDesigner1, "NOTESDESIGNER1"),
    (Key::NotesDesigner2, "NOTESDESIGNER2"),
    (Key::NotesDesigner3, "NOTESDESIGNER3"),
    (Key::NotesDesigner4, "NOTESDESIGNER4"),
    (Key::Exam1, "EXAM1"),
    (Key::Exam2, "EXAM2"),
    (Key::Exam3, "EXAM3"),
    (Key::Exam4, "EXAM4"),
    (Key::Exam5, "EXAM5"),
    (Key::Exam6, "EXAM6"),
    (Key::Exam7, "EXAM7"),
    (Key::GaugeIncr, "GAUGEINCR"),
    (Key::Total, "TOTAL"),
    (Key::HiddenBranch, "HIDDENBRANCH"),
    (Key::Life, "LIFE"),
    (Key::Side, "SIDE"),
    (Key::Start, "START"),
    (Key::End, "END"),
    (Key::Measure, "MEASURE"),
    (Key::BpmChange, "BPMCHANGE"),
    (Key::Delay, "DELAY"),
    (Key::Scroll, "SCROLL"),
    (Key::GoGoStart, "GOGOSTART"),
    (Key::GoGoEnd, "GOGOEND"),
    (Key::BarlineOff, "BARLINEOFF"),
    (Key::BarlineOn, "BARLINEON"),
    (Key::BranchStart, "BRANCHSTART"),
    (Key::BranchNormal, "N"),
    (Key::BranchExpert, "E"),
    (Key::BranchMaster, "M"),
    (Key::BranchEnd, "BRANCHEND"),
    (Key::Section, "SECTION"),
    (Key::Lyric, "LYRIC"),
    (Key::LevelHold, "LEVELHOLD"),
    (Key::BmScroll, "BMSCROLL"),
    (Key::HbScroll, "HBSCROLL"),
    (Key::NmScroll, "NMSCROLL"),
    (Key::Barline, "BARLINE"),
    (Key::GameType, "GAMETYPE"),
    (Key::SeNoteChange, "SENOTECHANGE"),
    (Key::NextSong, "NEXTSONG"),
    (Key::Direction, "DIRECTION"),
    (Key::Sudden, "SUDDEN"),
    (Key::JposScroll, "JPOSSCROLL"),
];

impl Key {
    /// Keyword as written in TJA text (empty for `Unknown`)
    pub fn as_str(self) -> &'static str {
        KEY_STRINGS
            .iter()
            .find(|(key, _)| *key == self)
            .map_or("", |(_, s)| *s)
    }

    pub fn category(self) -> Option<KeyCategory> {
        use Key::*;
        match self {
            Unknown => None,
            Title | TitleJa | TitleEn | TitleCn | TitleTw | TitleKo | Subtitle | SubtitleJa | SubtitleEn
            | SubtitleCn | SubtitleTw | SubtitleKo | Bpm | Wave | PreImage | Offset | DemoStart | Genre
            | ScoreMode | Maker | Lyrics | SongVol | SeVol | Game | HeadScroll | BgImage | BgMovie
            | MovieOffset | TaikoWebSkin => Some(KeyCategory::Main),
            Course | Level | Balloon | ScoreInit | ScoreDiff | BalloonNor | BalloonExp | BalloonMas | Style
            | Explicit | NotesDesigner0 | NotesDesigner1 | NotesDesigner2 | NotesDesigner3 | NotesDesigner4
            | Exam1 | Exam2 | Exam3 | Exam4 | Exam5 | Exam6 | Exam7 | GaugeIncr | Total | HiddenBranch | Life
            | Side => Some(KeyCategory::Course),
            _ => Some(KeyCategory::Command),
        }
    }

    /// Look up a `KEY:VALUE` property key
    pub fn from_property(s: &str) -> Key {
        Self::lookup(s, |category| category != KeyCategory::Command)
    }

    /// Look up a `#COMMAND` keyword (without the `#`)
    pub fn from_command(s: &str) -> Key {
        Self::lookup(s, |category| category == KeyCategory::Command)
    }

    fn lookup(s: &str, accept: impl Fn(KeyCategory) -> bool) -> Key {
        KEY_STRINGS
            .iter()
            .find(|(key, keyword)| *keyword == s && key.category().map_or(false, &accept))
            .map_or(Key::Unknown, |(key, _)| *key)
    }

    /// Language suffix for localized TITLE/SUBTITLE keys
    pub fn locale(self) -> Option<&'static str> {
        match self {
            Key::TitleJa | Key::SubtitleJa => Some("JA"),
            Key::TitleEn | Key::SubtitleEn => Some("EN"),
            Key::TitleCn | Key::SubtitleCn => Some("CN"),
            Key::TitleTw | Key::SubtitleTw => Some("TW"),
            Key::TitleKo | Key::SubtitleKo => Some("KO"),
            _ => None,
        }
    }

    /// Number of an `EXAMn` key
    pub fn exam_number(self) -> Option<i32> {
        match self {
            Key::Exam1 => Some(1),
            Key::Exam2 => Some(2),
            Key::Exam3 => Some(3),
            Key::Exam4 => Some(4),
            Key::Exam5 => Some(5),
            Key::Exam6 => Some(6),
            Key::Exam7 => Some(7),
            _ => None,
        }
    }

    pub fn exam(number: i32) -> Option<Key> {
        [Key::Exam1, Key::Exam2, Key::Exam3, Key::Exam4, Key::Exam5, Key::Exam6, Key::Exam7]
            .into_iter()
            .find(|key| key.exam_number() == Some(number))
    }
}

/// Localized TITLE/SUBTITLE suffixes in emission order
pub const LOCALES: [&str; 5] = ["JA", "EN", "CN", "TW", "KO"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_has_a_keyword() {
        for (key, keyword) in KEY_STRINGS {
            assert_eq!(key.as_str(), *keyword);
            assert!(key.category().is_some());
        }
        assert_eq!(Key::Unknown.as_str(), "");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(Key::from_command("START"), Key::Start);
        assert_eq!(Key::from_command("start"), Key::Unknown);
        assert_eq!(Key::from_property("TITLE"), Key::Title);
        assert_eq!(Key::from_property("Title"), Key::Unknown);
    }

    #[test]
    fn test_lookup_respects_category() {
        assert_eq!(Key::from_property("START"), Key::Unknown);
        assert_eq!(Key::from_command("TITLE"), Key::Unknown);
        assert_eq!(Key::from_command("N"), Key::BranchNormal);
        assert_eq!(Key::from_property("LEVEL"), Key::Level);
        assert_eq!(Key::from_command("LEVELHOLD"), Key::LevelHold);
    }

    #[test]
    fn test_exam_numbers() {
        assert_eq!(Key::Exam3.exam_number(), Some(3));
        assert_eq!(Key::exam(7), Some(Key::Exam7));
        assert_eq!(Key::exam(0), None);
    }
}

//! TJA text emitter
//!
//! Writes a `ParsedTja` back to text. Numbers use `%g` style formatting so
//! values read from a file are written back the way they were typed.

use serde::{Deserialize, Serialize};

use crate::models::Time;
use crate::parse::{
    DifficultyType, GaugeIncrementMethod, Key, ParsedChartCommand, ParsedCourse, ParsedMainMetadata, ParsedTja,
    ScoreMode, StyleMode, LOCALES,
};
use crate::utils::numeric::{approximately_same, format_g, format_g32};

const UTF8_BOM: &str = "\u{FEFF}";

/// Marker written as the first comment of files produced by this crate
pub const PROVENANCE_COMMENT_PREFIX: &str = "TJADB Project";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf8Bom,
}

fn property(out: &mut String, key: Key, value: &str) {
    out.push_str(key.as_str());
    out.push(':');
    out.push_str(value);
    out.push('\n');
}

fn property_if_not_empty(out: &mut String, key: Key, value: &str) {
    if !value.is_empty() {
        property(out, key, value);
    }
}

fn command(out: &mut String, key: Key, value: &str) {
    out.push('#');
    out.push_str(key.as_str());
    if !value.is_empty() {
        out.push(' ');
        out.push_str(value);
    }
    out.push('\n');
}

fn int_list(values: &[i32]) -> String {
    values.iter().map(i32::to_string).collect::<Vec<_>>().join(",")
}

fn seconds(time: Time) -> String {
    format_g(time.to_sec())
}

fn percent(fraction: f32) -> String {
    format_g32(fraction * 100.0)
}

fn localized(key: Key, locale: &str) -> Key {
    match (key, locale) {
        (Key::Title, "JA") => Key::TitleJa,
        (Key::Title, "EN") => Key::TitleEn,
        (Key::Title, "CN") => Key::TitleCn,
        (Key::Title, "TW") => Key::TitleTw,
        (Key::Title, "KO") => Key::TitleKo,
        (Key::Subtitle, "JA") => Key::SubtitleJa,
        (Key::Subtitle, "EN") => Key::SubtitleEn,
        (Key::Subtitle, "CN") => Key::SubtitleCn,
        (Key::Subtitle, "TW") => Key::SubtitleTw,
        (Key::Subtitle, "KO") => Key::SubtitleKo,
        _ => Key::Unknown,
    }
}

fn write_main_metadata(out: &mut String, meta: &ParsedMainMetadata) {
    property(out, Key::Title, &meta.title);
    for locale in LOCALES {
        if let Some(title) = meta.title_localized.get(locale) {
            property_if_not_empty(out, localized(Key::Title, locale), title);
        }
    }
    property(out, Key::Subtitle, &meta.subtitle);
    for locale in LOCALES {
        if let Some(subtitle) = meta.subtitle_localized.get(locale) {
            property_if_not_empty(out, localized(Key::Subtitle, locale), subtitle);
        }
    }
    property(out, Key::Bpm, &format_g32(meta.bpm.bpm));
    property(out, Key::Wave, &meta.wave);
    property_if_not_empty(out, Key::PreImage, &meta.preimage);
    property(out, Key::Offset, &seconds(meta.offset));
    property(out, Key::DemoStart, &seconds(meta.demostart));
    property_if_not_empty(out, Key::Genre, &meta.genre);
    if meta.scoremode != ScoreMode::Mode0 {
        property(out, Key::ScoreMode, &(meta.scoremode as u8).to_string());
    }
    property_if_not_empty(out, Key::Maker, &meta.maker);
    property_if_not_empty(out, Key::Lyrics, &meta.lyrics);
    if !approximately_same(meta.songvol, 1.0) {
        property(out, Key::SongVol, &percent(meta.songvol));
    }
    if !approximately_same(meta.sevol, 1.0) {
        property(out, Key::SeVol, &percent(meta.sevol));
    }
    if meta.headscroll != 1.0 {
        property(out, Key::HeadScroll, &format_g32(meta.headscroll));
    }
    property_if_not_empty(out, Key::BgImage, &meta.bgimage);
    property_if_not_empty(out, Key::BgMovie, &meta.bgmovie);
    if meta.movieoffset != Time::ZERO {
        property(out, Key::MovieOffset, &seconds(meta.movieoffset));
    }
    property_if_not_empty(out, Key::TaikoWebSkin, &meta.taikowebskin);
}

fn notes_designer_key(course: DifficultyType) -> Option<Key> {
    match course {
        DifficultyType::Easy => Some(Key::NotesDesigner0),
        DifficultyType::Normal => Some(Key::NotesDesigner1),
        DifficultyType::Hard => Some(Key::NotesDesigner2),
        DifficultyType::Oni => Some(Key::NotesDesigner3),
        DifficultyType::OniUra => Some(Key::NotesDesigner4),
        DifficultyType::Tower | DifficultyType::Dan => None,
    }
}

fn write_course_metadata(out: &mut String, course: &ParsedCourse) {
    let meta = &course.metadata;
    property(out, Key::Course, meta.course.as_str());
    match meta.level_decimal_tag {
        Some(tag) => property(out, Key::Level, &format!("{:.1}", meta.level as f64 + tag as f64 / 10.0)),
        None => property(out, Key::Level, &meta.level.to_string()),
    }

    if meta.course == DifficultyType::Tower {
        property(out, Key::Life, &meta.life.to_string());
        property_if_not_empty(out, Key::Side, meta.side.as_str());
    }

    let has_branch_balloons =
        !meta.balloon_normal.is_empty() || !meta.balloon_expert.is_empty() || !meta.balloon_master.is_empty();
    if !meta.balloon.is_empty() || has_branch_balloons {
        property(out, Key::Balloon, &int_list(&meta.balloon));
    }
    if has_branch_balloons {
        property(out, Key::BalloonNor, &int_list(&meta.balloon_normal));
        property(out, Key::BalloonExp, &int_list(&meta.balloon_expert));
        property(out, Key::BalloonMas, &int_list(&meta.balloon_master));
    }

    let score = |value: i32| if value == 0 { String::new() } else { value.to_string() };
    property(out, Key::ScoreInit, &score(meta.score_init));
    property(out, Key::ScoreDiff, &score(meta.score_diff));

    if meta.style == StyleMode::Double {
        property(out, Key::Style, "Double");
    }
    for (key, value) in [(Key::Explicit, meta.explicit), (Key::Total, meta.total), (Key::HiddenBranch, meta.hidden_branch)] {
        if value != 0 {
            property(out, key, &value.to_string());
        }
    }
    if meta.gauge_incr != GaugeIncrementMethod::Normal {
        property(out, Key::GaugeIncr, meta.gauge_incr.as_str());
    }
    if !meta.notes_designer.is_empty() {
        if let Some(key) = notes_designer_key(meta.course) {
            property(out, key, &meta.notes_designer);
        }
    }
    for (number, exam) in &meta.exams {
        if let Some(key) = Key::exam(*number) {
            property(out, key, exam);
        }
    }
}

fn write_chart_commands(out: &mut String, commands: &[ParsedChartCommand]) {
    for (index, chart_command) in commands.iter().enumerate() {
        match chart_command {
            ParsedChartCommand::MeasureNotes(notes) => {
                out.extend(notes.iter().map(|note| note.to_char()));
                if commands.get(index + 1) != Some(&ParsedChartCommand::MeasureEnd) {
                    out.push('\n');
                }
            }
            ParsedChartCommand::MeasureEnd => out.push_str(",\n"),
            ParsedChartCommand::ChangeTimeSignature(signature) => {
                command(out, Key::Measure, &format!("{}/{}", signature.numerator, signature.denominator))
            }
            ParsedChartCommand::ChangeTempo(tempo) => command(out, Key::BpmChange, &format_g32(tempo.bpm)),
            ParsedChartCommand::ChangeDelay(delay) => command(out, Key::Delay, &seconds(*delay)),
            ParsedChartCommand::ChangeScrollSpeed(speed) => command(out, Key::Scroll, &speed.to_string_compat()),
            ParsedChartCommand::ChangeBarLine { visible: true } => command(out, Key::BarlineOn, ""),
            ParsedChartCommand::ChangeBarLine { visible: false } => command(out, Key::BarlineOff, ""),
            ParsedChartCommand::GoGoStart => command(out, Key::GoGoStart, ""),
            ParsedChartCommand::GoGoEnd => command(out, Key::GoGoEnd, ""),
            ParsedChartCommand::BranchStart { condition, requirement_expert, requirement_master } => command(
                out,
                Key::BranchStart,
                &format!("{},{},{}", condition.to_char(), requirement_expert, requirement_master),
            ),
            ParsedChartCommand::BranchNormal => command(out, Key::BranchNormal, ""),
            ParsedChartCommand::BranchExpert => command(out, Key::BranchExpert, ""),
            ParsedChartCommand::BranchMaster => command(out, Key::BranchMaster, ""),
            ParsedChartCommand::BranchEnd => command(out, Key::BranchEnd, ""),
            ParsedChartCommand::BranchLevelHold => command(out, Key::LevelHold, ""),
            ParsedChartCommand::ResetAccuracyValues => command(out, Key::Section, ""),
            ParsedChartCommand::SetLyricLine(lyric) => command(out, Key::Lyric, lyric),
            ParsedChartCommand::BmScroll => command(out, Key::BmScroll, ""),
            ParsedChartCommand::HbScroll => command(out, Key::HbScroll, ""),
            ParsedChartCommand::NmScroll => command(out, Key::NmScroll, ""),
            ParsedChartCommand::SeNoteChange(note) => command(out, Key::SeNoteChange, &note.to_string()),
            ParsedChartCommand::SetNextSong(song) => command(out, Key::NextSong, song),
            ParsedChartCommand::SetSudden { appearance_offset, movement_wait_delay } => command(
                out,
                Key::Sudden,
                &format!("{} {}", seconds(*appearance_offset), seconds(*movement_wait_delay)),
            ),
            // Direction 1 keeps the move as written
            ParsedChartCommand::SetJposScroll { duration, movement } => command(
                out,
                Key::JposScroll,
                &format!("{} {} 1", seconds(*duration), movement.to_string_compat()),
            ),
        }
    }
}

/// Serialize a parsed file to TJA text
pub fn convert_parsed_to_text(parsed: &ParsedTja, encoding: TextEncoding) -> String {
    let mut out = String::with_capacity(0x4000);
    if encoding == TextEncoding::Utf8Bom {
        out.push_str(UTF8_BOM);
    }

    if parsed.has_provenance_comment {
        out.push_str("// ");
        out.push_str(PROVENANCE_COMMENT_PREFIX);
        if let Some(date) = parsed.provenance_date {
            out.push_str(&format!(" ({})", date.format("%Y/%m/%d")));
        }
        out.push('\n');
    }

    write_main_metadata(&mut out, &parsed.metadata);
    out.push('\n');

    for (index, course) in parsed.courses.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        write_course_metadata(&mut out, course);
        out.push('\n');

        command(&mut out, Key::Start, "");
        write_chart_commands(&mut out, &course.chart_commands);
        command(&mut out, Key::End, "");
    }

    log::debug!("wrote {} course(s), {} bytes of TJA text", parsed.courses.len(), out.len());
    out
}

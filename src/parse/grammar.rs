//! Token stream to parsed TJA
//!
//! A single forward pass over the tokens. Properties fill in metadata,
//! commands and chart data become `ParsedChartCommand`s of the current
//! course. Every problem becomes a diagnostic and the pass continues with
//! a default value, so a file always yields at least one course.

use once_cell::sync::Lazy;
use regex::Regex;

use super::keys::{Key, KeyCategory};
use super::tokens::{Token, TokenType};
use super::types::{ParsedChartCommand, ParsedCourse, ParsedCourseMetadata, ParsedTja};
use super::values::*;
use crate::diagnostics::Diagnostics;
use crate::models::{is_time_signature_supported, Complex};
use crate::utils::ascii;

static PROVENANCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^TJADB Project\s*\(?\s*(\d{4}/\d{1,2}/\d{1,2})?\s*\)?").expect("invalid regex pattern")
});

/// Report a failed value and fall back to the type's default
fn report<T: Default>(diagnostics: &mut Diagnostics, line: usize, result: Result<T, ValueError>) -> T {
    result.unwrap_or_else(|err| {
        diagnostics.push(line, err.to_string());
        T::default()
    })
}

/// Command arguments must be present, unlike property values
fn required<T>(
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, ValueError>,
    missing: impl FnOnce() -> ValueError,
) -> Result<T, ValueError> {
    if value.is_empty() {
        Err(missing())
    } else {
        parse(value)
    }
}

fn report_list(diagnostics: &mut Diagnostics, line: usize, value: &str) -> Vec<i32> {
    let (values, error) = parse_i32_list(value);
    if let Some(err) = error {
        diagnostics.push(line, err.to_string());
    }
    values
}

/// Star tag of `LEVEL:9.5`, the first digit after the dot
fn parse_level_decimal_tag(value: &str) -> Result<Option<i32>, ValueError> {
    match value.split_once('.') {
        Some((_, fraction)) => {
            let digit = fraction.chars().next().map_or("", |c| &fraction[..c.len_utf8()]);
            digit.parse().map(Some).map_err(|_| ValueError::InvalidInt(digit.to_string()))
        }
        None => Ok(None),
    }
}

fn open_course<'c>(courses: &'c mut Vec<ParsedCourse>, current: &mut Option<usize>) -> &'c mut ParsedCourse {
    let index = *current.get_or_insert_with(|| {
        courses.push(ParsedCourse::default());
        courses.len() - 1
    });
    &mut courses[index]
}

/// Scroll speed for a `#DIRECTION` value, rotated from the last `#SCROLL` speed
fn direction_to_scroll(direction: i32, speed: f32) -> Complex {
    match direction {
        1 => Complex::new(0.0, -speed),
        2 => Complex::new(0.0, speed),
        3 => Complex::new(speed, -speed),
        4 => Complex::new(speed, speed),
        5 => Complex::new(-speed, 0.0),
        6 => Complex::new(-speed, -speed),
        7 => Complex::new(-speed, speed),
        _ => Complex::new(speed, 0.0),
    }
}

struct Parser<'d> {
    out: ParsedTja,
    current_course: Option<usize>,
    diagnostics: &'d mut Diagnostics,
    in_chart: bool,
    in_gogo: bool,
    in_branch: bool,
    /// Notes were added since the last `,`
    measure_open: bool,
    last_scroll_speed: Complex,
}

impl<'d> Parser<'d> {
    fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            out: ParsedTja::default(),
            current_course: None,
            diagnostics,
            in_chart: false,
            in_gogo: false,
            in_branch: false,
            measure_open: false,
            last_scroll_speed: Complex::real(1.0),
        }
    }

    fn push(&mut self, command: ParsedChartCommand) {
        open_course(&mut self.out.courses, &mut self.current_course).chart_commands.push(command);
    }

    fn error(&mut self, line: usize, message: impl Into<String>) {
        self.diagnostics.push(line, message);
    }

    fn token(&mut self, token: &Token<'_>) {
        match token.token_type {
            TokenType::EmptyLine => {}
            TokenType::Comment => self.comment(token.value_string),
            TokenType::KeyColonValue => self.property(token),
            TokenType::HashChartCommand => self.command(token),
            TokenType::ChartData => self.chart_data(token),
            TokenType::Unknown => self.error(token.line_index, format!("Unknown data '{}'", token.line)),
        }
    }

    fn comment(&mut self, text: &str) {
        if self.out.has_provenance_comment {
            return;
        }
        if let Some(captures) = PROVENANCE_REGEX.captures(text) {
            self.out.has_provenance_comment = true;
            self.out.provenance_date = captures
                .get(1)
                .and_then(|date| chrono::NaiveDate::parse_from_str(date.as_str(), "%Y/%m/%d").ok());
        }
    }

    fn property(&mut self, token: &Token<'_>) {
        let value = ascii::trim(token.value_string);
        match token.key.category() {
            Some(KeyCategory::Main) => self.main_property(token.key, token.line_index, value),
            Some(KeyCategory::Course) => self.course_property(token.key, token.line_index, value),
            _ => self.error(token.line_index, format!("Unknown property '{}'", token.key_string)),
        }
    }

    fn main_property(&mut self, key: Key, line: usize, value: &str) {
        let diagnostics = &mut *self.diagnostics;
        let meta = &mut self.out.metadata;
        match key {
            Key::Title => meta.title = value.to_string(),
            Key::Subtitle => meta.subtitle = value.to_string(),
            Key::TitleJa | Key::TitleEn | Key::TitleCn | Key::TitleTw | Key::TitleKo => {
                if let Some(locale) = key.locale() {
                    meta.title_localized.insert(locale.to_string(), value.to_string());
                }
            }
            Key::SubtitleJa | Key::SubtitleEn | Key::SubtitleCn | Key::SubtitleTw | Key::SubtitleKo => {
                if let Some(locale) = key.locale() {
                    meta.subtitle_localized.insert(locale.to_string(), value.to_string());
                }
            }
            Key::Bpm => meta.bpm = report(diagnostics, line, parse_tempo(value)),
            Key::Wave => meta.wave = value.to_string(),
            Key::PreImage => meta.preimage = value.to_string(),
            Key::BgImage => meta.bgimage = value.to_string(),
            Key::BgMovie => meta.bgmovie = value.to_string(),
            Key::Lyrics => meta.lyrics = value.to_string(),
            Key::Maker => meta.maker = value.to_string(),
            Key::Genre => meta.genre = value.to_string(),
            Key::TaikoWebSkin => meta.taikowebskin = value.to_string(),
            Key::HeadScroll => meta.headscroll = report(diagnostics, line, parse_f32(value)),
            Key::Offset => meta.offset = report(diagnostics, line, parse_time(value)),
            Key::DemoStart => meta.demostart = report(diagnostics, line, parse_time(value)),
            Key::MovieOffset => meta.movieoffset = report(diagnostics, line, parse_time(value)),
            Key::SongVol => meta.songvol = report(diagnostics, line, parse_percent(value)),
            Key::SeVol => meta.sevol = report(diagnostics, line, parse_percent(value)),
            Key::ScoreMode => meta.scoremode = report(diagnostics, line, parse_score_mode(value)),
            Key::Game => meta.game = report(diagnostics, line, parse_game(value)),
            _ => {}
        }
    }

    fn course_property(&mut self, key: Key, line: usize, value: &str) {
        let diagnostics = &mut *self.diagnostics;
        let meta: &mut ParsedCourseMetadata =
            &mut open_course(&mut self.out.courses, &mut self.current_course).metadata;
        match key {
            Key::Course => meta.course = report(diagnostics, line, parse_difficulty(value)),
            Key::Level => match parse_f32(value) {
                Ok(level) => {
                    meta.level = level as i32;
                    meta.level_decimal_tag = report(diagnostics, line, parse_level_decimal_tag(value));
                }
                Err(err) => diagnostics.push(line, err.to_string()),
            },
            Key::Balloon => meta.balloon = report_list(diagnostics, line, value),
            Key::BalloonNor => meta.balloon_normal = report_list(diagnostics, line, value),
            Key::BalloonExp => meta.balloon_expert = report_list(diagnostics, line, value),
            Key::BalloonMas => meta.balloon_master = report_list(diagnostics, line, value),
            Key::ScoreInit => meta.score_init = report(diagnostics, line, parse_i32(value)),
            Key::ScoreDiff => meta.score_diff = report(diagnostics, line, parse_i32(value)),
            Key::Explicit => meta.explicit = report(diagnostics, line, parse_i32(value)),
            Key::Total => meta.total = report(diagnostics, line, parse_i32(value)),
            Key::HiddenBranch => meta.hidden_branch = report(diagnostics, line, parse_i32(value)),
            Key::Life => meta.life = report(diagnostics, line, parse_i32(value)),
            Key::Style => meta.style = report(diagnostics, line, parse_style(value)),
            Key::Side => meta.side = report(diagnostics, line, parse_side(value)),
            Key::GaugeIncr => meta.gauge_incr = report(diagnostics, line, parse_gauge_increment(value)),
            Key::NotesDesigner0
            | Key::NotesDesigner1
            | Key::NotesDesigner2
            | Key::NotesDesigner3
            | Key::NotesDesigner4 => meta.notes_designer = value.to_string(),
            _ => {
                if let Some(number) = key.exam_number() {
                    meta.exams.insert(number, value.to_string());
                }
            }
        }
    }

    fn command(&mut self, token: &Token<'_>) {
        let line = token.line_index;
        let value = ascii::trim(token.value_string);
        let key = token.key;

        if key == Key::Unknown {
            self.error(line, format!("Unknown chart command '{}'", token.key_string));
            return;
        }
        if !self.in_chart && !matches!(key, Key::Start | Key::End) {
            self.error(line, "Chart commands must be placed between #START and #END");
        }

        match key {
            Key::Start => {
                if self.in_chart {
                    self.error(line, "Missing #END command");
                }
                open_course(&mut self.out.courses, &mut self.current_course);
                self.in_chart = true;
                self.in_gogo = false;
                self.in_branch = false;
                self.measure_open = false;
                self.last_scroll_speed = Complex::real(1.0);
            }
            Key::End => {
                if !self.in_chart {
                    self.error(line, "Missing #START command");
                }
                if self.in_gogo {
                    self.error(line, "Missing #GOGOEND command");
                    self.push(ParsedChartCommand::GoGoEnd);
                }
                self.in_chart = false;
                self.in_gogo = false;
                self.in_branch = false;
                self.measure_open = false;
                self.current_course = None;
            }
            Key::Measure => {
                if self.measure_open {
                    self.error(line, "Cannot change time signature in the middle of a measure");
                    return;
                }
                let signature = report(
                    self.diagnostics,
                    line,
                    required(value, parse_time_signature, || ValueError::InvalidTimeSignature(String::new())),
                );
                if !signature.fits_max_bar_duration() {
                    self.error(line, format!("Time signature '{}' exceeds the maximum bar length", value));
                    return;
                }
                if !is_time_signature_supported(signature) {
                    self.error(line, format!("Unsupported time signature denominator '{}'", value));
                }
                self.push(ParsedChartCommand::ChangeTimeSignature(signature));
            }
            Key::BpmChange => {
                let tempo =
                    report(self.diagnostics, line, required(value, parse_tempo, || ValueError::InvalidTempo(String::new())));
                self.push(ParsedChartCommand::ChangeTempo(tempo));
            }
            Key::Delay => {
                let delay =
                    report(self.diagnostics, line, required(value, parse_time, || ValueError::InvalidFloat(String::new())));
                self.push(ParsedChartCommand::ChangeDelay(delay));
            }
            Key::Scroll => {
                let speed = report(
                    self.diagnostics,
                    line,
                    required(value, parse_complex, || ValueError::InvalidScrollSpeed(String::new())),
                );
                self.last_scroll_speed = speed;
                self.push(ParsedChartCommand::ChangeScrollSpeed(speed));
            }
            Key::GoGoStart => {
                if self.in_gogo {
                    self.error(line, "Missing #GOGOEND command");
                }
                self.in_gogo = true;
                self.push(ParsedChartCommand::GoGoStart);
            }
            Key::GoGoEnd => {
                if !self.in_gogo {
                    self.error(line, "Missing #GOGOSTART command");
                }
                self.in_gogo = false;
                self.push(ParsedChartCommand::GoGoEnd);
            }
            Key::BarlineOff => self.push(ParsedChartCommand::ChangeBarLine { visible: false }),
            Key::BarlineOn => self.push(ParsedChartCommand::ChangeBarLine { visible: true }),
            Key::BranchStart => {
                if self.in_branch {
                    self.error(line, "Nested #BRANCHSTART before #BRANCHEND");
                }
                self.in_branch = true;
                let command = self.branch_start(line, value);
                self.push(command);
            }
            Key::BranchNormal | Key::BranchExpert | Key::BranchMaster => {
                if !self.in_branch {
                    self.error(line, format!("#{} must be placed after #BRANCHSTART", token.key_string));
                }
                self.push(match key {
                    Key::BranchNormal => ParsedChartCommand::BranchNormal,
                    Key::BranchExpert => ParsedChartCommand::BranchExpert,
                    _ => ParsedChartCommand::BranchMaster,
                });
            }
            Key::BranchEnd => {
                if !self.in_branch {
                    self.error(line, "Missing #BRANCHSTART command");
                }
                self.in_branch = false;
                self.push(ParsedChartCommand::BranchEnd);
            }
            Key::Section => self.push(ParsedChartCommand::ResetAccuracyValues),
            Key::LevelHold => self.push(ParsedChartCommand::BranchLevelHold),
            Key::Lyric => self.push(ParsedChartCommand::SetLyricLine(value.to_string())),
            Key::BmScroll => self.push(ParsedChartCommand::BmScroll),
            Key::HbScroll => self.push(ParsedChartCommand::HbScroll),
            Key::NmScroll => self.push(ParsedChartCommand::NmScroll),
            Key::Barline | Key::GameType => {
                self.error(line, format!("Unsupported chart command '{}'", token.key_string));
            }
            Key::SeNoteChange => {
                let note = report(self.diagnostics, line, parse_i32(value));
                self.push(ParsedChartCommand::SeNoteChange(note));
            }
            Key::NextSong => self.push(ParsedChartCommand::SetNextSong(value.to_string())),
            Key::Direction => {
                let word = ascii::space_separated(value).next().unwrap_or("");
                let direction = report(self.diagnostics, line, parse_i32(word));
                let speed = direction_to_scroll(direction, self.last_scroll_speed.re);
                self.push(ParsedChartCommand::ChangeScrollSpeed(speed));
            }
            Key::Sudden => {
                let mut words = ascii::space_separated(value);
                let appearance_offset = report(self.diagnostics, line, parse_time(words.next().unwrap_or("")));
                let movement_wait_delay = report(self.diagnostics, line, parse_time(words.next().unwrap_or("")));
                self.push(ParsedChartCommand::SetSudden { appearance_offset, movement_wait_delay });
            }
            Key::JposScroll => {
                let command = self.jpos_scroll(line, value);
                self.push(command);
            }
            _ => {}
        }
    }

    /// `#BRANCHSTART cond,expert,master`
    fn branch_start(&mut self, line: usize, value: &str) -> ParsedChartCommand {
        let mut items = ascii::comma_separated(value).map(ascii::trim);
        let condition = report(self.diagnostics, line, parse_branch_condition(items.next().unwrap_or("")));
        let requirement_expert = report(self.diagnostics, line, parse_i32(items.next().unwrap_or("")));
        let requirement_master = report(self.diagnostics, line, parse_i32(items.next().unwrap_or("")));
        ParsedChartCommand::BranchStart { condition, requirement_expert, requirement_master }
    }

    /// `#JPOSSCROLL duration move direction` or `#JPOSSCROLL duration x yi direction`
    fn jpos_scroll(&mut self, line: usize, value: &str) -> ParsedChartCommand {
        let mut duration = Default::default();
        let mut movement = Complex::default();
        let mut direction = 0;
        // A move written with its own imaginary part cannot take a separate `yi` word
        let mut accepts_split_imaginary = true;

        let mut position = 0;
        for word in ascii::space_separated(value) {
            if position == 0 {
                duration = report(self.diagnostics, line, parse_time(word));
            } else if position == 1 {
                movement = report(self.diagnostics, line, parse_complex(word));
                if word.ends_with(&['i', 'I'][..]) {
                    accepts_split_imaginary = false;
                }
            } else if position == 2 && word.ends_with(&['i', 'I'][..]) {
                if accepts_split_imaginary {
                    movement.im = report(self.diagnostics, line, parse_f32(&word[..word.len() - 1]));
                } else {
                    self.error(line, "Invalid split complex number");
                }
            } else {
                direction = report(self.diagnostics, line, parse_i32(word));
                break;
            }
            position += 1;
        }

        if direction == 0 {
            movement = Complex::new(-movement.re, -movement.im);
        }
        ParsedChartCommand::SetJposScroll { duration, movement }
    }

    fn chart_data(&mut self, token: &Token<'_>) {
        let line = token.line_index;
        if !self.in_chart {
            self.error(line, "Chart note data can only be added between #START and #END");
            return;
        }

        let data = token.value_string;
        let mut notes = Vec::new();
        for (index, c) in data.char_indices() {
            if c == ',' {
                if !notes.is_empty() {
                    self.push(ParsedChartCommand::MeasureNotes(std::mem::take(&mut notes)));
                }
                self.push(ParsedChartCommand::MeasureEnd);
                self.measure_open = false;
                if index + 1 < data.len() {
                    self.error(line, "Unexpected trailing data after end-of-measure comma");
                }
                return;
            }
            if ascii::is_whitespace(c) {
                continue;
            }
            notes.push(report(self.diagnostics, line, parse_note(c)));
        }

        if !notes.is_empty() {
            self.measure_open = true;
            self.push(ParsedChartCommand::MeasureNotes(notes));
        }
    }

    fn finish(mut self, last_line: usize) -> ParsedTja {
        if self.in_chart {
            self.error(last_line, "Missing #END command");
        }
        if self.out.courses.is_empty() {
            self.out.courses.push(ParsedCourse::default());
        }
        self.out
    }
}

/// Parse a token stream, appending every problem found to `diagnostics`
pub fn parse_tokens(tokens: &[Token<'_>], diagnostics: &mut Diagnostics) -> ParsedTja {
    let mut parser = Parser::new(diagnostics);
    for token in tokens {
        parser.token(token);
    }

    let last_line = tokens.last().map_or(0, |token| token.line_index);
    let parsed = parser.finish(last_line);
    log::debug!("parsed {} course(s) from {} tokens", parsed.courses.len(), tokens.len());
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Tempo, Time};
    use crate::parse::tokens::tokenize;
    use crate::parse::types::{BranchCondition, DifficultyType, NoteType};

    fn parse(text: &str) -> (ParsedTja, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let parsed = parse_tokens(&tokenize(text), &mut diagnostics);
        (parsed, diagnostics)
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_minimal_chart() {
        let (parsed, diags) = parse("TITLE:Song\nBPM:150\nCOURSE:Hard\nLEVEL:7\n#START\n1020,\n#END");
        assert!(diags.is_empty(), "{:?}", diags);
        assert_eq!(parsed.metadata.title, "Song");
        assert_eq!(parsed.metadata.bpm, Tempo::new(150.0));
        assert_eq!(parsed.courses.len(), 1);

        let course = &parsed.courses[0];
        assert_eq!(course.metadata.course, DifficultyType::Hard);
        assert_eq!(course.metadata.level, 7);
        assert_eq!(
            course.chart_commands,
            vec![
                ParsedChartCommand::MeasureNotes(vec![NoteType::Don, NoteType::None, NoteType::Ka, NoteType::None]),
                ParsedChartCommand::MeasureEnd,
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_one_course() {
        let (parsed, diags) = parse("");
        assert!(diags.is_empty());
        assert_eq!(parsed.courses.len(), 1);
    }

    #[test]
    fn test_level_decimal_tag() {
        let (parsed, _) = parse("LEVEL:9.5");
        assert_eq!(parsed.courses[0].metadata.level, 9);
        assert_eq!(parsed.courses[0].metadata.level_decimal_tag, Some(5));
    }

    #[test]
    fn test_bad_level_tag_keeps_level() {
        let (parsed, diags) = parse("LEVEL:9.");
        assert_eq!(messages(&diags), vec!["Invalid int ''"]);
        assert_eq!(parsed.courses[0].metadata.level, 9);
        assert_eq!(parsed.courses[0].metadata.level_decimal_tag, None);

        let (parsed, diags) = parse("LEVEL:nine");
        assert_eq!(messages(&diags), vec!["Invalid float 'nine'"]);
        assert_eq!(parsed.courses[0].metadata.level, 0);
    }

    #[test]
    fn test_oversized_measure_is_rejected() {
        let (parsed, diags) = parse("#START\n#MEASURE 100000/1\n1,\n#END");
        assert_eq!(messages(&diags), vec!["Time signature '100000/1' exceeds the maximum bar length"]);
        assert!(!parsed.courses[0]
            .chart_commands
            .iter()
            .any(|c| matches!(c, ParsedChartCommand::ChangeTimeSignature(_))));
    }

    #[test]
    fn test_property_after_end_opens_new_course() {
        let (parsed, _) = parse("COURSE:Easy\n#START\n1,\n#END\nCOURSE:Oni\n#START\n2,\n#END");
        assert_eq!(parsed.courses.len(), 2);
        assert_eq!(parsed.courses[0].metadata.course, DifficultyType::Easy);
        assert_eq!(parsed.courses[1].metadata.course, DifficultyType::Oni);
    }

    #[test]
    fn test_bad_tempo_reports_and_continues() {
        let (parsed, diags) = parse("#START\n#BPMCHANGE abc\n1,\n#END");
        assert_eq!(messages(&diags), vec!["Invalid tempo 'abc'"]);
        assert_eq!(parsed.courses[0].chart_commands[0], ParsedChartCommand::ChangeTempo(Tempo::new(0.0)));
        assert_eq!(parsed.courses[0].chart_commands.len(), 3);
    }

    #[test]
    fn test_trailing_data_after_comma() {
        let (parsed, diags) = parse("#START\n10,20\n#END");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.items[0].line, 1);
        assert_eq!(diags.items[0].message, "Unexpected trailing data after end-of-measure comma");
        assert_eq!(parsed.courses[0].chart_commands.len(), 2);
    }

    #[test]
    fn test_unknown_note_type() {
        let (parsed, diags) = parse("#START\n1x2,\n#END");
        assert_eq!(messages(&diags), vec!["Unknown note type 'x'"]);
        assert_eq!(
            parsed.courses[0].chart_commands[0],
            ParsedChartCommand::MeasureNotes(vec![NoteType::Don, NoteType::None, NoteType::Ka])
        );
    }

    #[test]
    fn test_measure_inside_open_measure() {
        let (parsed, diags) = parse("#START\n1010\n#MEASURE 3/4\n1010,\n#END");
        assert_eq!(messages(&diags), vec!["Cannot change time signature in the middle of a measure"]);
        assert!(!parsed.courses[0]
            .chart_commands
            .iter()
            .any(|c| matches!(c, ParsedChartCommand::ChangeTimeSignature(_))));
    }

    #[test]
    fn test_missing_end() {
        let (_, diags) = parse("#START\n1,\n");
        assert_eq!(messages(&diags), vec!["Missing #END command"]);
    }

    #[test]
    fn test_end_inside_gogo_closes_it() {
        let (parsed, diags) = parse("#START\n#GOGOSTART\n1,\n#END");
        assert_eq!(messages(&diags), vec!["Missing #GOGOEND command"]);
        assert_eq!(parsed.courses[0].chart_commands.last(), Some(&ParsedChartCommand::GoGoEnd));
    }

    #[test]
    fn test_commands_outside_chart() {
        let (_, diags) = parse("#GOGOSTART\n1010,");
        assert_eq!(messages(&diags), vec!["Chart commands must be placed between #START and #END", "Unknown data '1010,'"]);
    }

    #[test]
    fn test_branch_structure() {
        let text = "#START\n#N\n#BRANCHSTART p,80,90\n#N\n1,\n#E\n1,\n#M\n1,\n#BRANCHEND\n#BRANCHEND\n#END";
        let (parsed, diags) = parse(text);
        assert_eq!(
            messages(&diags),
            vec!["#N must be placed after #BRANCHSTART", "Missing #BRANCHSTART command"]
        );
        assert!(parsed.courses[0].chart_commands.contains(&ParsedChartCommand::BranchStart {
            condition: BranchCondition::Precise,
            requirement_expert: 80,
            requirement_master: 90,
        }));
    }

    #[test]
    fn test_direction_rotates_last_scroll() {
        let (parsed, _) = parse("#START\n#SCROLL 2\n#DIRECTION 1\n#DIRECTION 7\n1,\n#END");
        let commands = &parsed.courses[0].chart_commands;
        assert_eq!(commands[1], ParsedChartCommand::ChangeScrollSpeed(Complex::new(0.0, -2.0)));
        assert_eq!(commands[2], ParsedChartCommand::ChangeScrollSpeed(Complex::new(-2.0, 2.0)));
    }

    #[test]
    fn test_jposscroll_forms() {
        let (parsed, diags) = parse("#START\n#JPOSSCROLL 0.5 3+2i 1\n#JPOSSCROLL 1 100 50i 0\n#END");
        assert!(diags.is_empty(), "{:?}", diags);
        let commands = &parsed.courses[0].chart_commands;
        assert_eq!(
            commands[0],
            ParsedChartCommand::SetJposScroll { duration: Time::from_sec(0.5), movement: Complex::new(3.0, 2.0) }
        );
        assert_eq!(
            commands[1],
            ParsedChartCommand::SetJposScroll { duration: Time::from_sec(1.0), movement: Complex::new(-100.0, -50.0) }
        );
    }

    #[test]
    fn test_jposscroll_split_after_complex_move() {
        let (_, diags) = parse("#START\n#JPOSSCROLL 1 1+1i 5i 1\n#END");
        assert_eq!(messages(&diags), vec!["Invalid split complex number"]);
    }

    #[test]
    fn test_unsupported_commands() {
        let (parsed, diags) = parse("#START\n#GAMETYPE Konga\n#FOO\n#END");
        assert_eq!(messages(&diags), vec!["Unsupported chart command 'GAMETYPE'", "Unknown chart command 'FOO'"]);
        assert!(parsed.courses[0].chart_commands.is_empty());
    }

    #[test]
    fn test_unknown_property() {
        let (_, diags) = parse("NOTAKEY:1");
        assert_eq!(messages(&diags), vec!["Unknown property 'NOTAKEY'"]);
    }

    #[test]
    fn test_provenance_comment() {
        let (parsed, _) = parse("// TJADB Project (2023/04/05)\nTITLE:x");
        assert!(parsed.has_provenance_comment);
        assert_eq!(parsed.provenance_date, chrono::NaiveDate::from_ymd_opt(2023, 4, 5));

        let (parsed, _) = parse("// TJADB Project");
        assert!(parsed.has_provenance_comment);
        assert_eq!(parsed.provenance_date, None);

        let (parsed, _) = parse("// just a comment");
        assert!(!parsed.has_provenance_comment);
    }

    #[test]
    fn test_localized_titles_and_exams() {
        let (parsed, _) = parse("TITLEJA:\u{66f2}\nEXAM2:g,80,90,m\nNOTESDESIGNER1:a\nNOTESDESIGNER3:b");
        assert_eq!(parsed.metadata.title_localized.get("JA").map(String::as_str), Some("\u{66f2}"));
        let course = &parsed.courses[0].metadata;
        assert_eq!(course.exams.get(&2).map(String::as_str), Some("g,80,90,m"));
        assert_eq!(course.notes_designer, "b");
    }

    #[test]
    fn test_balloon_list() {
        let (parsed, diags) = parse("BALLOON:5,10, 15");
        assert!(diags.is_empty());
        assert_eq!(parsed.courses[0].metadata.balloon, vec![5, 10, 15]);
    }
}

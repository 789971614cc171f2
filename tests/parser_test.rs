// Whole-file parsing: diagnostics, course handling, metadata

use tja_chart::models::{Beat, Complex, Tempo, Time};
use tja_chart::parse::{
    parse_tja, tokenize, DifficultyType, GaugeIncrementMethod, NoteType, ParsedChartCommand, TokenType,
};

fn messages(text: &str) -> Vec<(usize, String)> {
    let (_, diagnostics) = parse_tja(text);
    diagnostics.iter().map(|d| (d.line, d.message.clone())).collect()
}

#[test]
fn test_broken_file_still_loads() {
    let text = "\
BPM:fast
COURSE:Oni
LEVEL:ten
#START
#MEASURE 4/0
10X0,junk
#GOGOSTART
1,
";
    let (parsed, diagnostics) = parse_tja(text);
    assert_eq!(parsed.courses.len(), 1);
    assert_eq!(parsed.metadata.bpm, Tempo::default());
    assert_eq!(parsed.courses[0].metadata.level, 0);

    let found: Vec<(usize, &str)> = diagnostics.iter().map(|d| (d.line, d.message.as_str())).collect();
    assert_eq!(
        found,
        vec![
            (0, "Invalid tempo 'fast'"),
            (2, "Invalid float 'ten'"),
            (4, "Unsupported time signature denominator '4/0'"),
            (5, "Unknown note type 'X'"),
            (5, "Unexpected trailing data after end-of-measure comma"),
            (7, "Missing #END command"),
        ]
    );

    // The unsupported signature is kept as written; the host decides what to do with it
    let notes = &parsed.courses[0].chart_commands[1];
    assert_eq!(*notes, ParsedChartCommand::MeasureNotes(vec![NoteType::Don, NoteType::None, NoteType::None, NoteType::None]));
}

#[test]
fn test_commands_outside_chart() {
    assert_eq!(
        messages("#BPMCHANGE 120\n#START\n#END\n#END"),
        vec![
            (0, "Chart commands must be placed between #START and #END".to_string()),
            (3, "Missing #START command".to_string()),
        ]
    );
}

#[test]
fn test_gogo_pairing() {
    let (parsed, diagnostics) = parse_tja("#START\n#GOGOSTART\n1,\n#END");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.items[0].message, "Missing #GOGOEND command");
    assert_eq!(parsed.courses[0].chart_commands.last(), Some(&ParsedChartCommand::GoGoEnd));

    assert_eq!(messages("#START\n#GOGOEND\n#END"), vec![(1, "Missing #GOGOSTART command".to_string())]);
}

#[test]
fn test_properties_after_end_open_a_new_course() {
    let text = "COURSE:Easy\nLEVEL:3\n#START\n1,\n#END\nCOURSE:edit\nLEVEL:10\nGAUGEINCR:ceiling\n#START\n2,\n#END";
    let (parsed, diagnostics) = parse_tja(text);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(parsed.courses.len(), 2);
    assert_eq!(parsed.courses[0].metadata.course, DifficultyType::Easy);
    assert_eq!(parsed.courses[1].metadata.course, DifficultyType::OniUra);
    assert_eq!(parsed.courses[1].metadata.level, 10);
    assert_eq!(parsed.courses[1].metadata.gauge_incr, GaugeIncrementMethod::Ceiling);
}

#[test]
fn test_unmatched_gauge_increment_is_silently_normal() {
    let (parsed, diagnostics) = parse_tja("GAUGEINCR:SOMETIMES\n#START\n#END");
    assert!(diagnostics.is_empty());
    assert_eq!(parsed.courses[0].metadata.gauge_incr, GaugeIncrementMethod::Normal);
}

#[test]
fn test_direction_rotates_last_scroll() {
    let (parsed, diagnostics) = parse_tja("#START\n#SCROLL 2\n#DIRECTION 2\n1,\n#END");
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(
        parsed.courses[0].chart_commands[..2],
        [
            ParsedChartCommand::ChangeScrollSpeed(Complex::new(2.0, 0.0)),
            ParsedChartCommand::ChangeScrollSpeed(Complex::new(0.0, 2.0)),
        ]
    );
}

#[test]
fn test_sudden_and_jposscroll_forms() {
    let text = "#START\n#SUDDEN 2 0.5\n#JPOSSCROLL 0.5 100 0\n#JPOSSCROLL 1 30 40i 1\n1,\n#END";
    let (parsed, diagnostics) = parse_tja(text);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(
        parsed.courses[0].chart_commands[..3],
        [
            ParsedChartCommand::SetSudden { appearance_offset: Time::from_sec(2.0), movement_wait_delay: Time::from_sec(0.5) },
            ParsedChartCommand::SetJposScroll { duration: Time::from_sec(0.5), movement: Complex::new(-100.0, 0.0) },
            ParsedChartCommand::SetJposScroll { duration: Time::from_sec(1.0), movement: Complex::new(30.0, 40.0) },
        ]
    );
}

#[test]
fn test_provenance_comment() {
    let (parsed, _) = parse_tja("// TJADB Project (2022/3/7)\nTITLE:x");
    assert!(parsed.has_provenance_comment);
    assert_eq!(parsed.provenance_date, chrono::NaiveDate::from_ymd_opt(2022, 3, 7));

    let (parsed, _) = parse_tja("// TJADB Project\nTITLE:x");
    assert!(parsed.has_provenance_comment);
    assert_eq!(parsed.provenance_date, None);

    let (parsed, _) = parse_tja("// made by hand\nTITLE:x");
    assert!(!parsed.has_provenance_comment);
}

#[test]
fn test_tokenizer_handles_bom_crlf_and_comments() {
    let tokens = tokenize("\u{FEFF}TITLE:Song\r\n#START // begin\r\n1,\r\n\r\n#END");
    let kinds: Vec<(usize, TokenType)> = tokens.iter().map(|t| (t.line_index, t.token_type)).collect();
    assert_eq!(
        kinds,
        vec![
            (0, TokenType::KeyColonValue),
            (1, TokenType::HashChartCommand),
            (1, TokenType::Comment),
            (2, TokenType::ChartData),
            (3, TokenType::EmptyLine),
            (4, TokenType::HashChartCommand),
        ]
    );
    assert_eq!(tokens[0].key_string, "TITLE");
    assert_eq!(tokens[0].value_string, "Song");
    assert_eq!(tokens[2].value_string, "begin");
}

#[test]
fn test_measure_offsets_from_parse() {
    let (parsed, _) = parse_tja("#START\n#MEASURE 7/8\n1111111,\n#END");
    let course = tja_chart::ir::convert_parsed_to_converted_course(&parsed, &parsed.courses[0]);
    let last = course.measures[0].notes.last().map(|n| n.time_within_measure);
    assert_eq!(last, Some(Beat::from_ticks(6 * 17640 / 7)));
}

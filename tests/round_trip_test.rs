// Text -> measures -> text round trips

use tja_chart::ir::{convert_parsed_to_converted_course_with, import_tja_text, ConvertOptions, ConvertedCourse};
use tja_chart::models::{Beat, TimeSignature};
use tja_chart::parse::{parse_tja, NoteType, ParsedTja};
use tja_chart::renderers::{convert_parsed_to_text, TextEncoding};

const CHART: &str = "\
// TJADB Project (2023/11/02)
TITLE:Round Trip
SUBTITLE:--test
BPM:150.5
WAVE:song.ogg
OFFSET:-1.25
DEMOSTART:12.5

COURSE:Oni
LEVEL:9
BALLOON:10,20
SCOREINIT:1000

#START
#GOGOSTART
1020,
#GOGOEND
#MEASURE 3/4
#SCROLL 1.5
102
#BPMCHANGE 180.25
0,
#DELAY 0.125
#LYRIC hello
5008,
#BARLINEOFF
#SCROLL 2+0.5i
7000
#JPOSSCROLL 1 200 1
8000,
#BARLINEON
#HBSCROLL
12,
,
#END
";

/// Rebuild a whole file from converted courses, the way an editor saves
fn export(courses: &[ConvertedCourse], template: &ParsedTja) -> String {
    let parsed = ParsedTja {
        metadata: template.metadata.clone(),
        courses: courses.iter().map(ConvertedCourse::to_parsed_course).collect(),
        has_provenance_comment: template.has_provenance_comment,
        provenance_date: template.provenance_date,
    };
    convert_parsed_to_text(&parsed, TextEncoding::Utf8)
}

#[test]
fn test_single_measure_keeps_its_subdivision() {
    let (parsed, diagnostics) = parse_tja("#START\n#MEASURE 4/4\n1000\n#END");
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    let options = ConvertOptions { keep_placeholder_notes: true };
    let course = convert_parsed_to_converted_course_with(&parsed, &parsed.courses[0], options);
    assert_eq!(course.measures.len(), 1);

    let measure = &course.measures[0];
    assert_eq!(measure.time_signature, TimeSignature::new(4, 4));
    let notes: Vec<(i32, NoteType)> = measure.notes.iter().map(|n| (n.time_within_measure.ticks, n.note_type)).collect();
    let quarter = Beat::from_bars(1).ticks / 4;
    assert_eq!(
        notes,
        vec![
            (0, NoteType::Don),
            (quarter, NoteType::None),
            (2 * quarter, NoteType::None),
            (3 * quarter, NoteType::None),
        ]
    );

    let text = export(&[course], &parsed);
    assert!(text.contains("\n1000,\n#END\n"), "{}", text);
}

#[test]
fn test_export_is_idempotent() {
    let (parsed, courses, diagnostics) = import_tja_text(CHART, ConvertOptions::default());
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    let first = export(&courses, &parsed);

    let (reparsed, reconverted, diagnostics) = import_tja_text(&first, ConvertOptions::default());
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    let second = export(&reconverted, &reparsed);

    assert_eq!(first, second);
    assert_eq!(reconverted, courses);
}

#[test]
fn test_measures_survive_round_trip() {
    let (parsed, courses, _) = import_tja_text(CHART, ConvertOptions::default());
    let course = &courses[0];
    assert_eq!(course.measures.len(), 6);

    let signatures: Vec<TimeSignature> = course.measures.iter().map(|m| m.time_signature).collect();
    assert_eq!(signatures[0], TimeSignature::new(4, 4));
    assert!(signatures[1..].iter().all(|s| *s == TimeSignature::new(3, 4)));

    // `#BPMCHANGE` between "102" and "0," sits on the fourth of four slots
    let bar = TimeSignature::new(3, 4).duration_per_bar();
    assert_eq!(course.measures[1].tempo_changes[0].time_within_measure, bar * 3 / 4);
    assert_eq!(course.gogo_ranges.len(), 1);

    let text = export(&courses, &parsed);
    assert!(text.starts_with("// TJADB Project (2023/11/02)\nTITLE:Round Trip\nSUBTITLE:--test\nBPM:150.5\n"));
    assert!(text.contains("OFFSET:-1.25\nDEMOSTART:12.5\n"));
    assert!(text.contains("BALLOON:10,20\nSCOREINIT:1000\nSCOREDIFF:\n"));
    // Placeholders were stripped on import, so the first bar comes back on a half-bar grid
    assert!(text.contains("#START\n#GOGOSTART\n#BPMCHANGE 150.5\n12,\n"));
    assert!(text.contains("#MEASURE 3/4\n#GOGOEND\n#SCROLL 1.5\n102\n#BPMCHANGE 180.25\n0,\n"));
    assert!(text.contains("#SCROLL 2+0.5i\n"));
    assert!(text.contains("#JPOSSCROLL 1 200 1\n"));
    assert!(text.contains("#LYRIC hello\n#DELAY 0.125\n5008,\n"));
    assert!(text.ends_with("#HBSCROLL\n12,\n,\n#END\n"));
}

#[test]
fn test_branches_are_dropped_from_measures() {
    let text = "#START\n#BRANCHSTART p,50,80\n#N\n1,\n#E\n2,\n#M\n3,\n#BRANCHEND\n#END";
    let (parsed, courses, diagnostics) = import_tja_text(text, ConvertOptions::default());
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    // The flat parse keeps every branch; the measure view lines them up one after another
    assert_eq!(parsed.courses[0].chart_commands.len(), 11);
    let measures = &courses[0].measures;
    assert_eq!(measures.len(), 4);
    assert_eq!(measures[2].start_time, Beat::from_bars(2));
    assert!(measures[3].is_empty());
}

#[test]
fn test_oversized_signature_is_diagnosed_not_imported() {
    let text = "#START\n#MEASURE 100000/1\n1,\n1,\n1,\n#END";
    let (_, courses, diagnostics) = import_tja_text(text, ConvertOptions::default());

    let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["Time signature '100000/1' exceeds the maximum bar length"]);

    let measures = &courses[0].measures;
    assert_eq!(measures.len(), 3);
    assert!(measures.iter().all(|m| m.time_signature == TimeSignature::new(4, 4)));
    let starts: Vec<i32> = measures.iter().map(|m| m.start_time.ticks).collect();
    assert_eq!(starts, vec![0, Beat::from_bars(1).ticks, Beat::from_bars(2).ticks]);
}

#[test]
fn test_largest_bar_round_trips() {
    let text = "#START\n#MEASURE 256/4\n1,\n12,\n#END";
    let (parsed, courses, diagnostics) = import_tja_text(text, ConvertOptions::default());
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    let measures = &courses[0].measures;
    assert_eq!(measures[1].start_time, Beat::from_bars(64));
    assert_eq!(measures[1].notes[1].time_within_measure, Beat::from_bars(32));
    assert_eq!(courses[0].end_time(), Beat::from_bars(128));

    let exported = export(&courses, &parsed);
    assert!(exported.contains("#MEASURE 256/4\n"), "{}", exported);
    assert!(exported.contains("\n1,\n12,\n"), "{}", exported);
    let (_, reconverted, diagnostics) = import_tja_text(&exported, ConvertOptions::default());
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(reconverted, courses);
}

//! Line splitting and token classification
//!
//! Tokenizing never fails: every line becomes some token, and anything the
//! tokenizer cannot place is left for the parser to report with its line
//! number. Tokens borrow from the source text.

use serde::Serialize;

use super::keys::Key;
use crate::utils::ascii;

const UTF8_BOM: char = '\u{FEFF}';

/// Token types for TJA lines
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenType {
    /// Non-empty line that is none of the below (e.g. note data outside `#START`/`#END`)
    Unknown,
    EmptyLine,
    /// Text after `//`, trimmed
    Comment,
    /// `KEY:VALUE`
    KeyColonValue,
    /// `#COMMAND [value]`
    HashChartCommand,
    /// Note characters between `#START` and `#END`
    ChartData,
}

/// One classified piece of a line
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub token_type: TokenType,
    pub key: Key,
    pub line_index: usize,
    /// Trimmed line with any comment removed
    pub line: &'a str,
    pub key_string: &'a str,
    pub value_string: &'a str,
}

impl<'a> Token<'a> {
    fn new(token_type: TokenType, line_index: usize, line: &'a str) -> Self {
        Self { token_type, key: Key::Unknown, line_index, line, key_string: "", value_string: "" }
    }
}

/// Split file content into lines, dropping a leading BOM and `\r\n` line ends
pub fn split_lines(content: &str) -> Vec<&str> {
    content.strip_prefix(UTF8_BOM).unwrap_or(content).lines().collect()
}

/// Split a line at the first `//` into (prefix, comment suffix including the slashes)
fn split_line_comment(line: &str) -> (&str, &str) {
    match line.find("//") {
        Some(index) => line.split_at(index),
        None => (line, ""),
    }
}

/// Classify every line
///
/// The only state carried across lines is whether the scan is currently
/// between `#START` and `#END`, which decides if bare lines are chart data.
pub fn tokenize_lines<'a>(lines: &[&'a str]) -> Vec<Token<'a>> {
    let mut tokens = Vec::with_capacity(lines.len());
    let mut in_chart = false;

    for (line_index, &full_line) in lines.iter().enumerate() {
        let trimmed = ascii::trim(full_line);
        if trimmed.is_empty() {
            tokens.push(Token::new(TokenType::EmptyLine, line_index, trimmed));
            continue;
        }

        let (prefix, comment) = split_line_comment(trimmed);
        let content = ascii::trim(prefix);

        if !content.is_empty() {
            tokens.push(classify_line(line_index, content, &mut in_chart));
        }

        if !comment.is_empty() {
            let mut token = Token::new(TokenType::Comment, line_index, trimmed);
            token.value_string = ascii::trim(&comment[2..]);
            tokens.push(token);
        }
    }

    log::trace!("tokenized {} lines into {} tokens", lines.len(), tokens.len());
    tokens
}

fn classify_line<'a>(line_index: usize, content: &'a str, in_chart: &mut bool) -> Token<'a> {
    let mut token = Token::new(TokenType::Unknown, line_index, content);

    if let Some(command) = content.strip_prefix('#') {
        token.token_type = TokenType::HashChartCommand;
        let (key, value) = command.split_once(' ').unwrap_or((command, ""));
        token.key_string = key;
        token.value_string = value;
        token.key = Key::from_command(key);

        match token.key {
            Key::Start => *in_chart = true,
            Key::End => *in_chart = false,
            _ => {}
        }
    } else if let Some((key, value)) = content.split_once(':') {
        token.token_type = TokenType::KeyColonValue;
        token.key_string = key;
        token.value_string = value;
        token.key = Key::from_property(key);
    } else {
        token.token_type = if *in_chart { TokenType::ChartData } else { TokenType::Unknown };
        token.value_string = content;
    }

    token
}

/// Split and tokenize in one step
pub fn tokenize(content: &str) -> Vec<Token<'_>> {
    tokenize_lines(&split_lines(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_strips_bom_and_cr() {
        let lines = split_lines("\u{FEFF}TITLE:a\r\nBPM:120\n\n#START");
        assert_eq!(lines, vec!["TITLE:a", "BPM:120", "", "#START"]);
    }

    #[test]
    fn test_key_colon_value() {
        let tokens = tokenize("TITLE: Song : Remix");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::KeyColonValue);
        assert_eq!(tokens[0].key, Key::Title);
        assert_eq!(tokens[0].value_string, " Song : Remix");
    }

    #[test]
    fn test_unknown_property_keeps_type() {
        let tokens = tokenize("FOO:1");
        assert_eq!(tokens[0].token_type, TokenType::KeyColonValue);
        assert_eq!(tokens[0].key, Key::Unknown);
        assert_eq!(tokens[0].key_string, "FOO");
    }

    #[test]
    fn test_hash_commands() {
        let tokens = tokenize("#BPMCHANGE 150\n#GOGOSTART\n#FOOBAR 1");
        assert_eq!(tokens[0].key, Key::BpmChange);
        assert_eq!(tokens[0].value_string, "150");
        assert_eq!(tokens[1].key, Key::GoGoStart);
        assert_eq!(tokens[1].value_string, "");
        assert_eq!(tokens[2].token_type, TokenType::HashChartCommand);
        assert_eq!(tokens[2].key, Key::Unknown);
    }

    #[test]
    fn test_chart_data_only_inside_start_end() {
        let tokens = tokenize("1010,\n#START\n1010,\n#END\n2020,");
        let types: Vec<TokenType> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            types,
            vec![
                TokenType::Unknown,
                TokenType::HashChartCommand,
                TokenType::ChartData,
                TokenType::HashChartCommand,
                TokenType::Unknown,
            ]
        );
    }

    #[test]
    fn test_comments_become_separate_tokens() {
        let tokens = tokenize("#START\n1000, // first bar\n// whole line");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].token_type, TokenType::ChartData);
        assert_eq!(tokens[1].value_string, "1000,");
        assert_eq!(tokens[2].token_type, TokenType::Comment);
        assert_eq!(tokens[2].value_string, "first bar");
        assert_eq!(tokens[2].line_index, 1);
        assert_eq!(tokens[3].token_type, TokenType::Comment);
        assert_eq!(tokens[3].value_string, "whole line");
    }

    #[test]
    fn test_empty_lines() {
        let tokens = tokenize("\n   \t\nTITLE:x");
        assert_eq!(tokens[0].token_type, TokenType::EmptyLine);
        assert_eq!(tokens[1].token_type, TokenType::EmptyLine);
        assert_eq!(tokens[2].line_index, 2);
    }

    #[test]
    fn test_tokenizer_is_total_on_garbage() {
        let garbage = "#\n:\n//\n#START\n\u{3042}\u{3044}\n::::\n#END #END";
        let tokens = tokenize(garbage);
        assert!(!tokens.is_empty());
        assert!(tokens.iter().all(|t| t.line_index < 7));
    }
}

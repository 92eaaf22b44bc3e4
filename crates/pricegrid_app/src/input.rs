//! Line commands read from stdin.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the input with this text and submit it.
    Search(String),
    /// Submit whatever is currently in the input.
    SubmitCurrent,
    /// Zero-based index into the sample list.
    Sample(usize),
    ListSamples,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP_TEXT: &str = "\
Type a product query and press Enter to compare offers.
  <empty line>   submit the current query again
  :samples       list sample queries
  :sample N      put sample N into the query box (Enter submits it)
  :quit          exit";

pub fn parse_line(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Command::SubmitCurrent;
    }

    let Some(command) = line.trim().strip_prefix(':') else {
        return Command::Search(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("quit" | "q"), None, None) => Command::Quit,
        (Some("help" | "h"), None, None) => Command::Help,
        (Some("samples"), None, None) => Command::ListSamples,
        (Some("sample"), Some(number), None) => match number.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Sample(n - 1),
            _ => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_search() {
        assert_eq!(
            parse_line("iphone 15 128gb\n"),
            Command::Search("iphone 15 128gb".to_string())
        );
    }

    #[test]
    fn whitespace_is_passed_through_for_validation() {
        assert_eq!(parse_line("   \n"), Command::Search("   ".to_string()));
    }

    #[test]
    fn empty_line_resubmits() {
        assert_eq!(parse_line("\n"), Command::SubmitCurrent);
        assert_eq!(parse_line("\r\n"), Command::SubmitCurrent);
    }

    #[test]
    fn colon_commands() {
        assert_eq!(parse_line(":quit"), Command::Quit);
        assert_eq!(parse_line(":samples"), Command::ListSamples);
        assert_eq!(parse_line(":sample 2"), Command::Sample(1));
        assert_eq!(parse_line(":help"), Command::Help);
        assert_eq!(
            parse_line(":sample 0"),
            Command::Unknown(":sample 0".to_string())
        );
        assert_eq!(
            parse_line(":frobnicate"),
            Command::Unknown(":frobnicate".to_string())
        );
    }
}

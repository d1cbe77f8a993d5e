//! Operator input parsing.

use washline_alerts::PanelCommand;

/// A line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorInput {
    Panel(PanelCommand),
    Help,
    Quit,
}

pub const HELP: &str = "commands: d <id> (dismiss), m (minimize/expand), h (help), q (quit)";

/// Parse one input line. Returns `None` for blank or unrecognized input.
pub fn parse(line: &str) -> Option<OperatorInput> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?.to_lowercase();
    match verb.as_str() {
        "d" | "dismiss" => {
            let id = parts.next()?;
            Some(OperatorInput::Panel(PanelCommand::Dismiss(id.to_string())))
        }
        "m" | "min" | "minimize" | "expand" => {
            Some(OperatorInput::Panel(PanelCommand::ToggleMinimized))
        }
        "h" | "help" | "?" => Some(OperatorInput::Help),
        "q" | "quit" | "exit" => Some(OperatorInput::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dismiss() {
        assert_eq!(
            parse("d sec-1"),
            Some(OperatorInput::Panel(PanelCommand::Dismiss("sec-1".into())))
        );
        assert_eq!(
            parse("  DISMISS   pay-7 "),
            Some(OperatorInput::Panel(PanelCommand::Dismiss("pay-7".into())))
        );
    }

    #[test]
    fn test_parse_dismiss_without_id() {
        assert_eq!(parse("d"), None);
    }

    #[test]
    fn test_parse_toggle_help_quit() {
        assert_eq!(
            parse("m"),
            Some(OperatorInput::Panel(PanelCommand::ToggleMinimized))
        );
        assert_eq!(parse("?"), Some(OperatorInput::Help));
        assert_eq!(parse("quit"), Some(OperatorInput::Quit));
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("refund everything"), None);
    }
}

//! The three-way input mode selector.

use std::fmt;

/// Where the next goal comes from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Typed at the prompt.
    #[default]
    Type,
    /// Dictated through the microphone.
    Voice,
    /// Picked from the goal file.
    File,
}

impl InputMode {
    pub const ALL: [Self; 3] = [Self::Type, Self::Voice, Self::File];

    /// Label shown in the selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Type => "💬 Type",
            Self::Voice => "🎤 Voice",
            Self::File => "📄 From File",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user picked in the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Mode(InputMode),
    Quit,
    Invalid(String),
}

/// Interpret a selector answer. A blank answer keeps `current`.
pub fn parse_menu_choice(answer: &str, current: InputMode) -> MenuChoice {
    match answer.trim().to_lowercase().as_str() {
        "" => MenuChoice::Mode(current),
        "1" | "t" | "type" => MenuChoice::Mode(InputMode::Type),
        "2" | "v" | "voice" => MenuChoice::Mode(InputMode::Voice),
        "3" | "f" | "file" => MenuChoice::Mode(InputMode::File),
        "q" | "quit" | "exit" => MenuChoice::Quit,
        _ => MenuChoice::Invalid(answer.trim().to_owned()),
    }
}

/// Selector prompt text with the current mode marked.
pub fn menu_prompt(current: InputMode) -> String {
    let options: Vec<String> = InputMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            let marker = if *mode == current { "•" } else { " " };
            format!("{marker}[{}] {mode}", i + 1)
        })
        .collect();
    format!("Choose input method: {}  [q] Quit >", options.join("  "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_names_select_modes() {
        let cur = InputMode::Type;
        assert_eq!(parse_menu_choice("1", cur), MenuChoice::Mode(InputMode::Type));
        assert_eq!(parse_menu_choice(" Voice ", cur), MenuChoice::Mode(InputMode::Voice));
        assert_eq!(parse_menu_choice("f", cur), MenuChoice::Mode(InputMode::File));
        assert_eq!(parse_menu_choice("QUIT", cur), MenuChoice::Quit);
    }

    #[test]
    fn blank_keeps_current_mode() {
        assert_eq!(
            parse_menu_choice("", InputMode::File),
            MenuChoice::Mode(InputMode::File)
        );
    }

    #[test]
    fn unknown_answer_is_invalid() {
        assert_eq!(
            parse_menu_choice("7", InputMode::Type),
            MenuChoice::Invalid("7".to_owned())
        );
    }

    #[test]
    fn menu_marks_current_mode() {
        let menu = menu_prompt(InputMode::Voice);
        assert!(menu.contains("•[2] 🎤 Voice"));
        assert!(menu.contains(" [1] 💬 Type"));
    }
}

use inksac::prelude::*;
use std::env;

pub const SHELL_NAME: &str = "tsh";

const BANNER: &str = r#"
 ████████╗███████╗██╗  ██╗
 ╚══██╔══╝██╔════╝██║  ██║
    ██║   ███████╗███████║
    ██║   ╚════██║██╔══██║
    ██║   ███████║██║  ██║
    ╚═╝   ╚══════╝╚═╝  ╚═╝

 --- use at your own risk ---
"#;

/// Display-only rendering of the banner, the per-iteration header box and
/// interpreter messages. Holds no interpreter state.
#[derive(Debug, Clone, Copy)]
pub struct Prompt {
    color_support: ColorSupport,
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn banner(&self) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return BANNER.to_string();
        }

        let banner_style = Style::builder().foreground(Color::Cyan).bold().build();
        BANNER.style(banner_style).to_string()
    }

    /// The boxed header shown before each prompt: shell name plus the
    /// invoking user on one line, the working directory on the next.
    pub fn header(&self, current_dir: &str) -> String {
        let username = env::var("USER").unwrap_or_else(|_| "Unknown User".to_string());
        let shell_info = format!("{} : {}", SHELL_NAME, username);
        let path_info = format!("workdir : {}", current_dir);

        let width = shell_info
            .chars()
            .count()
            .max(path_info.chars().count())
            + 4;

        let mut header = String::new();
        header.push('┌');
        for _ in 0..width {
            header.push('─');
        }
        header.push_str("┐\n");
        header.push_str(&format!("│ {:<w$} │\n", shell_info, w = width - 2));
        header.push_str(&format!("│ {:<w$} │\n", path_info, w = width - 2));
        header.push('└');
        for _ in 0..width {
            header.push('─');
        }
        header.push('┘');
        header
    }

    pub fn ready(&self) -> &'static str {
        "> "
    }

    pub fn error(&self, message: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return message.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();
        message.style(error_style).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_mentions_no_internals() {
        let prompt = Prompt::new();
        assert!(!prompt.banner().is_empty());
    }

    #[test]
    fn test_header_boxes_shell_name_and_workdir() {
        let prompt = Prompt::new();
        let header = prompt.header("/tmp");

        assert!(header.contains(SHELL_NAME));
        assert!(header.contains("workdir : /tmp"));
        assert!(header.starts_with('┌'));
        assert!(header.ends_with('┘'));
    }

    #[test]
    fn test_header_box_widens_with_long_paths() {
        let prompt = Prompt::new();
        let long_dir = "/some/deeply/nested/working/directory/path";
        let header = prompt.header(long_dir);
        assert!(header.contains(long_dir));
    }

    #[test]
    fn test_ready_prompt() {
        assert_eq!(Prompt::new().ready(), "> ");
    }
}

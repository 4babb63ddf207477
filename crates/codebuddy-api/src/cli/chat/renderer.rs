//! Terminal markdown rendering with syntax-highlighted code blocks.
//!
//! `ChatRenderer` combines `termimad` for prose and `syntect` for fenced code.

use console::style;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use codebuddy_types::chat::Turn;

const THEME: &str = "base16-ocean.dark";

pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.headers[2].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render markdown, highlighting fenced code via syntect and the rest via termimad.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            let is_fence = line.trim_start().starts_with("```");
            if is_fence && !in_code_block {
                in_code_block = true;
                code_lang = line.trim().trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if is_fence {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                output.push_str(&self.skin.term_text(line).to_string());
            }
        }

        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    /// Print an assistant turn: the answer or error, then image and notices.
    pub fn print_turn(&self, turn: &Turn) {
        println!();
        if turn.is_error() {
            println!("  {} {}", style("!").red().bold(), style(&turn.content).red());
        } else {
            println!("{}", self.render_final(&turn.content).trim_end());
        }

        if let Some(image) = &turn.image {
            println!();
            println!("  🖼️  {}", style(&image.caption).dim());
            println!("  {}", style(&image.url).cyan().underlined());
        }
        for notice in &turn.notices {
            println!("  {} {}", style("!").yellow().bold(), style(notice).yellow());
        }
        println!();
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let mut output = String::new();
        output.push_str(&format!("  {}\n", style(format!("--- {lang} ---")).dim()));

        let Some(theme) = self.theme_set.themes.get(THEME) else {
            for line in code.lines() {
                output.push_str(&format!("  {line}\n"));
            }
            return output;
        };

        let mut h = HighlightLines::new(syntax, theme);
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_fence_is_highlighted_separately() {
        let renderer = ChatRenderer::new();
        let out = renderer.render_final("### Example\n```python\nscores = {}\n```\nDone.");
        assert!(out.contains("--- python ---"));
        assert!(out.contains("scores"));
        assert!(out.contains("\x1b[0m"));
        assert!(!out.contains("```"));
    }

    #[test]
    fn test_unclosed_fence_still_rendered() {
        let renderer = ChatRenderer::new();
        let out = renderer.render_final("```\nplain code");
        assert!(out.contains("plain code"));
    }

    #[test]
    fn test_prose_passes_through() {
        let renderer = ChatRenderer::new();
        let out = renderer.render_final("Recursion calls itself.");
        assert!(out.contains("Recursion calls itself."));
    }
}

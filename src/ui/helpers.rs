use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{Category, FontSize};

/// Panel and header color per rhythm class, matching the colors
/// practitioners already associate with each rhythm.
pub(crate) fn category_color(category: Category) -> Color {
    match category {
        Category::Angola => Color::Rgb(0xe8, 0xdf, 0x24),
        Category::SaoBentoPequeno => Color::Rgb(0x03, 0xa5, 0x01),
        Category::SaoBentoGrande => Color::Rgb(0x04, 0x67, 0xb0),
    }
}

/// Countdown rendering for the teleprompter header, `m:ss`.
pub(crate) fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Render lyric text into styled lines, coloring every line that mentions
/// "coro" in the category color so the chorus cue stands out. Uppercasing is
/// applied before the match so the cue is found either way.
pub(crate) fn lyric_lines(lyrics: &str, category: Category, upper_case: bool) -> Vec<Line<'static>> {
    let text = if upper_case {
        lyrics.to_uppercase()
    } else {
        lyrics.to_string()
    };

    text.lines()
        .map(|line| {
            if line.to_lowercase().contains("coro") {
                Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(category_color(category)),
                ))
            } else {
                Line::from(line.to_string())
            }
        })
        .collect()
}

/// Transform panel text for the chosen display size. The terminal cannot
/// grow glyphs, so Large spreads the letters instead.
pub(crate) fn sized_text(text: &str, size: FontSize) -> String {
    match size {
        FontSize::Small | FontSize::Medium => text.to_string(),
        FontSize::Large => {
            let mut spaced = String::with_capacity(text.len() * 2);
            for (index, ch) in text.chars().enumerate() {
                if index > 0 {
                    spaced.push(' ');
                }
                spaced.push(ch);
            }
            spaced
        }
    }
}

/// Emphasis companion to [`sized_text`].
pub(crate) fn sized_modifier(size: FontSize) -> Modifier {
    match size {
        FontSize::Small => Modifier::empty(),
        FontSize::Medium | FontSize::Large => Modifier::BOLD,
    }
}

/// Produce a rectangle centered within `area` that spans the requested
/// percent of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_countdown_pads_seconds() {
        assert_eq!(format_countdown(120), "2:00");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(9), "0:09");
    }

    #[test]
    fn test_lyric_lines_highlight_the_chorus_cue() {
        let lines = lyric_lines("Coro: paranauê\nparaná", Category::Angola, false);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].spans[0].style.fg,
            Some(category_color(Category::Angola))
        );
        assert_eq!(lines[1].spans[0].style.fg, None);
    }

    #[test]
    fn test_lyric_lines_find_the_cue_after_uppercasing() {
        let lines = lyric_lines("coro: vamos embora", Category::SaoBentoGrande, true);
        assert_eq!(lines[0].spans[0].content.as_ref(), "CORO: VAMOS EMBORA");
        assert_eq!(
            lines[0].spans[0].style.fg,
            Some(category_color(Category::SaoBentoGrande))
        );
    }

    #[test]
    fn test_sized_text_spreads_letters_only_for_large() {
        assert_eq!(sized_text("iê", FontSize::Small), "iê");
        assert_eq!(sized_text("iê", FontSize::Medium), "iê");
        assert_eq!(sized_text("iê", FontSize::Large), "i ê");
    }
}

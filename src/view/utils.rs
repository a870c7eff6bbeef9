//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

use crate::model::Theme;

/// Colors for the active theme
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub background: Color,
    pub favorite: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: Color::Green,
                text: Color::White,
                muted: Color::DarkGray,
                background: Color::Black,
                favorite: Color::LightRed,
                warning: Color::Yellow,
                error: Color::Red,
            },
            Theme::Light => Self {
                accent: Color::Blue,
                text: Color::Black,
                muted: Color::Gray,
                background: Color::White,
                favorite: Color::Red,
                warning: Color::Rgb(180, 110, 0),
                error: Color::Red,
            },
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn item(&self, selected: bool, focused: bool) -> Style {
        if selected && focused {
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().fg(self.text).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text)
        }
    }
}

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Calculate width needed for index column (log10(n) + padding)
pub fn calculate_num_width(item_count: usize) -> usize {
    if item_count == 0 {
        2
    } else {
        let digits = (item_count as f64).log10().floor() as usize + 1;
        digits + 1
    }
}

/// Five-star bar for a 0..=5 star count
pub fn star_bar(stars: u8) -> String {
    let filled = usize::from(stars.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

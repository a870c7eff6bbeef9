//! Layout rendering (top bar, sidebar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, Category, LibraryItem, PreferenceSnapshot, Theme, UiState};
use super::utils::{render_scrollable_list, Palette};

pub fn render_top_bar(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    prefs: &PreferenceSnapshot,
    palette: &Palette,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(26), // Language + theme
        ])
        .split(area);

    let focused = ui_state.active_section == ActiveSection::Search;
    let (search_text, search_style) = if ui_state.search_query.is_empty() {
        ("Search movies...", Style::default().fg(palette.muted))
    } else {
        (ui_state.search_query.as_str(), Style::default().fg(palette.text))
    };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" CineScope · Search ")
            .padding(Padding::horizontal(1))
            .border_style(palette.border(focused)),
    );
    frame.render_widget(search, chunks[0]);

    let theme_icon = match prefs.theme {
        Theme::Dark => "☾",
        Theme::Light => "☀",
    };
    let settings = Paragraph::new(format!("🌐 {}  {}", prefs.language, theme_icon))
        .style(Style::default().fg(palette.accent))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" L · T ")
                .border_style(palette.border(false)),
        );
    frame.render_widget(settings, chunks[1]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, ui_state: &UiState, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(LibraryItem::ALL.len() as u16 + 2), // items + borders
            Constraint::Min(0),                                    // Categories
        ])
        .split(area);

    // Library section
    let library_focused = ui_state.active_section == ActiveSection::Library;
    let library_items: Vec<ListItem> = LibraryItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| {
            ListItem::new(item.label())
                .style(palette.item(i == ui_state.library_selected, library_focused))
        })
        .collect();

    let library = List::new(library_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Library ")
            .padding(Padding::horizontal(1))
            .border_style(palette.border(library_focused)),
    );
    frame.render_widget(library, chunks[0]);

    // Categories: "All" first
    let categories_focused = ui_state.active_section == ActiveSection::Categories;
    let labels = std::iter::once("All").chain(Category::ALL.iter().map(|c| c.label()));
    let category_items: Vec<ListItem> = labels
        .enumerate()
        .map(|(i, label)| {
            ListItem::new(label)
                .style(palette.item(i == ui_state.category_selected, categories_focused))
        })
        .collect();

    render_scrollable_list(
        frame,
        chunks[1],
        category_items,
        ui_state.category_selected,
        Block::default()
            .borders(Borders::ALL)
            .title(" Categories ")
            .padding(Padding::horizontal(1))
            .border_style(palette.border(categories_focused)),
    );
}

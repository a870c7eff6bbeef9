//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Theme palette and shared helpers (scrollable lists, formatting)
//! - `layout`: Main layout structure (top bar, sidebar)
//! - `content`: Main content area rendering
//! - `status`: Status bar rendering
//! - `overlays`: Modal overlays (error, notification, help)

mod utils;
mod layout;
mod content;
mod status;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::model::AppSnapshot;
use utils::Palette;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, snapshot: &AppSnapshot) {
        let palette = Palette::for_theme(snapshot.prefs.theme);
        frame.render_widget(
            Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
            frame.area(),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + language/theme
                Constraint::Min(0),    // Main content (sidebar + content)
                Constraint::Length(3), // Status bar
            ])
            .split(frame.area());

        // Top bar: Search + settings
        layout::render_top_bar(frame, chunks[0], &snapshot.ui_state, &snapshot.prefs, &palette);

        // Middle: Sidebar (Library + Categories) and Main Content
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25), // Sidebar
                Constraint::Percentage(75), // Main content
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], &snapshot.ui_state, &palette);
        content::render_main_content(frame, main_chunks[1], snapshot, &palette);

        // Bottom: counts, load state, language and theme
        status::render_status_bar(frame, chunks[2], snapshot, &palette);

        if let Some(notification) = &snapshot.prefs.notification {
            overlays::render_notification(frame, notification, &palette);
        }

        // Error notification overlay (if there's an error)
        if snapshot.ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, &snapshot.ui_state, &palette);
        }

        // Help popup overlay (if open)
        if snapshot.ui_state.show_help_popup {
            overlays::render_help_popup(frame, &palette);
        }
    }
}

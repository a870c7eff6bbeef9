//! Bottom status bar

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::AppSnapshot;
use super::utils::Palette;

pub fn render_status_bar(frame: &mut Frame, area: Rect, snapshot: &AppSnapshot, palette: &Palette) {
    let search = &snapshot.search;
    let status_text = if search.loading {
        format!(" Searching \"{}\"...", search.query)
    } else if snapshot.categories.loading {
        " Loading categories...".to_string()
    } else if !search.is_idle() && search.error.is_none() {
        format!(" {} results for \"{}\"", search.total_results, search.query)
    } else {
        " Ready".to_string()
    };

    let counts = format!(
        " ♥ {}  ⏱ {} ",
        snapshot.prefs.favorites.len(),
        snapshot.prefs.watch_later.len()
    );
    let controls_info = format!(
        " {} | {} | H help ",
        snapshot.prefs.language.native_name(),
        snapshot.prefs.theme.as_str()
    );

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(palette.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(false))
                .title(counts)
                .title_bottom(Line::from(controls_info).right_aligned()),
        );

    frame.render_widget(status, area);
}

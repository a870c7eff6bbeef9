//! Overlay rendering (error popup, notification toast, help popup)

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::{Notification, NotificationKind, UiState};
use super::utils::Palette;

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState, palette: &Palette) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        // Fixed width popup (responsive to screen size)
        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4).max(1) as usize; // account for borders

        // Calculate how many lines the error message will take when wrapped
        let error_line_count = error_msg.chars().count().div_ceil(inner_width) as u16;

        // Height: top border (1) + error lines + bottom border (1)
        let popup_height = (2 + error_line_count.max(1)).min(area.height.saturating_sub(4));

        let popup_area = Rect {
            x: area.width.saturating_sub(popup_width) / 2,
            y: area.height.saturating_sub(popup_height) / 2,
            width: popup_width,
            height: popup_height,
        };

        // Clear the area behind the popup first
        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(palette.error))
            .wrap(ratatui::widgets::Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.error))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(palette.error).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(palette.background)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

/// Toast in the top-right corner, above the content
pub fn render_notification(frame: &mut Frame, notification: &Notification, palette: &Palette) {
    let area = frame.area();
    let color = match notification.kind {
        NotificationKind::Success => palette.accent,
        NotificationKind::Info => palette.warning,
    };

    let width = (notification.message.chars().count() as u16 + 4)
        .min(area.width.saturating_sub(2));
    let popup_area = Rect {
        x: area.width.saturating_sub(width + 1),
        y: 1.min(area.height),
        width,
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, popup_area);
    let toast = Paragraph::new(notification.message.clone())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(palette.background)),
        );
    frame.render_widget(toast, popup_area);
}

pub fn render_help_popup(frame: &mut Frame, palette: &Palette) {
    let area = frame.area();

    // Define keybindings organized by category
    let keybindings = vec![
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("↑ / ↓", "Move selection"),
        ("Enter", "Open / Select"),
        ("Backspace / Esc", "Go back"),
        ("/", "Focus search"),
        ("", ""),
        ("", "── Movies ──"),
        ("F", "Add / remove favorite"),
        ("W", "Add / remove watch later"),
        ("M", "Load more results"),
        ("C", "Clear watch later list"),
        ("", ""),
        ("", "── General ──"),
        ("L", "Next language"),
        ("T", "Toggle dark / light theme"),
        ("H", "Toggle this help"),
        ("Q / Ctrl+C", "Quit"),
    ];

    let popup_width = 62.min(area.width);
    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(4));

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(palette.warning).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(palette.text)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(palette.background)),
        )
        .style(Style::default().bg(palette.background));

    frame.render_widget(help_text, popup_area);
}

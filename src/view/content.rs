//! Main content area rendering (categories, search results, lists, detail)

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, AppSnapshot, ContentView, MovieDetail, MovieSummary};
use super::utils::{calculate_num_width, render_scrollable_list, star_bar, Palette};

pub fn render_main_content(frame: &mut Frame, area: Rect, snapshot: &AppSnapshot, palette: &Palette) {
    let is_focused = snapshot.ui_state.active_section == ActiveSection::MainContent;
    let content_state = &snapshot.content_state;

    if content_state.is_loading {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(palette.warning))
            .block(content_block(" Content ", palette, is_focused));
        frame.render_widget(loading, area);
        return;
    }

    match &content_state.view {
        ContentView::Home { selected_index } => {
            render_home(frame, area, snapshot, *selected_index, is_focused, palette);
        }
        ContentView::SearchResults { selected_index } => {
            render_search_results(frame, area, snapshot, *selected_index, is_focused, palette);
        }
        ContentView::Favorites { selected_index } => {
            let title = format!(" Favorites ({}) ", snapshot.prefs.favorites.len());
            render_movie_list(
                frame,
                area,
                &title,
                &snapshot.prefs.favorites,
                snapshot,
                *selected_index,
                is_focused,
                palette,
                "No favorites yet. Press F on any movie to add it.",
            );
        }
        ContentView::WatchLater { selected_index } => {
            let title = format!(" Watch Later ({}) · C to clear ", snapshot.prefs.watch_later.len());
            render_movie_list(
                frame,
                area,
                &title,
                &snapshot.prefs.watch_later,
                snapshot,
                *selected_index,
                is_focused,
                palette,
                "Your watch later list is empty. Press W on any movie to add it.",
            );
        }
        ContentView::Detail { detail, scroll } => {
            render_detail(frame, area, detail, snapshot, *scroll, is_focused, palette);
        }
    }
}

fn content_block<'a>(title: impl Into<Line<'a>>, palette: &Palette, is_focused: bool) -> Block<'a> {
    let title: Line<'a> = title.into();
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(palette.border(is_focused))
}

fn render_hint(frame: &mut Frame, area: Rect, title: &str, text: &str, palette: &Palette, is_focused: bool) {
    let hint = Paragraph::new(text.to_string())
        .style(Style::default().fg(palette.muted))
        .wrap(Wrap { trim: true })
        .block(content_block(title.to_string(), palette, is_focused));
    frame.render_widget(hint, area);
}

fn movie_item<'a>(
    index: usize,
    num_width: usize,
    movie: &MovieSummary,
    snapshot: &AppSnapshot,
    selected: bool,
    is_focused: bool,
    palette: &Palette,
) -> ListItem<'a> {
    let favorite = if snapshot.is_favorite(&movie.id) { "♥" } else { " " };
    let later = if snapshot.is_in_watch_later(&movie.id) { "⏱" } else { " " };

    let line = Line::from(vec![
        Span::styled(
            format!("{:>width$} ", index + 1, width = num_width),
            Style::default().fg(palette.muted),
        ),
        Span::styled(favorite.to_string(), Style::default().fg(palette.favorite)),
        Span::styled(later.to_string(), Style::default().fg(palette.warning)),
        Span::raw(" "),
        Span::styled(movie.title.clone(), palette.item(selected, is_focused)),
        Span::styled(format!(" ({})", movie.year), Style::default().fg(palette.muted)),
    ]);
    ListItem::new(line)
}

fn render_home(
    frame: &mut Frame,
    area: Rect,
    snapshot: &AppSnapshot,
    selected_index: usize,
    is_focused: bool,
    palette: &Palette,
) {
    let categories = &snapshot.categories;
    let title = if categories.loading {
        " Home · loading categories... ".to_string()
    } else {
        " Home ".to_string()
    };

    let total: usize = categories.visible().map(|(_, movies)| movies.len()).sum();
    if total == 0 {
        let text = if categories.loading {
            "Loading categories..."
        } else {
            "Nothing to show. Type in the search box to find movies."
        };
        render_hint(frame, area, &title, text, palette, is_focused);
        return;
    }

    // Section headers sit between movies, so the list row of the selected
    // movie is offset by the headers above it
    let num_width = calculate_num_width(total);
    let mut items = Vec::new();
    let mut selected_row = 0;
    let mut movie_index = 0;
    for (category, movies) in categories.visible() {
        if movies.is_empty() {
            continue;
        }
        items.push(ListItem::new(Line::from(Span::styled(
            category.label(),
            Style::default().fg(palette.warning).add_modifier(Modifier::BOLD),
        ))));
        for movie in movies {
            let selected = movie_index == selected_index;
            if selected {
                selected_row = items.len();
            }
            items.push(movie_item(movie_index, num_width, movie, snapshot, selected, is_focused, palette));
            movie_index += 1;
        }
    }

    render_scrollable_list(frame, area, items, selected_row, content_block(title, palette, is_focused));
}

fn render_search_results(
    frame: &mut Frame,
    area: Rect,
    snapshot: &AppSnapshot,
    selected_index: usize,
    is_focused: bool,
    palette: &Palette,
) {
    let session = &snapshot.search;

    if session.is_idle() {
        render_hint(
            frame,
            area,
            " Search Results ",
            "Start typing to search for movies.",
            palette,
            is_focused,
        );
        return;
    }

    let title = format!(" Results for \"{}\" ", session.query);
    if let Some(error) = &session.error {
        let message = Paragraph::new(error.clone())
            .style(Style::default().fg(palette.error))
            .wrap(Wrap { trim: true })
            .block(content_block(title, palette, is_focused));
        frame.render_widget(message, area);
        return;
    }
    if session.results.is_empty() {
        let text = if session.loading { "Searching..." } else { "No results." };
        render_hint(frame, area, &title, text, palette, is_focused);
        return;
    }

    let footer = if session.loading {
        " Loading more... ".to_string()
    } else if session.has_more {
        format!(
            " {} of {} · M or ↓ at the end for more ",
            session.results.len(),
            session.total_results
        )
    } else {
        format!(" {} of {} ", session.results.len(), session.total_results)
    };

    let num_width = calculate_num_width(session.results.len());
    let items: Vec<ListItem> = session
        .results
        .iter()
        .enumerate()
        .map(|(i, movie)| movie_item(i, num_width, movie, snapshot, i == selected_index, is_focused, palette))
        .collect();

    let block = content_block(title, palette, is_focused)
        .title_bottom(Line::from(footer).right_aligned());
    render_scrollable_list(frame, area, items, selected_index, block);
}

#[allow(clippy::too_many_arguments)]
fn render_movie_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    movies: &[MovieSummary],
    snapshot: &AppSnapshot,
    selected_index: usize,
    is_focused: bool,
    palette: &Palette,
    empty_text: &str,
) {
    if movies.is_empty() {
        render_hint(frame, area, title, empty_text, palette, is_focused);
        return;
    }

    let num_width = calculate_num_width(movies.len());
    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, movie)| movie_item(i, num_width, movie, snapshot, i == selected_index, is_focused, palette))
        .collect();

    render_scrollable_list(
        frame,
        area,
        items,
        selected_index,
        content_block(title.to_string(), palette, is_focused),
    );
}

fn field_line<'a>(label: &'a str, value: String, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(palette.muted)),
        Span::styled(value, Style::default().fg(palette.text)),
    ])
}

fn render_detail(
    frame: &mut Frame,
    area: Rect,
    detail: &MovieDetail,
    snapshot: &AppSnapshot,
    scroll: u16,
    is_focused: bool,
    palette: &Palette,
) {
    let summary = &detail.summary;
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                summary.title.clone(),
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" ({})", summary.year), Style::default().fg(palette.muted)),
        ]),
        Line::from(vec![
            Span::styled(star_bar(detail.star_rating()), Style::default().fg(palette.warning)),
            Span::raw(format!(
                "  {}/10",
                detail.rating.as_deref().unwrap_or("N/A")
            )),
        ]),
        Line::default(),
    ];

    if let Some(rated) = &detail.rated {
        lines.push(field_line("Rated", rated.clone(), palette));
    }
    if let Some(runtime) = &detail.runtime {
        lines.push(field_line("Runtime", runtime.clone(), palette));
    }
    match (detail.release_date(), &detail.released) {
        (Some(date), _) => lines.push(field_line("Released", date.format("%B %-d, %Y").to_string(), palette)),
        (None, Some(raw)) => lines.push(field_line("Released", raw.clone(), palette)),
        (None, None) => {}
    }
    if !detail.genres.is_empty() {
        lines.push(field_line("Genre", detail.genres.join(" · "), palette));
    }
    if let Some(director) = &detail.director {
        lines.push(field_line("Director", director.clone(), palette));
    }
    if !detail.cast.is_empty() {
        lines.push(field_line("Cast", detail.cast.join(", "), palette));
    }
    if let Some(awards) = &detail.awards {
        lines.push(field_line("Awards", awards.clone(), palette));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        detail.plot.clone().unwrap_or_else(|| "No plot available.".to_string()),
        Style::default().fg(palette.text),
    )));
    lines.push(Line::default());
    lines.push(field_line("Trailer", detail.trailer_search_url(), palette));

    let mut badges = Vec::new();
    if snapshot.is_favorite(&summary.id) {
        badges.push("♥ Favorite");
    }
    if snapshot.is_in_watch_later(&summary.id) {
        badges.push("⏱ Watch later");
    }
    if !badges.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            badges.join("   "),
            Style::default().fg(palette.favorite),
        )));
    }

    let block = content_block(format!(" {} ", summary.title), palette, is_focused)
        .title_bottom(Line::from(" F favorite · W watch later · Esc back ").right_aligned());
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(block);
    frame.render_widget(paragraph, area);
}

//! TUI rendering for the movie browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Wrap};

use crate::state::{BrowserState, InputMode, View};

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search + sort
            Constraint::Min(5),    // results
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);

    match state.view() {
        View::Error(message) => draw_message(frame, chunks[1], &message, Color::Red),
        View::Loading => draw_message(frame, chunks[1], "Loading...", Color::DarkGray),
        View::Cards(cards) => {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            let rows: Vec<Row> = cards
                .iter()
                .map(|card| {
                    Row::new(vec![
                        card.title.clone(),
                        card.release_date.clone(),
                        card.rating.clone(),
                    ])
                })
                .collect();
            draw_table(frame, panes[0], state, rows);
            draw_details(frame, panes[1], state);
        }
    }

    draw_footer(frame, chunks[2], state);
}

/// Draws the search box and current sort.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let search_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let search = Paragraph::new(state.search().to_owned())
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, header_chunks[0]);

    let sort_label = state.sort().map_or("Popular", |s| s.label());
    let sort = Paragraph::new(sort_label).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Sort By: s/S "),
    );
    frame.render_widget(sort, header_chunks[1]);
}

/// Draws a single message in place of the result list.
fn draw_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let paragraph = Paragraph::new(message.to_owned())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Movies "));
    frame.render_widget(paragraph, area);
}

/// Draws the result table.
fn draw_table(frame: &mut Frame, area: Rect, state: &mut BrowserState, rows: Vec<Row>) {
    let header = Row::new(vec!["Title", "Release Date", "Rating"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let widths = [
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(6),
    ];

    let title = if state.is_fetching() {
        " Movies (loading) "
    } else {
        " Movies "
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws the selected movie's details.
fn draw_details(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let Some(card) = state.selected_card() else {
        frame.render_widget(Block::default().borders(Borders::ALL), area);
        return;
    };

    let label = Style::default().fg(Color::Yellow);
    let lines = vec![
        Line::from(vec![Span::styled("Released: ", label), Span::raw(card.release_date)]),
        Line::from(vec![Span::styled("Rating:   ", label), Span::raw(card.rating)]),
        Line::from(vec![
            Span::styled("Poster:   ", label),
            Span::raw(card.poster.to_string()),
        ]),
        Line::from(""),
        Line::from(card.overview),
    ];

    let details = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", card.title)),
    );
    frame.render_widget(details, area);
}

/// Draws the page indicator and key hints.
#[allow(clippy::indexing_slicing)]
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let footer_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(10)])
        .split(area);

    let page = Paragraph::new(page_label(state)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(page, footer_chunks[0]);

    let help_text = match state.input_mode {
        InputMode::Search => Line::from("Type to search | Esc: clear | Enter: done"),
        InputMode::Normal => {
            let pagination = state.pagination();
            Line::from(vec![
                Span::styled("\u{2190}/h: prev", page_hint_style(pagination.has_prev())),
                Span::raw("  "),
                Span::styled("\u{2192}/l: next", page_hint_style(pagination.has_next())),
                Span::raw(
                    "  g/G: first/last  \u{2191}\u{2193}/j/k: move  /: search  s/S: sort  o: poster  r: reload  q: quit",
                ),
            ])
        }
    };
    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, footer_chunks[1]);
}

/// Dims a page hint whose direction has no page.
fn page_hint_style(available: bool) -> Style {
    if available {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Formats the page indicator.
fn page_label(state: &BrowserState) -> String {
    format!("Page {} of {}", state.page(), state.total_pages())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::unreachable)]
    #![allow(clippy::indexing_slicing)]

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::state::Event;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_page_label() {
        // Arrange
        let state = BrowserState::default();

        // Act & Assert
        assert_eq!(page_label(&state), "Page 1 of 1");
    }

    #[test]
    fn test_draw_cards() {
        // Arrange
        let mut state = BrowserState::default();
        let commands = state.update(Event::Init);
        let crate::state::Command::FetchMovies { ticket, .. } = commands[1].clone() else {
            unreachable!();
        };
        let page = serde_json::from_str(include_str!("../../../fixtures/tmdb/movie_popular.json"))
            .unwrap();
        state.update(Event::MoviesLoaded {
            ticket,
            result: Ok(page),
        });
        let mut terminal = Terminal::new(TestBackend::new(140, 20)).unwrap();

        // Act
        terminal.draw(|frame| draw(frame, &mut state)).unwrap();

        // Assert
        let text = buffer_text(&terminal);
        assert!(text.contains("Inside Out 2"));
        assert!(text.contains("Page 1 of 500"));
        assert!(text.contains("(no image)"));
    }

    fn symbol_fg(terminal: &Terminal<TestBackend>, symbol: &str) -> Color {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .find(|cell| cell.symbol() == symbol)
            .map(|cell| cell.fg)
            .unwrap()
    }

    #[test]
    fn test_page_hints_dim_at_bounds() {
        // Arrange
        let mut state = BrowserState::default();
        let commands = state.update(Event::Init);
        let crate::state::Command::FetchMovies { ticket, .. } = commands[1].clone() else {
            unreachable!();
        };
        let page = serde_json::from_str(include_str!("../../../fixtures/tmdb/movie_popular.json"))
            .unwrap();
        state.update(Event::MoviesLoaded {
            ticket,
            result: Ok(page),
        });
        let mut terminal = Terminal::new(TestBackend::new(140, 20)).unwrap();

        // Act
        terminal.draw(|frame| draw(frame, &mut state)).unwrap();
        let first_prev = symbol_fg(&terminal, "\u{2190}");
        let first_next = symbol_fg(&terminal, "\u{2192}");
        state.update(Event::LastPage);
        terminal.draw(|frame| draw(frame, &mut state)).unwrap();
        let last_prev = symbol_fg(&terminal, "\u{2190}");
        let last_next = symbol_fg(&terminal, "\u{2192}");

        // Assert
        assert_eq!(first_prev, Color::DarkGray);
        assert_ne!(first_next, Color::DarkGray);
        assert_ne!(last_prev, Color::DarkGray);
        assert_eq!(last_next, Color::DarkGray);
    }

    #[test]
    fn test_draw_loading() {
        // Arrange
        let mut state = BrowserState::default();
        state.update(Event::Init);
        let mut terminal = Terminal::new(TestBackend::new(140, 20)).unwrap();

        // Act
        terminal.draw(|frame| draw(frame, &mut state)).unwrap();

        // Assert
        assert!(buffer_text(&terminal).contains("Loading..."));
    }
}

//! Equation view: `[first] ± [second] = [result]`

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, OperandBox};
use crate::models::{Movie, ResultSlot, Slot};
use crate::search::SearchStatus;
use crate::ui::Theme;

/// Placeholder shown in an empty result panel
pub const EMPTY_RESULT: &str = "(Select two movies)";

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Theme::text()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Equation
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0]);
    render_equation(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled("MOVIE ", Theme::title()),
        Span::styled("MATHS", Theme::year()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(header, area);
}

fn render_equation(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(5),
            Constraint::Percentage(30),
            Constraint::Length(5),
            Constraint::Min(10),
        ])
        .split(area);

    render_operand(frame, columns[0], app, Slot::First);
    render_glyph(frame, columns[1], app.engine.operator().symbol());
    render_operand(frame, columns[2], app, Slot::Second);
    render_glyph(frame, columns[3], "=");
    render_result(frame, columns[4], app.result());
}

fn render_glyph(frame: &mut Frame, area: Rect, glyph: &str) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let glyph = Paragraph::new(Span::styled(glyph.to_string(), Theme::operator()))
        .alignment(Alignment::Center);
    frame.render_widget(glyph, vertical[1]);
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(format!(" {} ", title), Theme::title()))
}

fn render_operand(frame: &mut Frame, area: Rect, app: &App, slot: Slot) {
    let focused = app.focus == slot;
    let title = match slot {
        Slot::First => "FIRST",
        Slot::Second => "SECOND",
    };
    let block = panel(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.engine.operand(slot) {
        Some(movie) => render_movie(frame, inner, movie),
        None => render_search_box(frame, inner, app.operand_box(slot), focused),
    }
}

fn movie_lines(movie: &Movie) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(movie.title.clone(), Theme::title()))];
    if movie.has_known_year() {
        lines.push(Line::from(Span::styled(movie.year.clone(), Theme::year())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(movie.id.clone(), Theme::dimmed())));
    if let Some(image) = &movie.image {
        lines.push(Line::from(Span::styled(format!("▣ {}", image), Theme::dimmed())));
    }
    lines
}

fn render_movie(frame: &mut Frame, area: Rect, movie: &Movie) {
    let paragraph = Paragraph::new(movie_lines(movie)).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_search_box(frame: &mut Frame, area: Rect, operand_box: &OperandBox, focused: bool) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let value = operand_box.search.value();
    let input = if focused {
        format!("⌕ {}│", value)
    } else if value.is_empty() {
        "⌕ Tab here to search...".to_string()
    } else {
        format!("⌕ {}", value)
    };
    frame.render_widget(Paragraph::new(input).style(Theme::input()), rows[0]);

    let status = match operand_box.search.status() {
        SearchStatus::Searching => Some(Line::from(Span::styled("⟳ Searching...", Theme::loading()))),
        SearchStatus::Failed(msg) => Some(Line::from(Span::styled(format!("✗ {}", msg), Theme::error()))),
        SearchStatus::Idle | SearchStatus::Debouncing => None,
    };

    let mut lines: Vec<Line> = status.into_iter().collect();
    for (i, movie) in operand_box.search.candidates().iter().enumerate() {
        let selected = i == operand_box.list.selected;
        let mut spans = vec![
            Span::styled(if selected { "▸ " } else { "  " }, Theme::keybind()),
            Span::styled(
                movie.title.clone(),
                if selected {
                    Theme::highlighted()
                } else {
                    Theme::text()
                },
            ),
        ];
        if movie.has_known_year() {
            spans.push(Span::styled(format!(" ({})", movie.year), Theme::year()));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), rows[1]);
}

fn render_result(frame: &mut Frame, area: Rect, result: &ResultSlot) {
    let block = panel("RESULT", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = match result {
        ResultSlot::Empty => {
            Paragraph::new(Span::styled(EMPTY_RESULT, Theme::dimmed())).alignment(Alignment::Center)
        }
        ResultSlot::Loading => {
            Paragraph::new(Span::styled("⟳ Computing...", Theme::loading())).alignment(Alignment::Center)
        }
        ResultSlot::Ready(movie) => Paragraph::new(movie_lines(movie)),
        ResultSlot::Failed(msg) => Paragraph::new(vec![
            Line::from(Span::styled("✗ Could not compute", Theme::error())),
            Line::from(Span::styled(msg.clone(), Theme::dimmed())),
            Line::from(""),
            Line::from(Span::styled("Toggle the operator to retry", Theme::dimmed())),
        ]),
    };
    frame.render_widget(paragraph.wrap(Wrap { trim: true }), inner);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(error) = &app.error {
        Line::from(Span::styled(format!(" {}", error), Theme::error()))
    } else {
        let mut spans = Vec::new();
        let hints: &[(&str, &str)] = if app.is_editing() {
            &[("Tab", "switch"), ("↑↓", "choose"), ("↵", "select"), ("^O", "operator"), ("Esc", "quit")]
        } else {
            &[("Tab", "switch"), ("⌫", "clear"), ("o", "operator"), ("+/-", "set"), ("q", "quit")]
        };
        for (key, desc) in hints {
            spans.push(Span::styled(format!(" {} ", key), Theme::keybind()));
            spans.push(Span::styled(format!("{} ", desc), Theme::dimmed()));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_lines_skip_unknown_year() {
        let movie = Movie::new("tt0000001", "Untitled", "NaN");
        let lines = movie_lines(&movie);
        assert_eq!(lines.len(), 3);

        let dated = Movie::new("tt0133093", "The Matrix", "1999")
            .with_image(Some("http://image.tmdb.org/t/p/w300/m.jpg".into()));
        assert_eq!(movie_lines(&dated).len(), 5);
    }
}

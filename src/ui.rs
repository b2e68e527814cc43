use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::render::{LineKind, OutlineLine, Wrapped, ARROW_MARKER, BODY_PAD, CHECK_MARKER};
use crate::style::{glyph_for, tag_style};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let header_height = if app.config.layout.show_header {
        header_lines(app).len() as u16 + 2
    } else {
        0
    };
    let principles_height = if app.document.principles.is_empty() {
        0
    } else {
        (app.document.principles.len() as u16 + 2).min(app.config.layout.principles_height)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(3),
            Constraint::Length(principles_height),
            Constraint::Length(1),
        ])
        .split(frame.area());

    if header_height > 0 {
        draw_header(frame, app, chunks[0]);
    }
    draw_tree(frame, app, chunks[1]);
    if principles_height > 0 {
        draw_principles(frame, app, chunks[2]);
    }
    draw_status_bar(frame, app, chunks[3]);
}

fn header_lines(app: &App) -> Vec<Line<'static>> {
    let document = &app.document;
    let icons = app.config.icons.provider();
    let mut lines = vec![Line::from(Span::styled(
        document.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    if let Some(subtitle) = &document.subtitle {
        lines.push(Line::from(Span::styled(
            subtitle.clone(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(purpose) = &document.purpose {
        lines.push(Line::from(vec![
            Span::styled("Purpose: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(purpose.clone()),
        ]));
    }
    if !document.summary.is_empty() {
        let mut spans = Vec::new();
        for (i, card) in document.summary.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            if let Some(glyph) = glyph_for(icons, card.icon) {
                spans.push(Span::raw(format!("{} ", glyph)));
            }
            spans.push(Span::styled(
                format!("{}: ", card.label),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(card.value.clone()));
        }
        lines.push(Line::from(spans));
    }
    if let Some(notice) = &document.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(header_lines(app)).block(block), area);
}

fn draw_tree(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Procedure ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);

    app.tree_area = inner;
    app.viewport_height = inner.height as usize;
    app.scroll_to_selection();

    if app.document.roots.is_empty() {
        let paragraph = Paragraph::new("Document has no steps")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(paragraph, area);
        return;
    }

    let outline = app.outline();
    let selected = app.selected.as_deref();
    let lines: Vec<Line> = outline
        .iter()
        .skip(app.scroll_offset)
        .take(app.viewport_height)
        .map(|line| {
            let is_selected = line.is_title() && Some(line.node_id) == selected;
            styled_line(line, is_selected)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Turn one outline row into styled spans
fn styled_line<'a>(line: &OutlineLine<'a>, is_selected: bool) -> Line<'a> {
    let style = line.style;
    let mut spans = vec![Span::raw(" ".repeat(line.indent))];
    match style.border_accent {
        Some(accent) => spans.push(Span::styled("▎", Style::default().fg(accent))),
        None => spans.push(Span::raw(" ")),
    }

    match &line.kind {
        LineKind::Header {
            indicator,
            icon,
            title,
        } => {
            let mut header = style.header_style();
            if is_selected {
                header = header.add_modifier(Modifier::REVERSED);
            }
            if let Some(indicator) = indicator {
                spans.push(Span::styled(format!("{} ", indicator.glyph()), header));
            }
            if let Some(icon) = icon {
                spans.push(Span::styled(format!("{} ", icon), header));
            }
            spans.push(Span::styled(*title, header));
        }
        LineKind::Tags(tags) => {
            spans.push(Span::raw(BODY_PAD));
            for (i, tag) in tags.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.push(Span::styled(tag.label(), tag_style(line.node_type, tag.kind)));
            }
        }
        LineKind::Description(text) => {
            spans.push(Span::raw(BODY_PAD));
            spans.push(Span::styled(*text, style.body_style()));
        }
        LineKind::Detail(text) => {
            spans.push(Span::raw(BODY_PAD));
            spans.push(Span::styled(format!("{} ", ARROW_MARKER), style.marker_style()));
            spans.push(Span::styled(*text, style.block_style()));
        }
        LineKind::Checklist(text) => {
            spans.push(Span::raw(BODY_PAD));
            spans.push(Span::styled(format!("{} ", CHECK_MARKER), style.marker_style()));
            spans.push(Span::styled(*text, style.block_style()));
        }
        LineKind::Continuation { text, hang, of } => {
            let (pad, fill, text_style) = match of {
                Wrapped::Title => {
                    let mut header = style.header_style();
                    if is_selected {
                        header = header.add_modifier(Modifier::REVERSED);
                    }
                    (0, *hang, header)
                }
                Wrapped::Description => (*hang, 0, style.body_style()),
                // The tint starts where the marker did
                Wrapped::Block => (
                    BODY_PAD.len(),
                    hang.saturating_sub(BODY_PAD.len()),
                    style.block_style(),
                ),
            };
            spans.push(Span::raw(" ".repeat(pad)));
            spans.push(Span::styled(" ".repeat(fill), text_style));
            spans.push(Span::styled(*text, text_style));
        }
    }

    Line::from(spans)
}

fn draw_principles(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Core Operating Principles ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let lines: Vec<Line> = app
        .document
        .principles
        .iter()
        .map(|principle| {
            Line::from(vec![
                Span::styled(format!("{} ", CHECK_MARKER), Style::default().fg(Color::Green)),
                Span::raw(principle.as_str()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = "↑↓: Navigate | Enter/Space: Expand/Collapse | →←: Open/Close | q: Quit";

    let status_line = Line::from(vec![
        Span::styled(app.status_message.as_str(), Style::default().fg(Color::White)),
        Span::raw(" | "),
        Span::styled(help_text, Style::default().fg(Color::Gray)),
    ]);

    let paragraph = Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use typedrill::session::SessionPhase;
use typedrill::util::{format_time, SpeedRating};

use crate::{App, AppScreen};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            AppScreen::Typing => render_typing(self, area, buf),
            AppScreen::Results => render_results(self, area, buf),
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);
    let hint_style = Style::default()
        .add_modifier(Modifier::DIM | Modifier::ITALIC);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let reference_width = session.reference().width();
    let mut passage_lines =
        ((reference_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;
    if reference_width <= max_chars_per_line as usize {
        passage_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(
                    (area.height.saturating_sub(passage_lines + 4) / 2).max(1),
                ),
                Constraint::Length(3),
                Constraint::Length(passage_lines),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(area);

    let stats = session.stats();
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format_time(session.time_remaining()),
            bold_style,
        )),
        Line::from(Span::styled(
            format!(
                "{} wpm   {}% acc   {:.0}%",
                stats.wpm,
                stats.accuracy,
                session.progress()
            ),
            dim_bold_style,
        )),
    ])
    .alignment(Alignment::Center);
    header.render(chunks[1], buf);

    if session.phase() == SessionPhase::Paused {
        let banner = Paragraph::new(Span::styled(
            "PAUSED (tab to resume)",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        banner.render(chunks[2], buf);
        return;
    }

    let typed: Vec<char> = session.user_input().chars().collect();
    let reference: Vec<char> = session.reference().chars().collect();

    let mut spans: Vec<Span> = Vec::with_capacity(typed.len().max(reference.len()) + 1);
    for (idx, &expected) in reference.iter().enumerate() {
        if idx < typed.len() {
            if typed[idx] == expected {
                spans.push(Span::styled(expected.to_string(), green_bold_style));
            } else {
                // wrong spaces get a visible glyph
                let shown = match typed[idx] {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                };
                spans.push(Span::styled(shown, red_bold_style));
            }
        } else if idx == typed.len() {
            spans.push(Span::styled(
                expected.to_string(),
                underlined_dim_bold_style,
            ));
        } else {
            spans.push(Span::styled(expected.to_string(), dim_bold_style));
        }
    }
    for &c in typed.iter().skip(reference.len()) {
        let shown = match c {
            ' ' => "·".to_owned(),
            c => c.to_string(),
        };
        spans.push(Span::styled(shown, red_bold_style));
    }

    let passage = Paragraph::new(Line::from(spans))
        .alignment(if passage_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    passage.render(chunks[2], buf);

    if session.phase() == SessionPhase::Idle {
        let hint = Paragraph::new(Span::styled(
            "start typing to begin   tab pause   esc quit",
            hint_style,
        ))
        .alignment(Alignment::Center);
        hint.render(chunks[3], buf);
    }
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let stats = session.stats();

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let dim_italic_style = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),    // wpm chart
                Constraint::Length(1), // stats
                Constraint::Length(1), // rating
                Constraint::Length(1), // author
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    let tuples: Vec<(f64, f64)> = session.wpm_series().iter().map(|p| (p.t, p.wpm)).collect();
    let (overall_duration, highest_wpm) = chart_bounds(&tuples, session.duration_secs());

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&tuples)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(format_label(overall_duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(format_label(highest_wpm), bold_style),
                ]),
        );
    chart.render(chunks[0], buf);

    let summary = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {} errors   {}",
            stats.wpm,
            stats.accuracy,
            stats.errors,
            format_time(stats.time_elapsed_secs)
        ),
        bold_style,
    ))
    .alignment(Alignment::Center);
    summary.render(chunks[1], buf);

    let rating = SpeedRating::from_wpm(stats.wpm);
    let rating_line = Paragraph::new(Span::styled(
        format!("{}: {}", rating.label(), rating.blurb()),
        italic_style,
    ))
    .alignment(Alignment::Center);
    rating_line.render(chunks[2], buf);

    let author = Paragraph::new(Span::styled(
        format!("passage by {}", app.passage.author),
        dim_italic_style,
    ))
    .alignment(Alignment::Center);
    author.render(chunks[3], buf);

    let legend = Paragraph::new(Span::styled("(r)etry (n)ew (esc)ape", italic_style))
        .alignment(Alignment::Center);
    legend.render(chunks[5], buf);
}

/// X (seconds) and Y (WPM) bounds for the results chart
fn chart_bounds(points: &[(f64, f64)], duration_secs: u64) -> (f64, f64) {
    let mut highest_wpm: f64 = 0.0;
    for &(_, wpm) in points {
        if wpm > highest_wpm {
            highest_wpm = wpm;
        }
    }

    let mut overall_duration = match points.last() {
        Some(&(t, _)) => t,
        None => duration_secs as f64,
    };
    if overall_duration < 1.0 {
        overall_duration = 1.0;
    }

    (overall_duration, highest_wpm.round())
}

fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use super::app::App;
use crate::fretboard::{Fingering, MAX_FRET, Mode, Tuning};
use crate::types::note::pitch_name;

/// Render the TUI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title
            Constraint::Length(3),  // Mode
            Constraint::Min(6),     // Phrase
            Constraint::Length(8),  // Fretboard (6 strings + 2 borders)
            Constraint::Length(3),  // Help
        ])
        .split(frame.size());

    render_title(frame, chunks[0], app);
    render_mode(frame, chunks[1], app);
    render_phrase(frame, chunks[2], app);
    render_fretboard(frame, chunks[3], app);
    render_help(frame, chunks[4]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Render title bar
fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = Paragraph::new(format!("Fretwise - {}", app.device_name))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(title, area);
}

fn render_mode(frame: &mut Frame, area: Rect, app: &App) {
    let mode_text = match app.mode {
        Mode::Automatic => "Position: Auto".to_string(),
        Mode::Fixed(position) => {
            let (min, max) = position.fret_range();
            format!("Position: {} (frets {}-{})", position, min, max)
        }
    };

    let line = Line::from(vec![
        Span::styled(
            mode_text,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("    Octave shift: {:+}", app.octave_shift)),
    ]);

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Render the recent phrase, newest last
fn render_phrase(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .phrase
        .iter()
        .zip(app.fingerings.iter())
        .enumerate()
        .map(|(i, (&pitch, fingering))| {
            let name = pitch_name(pitch, app.octave_shift);
            match fingering {
                Some(f) => {
                    let style = if i + 1 == app.phrase.len() {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(format!(
                        "{:>3}  {:<5} string {}  fret {:>2}  finger {}  Pos. {}",
                        i + 1,
                        name,
                        f.string(),
                        f.fret(),
                        f.finger,
                        f.position
                    ))
                    .style(style)
                }
                None => ListItem::new(format!("{:>3}  {:<5} not playable", i + 1, name))
                    .style(Style::default().fg(Color::DarkGray)),
            }
        })
        .collect();

    let list = List::new(items).block(Block::default().title("Phrase").borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn render_fretboard(frame: &mut Frame, area: Rect, app: &App) {
    let latest = app.latest().and_then(|(_, f)| f);
    let lines: Vec<Line> = fretboard_rows(app.resolver.tuning(), latest.as_ref())
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let is_latest = latest.is_some_and(|f| usize::from(f.string()) == i + 1);
            let style = if is_latest {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(row, style))
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Fretboard").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Text rows for the fretboard, string 1 on top.
/// The fingered note is drawn as its finger number, `o` marks an open string.
pub fn fretboard_rows(tuning: &Tuning, highlight: Option<&Fingering>) -> Vec<String> {
    tuning
        .strings()
        .iter()
        .enumerate()
        .map(|(i, &open)| {
            let string = i as u8 + 1;
            let here = highlight.filter(|f| f.string() == string);

            let mut row = format!("{:<4}", pitch_name(open, 0));
            row.push(match here {
                Some(f) if f.fret() == 0 => 'o',
                _ => ' ',
            });
            row.push_str("||");

            for fret in 1..=MAX_FRET as u8 {
                let marker = match here {
                    Some(f) if f.fret() == fret => finger_char(f.finger),
                    _ => '-',
                };
                row.push('-');
                row.push(marker);
                row.push('-');
                row.push('|');
            }
            row
        })
        .collect()
}

fn finger_char(finger: u8) -> char {
    char::from_digit(u32::from(finger), 10).unwrap_or('+')
}

/// Render help text
fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("0: Auto  1-5: Position I-V  |  +/-: Octave  |  c: Clear  |  ?: Help  |  q: Quit")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));

    frame.render_widget(help, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.size());
    let text = vec![
        Line::from("Play notes on the MIDI input to see their fingering."),
        Line::from(""),
        Line::from("0      automatic position per note"),
        Line::from("1-5    keep the hand in position I-V"),
        Line::from("+ / -  shift displayed octave"),
        Line::from("c      clear the phrase"),
        Line::from("q      quit"),
        Line::from(""),
        Line::from("Fingers: o = open, 1 = index .. 4 = little"),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

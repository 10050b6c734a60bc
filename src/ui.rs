use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::controller::{Notice, Screen};
use crate::models::{Board, BoardId};

const COLOR_SAND: Color = Color::Rgb(0xC4, 0xCD, 0xFF);
const COLOR_SLATE: Color = Color::Rgb(0x72, 0x7C, 0xB0);
const COLOR_INK: Color = Color::Rgb(0x36, 0x38, 0x47);
const COLOR_WARN: Color = Color::Rgb(0xF0, 0x8A, 0x8A);

const ASCII_BANNER: [&str; 6] = [
    "██████╗ ███████╗███████╗██╗  ██╗███████╗",
    "██╔══██╗██╔════╝██╔════╝██║ ██╔╝██╔════╝",
    "██║  ██║█████╗  ███████╗█████╔╝ ███████╗",
    "██║  ██║██╔══╝  ╚════██║██╔═██╗ ╚════██║",
    "██████╔╝███████╗███████║██║  ██╗███████║",
    "╚═════╝ ╚══════╝╚══════╝╚═╝  ╚═╝╚══════╝",
];

#[derive(Clone, Copy)]
struct OverlayTheme {
    border: Color,
    title: Color,
    text: Color,
    bg: Color,
}

fn themed_overlay(overlay: &Overlay) -> OverlayTheme {
    match overlay {
        Overlay::Prompt { .. } => OverlayTheme {
            border: COLOR_SLATE,
            title: COLOR_SAND,
            text: COLOR_SAND,
            bg: Color::Rgb(0x1C, 0x1E, 0x2A),
        },
        Overlay::ConfirmDelete(_) => OverlayTheme {
            border: Color::Rgb(0xB3, 0x6B, 0x6B),
            title: Color::Rgb(0xF0, 0xC8, 0xC8),
            text: COLOR_SAND,
            bg: Color::Rgb(0x2A, 0x18, 0x1C),
        },
        Overlay::ConfirmQuit => OverlayTheme {
            border: COLOR_SLATE,
            title: Color::Rgb(0xE0, 0xE4, 0xFF),
            text: COLOR_SAND,
            bg: Color::Rgb(0x20, 0x22, 0x30),
        },
    }
}

/// A password field as the renderer sees it: already masked if hidden.
pub struct FieldView {
    pub label: &'static str,
    pub display: String,
    pub focused: bool,
}

pub enum Overlay {
    Prompt { title: &'static str, input: String },
    ConfirmDelete(String),
    ConfirmQuit,
}

impl Overlay {
    fn title(&self) -> &str {
        match self {
            Overlay::Prompt { title, .. } => title,
            Overlay::ConfirmDelete(_) => "Confirm delete",
            Overlay::ConfirmQuit => "Confirm quit",
        }
    }

    fn lines(&self) -> Vec<String> {
        match self {
            Overlay::Prompt { title, input } => vec![
                (*title).to_string(),
                String::new(),
                format!("> {input}"),
                String::new(),
                "Enter accepts | Esc cancels".to_string(),
            ],
            Overlay::ConfirmDelete(name) => vec![
                format!("Delete desk '{name}'?"),
                String::new(),
                "[y] Yes   [n] No".to_string(),
            ],
            Overlay::ConfirmQuit => vec![
                "Quit?".to_string(),
                String::new(),
                "[y] Yes   [n] No".to_string(),
            ],
        }
    }
}

pub struct View<'a> {
    pub screen: Screen,
    pub notice: Option<Notice>,
    pub fields: Vec<FieldView>,
    pub fields_visible: bool,
    pub desks: &'a [Board],
    pub active: Option<BoardId>,
    pub status: String,
    pub strength: Option<StatusStrength>,
    pub overlay: Option<Overlay>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusStrength {
    pub label: &'static str,
    pub level: u8,
}

/// Rough strength of a candidate password for the footer meter.
pub fn classify_password_strength(password: &str) -> StatusStrength {
    let len = password.chars().count();
    let classes = [
        password.chars().any(|c| c.is_lowercase()),
        password.chars().any(|c| c.is_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
    ];
    let variety = classes.iter().filter(|present| **present).count();
    let length_score = [4usize, 8, 12, 16].iter().filter(|n| len >= **n).count();

    let (label, level) = match variety + length_score {
        _ if len < 4 => ("Weak", 1),
        0..=3 => ("Weak", 1),
        4..=5 => ("Average", 2),
        6..=7 => ("Strong", 3),
        _ => ("Excellent", 4),
    };
    StatusStrength { label, level }
}

pub fn mask(text: &str, visible: bool) -> String {
    if visible {
        text.to_string()
    } else {
        "•".repeat(text.chars().count())
    }
}

fn strength_color(level: u8) -> Color {
    match level.clamp(1, 4) {
        1 => Color::Red,
        2 => Color::Yellow,
        3 => Color::Green,
        _ => Color::Cyan,
    }
}

fn centered_overlay_area(frame_size: Rect, lines: &[String]) -> Rect {
    let maxw = lines.iter().map(|s| s.chars().count()).max().unwrap_or(0) as u16 + 4;
    let maxh = lines.len() as u16 + 2;
    Rect::new(
        (frame_size.width.saturating_sub(maxw)) / 2,
        (frame_size.height.saturating_sub(maxh)) / 2,
        maxw.min(frame_size.width),
        maxh.min(frame_size.height),
    )
}

fn render_overlay(f: &mut Frame<'_>, overlay: &Overlay) {
    let lines = overlay.lines();
    let area = centered_overlay_area(f.size(), &lines);
    let theme = themed_overlay(overlay);
    let paragraph = Paragraph::new(
        lines
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect::<Vec<Line>>(),
    )
    .style(Style::default().fg(theme.text).bg(theme.bg))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                overlay.title().to_string(),
                Style::default()
                    .fg(theme.title)
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(
                Style::default()
                    .fg(theme.border)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().bg(theme.bg)),
    );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

pub fn draw(f: &mut Frame<'_>, view: &View) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    match view.screen {
        Screen::NewUser => draw_welcome(f, layout[0]),
        Screen::Auth | Screen::SetPassword | Screen::ChangePassword => {
            draw_password_screen(f, layout[0], view)
        }
        Screen::Desks => draw_desks(f, layout[0], view),
        Screen::Card => draw_card(f, layout[0], view),
    }

    draw_footer(f, layout[1], view);

    if let Some(overlay) = &view.overlay {
        render_overlay(f, overlay);
    }
}

fn banner() -> Paragraph<'static> {
    let lines: Vec<Line> = ASCII_BANNER
        .iter()
        .map(|l| {
            let spans: Vec<Span> = l
                .chars()
                .map(|ch| {
                    let color = match ch {
                        '█' => COLOR_SAND,
                        _ => COLOR_SLATE,
                    };
                    Span::styled(
                        ch.to_string(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    Paragraph::new(lines).alignment(Alignment::Center)
}

fn draw_welcome(f: &mut Frame<'_>, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(area);
    f.render_widget(banner(), layout[1]);

    let text = vec![
        Line::from(Span::styled(
            "Welcome! Protect your desks with a password?",
            Style::default().fg(COLOR_SAND).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("[s] Set a password"),
        Line::from("[k] Continue without one"),
    ];
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center), layout[2]);
}

fn draw_password_screen(f: &mut Frame<'_>, area: Rect, view: &View) {
    let field_rows = view.fields.len() as u16 * 3;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(8),
            Constraint::Length(2),
            Constraint::Length(field_rows),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);
    f.render_widget(banner(), layout[1]);

    let heading = match view.screen {
        Screen::Auth => "Enter your password",
        Screen::SetPassword => "Choose a password",
        _ => "Change your password",
    };
    f.render_widget(
        Paragraph::new(heading)
            .alignment(Alignment::Center)
            .style(Style::default().fg(COLOR_SAND).add_modifier(Modifier::BOLD)),
        layout[2],
    );

    let box_width: u16 = 44;
    let fields_area = layout[3];
    let w = box_width.min(fields_area.width);
    let x = fields_area.x + fields_area.width.saturating_sub(w) / 2;
    for (idx, field) in view.fields.iter().enumerate() {
        let rect = Rect::new(x, fields_area.y + idx as u16 * 3, w, 3);
        let border = if field.focused {
            Style::default().fg(COLOR_SAND).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_SLATE)
        };
        let visibility = if view.fields_visible { "visible" } else { "hidden" };
        let input = Paragraph::new(Span::styled(
            format!("> {}", field.display),
            Style::default().fg(COLOR_SAND),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!("{} ({visibility})", field.label)),
        );
        if rect.bottom() <= fields_area.bottom() {
            f.render_widget(input, rect);
        }
    }

    if let Some(notice) = view.notice {
        f.render_widget(
            Paragraph::new(notice.to_string())
                .alignment(Alignment::Center)
                .style(Style::default().fg(COLOR_WARN).add_modifier(Modifier::BOLD)),
            layout[4],
        );
    }
}

fn draw_desks(f: &mut Frame<'_>, area: Rect, view: &View) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let items: Vec<ListItem> = if view.desks.is_empty() {
        vec![ListItem::new("No desks")]
    } else {
        view.desks
            .iter()
            .map(|d| ListItem::new(d.name.clone()))
            .collect()
    };
    let mut list_state = ListState::default();
    list_state.select(
        view.active
            .and_then(|id| view.desks.iter().position(|d| d.id == id)),
    );
    let list = List::new(items)
        .block(Block::default().title("Desks").borders(Borders::ALL))
        .highlight_symbol("▶ ")
        .highlight_style(
            Style::default()
                .fg(COLOR_SAND)
                .bg(COLOR_SLATE)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, body[0], &mut list_state);

    let active = view
        .active
        .and_then(|id| view.desks.iter().find(|d| d.id == id));
    let detail_text = match active {
        Some(desk) => format!(
            "Name: {}\nId: {}\n\nEnter opens the desk, r renames it, d deletes it.",
            desk.name, desk.id
        ),
        None => "No desk selected. Press n to create one.".to_string(),
    };
    let title = active.map_or("Desk".to_string(), |d| d.name.clone());
    let detail = Paragraph::new(detail_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(detail, body[1]);
}

fn draw_card(f: &mut Frame<'_>, area: Rect, view: &View) {
    let name = view
        .active
        .and_then(|id| view.desks.iter().find(|d| d.id == id))
        .map_or("Desk", |d| d.name.as_str());
    let body = Paragraph::new("This desk has no cards.")
        .style(Style::default().fg(COLOR_SAND).bg(COLOR_INK))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(
                    name.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL),
        );
    f.render_widget(body, area);
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, view: &View) {
    let line = if let Some(strength) = &view.strength {
        let color = strength_color(strength.level);
        let total = 12usize;
        let filled = (strength.level.clamp(1, 4) as usize * 3).min(total);
        Line::from(vec![
            Span::raw("Strength: "),
            Span::styled(
                strength.label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ["),
            Span::styled("=".repeat(filled), Style::default().fg(color)),
            Span::styled(
                "-".repeat(total - filled),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("]  "),
            Span::raw(view.status.clone()),
        ])
    } else {
        Line::from(view.status.clone())
    };
    let footer = Paragraph::new(line).block(
        Block::default()
            .title(view.screen.title())
            .borders(Borders::ALL),
    );
    f.render_widget(footer, area);
}

use crate::client::{
    AppSnapshot,
    Screen,
};
use color_eyre::eyre::{
    Result,
    eyre,
};
use crossterm::{
    event::{
        Event,
        EventStream,
        KeyCode,
        KeyEvent,
        KeyEventKind,
        KeyModifiers,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
    },
};
use futures::StreamExt;
use prize_wheel::player::{
    PlayerField,
    PlayerInfo,
    validate,
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use std::{
    f64::consts::TAU,
    io::{
        Stdout,
        stdout,
    },
};
use unicode_width::{
    UnicodeWidthChar,
    UnicodeWidthStr,
};
use wheel_core::{
    ResolvedOption,
    Wheel,
    slice_under_pointer,
};

const MAX_FIELD_CHARS: usize = 64;

const SLICE_COLORS: [Color; 8] = [
    Color::LightRed,
    Color::LightYellow,
    Color::LightGreen,
    Color::LightCyan,
    Color::LightBlue,
    Color::LightMagenta,
    Color::Yellow,
    Color::Cyan,
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserEvent {
    Quit,
    Spin,
    SubmitPlayer(PlayerInfo),
    DismissResult,
    ToggleLocale,
    Redraw,
}

pub type InputEventReceiver = EventStream;

pub fn input_event_stream() -> InputEventReceiver {
    EventStream::new()
}

pub async fn next_raw_event(events: &mut InputEventReceiver) -> Result<Event> {
    match events.next().await {
        Some(event) => Ok(event?),
        None => Err(eyre!("terminal input stream closed")),
    }
}

#[derive(Debug, Default)]
pub struct UiState {
    screen: Screen,
    form: FormState,
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
}

#[derive(Clone, Debug)]
struct FormState {
    email: String,
    phone: String,
    focus: PlayerField,
    invalid: Vec<PlayerField>,
}

impl Default for FormState {
    fn default() -> Self {
        FormState {
            email: String::new(),
            phone: String::new(),
            focus: PlayerField::Email,
            invalid: Vec::new(),
        }
    }
}

impl FormState {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            PlayerField::Email => &mut self.email,
            PlayerField::Phone => &mut self.phone,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            PlayerField::Email => PlayerField::Phone,
            PlayerField::Phone => PlayerField::Email,
        };
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    Ok(())
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    // input handling follows whatever screen was last shown
    state.screen = snap.screen.clone();
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

pub fn interpret_event(state: &mut UiState, event: Event) -> Option<UserEvent> {
    let key = match event {
        Event::Key(key) => key,
        Event::Resize(..) => return Some(UserEvent::Redraw),
        _ => return None,
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }
    // raw mode swallows SIGINT
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UserEvent::Quit);
    }
    // letters are text on the form, so the language key there is F2
    if key.code == KeyCode::F(2) {
        return Some(UserEvent::ToggleLocale);
    }
    match state.screen {
        Screen::Form => interpret_form_key(&mut state.form, key),
        Screen::Wheel => match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(UserEvent::Spin),
            KeyCode::Char('l') => Some(UserEvent::ToggleLocale),
            KeyCode::Char('q') | KeyCode::Esc => Some(UserEvent::Quit),
            _ => None,
        },
        Screen::Result { .. } => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(UserEvent::DismissResult),
            KeyCode::Char('l') => Some(UserEvent::ToggleLocale),
            KeyCode::Char('q') | KeyCode::Esc => Some(UserEvent::Quit),
            _ => None,
        },
    }
}

fn interpret_form_key(form: &mut FormState, key: KeyEvent) -> Option<UserEvent> {
    match key.code {
        KeyCode::Esc => Some(UserEvent::Quit),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            form.toggle_focus();
            Some(UserEvent::Redraw)
        }
        KeyCode::Backspace => {
            form.focused_mut().pop();
            Some(UserEvent::Redraw)
        }
        KeyCode::Char(c) => {
            let focus = form.focus;
            let field = form.focused_mut();
            if field.chars().count() < MAX_FIELD_CHARS {
                field.push(c);
            }
            form.invalid.retain(|f| *f != focus);
            Some(UserEvent::Redraw)
        }
        KeyCode::Enter => match validate(&form.email, &form.phone) {
            Ok(player) => {
                *form = FormState::default();
                Some(UserEvent::SubmitPlayer(player))
            }
            Err(invalid) => {
                tracing::debug!(?invalid, "player form rejected");
                form.invalid = invalid;
                Some(UserEvent::Redraw)
            }
        },
        _ => None,
    }
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    f.render_widget(Clear, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(5), // pointer + strip
            Constraint::Min(4),    // chance table
            Constraint::Length(3), // status + help
        ])
        .split(f.area());

    draw_title(f, chunks[0], snap);
    match &snap.wheel {
        Some(wheel) => {
            draw_wheel(f, chunks[1], wheel.options(), snap.rotation);
            draw_chances(f, chunks[2], wheel, snap);
        }
        None => draw_loading(f, chunks[1].union(chunks[2]), snap),
    }
    draw_status(f, chunks[3], snap);

    match &snap.screen {
        Screen::Form => draw_form(f, &state.form, snap),
        Screen::Result { winner } => draw_result(f, winner, snap),
        Screen::Wheel => {}
    }
}

fn draw_title(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            snap.strings.app_title,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{}]", snap.locale.code()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn draw_loading(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let loading = Paragraph::new(Span::styled(
        snap.strings.loading,
        Style::default().fg(Color::Yellow),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(loading, area);
}

fn draw_wheel(f: &mut Frame, area: Rect, options: &[ResolvedOption], rotation: f64) {
    let area = area.inner(Margin::new(1, 0));
    let width = area.width as usize;
    if width == 0 {
        return;
    }
    let pointer_col = width / 2;
    let indices = strip_indices(options, rotation, width);

    let marker = |glyph: &'static str| {
        Line::from(vec![
            Span::raw(" ".repeat(pointer_col)),
            Span::styled(glyph, Style::default().fg(Color::White).bold()),
        ])
    };
    let mut blank = Vec::new();
    let mut labelled = Vec::new();
    for (index, start, len) in runs(&indices) {
        let mut style = Style::default().bg(slice_color(index)).fg(Color::Black);
        if (start..start + len).contains(&pointer_col) {
            style = style.add_modifier(Modifier::BOLD);
        }
        blank.push(Span::styled(" ".repeat(len), style));
        labelled.push(Span::styled(fit_label(&options[index].label, len), style));
    }

    let lines = vec![
        marker("▼"),
        Line::from(blank.clone()),
        Line::from(labelled),
        Line::from(blank),
        marker("▲"),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_chances(f: &mut Frame, area: Rect, wheel: &Wheel, snap: &AppSnapshot) {
    let options = wheel.options();
    let total_ratio = wheel.total_ratio();
    let under_pointer = slice_under_pointer(options, snap.rotation);
    let rows: Vec<Row> = options
        .iter()
        .enumerate()
        .map(|(index, opt)| {
            let share = opt.ratio / total_ratio * 100.0;
            let chance = if opt.is_auto() {
                format!("{:.2}% *", opt.resolved_chance)
            } else {
                format!("{:.2}%", opt.resolved_chance)
            };
            let style = if index == under_pointer {
                Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(Span::styled("■", Style::default().fg(slice_color(index)))),
                Cell::from(opt.label.clone()),
                Cell::from(chance),
                Cell::from(format!("{share:.2}%")),
            ])
            .style(style)
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(snap.strings.chances_title),
    );
    f.render_widget(table, area);
}

fn draw_status(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let (action, help) = match snap.screen {
        Screen::Form => (snap.strings.claim_prize_title, snap.strings.form_help),
        Screen::Wheel if snap.spinning => (snap.strings.spinning, snap.strings.wheel_help),
        Screen::Wheel => (snap.strings.spin, snap.strings.wheel_help),
        Screen::Result { .. } => (snap.strings.congratulations, snap.strings.result_help),
    };
    let line = Line::from(vec![
        Span::styled(action, Style::default().fg(Color::Yellow).bold()),
        Span::raw("  "),
        Span::raw(snap.status.as_str()),
        Span::raw("  "),
        Span::styled(help, Style::default().fg(Color::DarkGray)),
    ]);
    let status = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

fn draw_form(f: &mut Frame, form: &FormState, snap: &AppSnapshot) {
    let strings = snap.strings;
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let field_line = |field: PlayerField, value: &str, placeholder: &'static str| {
        let focused = form.focus == field;
        let prefix = if focused { "> " } else { "  " };
        let value = if value.is_empty() {
            Span::styled(placeholder, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(value.to_string())
        };
        let mut spans = vec![Span::raw(prefix), value];
        if focused {
            spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
        }
        Line::from(spans)
    };
    let error_line = |field: PlayerField, message: &'static str| {
        if form.invalid.contains(&field) {
            Line::from(Span::styled(message, Style::default().fg(Color::Red)))
        } else {
            Line::default()
        }
    };

    let lines = vec![
        Line::from(strings.form_subtitle),
        Line::default(),
        Line::from(Span::styled(strings.email_label, Style::default().bold())),
        field_line(PlayerField::Email, &form.email, strings.email_placeholder),
        error_line(PlayerField::Email, strings.email_error),
        Line::from(Span::styled(strings.phone_label, Style::default().bold())),
        field_line(PlayerField::Phone, &form.phone, strings.phone_placeholder),
        error_line(PlayerField::Phone, strings.phone_error),
        Line::default(),
        Line::from(Span::styled(
            format!("[ {} ]", strings.submit_info),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ))
        .alignment(Alignment::Center),
    ];
    let form = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(strings.claim_prize_title),
    );
    f.render_widget(form, area);
}

fn draw_result(f: &mut Frame, winner: &str, snap: &AppSnapshot) {
    let strings = snap.strings;
    let area = centered_rect(50, 40, f.area());
    f.render_widget(Clear, area);
    let lines = vec![
        Line::from(Span::styled(
            strings.congratulations,
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::default(),
        Line::from(strings.you_won),
        Line::from(Span::styled(
            winner.to_string(),
            Style::default().fg(Color::LightGreen).bold(),
        )),
        Line::default(),
        Line::from(strings.result_followup),
    ];
    let result = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(result, area);
}

fn slice_color(index: usize) -> Color {
    SLICE_COLORS[index % SLICE_COLORS.len()]
}

/// Slice index for each column of a strip that unrolls the whole wheel,
/// with the pointer over the middle column.
fn strip_indices(options: &[ResolvedOption], rotation: f64, width: usize) -> Vec<usize> {
    let pointer_col = width / 2;
    (0..width)
        .map(|col| {
            let offset = (col as f64 - pointer_col as f64) / width as f64 * TAU;
            slice_under_pointer(options, rotation - offset)
        })
        .collect()
}

/// Collapses per-column indices into `(index, start, len)` runs.
fn runs(indices: &[usize]) -> Vec<(usize, usize, usize)> {
    let mut runs: Vec<(usize, usize, usize)> = Vec::new();
    for (col, &index) in indices.iter().enumerate() {
        match runs.last_mut() {
            Some((last, _, len)) if *last == index => *len += 1,
            _ => runs.push((index, col, 1)),
        }
    }
    runs
}

/// Centres `label` in exactly `width` terminal cells, truncating with `…`.
fn fit_label(label: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let label_width = label.width();
    if label_width <= width {
        let left = (width - label_width) / 2;
        let right = width - label_width - left;
        return format!("{}{label}{}", " ".repeat(left), " ".repeat(right));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width - used));
    out
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(vertical[1])[1]
}

//! Interactive chat shell (ratatui + crossterm)
//!
//! The composer doubles as a command line: a line starting with `/` is parsed
//! as a slash command instead of being sent.

use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::core::mode::Mode;
use crate::core::types::MessageRole;
use crate::ui_backend::{
    key_to_command, AppEvent, AppService, AppView, ErrorLevel, HealthStatus, SidebarView,
    UiRenderer,
};

use super::cli::connect;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the interactive chat shell until the user quits
pub async fn run_chat(config: &Config) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&std::io::stdout()) {
        anyhow::bail!("The chat shell requires a real terminal (TTY).");
    }

    let backend = connect(config)?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut service = AppService::new(config, backend, event_tx);
    service.start();

    enable_raw_mode().context("Failed to enable terminal raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    // Needed for Shift+Enter; unsupported terminals simply send Enter
    let enhanced = execute!(
        out,
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
    )
    .is_ok();

    let terminal = Terminal::new(CrosstermBackend::new(out))
        .context("Failed to create terminal backend")?;
    let mut renderer = TerminalRenderer::new(terminal);

    let result = event_loop(&mut service, &mut event_rx, &mut renderer).await;

    let terminal = renderer.terminal_mut();
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags).ok();
    }
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

async fn event_loop<R: UiRenderer>(
    service: &mut AppService,
    events: &mut mpsc::UnboundedReceiver<AppEvent>,
    renderer: &mut R,
) -> Result<()> {
    loop {
        while let Ok(event) = events.try_recv() {
            service.handle_event(event).await?;
        }

        let view = service.view().await;
        renderer.render(&view)?;

        if service.state().should_quit() {
            return Ok(());
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    service.handle_command(key_to_command(key)).await?;
                }
            }
        }
    }
}

/// Draws an [`AppView`] onto any ratatui backend
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self { terminal }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> UiRenderer for TerminalRenderer<B> {
    fn render(&mut self, view: &AppView) -> Result<()> {
        self.terminal.draw(|frame| draw(frame, view))?;
        Ok(())
    }
}

fn draw(frame: &mut Frame, view: &AppView) {
    let composer_height = 3 + view.composer.attachments.len().min(4) as u16;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(composer_height),
        ])
        .split(frame.area());

    frame.render_widget(status_line(view), rows[0]);

    let main = match &view.sidebar {
        Some(sidebar) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                .split(rows[1]);
            frame.render_widget(sidebar_widget(sidebar), cols[0]);
            cols[1]
        }
        None => rows[1],
    };
    draw_main(frame, view, main);

    if let Some(notification) = &view.notification {
        let color = match notification.level {
            ErrorLevel::Info => Color::Cyan,
            ErrorLevel::Warning => Color::Yellow,
            ErrorLevel::Error => Color::Red,
        };
        let line = Line::from(vec![
            Span::styled(
                notification.timestamp.format("%H:%M:%S ").to_string(),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(notification.message.clone(), Style::default().fg(color)),
        ]);
        frame.render_widget(Paragraph::new(line), rows[2]);
    }

    frame.render_widget(composer_widget(view), rows[3]);
}

fn status_line(view: &AppView) -> Paragraph<'static> {
    let health_color = match view.health {
        HealthStatus::Checking => Color::Yellow,
        HealthStatus::Connected => Color::Green,
        HealthStatus::Error => Color::Red,
    };
    Paragraph::new(Line::from(vec![
        Span::styled("chatfront", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" · "),
        Span::raw(view.mode.display_name()),
        Span::raw(" · "),
        Span::styled("● ", Style::default().fg(health_color)),
        Span::raw(view.health.label()),
    ]))
}

fn sidebar_widget(sidebar: &SidebarView) -> List<'static> {
    let mut items: Vec<ListItem> = Vec::new();
    if sidebar.loading && sidebar.rows.is_empty() {
        items.push(ListItem::new("Loading..."));
    }
    if let Some(error) = &sidebar.error {
        items.push(ListItem::new(Line::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
        items.push(ListItem::new("/retry to try again"));
    }
    for row in &sidebar.rows {
        let marker = if row.active { "▸ " } else { "  " };
        let style = if row.active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("{}{}", marker, row.title), style),
            Span::styled(
                format!(" ({})", row.message_count),
                Style::default().fg(Color::DarkGray),
            ),
        ])));
    }
    let title = match sidebar.footer {
        Some(footer) => format!(
            "Conversations · {} / {} msgs",
            footer.session_count, footer.message_count_total
        ),
        None => "Conversations".to_string(),
    };
    List::new(items).block(Block::default().borders(Borders::ALL).title(title))
}

fn draw_main(frame: &mut Frame, view: &AppView, area: Rect) {
    match view.mode {
        Mode::Home => {
            let lines = vec![
                Line::styled("How do you want to start?", Style::default().add_modifier(Modifier::BOLD)),
                Line::raw(""),
                Line::raw("  /index   Index documents"),
                Line::raw("  /pick    Chat with an existing index"),
                Line::raw("  /quick   Quick chat"),
            ];
            frame.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
                area,
            );
        }
        Mode::Indexing => {
            let in_progress = view.index_modal.as_ref().is_some_and(|m| m.in_progress);
            let lines = if in_progress {
                vec![Line::raw("Indexing documents...")]
            } else {
                vec![
                    Line::raw("/upload <name> <paths...>   Upload documents into a new index"),
                    Line::raw("/cancel                     Back"),
                ]
            };
            frame.render_widget(
                Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL).title("Index documents")),
                area,
            );
        }
        Mode::PickingExistingIndex => draw_index_picker(frame, view, area),
        Mode::ChatExisting | Mode::QuickChat => {
            draw_transcript(frame, view, area);
            if view.index_picker.is_some() {
                draw_index_picker(frame, view, overlay_area(area));
            } else if let Some(info) = &view.index_info {
                let area = overlay_area(area);
                let lines = vec![
                    Line::raw(format!("Session: {}", info.session_id)),
                    Line::raw(format!(
                        "Index:   {}",
                        info.index_name
                            .clone()
                            .or_else(|| info.index_id.clone())
                            .unwrap_or_else(|| "none".to_string())
                    )),
                ];
                frame.render_widget(Clear, area);
                frame.render_widget(
                    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Index")),
                    area,
                );
            }
        }
    }
}

fn draw_transcript(frame: &mut Frame, view: &AppView, area: Rect) {
    let Some(chat) = &view.chat else {
        return;
    };
    let mut lines: Vec<Line> = Vec::new();
    for message in &chat.transcript {
        let (label, color) = match message.role {
            MessageRole::User => ("You", Color::Cyan),
            MessageRole::Assistant => ("Assistant", Color::Green),
        };
        lines.push(Line::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        for text in message.content.lines() {
            lines.push(Line::raw(text.to_string()));
        }
        lines.push(Line::raw(""));
    }
    if lines.is_empty() {
        lines.push(Line::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        ));
    }

    // Keep the latest exchange in view
    let height = area.height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(height);
    let lines: Vec<Line> = lines.into_iter().skip(skip).collect();

    let title = chat.title.clone().unwrap_or_else(|| "New conversation".to_string());
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn draw_index_picker(frame: &mut Frame, view: &AppView, area: Rect) {
    let indexes = view.index_picker.clone().unwrap_or_default();
    let mut items: Vec<ListItem> = indexes
        .iter()
        .map(|index| {
            ListItem::new(format!(
                "{}  {} ({} documents)",
                index.id, index.name, index.document_count
            ))
        })
        .collect();
    if items.is_empty() {
        items.push(ListItem::new("No indexes yet"));
    }
    frame.render_widget(Clear, area);
    frame.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Pick an index · /use <id> · /cancel"),
        ),
        area,
    );
}

fn overlay_area(area: Rect) -> Rect {
    let width = area.width.saturating_mul(3) / 4;
    let height = area.height / 2;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn composer_widget(view: &AppView) -> Paragraph<'static> {
    let composer = &view.composer;
    let mut lines: Vec<Line> = composer
        .attachments
        .iter()
        .take(4)
        .enumerate()
        .map(|(i, preview)| {
            Line::styled(
                format!("[{}] {}", i + 1, preview),
                Style::default().fg(Color::DarkGray),
            )
        })
        .collect();
    if composer.text.is_empty() {
        lines.push(Line::styled(
            composer.placeholder,
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        lines.push(Line::raw(composer.text.clone()));
    }

    let title = if composer.in_flight {
        "Message · sending..."
    } else if composer.disabled {
        "Message · server unavailable (/health to retry)"
    } else {
        "Message"
    };
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title))
}

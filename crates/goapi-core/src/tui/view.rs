//! Per-step rendering of the wizard

use crate::error::DeployError;
use crate::wizard::{Outcome, SelectList, Step, TextInput, Wizard};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Draw the current wizard step
pub fn render(frame: &mut Frame, wizard: &Wizard, display_name: &str, next_steps: &[String]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(8),    // Step body
            Constraint::Length(2), // Validation error
            Constraint::Length(2), // Help
        ])
        .split(frame.area());

    let step = wizard.step();
    let title = match step {
        Step::Welcome => display_name.to_string(),
        Step::Generating if wizard.is_deploying() => "Deploying".to_string(),
        other => other.title().to_string(),
    };
    let title = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(title, chunks[0]);

    match step {
        Step::Welcome => render_welcome(frame, chunks[1], display_name),
        Step::DatabaseSelection => render_select(frame, chunks[1], wizard.database()),
        Step::AwsProfileSelection => render_select(frame, chunks[1], wizard.aws_profiles()),
        Step::FrameworkSelection => render_select(frame, chunks[1], wizard.framework()),
        Step::DeploySelection => render_select(frame, chunks[1], wizard.deploy()),
        Step::Review => render_review(frame, chunks[1], wizard),
        Step::Generating => render_progress(frame, chunks[1], wizard),
        Step::Complete => render_complete(frame, chunks[1], wizard, next_steps),
        text_step => {
            if let Some(input) = wizard.text_input(text_step) {
                render_text(frame, chunks[1], input);
            }
        }
    }

    if let Some(error) = wizard.error() {
        let error = Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red));
        frame.render_widget(error, chunks[2]);
    }

    let help = Paragraph::new(help_text(wizard)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

fn help_text(wizard: &Wizard) -> &'static str {
    match wizard.step() {
        Step::Welcome => "Enter Start • q Quit",
        Step::Review => "Enter Generate • Esc Back • q Quit",
        Step::Generating => "Ctrl+C Quit",
        Step::Complete if wizard.docs_url().is_some() => "o Open install docs • Enter Exit",
        Step::Complete => "Enter Exit",
        step if step.is_text_entry() => "Enter Confirm • Esc Back • Ctrl+C Quit",
        _ => "↑↓ Navigate • Enter Select • Esc Back • q Quit",
    }
}

fn render_welcome(frame: &mut Frame, area: Rect, display_name: &str) {
    let lines = vec![
        Line::from(format!("Welcome to {display_name}.")),
        Line::from(""),
        Line::from("This wizard scaffolds a production-ready Go API service with:"),
        Line::from(Span::styled(
            "  • PostgreSQL or DynamoDB persistence",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "  • Chi or ConnectRPC transport",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "  • Prometheus metrics, Grafana dashboards and optional Fly.io deployment",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to begin",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let welcome = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Info"));
    frame.render_widget(welcome, area);
}

fn render_text(frame: &mut Frame, area: Rect, input: &TextInput) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let field = Paragraph::new(Line::from(vec![
        Span::raw("> "),
        Span::raw(input.display_value()),
    ]))
    .block(Block::default().borders(Borders::ALL).title(input.label()));
    frame.render_widget(field, chunks[0]);

    frame.set_cursor_position((
        cursor_column(chunks[0], input.cursor()),
        chunks[0].y.saturating_add(1),
    ));

    if input.is_sensitive() {
        let note = Paragraph::new(Span::styled(
            "Only the last four characters are shown",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(note, chunks[1]);
    }
}

/// Column of the text cursor in a bordered `> ` field, kept inside the border
fn cursor_column(field: Rect, cursor: usize) -> u16 {
    let offset = u16::try_from(cursor).unwrap_or(u16::MAX);
    field
        .x
        .saturating_add(3)
        .saturating_add(offset)
        .min(field.right().saturating_sub(2))
}

fn render_select<T>(frame: &mut Frame, area: Rect, list: &SelectList<T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = list
        .items()
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let selected = i == list.cursor();
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if selected { "▶ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(prefix),
                Span::styled(choice.title.as_str(), style),
            ]))
        })
        .collect();

    let widget = List::new(items).block(Block::default().borders(Borders::ALL).title(list.label()));
    let mut state = ListState::default().with_selected(Some(list.cursor()));
    frame.render_stateful_widget(widget, chunks[0], &mut state);

    if let Some(choice) = list.selected() {
        let details = Paragraph::new(Span::styled(
            choice.description.as_str(),
            Style::default().fg(Color::Gray),
        ))
        .block(Block::default().borders(Borders::ALL).title("Details"));
        frame.render_widget(details, chunks[1]);
    }
}

fn render_review(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let lines: Vec<Line> = wizard
        .review()
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
                Span::raw(value),
            ])
        })
        .collect();

    let review = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Configuration"));
    frame.render_widget(review, area);
}

fn render_progress(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let label = if wizard.is_deploying() {
        "Project generated. Deploying to Fly.io..."
    } else {
        "Generating project..."
    };

    let progress = Paragraph::new(Line::from(vec![
        Span::styled(wizard.spinner().frame(), Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::raw(label),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Progress"));
    frame.render_widget(progress, area);
}

fn render_complete(frame: &mut Frame, area: Rect, wizard: &Wizard, next_steps: &[String]) {
    let mut lines = Vec::new();

    match wizard.outcome() {
        Some(Outcome::Generated { report, deployment }) => {
            lines.push(Line::from(Span::styled(
                "✓ Project Created Successfully!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));

            if let Some(config) = wizard.submitted_config() {
                lines.push(info_line("Project: ", &config.project_name));
                lines.push(info_line("Module: ", &config.module_path));
            }
            lines.push(info_line("Output: ", &report.output_dir.display().to_string()));
            lines.push(info_line("Files: ", &report.files.len().to_string()));

            match deployment {
                Some(Ok(_)) => {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "✓ Deployed to Fly.io",
                        Style::default().fg(Color::Green),
                    )));
                }
                Some(Err(error)) => {
                    lines.push(Line::from(""));
                    lines.extend(deploy_error_lines(error));
                }
                None => {}
            }

            if !next_steps.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Next steps:",
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                for (i, step) in next_steps.iter().enumerate() {
                    lines.push(Line::from(format!("  {}. {}", i + 1, step)));
                }
            }
        }
        Some(Outcome::Failed(error)) => {
            lines.push(Line::from(Span::styled(
                "✗ Error Creating Project",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        }
        None => {}
    }

    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    frame.render_widget(summary, area);
}

fn info_line<'a>(label: &'a str, value: &str) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Gray)),
        Span::raw(value.to_string()),
    ])
}

fn deploy_error_lines(error: &DeployError) -> Vec<Line<'static>> {
    let warning = Style::default().fg(Color::Yellow);
    match error {
        DeployError::ToolNotFound { docs_url, .. } => vec![
            Line::from(Span::styled("△ Deployment skipped: flyctl is not installed", warning)),
            Line::from(Span::styled(
                format!("  Install it from {docs_url}, then run `make deploy`"),
                Style::default().fg(Color::Gray),
            )),
        ],
        other => {
            let mut lines = vec![Line::from(Span::styled("△ Deployment failed", warning))];
            lines.extend(
                other
                    .to_string()
                    .lines()
                    .map(|line| Line::from(format!("  {line}"))),
            );
            lines
        }
    }
}

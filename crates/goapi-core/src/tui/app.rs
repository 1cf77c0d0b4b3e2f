//! Full-screen wizard application

use crate::aws::SharedConfigFiles;
use crate::generator::Generator;
use crate::product::ProductConfig;
use crate::runtime::ToolManager;
use crate::templates::{TemplateCatalog, TemplateSource};
use crate::tui::{keys, view};
use crate::wizard::{Command, Message, Outcome, Step, Wizard, WizardDefaults};
use anyhow::Result;
use colored::Colorize;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(100);

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Leave raw mode and the alternate screen
///
/// Safe to call more than once; used by panic and signal handlers too.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Run the interactive wizard
pub async fn run_wizard<C: ProductConfig>(product: &C, template_dir: Option<PathBuf>) -> Result<()> {
    let catalog = Arc::new(TemplateSource::from_config(product, template_dir)?);
    let mut wizard = Wizard::new(
        WizardDefaults::from_product(product),
        Box::new(SharedConfigFiles::from_env()),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut wizard, product, catalog, product.deploy_tool()).await;

    // Restore terminal
    restore_terminal()?;
    terminal.show_cursor()?;
    result?;

    print_summary(product, &wizard)
}

async fn event_loop<C, K>(
    terminal: &mut Term,
    wizard: &mut Wizard,
    product: &C,
    catalog: Arc<K>,
    deploy_tool: ToolManager,
) -> Result<()>
where
    C: ProductConfig,
    K: TemplateCatalog + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let mut next_steps: Vec<String> = Vec::new();
    let mut last_tick = Instant::now();

    loop {
        if wizard.step() == Step::Complete && next_steps.is_empty() {
            if let (Some(config), Some(Outcome::Generated { .. })) =
                (wizard.submitted_config(), wizard.outcome())
            {
                next_steps = product.next_steps(config);
            }
        }

        terminal.draw(|frame| view::render(frame, wizard, product.display_name(), &next_steps))?;

        let mut commands = Vec::new();

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(input) = keys::map_key(key, wizard.step()) {
                        commands.push(wizard.update(Message::Input(input)));
                    }
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            if wizard.step() == Step::Generating {
                commands.push(wizard.update(Message::Tick));
            }
            last_tick = Instant::now();
        }

        while let Ok(message) = rx.try_recv() {
            commands.push(wizard.update(message));
        }

        for command in commands {
            match command {
                Command::None => {}
                Command::Quit => return Ok(()),
                Command::Generate(config) => {
                    let generator = Generator::new(config, Arc::clone(&catalog));
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let result = generator.generate().await;
                        let _ = tx.send(Message::GenerationFinished(result));
                    });
                }
                Command::Deploy {
                    project_name,
                    project_dir,
                } => {
                    let tool = deploy_tool.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let result = tool.launch(&project_name, &project_dir).await;
                        let _ = tx.send(Message::DeploymentFinished(result));
                    });
                }
                Command::OpenUrl(url) => {
                    if let Err(error) = open::that(&url) {
                        tracing::warn!(%url, %error, "failed to open browser");
                    }
                }
            }
        }
    }
}

/// Print the outcome once the terminal is restored
fn print_summary<C: ProductConfig>(product: &C, wizard: &Wizard) -> Result<()> {
    let (Some(outcome), Some(config)) = (wizard.outcome(), wizard.submitted_config()) else {
        return Ok(());
    };

    match outcome {
        Outcome::Generated { report, deployment } => {
            println!("\n{} Project created successfully!\n", "✓".green());
            println!("  {} {}", "Location:".dimmed(), report.output_dir.display());
            println!("  {} {}", "Files:".dimmed(), report.files.len());

            match deployment {
                Some(Ok(_)) => println!("  {} Deployed to Fly.io", "✓".green()),
                Some(Err(error)) => println!("  {} {}", "△".yellow(), error.to_string().yellow()),
                None => {}
            }

            println!("\nNext steps:");
            for (i, step) in product.next_steps(config).iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            println!();
            Ok(())
        }
        Outcome::Failed(error) => anyhow::bail!("Failed to create project: {error}"),
    }
}

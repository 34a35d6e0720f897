use clap::Parser;
use color_eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event};
use fibstrip::{logging, App, AppConfig, AppEvent, Args, ConfigManager, StripOptions, Theme};
use ratatui::DefaultTerminal;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::time::Duration;

/// Mouse capture for the lifetime of the value
struct MouseCapture;

impl MouseCapture {
    fn enable() -> Result<Self> {
        crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for MouseCapture {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    }
}

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    app.record_frame();
    terminal.draw(|frame| frame.render_widget(&mut *app, frame.area()))?;
    Ok(())
}

fn run(
    mut terminal: DefaultTerminal,
    mut app: App,
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
    opts: &StripOptions,
) -> Result<()> {
    let poll_interval = Duration::from_millis(opts.event_poll_interval_ms);
    app.mount();
    render(&mut terminal, &mut app)?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                Event::Key(key) => tx.send(AppEvent::Key(key))?,
                Event::Mouse(mouse) => tx.send(AppEvent::Mouse(mouse))?,
                Event::Resize(cols, rows) => tx.send(AppEvent::Resize(cols, rows))?,
                _ => {}
            }
        }

        let mut updated = false;
        loop {
            match rx.try_recv() {
                Ok(AppEvent::Exit) => {
                    app.unmount();
                    return Ok(());
                }
                Ok(event) => {
                    if let Some(event) = app.event(&event) {
                        tx.send(event)?;
                    }
                    updated = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        match ConfigManager::new(fibstrip::APP_NAME) {
            Ok(config_manager) => match config_manager.write_default_config(args.force) {
                Ok(path) => {
                    println!("Configuration written to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing config: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;

    let config = AppConfig::load(fibstrip::APP_NAME).unwrap_or_else(|e| {
        eprintln!("Warning: {}. Using default configuration.", e);
        AppConfig::default()
    });
    let opts = StripOptions::from_args_and_config(&args, &config);
    let log_guard = logging::init(opts.log_to_file, opts.debug);

    let theme = Theme::from_config(&config.theme).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to create theme: {}. Using default theme.", e);
        Theme::default()
    });

    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new_with_config(tx.clone(), theme, &config);
    app.set_length(opts.initial_length);
    if opts.debug {
        app.enable_debug();
    }

    let terminal = ratatui::init();
    let mouse = if opts.mouse {
        match MouseCapture::enable() {
            Ok(capture) => Some(capture),
            Err(e) => {
                tracing::warn!("mouse capture unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };

    let result = run(terminal, app, tx, rx, &opts);
    drop(mouse);
    ratatui::restore();

    if let Err(e) = result {
        tracing::error!("exiting with error: {}", e);
        drop(log_guard);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

use std::io;
use std::path::Path;

use clap::Parser;

use focus_lens::app::App;
use focus_lens::components::LogHandle;
use focus_lens::components::debug_log::{install_panic_hook, set_global_log};
use focus_lens::config::{AppConfig, Cli, EventSource};
use focus_lens::drivers::OutputDriver;
use focus_lens::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use focus_lens::feed::{open_source, spawn_feed};
use focus_lens::labels::DesktopEntryResolver;
use focus_lens::overlay::TerminalOverlayHost;
use focus_lens::runner::run_app;
use focus_lens::{EventIngestor, FocusContext, tracing_sub};

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::try_from(&cli)?;

    let log = LogHandle::default();
    set_global_log(log.clone());
    install_panic_hook();
    tracing_sub::init(config.log_file.as_deref(), config.log_level)?;

    let (context, ingestor) = FocusContext::new();
    start_feed(&config.events, ingestor);

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let viewport = output.size()?;
    let mut app = App::new(
        context,
        TerminalOverlayHost::new(viewport),
        Box::new(DesktopEntryResolver::from_env()),
        config.overlay,
        log,
        viewport,
    );
    if config.show_overlay {
        app.show_overlay();
    }

    let mut driver = ConsoleInputDriver::new();
    let result = run_app(&mut driver, &mut output, &mut app, config.tick);
    output.exit()?;
    result
}

/// Hand the ingestor to the feed thread. Without a feed the ingestor is
/// dropped and the screens keep showing the placeholder.
fn start_feed(source: &EventSource, ingestor: EventIngestor) {
    let reader = match source {
        EventSource::Stdin => open_source(Path::new("-")),
        EventSource::File(path) => open_source(path),
        EventSource::Disabled => {
            tracing::info!("no event feed configured");
            return;
        }
    };
    match reader.and_then(|reader| spawn_feed(reader, ingestor)) {
        Ok(_) => tracing::info!(?source, "event feed started"),
        Err(err) => tracing::warn!(?source, "event feed unavailable: {err}"),
    }
}

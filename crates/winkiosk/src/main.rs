//! Binary entrypoint for the winkiosk host.

use clap::Parser;

use winkiosk::args::Cli;

fn main() {
    let cli = Cli::parse();

    let spec = logging::compute_spec(
        cli.log.trace,
        cli.log.debug,
        cli.log.log_level.as_deref(),
        cli.log.log_filter.as_deref(),
    );
    logging::init(&spec);

    #[cfg(target_os = "windows")]
    winkiosk::app::run(cli);

    // Exit status stays success even here; errors surface via the log.
    #[cfg(not(target_os = "windows"))]
    {
        drop(cli);
        tracing::error!("winkiosk requires the Windows window system");
    }
}

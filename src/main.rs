use adoc_pages::{config, job::Layout, output, pipeline};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adoc-pages")]
#[command(about = "Render AsciiDoc sources into Jekyll-ready HTML pages")]
#[command(long_about = "\
Render AsciiDoc sources into Jekyll-ready HTML pages

Every .adoc file under the source root is converted with asciidoctor and
written one directory up, mirroring the source tree:

  _adoc/
  ├── config.toml                  # Build config (optional)
  ├── index.adoc                   # → index.html
  ├── gettingstarted/
  │   └── pipeline.adoc            # → gettingstarted/pipeline.html
  └── v1.0/                        # Version directory = manual pages
      └── nn_socket.adoc           # → v1.0/nn_socket.html

Front matter (first available wins):
  Existing:    a leading ---/--- block in the source, copied verbatim
  Manual page: version + layout, for documents under v<version>/
  Otherwise:   none

Each page is pinned to its last git commit via SOURCE_DATE_EPOCH, so
unchanged sources rebuild to identical output.

Run 'adoc-pages gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Source root containing the AsciiDoc documents
    #[arg(long, default_value = "_adoc", global = true)]
    source: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Convert only this document (relative to the source root, or including it)
    target: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the documents that would be converted, without converting
    Check {
        /// Check only this document
        target: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Some(Command::GenConfig) => {
            print!("{}", config::stock_config_toml());
        }
        Some(Command::Check { target }) => {
            let build_config = config::load_config(&cli.source)?;
            let layout = Layout::new(&cli.source, &build_config);
            let jobs = pipeline::plan(&layout, &build_config, target.as_deref())?;
            output::print_check_output(&jobs);
        }
        None => {
            let build_config = config::load_config(&cli.source)?;
            let layout = Layout::new(&cli.source, &build_config);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = output::spawn_event_printer(rx);
            let result = pipeline::run(&layout, &build_config, cli.target.as_deref(), Some(tx));
            // The sender is dropped by now, so the printer drains and exits
            output::join_event_printer(printer);
            let report = result?;
            output::print_summary(&report);

            if build_config.fail_on_error && report.failed() > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use mixmaker::logging::{self, LogSettings};
use mixmaker::scan::{self, AssetResolver, DirectoryResolver};
use mixmaker::types::LayerRole;
use mixmaker::{config, output, process};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mixmaker")]
#[command(about = "Batch compositor for promotional thumbnail artwork")]
#[command(long_about = "\
Batch compositor for promotional thumbnail artwork

Every base name found in the thumb, screenshot or logo folder becomes one
output image: the screenshot wrapped in a bezel tinted with its dominant
color, the logo, the thumbnail and the shared template, stacked onto a
transparent canvas in that order and written as <output_folder>/<name>.png.

Asset structure:

  assets/
  ├── thumb/                # <name>.jpg|png|gif
  ├── screenshot/
  ├── logo/
  └── template/             # template.image, shared by every item

Runs are described by named config files:

  config/
  └── steam.toml            # mixmaker run steam

Run 'mixmaker gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Directory holding the named <NAME>.toml run configs
    #[arg(long, default_value = "config", global = true)]
    config_dir: PathBuf,

    /// Log filter (overridden by RUST_LOG), e.g. warn, info, mixmaker=debug
    #[arg(long, default_value = logging::DEFAULT_LEVEL, global = true)]
    log_level: String,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Composite every discovered item
    Run {
        /// Config name, read from <config-dir>/<NAME>.toml
        name: String,

        /// Also write the batch report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Validate a config and list the items it would composite
    Check {
        /// Config name, read from <config-dir>/<NAME>.toml
        name: String,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&LogSettings {
        level: cli.log_level.clone(),
        json: cli.log_json,
    });

    match cli.command {
        Command::Run { name, report } => {
            let run_config = config::load_config(&cli.config_dir, &name)?;
            init_thread_pool(&run_config.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || output::print_process_events(rx));
            let result = process::process(&run_config, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let batch = result?;

            println!();
            output::print_batch_summary(&batch);

            if let Some(report_path) = report {
                let json = serde_json::to_string_pretty(&batch)?;
                std::fs::write(&report_path, json)?;
                println!("Report: {}", report_path.display());
            }
        }
        Command::Check { name } => {
            let path = config::config_path(&cli.config_dir, &name);
            println!("==> Checking {}", path.display());
            let run_config = config::load_config_file(&path)?;

            let resolver = DirectoryResolver::new(&run_config.general.assets_folder);
            let items = scan::survey(&resolver, &run_config)?;
            let template = if run_config.template.enabled {
                resolver.find(LayerRole::Template, &run_config.template.image)
            } else {
                None
            };
            output::print_check_output(&items, template.as_deref(), &run_config);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

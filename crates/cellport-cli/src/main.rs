use cellport::{
    commands::{
        app::{self, AppCommand},
        config::{self, ConfigAction},
        config_export::{self, ConfigExportCommand},
        schema::{self, SchemaCommand},
    },
    config_manager, init_tracing, logger, GlobalOpts,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cellport")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Application-server cell exporter",
    long_about = "cellport exports cell configuration and deployed applications into portable manifests."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the deployment manifest of an application
    App(AppCommand),
    /// Export configuration objects through the export schema
    ConfigExport(ConfigExportCommand),
    /// Print the built-in export schema
    Schema(SchemaCommand),
    /// Configure cellport
    #[command(subcommand_required = true, arg_required_else_help = true)]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.quiet) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing(cli.global.verbosity_level());

    let settings = config_manager::Config::load().unwrap_or_else(|e| {
        logger::warn(&format!("Failed to load config, using defaults: {}", e));
        config_manager::Config::default()
    });

    let result = match cli.command {
        Commands::App(cmd) => app::handle_app(cmd, &cli.global, &settings),
        Commands::ConfigExport(cmd) => {
            config_export::handle_config_export(cmd, &cli.global, &settings)
        }
        Commands::Schema(cmd) => schema::handle_schema(cmd),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        if let Some(path) = logger::get_log_path() {
            logger::debug(&format!("Log file: {}", path.display()));
        }
        std::process::exit(1);
    }
}

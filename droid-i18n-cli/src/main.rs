use clap::{Parser, Subcommand};
use droid_i18n_cli::{
    ExportOptions, ImportOptions, InspectOptions, run_export_command, run_import_command,
    run_inspect_command,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log every sheet, row skip and file read
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the project's strings.xml files from a translation workbook.
    Import {
        /// The Android project directory
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Workbook to import: local path, UNC path, smb:// or https:// URL
        #[arg(short, long)]
        source: Option<String>,

        /// Locale written to the unsuffixed `values` directory (default: en)
        #[arg(long)]
        default_locale: Option<String>,

        /// Merge every sheet matching --sheet-name-regex (single-module projects)
        #[arg(long)]
        all_sheets: bool,

        /// Sheets to read besides the first one; must match the whole name
        #[arg(long)]
        sheet_name_regex: Option<String>,

        /// Settings file (default: <project>/i18n.toml when present)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Gather the project's strings.xml files into a timestamped workbook.
    Export {
        /// The Android project directory
        #[arg(short, long, default_value = ".")]
        project: String,

        /// Directory receiving i18n_<timestamp>.xlsx (default: <project>/build)
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Locale of the unsuffixed `values` directory (default: en)
        #[arg(long)]
        default_locale: Option<String>,

        /// Module whose strings override the same strings of the other modules
        #[arg(long)]
        dedup_source: Option<String>,

        /// Settings file (default: <project>/i18n.toml when present)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Read a translation workbook and print the imported data as JSON.
    Inspect {
        /// Workbook to read
        #[arg(short, long)]
        source: String,

        /// Locale flagged as default (default: en)
        #[arg(long)]
        default_locale: Option<String>,

        /// Merge every sheet matching --sheet-name-regex
        #[arg(long)]
        all_sheets: bool,

        /// Sheets to read besides the first one; must match the whole name
        #[arg(long)]
        sheet_name_regex: Option<String>,

        /// Map each sheet to its own module
        #[arg(long)]
        multi_module: bool,

        /// Write the JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.commands {
        Commands::Import {
            project,
            source,
            default_locale,
            all_sheets,
            sheet_name_regex,
            config,
        } => run_import_command(ImportOptions {
            project,
            source,
            default_locale,
            all_sheets,
            sheet_name_regex,
            config,
        }),
        Commands::Export {
            project,
            output_dir,
            default_locale,
            dedup_source,
            config,
        } => run_export_command(ExportOptions {
            project,
            output_dir,
            default_locale,
            dedup_source,
            config,
        }),
        Commands::Inspect {
            source,
            default_locale,
            all_sheets,
            sheet_name_regex,
            multi_module,
            output,
        } => run_inspect_command(InspectOptions {
            source,
            default_locale,
            all_sheets,
            sheet_name_regex,
            multi_module,
            output,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

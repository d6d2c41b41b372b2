use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::borrow::Cow;
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use replace_uploads_url::assets::{ContentTransformer, format_srcset, parse_srcset};
use replace_uploads_url::config::{
	CONFIG_FILE_NAME, MergedConfig, Overrides, PRODUCTION_URL_ENV, ProductionUrlOrigin, Settings,
	discover_configs, load_merged_config, merge_configs, user_config_path,
};

#[derive(Parser)]
#[command(name = "ruu")]
#[command(
	author,
	version,
	about = "Rewrite development-host media URLs in rendered HTML to a production host"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Production base URL (overrides RUU_PRODUCTION_URL and config files)
	#[arg(long, global = true, value_name = "URL")]
	production_url: Option<String>,

	/// Development site URL whose host is scanned for
	#[arg(long, global = true, value_name = "URL")]
	site_url: Option<String>,

	/// Directory that asset paths are checked against
	#[arg(long, global = true, value_name = "DIR")]
	document_root: Option<PathBuf>,

	/// Directory to start config discovery from (defaults to the current directory)
	#[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
	dir: Option<PathBuf>,

	/// Increase log verbosity (-v debug, -vv trace)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Rewrite asset URLs in an HTML document
	Transform {
		/// Input file (reads stdin if omitted)
		input: Option<PathBuf>,

		/// Output file (writes stdout if omitted)
		#[arg(short, long)]
		output: Option<PathBuf>,
	},
	/// Rewrite individual attachment URLs, one result per line
	Url {
		#[arg(required = true)]
		urls: Vec<String>,
	},
	/// Rewrite every candidate of a srcset attribute value
	Srcset { srcset: String },
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
	/// Create a template .ruu.toml in the current (or -C) directory
	Init {
		/// Overwrite an existing .ruu.toml
		#[arg(long)]
		force: bool,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the resolved settings and the files they came from
	Show,
	/// Check all config files for errors without rewriting anything
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: u8) {
	let max_level = match verbose {
		0 => tracing::Level::WARN,
		1 => tracing::Level::DEBUG,
		_ => tracing::Level::TRACE,
	};

	let subscriber = tracing_subscriber::FmtSubscriber::builder()
		.with_max_level(max_level)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.finish();

	if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
		eprintln!("Warning: failed to initialize logging: {e}");
	}
}

fn run(cli: Cli) -> Result<ExitCode> {
	let start_dir = match cli.dir {
		Some(ref dir) => dir.clone(),
		None => std::env::current_dir().context("Failed to get current directory")?,
	};
	let overrides = Overrides {
		production_url: cli.production_url.clone(),
		site_url: cli.site_url.clone(),
		document_root: cli.document_root.clone(),
	};

	match cli.command {
		Commands::Transform { input, output } => {
			handle_transform(&start_dir, &overrides, input.as_deref(), output.as_deref())
		}
		Commands::Url { urls } => handle_url(&start_dir, &overrides, &urls),
		Commands::Srcset { srcset } => handle_srcset(&start_dir, &overrides, &srcset),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(&start_dir, &overrides),
			ConfigAction::Validate => handle_config_validate(&start_dir),
		},
		Commands::Init { force } => handle_init(&start_dir, force),
	}
}

fn load_settings(start_dir: &Path, overrides: &Overrides) -> Result<(MergedConfig, Settings)> {
	let merged = load_merged_config(start_dir).context("Failed to load configuration")?;
	let settings =
		Settings::resolve(&merged, overrides, start_dir).context("Failed to resolve settings")?;
	Ok((merged, settings))
}

fn load_transformer(
	start_dir: &Path,
	overrides: &Overrides,
) -> Result<Option<ContentTransformer>> {
	let (_, settings) = load_settings(start_dir, overrides)?;
	ContentTransformer::activate(&settings).context("Failed to set up URL rewriting")
}

fn handle_transform(
	start_dir: &Path,
	overrides: &Overrides,
	input: Option<&Path>,
	output: Option<&Path>,
) -> Result<ExitCode> {
	let transformer = load_transformer(start_dir, overrides)?;

	let content = match input {
		Some(path) => std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read {}", path.display()))?,
		None => {
			let mut buffer = String::new();
			std::io::stdin()
				.read_to_string(&mut buffer)
				.context("Failed to read stdin")?;
			buffer
		}
	};

	let rewritten = match transformer {
		Some(ref transformer) => transformer.transform(&content),
		None => Cow::Borrowed(content.as_str()),
	};

	match output {
		Some(path) => std::fs::write(path, rewritten.as_bytes())
			.with_context(|| format!("Failed to write {}", path.display()))?,
		None => std::io::stdout()
			.write_all(rewritten.as_bytes())
			.context("Failed to write stdout")?,
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_url(start_dir: &Path, overrides: &Overrides, urls: &[String]) -> Result<ExitCode> {
	let transformer = load_transformer(start_dir, overrides)?;

	for url in urls {
		match transformer {
			Some(ref transformer) => println!("{}", transformer.rewrite_url(url)),
			None => println!("{}", url),
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_srcset(start_dir: &Path, overrides: &Overrides, srcset: &str) -> Result<ExitCode> {
	let transformer = load_transformer(start_dir, overrides)?;

	let sources = parse_srcset(srcset);
	let sources = match transformer {
		Some(ref transformer) => transformer.rewrite_srcset(sources),
		None => sources,
	};

	println!("{}", format_srcset(&sources));
	Ok(ExitCode::SUCCESS)
}

fn handle_init(start_dir: &Path, force: bool) -> Result<ExitCode> {
	let config_path = start_dir.join(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, INIT_TEMPLATE)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

const INIT_TEMPLATE: &str = r#"# replace-uploads-url configuration
#
# Files named .ruu.toml are looked up from the working directory upwards.
# `root = true` stops the lookup at this file.
root = true

# Assets missing from the document root are loaded from here.
# Leave empty to disable rewriting. RUU_PRODUCTION_URL overrides this value.
production-url = ""

# Development site URL. Only its host is matched in page content.
site-url = "http://localhost"

# Directory holding the site's files, relative to this file.
document-root = "."
"#;

fn handle_config_show(start_dir: &Path, overrides: &Overrides) -> Result<ExitCode> {
	let (merged, settings) = load_settings(start_dir, overrides)?;

	if merged.sources.is_empty() {
		println!("No configuration files found.");
	} else {
		println!("Configuration files (in cascade order):");
		for source in &merged.sources {
			println!("  {}", source.display());
		}
	}
	println!();

	println!("Resolved settings:");
	if settings.is_active() {
		println!("  production-url: {}", settings.production_base_url);
	} else {
		println!("  production-url: (empty, rewriting disabled)");
	}
	match settings.production_url_origin {
		ProductionUrlOrigin::Explicit => println!("    # from: --production-url"),
		ProductionUrlOrigin::Env => println!("    # from: {PRODUCTION_URL_ENV}"),
		ProductionUrlOrigin::File(ref path) => println!("    # from: {}", path.display()),
		ProductionUrlOrigin::Unset => {}
	}
	if settings.site_host.is_empty() {
		println!("  site-host: (unresolved, nothing will be rewritten)");
	} else {
		println!("  site-host: {}", settings.site_host);
	}
	println!("  document-root: {}", settings.document_root.display());

	if let Ok(user_path) = user_config_path() {
		println!();
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(start_dir: &Path) -> Result<ExitCode> {
	match discover_configs(start_dir) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
				return Ok(ExitCode::SUCCESS);
			}

			let merged = merge_configs(&configs);
			if let Err(e) = Settings::resolve_files(&merged, start_dir) {
				eprintln!("Configuration error: {}", e);
				return Ok(ExitCode::FAILURE);
			}

			println!("All configuration files are valid:");
			for loaded in &configs {
				println!("  {}", loaded.path.display());
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}

// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! tidylint CLI - run clang-tidy against a compilation database.

use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tidylint::config::Config;
use tidylint::host::{CollectingSink, SettingsProvider, SystemRunner, WorkspaceSettings};
use tidylint::utils::output::{format_report_human, format_result, OutputFormat};
use tidylint::utils::{get_project_root, DEFAULT_EXCLUDES};
use tidylint::{database_files, run, Language, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "tidylint")]
#[command(
    author,
    version,
    about = "Run clang-tidy against a compilation database and report diagnostics"
)]
struct Cli {
    /// Files or directories to check (default: every file in the compilation database)
    paths: Vec<PathBuf>,

    /// Directory containing compile_commands.json (supports ${variables})
    #[arg(short = 'p', long = "compile-commands", value_name = "DIR")]
    compile_commands: Option<String>,

    /// clang-tidy executable to run
    #[arg(long, value_name = "PATH")]
    executable: Option<String>,

    /// Extra argument passed to clang-tidy before the file (repeatable)
    #[arg(long = "extra-arg", value_name = "ARG", allow_hyphen_values = true)]
    extra_args: Vec<String>,

    /// Define a variable for ${placeholder} expansion (KEY=VALUE, repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    vars: Vec<String>,

    /// Specify languages to check (comma-separated: c,cpp,objc,objcpp)
    #[arg(short, long, value_delimiter = ',')]
    lang: Option<Vec<String>>,

    /// Exclude patterns (glob patterns)
    #[arg(short, long)]
    exclude: Option<Vec<String>>,

    /// Disable default exclusions (.git, build, third_party, etc.)
    #[arg(long)]
    no_default_excludes: bool,

    /// Path to configuration file (toml, yaml or json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: human, json, github-actions
    #[arg(short, long, default_value = "human")]
    output: String,

    /// Exit with code 1 when only warnings are found
    #[arg(long)]
    fail_on_warnings: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List the translation units in the compilation database
    Files,
    /// Initialize .tidylint/config.toml in the current directory
    Init {
        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Install the logger before config files are read so their warnings show.
/// `verbose` may still be switched on by a config file afterwards, so the
/// logger accepts debug records and the global max level gates them.
fn init_logging(verbose: bool) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    set_verbosity(verbose);
}

/// Raise or lower the log level unless `RUST_LOG` is in charge.
fn set_verbosity(verbose: bool) {
    if std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_none() {
        log::set_max_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        });
    }
}

/// `-v` on the command line or `verbose = true` in any config layer.
fn verbose_enabled(settings: &WorkspaceSettings) -> bool {
    settings.config().verbose.unwrap_or(false)
}

/// Parse `KEY=VALUE` pairs from `--var`.
fn parse_vars(vars: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    vars.iter()
        .map(|v| match v.split_once('=') {
            Some((k, val)) if !k.is_empty() => Ok((k.to_string(), val.to_string())),
            _ => bail!("Invalid --var '{}', expected KEY=VALUE", v),
        })
        .collect()
}

/// Merge config files and CLI flags into workspace settings.
fn load_settings(cli: &Cli) -> anyhow::Result<WorkspaceSettings> {
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    let mut config = Config::load_merged(&cwd);

    if let Some(path) = &cli.config {
        let file_config = Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        config.merge(file_config);
    }

    let mut cli_config = Config {
        compile_commands: cli.compile_commands.clone(),
        executable: cli.executable.clone(),
        args: cli.extra_args.clone(),
        excludes: cli.exclude.clone().unwrap_or_default(),
        fail_on_warnings: cli.fail_on_warnings.then_some(true),
        verbose: cli.verbose.then_some(true),
        ..Default::default()
    };
    cli_config.variables.extend(parse_vars(&cli.vars)?);
    config.merge(cli_config);

    Ok(WorkspaceSettings::new(config, get_project_root()))
}

fn parse_languages(names: &[String]) -> anyhow::Result<Vec<Language>> {
    names
        .iter()
        .map(|name| {
            Language::from_name(name)
                .with_context(|| format!("Unsupported language: {}", name))
        })
        .collect()
}

fn handle_init_command(force: bool) -> ExitCode {
    let cwd = std::env::current_dir().unwrap_or_default();
    let config_path = Config::project_config_path(&cwd);

    if config_path.exists() && !force {
        eprintln!(
            "{}: {} already exists (use --force to overwrite)",
            "Error".red(),
            config_path.display()
        );
        return ExitCode::from(1);
    }

    let written = config_path
        .parent()
        .map(std::fs::create_dir_all)
        .unwrap_or(Ok(()))
        .and_then(|_| std::fs::write(&config_path, Config::generate_default_toml()));

    match written {
        Ok(()) => {
            println!("{} Created {}", "✓".green(), config_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: Failed to write {}: {}", "Error".red(), config_path.display(), e);
            ExitCode::from(1)
        }
    }
}

fn handle_files_command(settings: &WorkspaceSettings) -> ExitCode {
    let sink = CollectingSink::new();
    match database_files(settings as &dyn SettingsProvider, &sink) {
        Ok(files) => {
            for report in sink.failures() {
                eprintln!("{}", format_report_human(&report));
            }
            for file in &files {
                println!("{}", file.display());
            }
            if sink.failures().is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(2)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(Commands::Init { force }) = cli.command {
        return handle_init_command(force);
    }

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            return ExitCode::from(2);
        }
    };

    let verbose = verbose_enabled(&settings);
    set_verbosity(verbose);

    if let Some(Commands::Files) = cli.command {
        return handle_files_command(&settings);
    }

    let output_format = match OutputFormat::parse(&cli.output) {
        Some(f) => f,
        None => {
            eprintln!(
                "{}: Invalid output format '{}'. Use: human, json, github-actions",
                "Error".red(),
                cli.output
            );
            return ExitCode::from(2);
        }
    };

    let languages = match cli.lang.as_deref().map(parse_languages).transpose() {
        Ok(l) => l.unwrap_or_default(),
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            return ExitCode::from(2);
        }
    };

    let config = settings.config();
    let mut exclude_patterns = config.excludes.clone();
    if !cli.no_default_excludes {
        exclude_patterns.extend(DEFAULT_EXCLUDES.iter().map(|s| s.to_string()));
    }

    let options = RunOptions {
        paths: cli.paths.clone(),
        languages,
        exclude_patterns,
        fail_on_warnings: config.fail_on_warnings.unwrap_or(false),
    };

    if verbose {
        eprintln!("{:?}", options);
    }

    let result = match run(&options, Arc::new(settings), Arc::new(SystemRunner::new())) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            return ExitCode::from(2);
        }
    };

    let rendered = format_result(&result, output_format);
    if !(cli.quiet && output_format == OutputFormat::Human && result.exit_code == 0) {
        println!("{}", rendered);
    }

    ExitCode::from(result.exit_code as u8)
}

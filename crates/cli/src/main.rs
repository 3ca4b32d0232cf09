// ABOUTME: CLI for sitekit: audits and patches the HTML pages of a static site.
// ABOUTME: One subcommand per tool; reports go to stdout, logs to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sitekit::audit::audit_site;
use sitekit::i18n::check_site;
use sitekit::security::{apply_to_file, PatchKind};
use sitekit::{find_html_files, relative_display, SiteOptions};
use tracing_subscriber::EnvFilter;

/// Maintenance tools for a static HTML site.
#[derive(Parser, Debug)]
#[command(name = "sitekit")]
#[command(version, about = "Audit and patch the HTML pages of a static site", long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SiteArgs {
    /// Site root directory
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Extra directory name to skip (repeatable)
    #[arg(long = "exclude", value_name = "DIR")]
    exclude: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check pages for structural accessibility problems
    AuditUi {
        #[command(flatten)]
        site: SiteArgs,

        /// Report file; relative paths resolve against --root
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Format printed to stdout
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Do not write the markdown report file
        #[arg(long = "no-write")]
        no_write: bool,
    },

    /// Check front matter lang/ref consistency across translations
    I18nCheck {
        #[command(flatten)]
        site: SiteArgs,
    },

    /// Replace the CSP and add the other security meta tags
    UpdateSecurity {
        #[command(flatten)]
        site: SiteArgs,

        /// Report changes without writing files
        #[arg(long = "dry-run")]
        dry_run: bool,
    },

    /// Repair malformed or duplicated CSP meta tags
    FixCsp {
        #[command(flatten)]
        site: SiteArgs,

        /// Report changes without writing files
        #[arg(long = "dry-run")]
        dry_run: bool,
    },

    /// Remove inline scripts and restrict script-src to 'self'
    RemoveInlineScripts {
        #[command(flatten)]
        site: SiteArgs,

        /// Report changes without writing files
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Markdown report
    Text,
    /// JSON with per-page details
    Json,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sitekit=debug" } else { "sitekit=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn site_options(site: SiteArgs, output: Option<PathBuf>) -> SiteOptions {
    let mut builder = SiteOptions::builder(site.root).exclude_dirs(site.exclude);
    if let Some(output) = output {
        builder = builder.report_path(output);
    }
    builder.build()
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::AuditUi {
            site,
            output,
            format,
            no_write,
        } => run_audit(&site_options(site, output), format, no_write),
        Command::I18nCheck { site } => run_i18n(&site_options(site, None)),
        Command::UpdateSecurity { site, dry_run } => run_patch(
            &site_options(site, None),
            PatchKind::SecurityHeaders,
            dry_run,
        ),
        Command::FixCsp { site, dry_run } => run_fix_csp(&site_options(site, None), dry_run),
        Command::RemoveInlineScripts { site, dry_run } => run_patch(
            &site_options(site, None),
            PatchKind::InlineScripts,
            dry_run,
        ),
    }
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_audit(opts: &SiteOptions, format: Format, no_write: bool) -> Result<ExitCode> {
    let audit = audit_site(opts)?;

    match format {
        Format::Text => println!("{}", audit.render_markdown()),
        Format::Json => println!("{}", audit.render_json()?),
    }

    if !no_write {
        audit
            .write_markdown(&opts.report_path)
            .with_context(|| format!("writing {}", opts.report_path.display()))?;
    }

    Ok(exit_code(audit.has_errors()))
}

fn run_i18n(opts: &SiteOptions) -> Result<ExitCode> {
    let report = check_site(opts)?;
    println!("{}", report.render());
    Ok(exit_code(report.has_errors()))
}

fn run_patch(opts: &SiteOptions, kind: PatchKind, dry_run: bool) -> Result<ExitCode> {
    let files = find_html_files(opts)?;
    let mut had_error = false;
    let mut total_changes = 0;

    println!("Found {} HTML files to process", files.len());
    println!();

    for path in &files {
        let rel = relative_display(opts.root(), path);
        match apply_to_file(path, kind, dry_run) {
            Ok(changes) if changes.is_empty() => println!("  {} (no changes needed)", rel),
            Ok(changes) => {
                println!("✓ {}", rel);
                for change in &changes {
                    println!("    - {}", change);
                }
                total_changes += changes.len();
            }
            Err(e) => {
                eprintln!("error: {}", e);
                had_error = true;
            }
        }
    }

    println!();
    println!("Total changes made: {}", total_changes);

    Ok(exit_code(had_error))
}

fn run_fix_csp(opts: &SiteOptions, dry_run: bool) -> Result<ExitCode> {
    let files = find_html_files(opts)?;
    let mut had_error = false;
    let mut fixed = 0;

    println!("Fixing CSP in {} HTML files", files.len());

    for path in &files {
        match apply_to_file(path, PatchKind::FixCsp, dry_run) {
            Ok(changes) if changes.is_empty() => {}
            Ok(_) => {
                println!("✓ Fixed: {}", relative_display(opts.root(), path));
                fixed += 1;
            }
            Err(e) => {
                eprintln!("error: {}", e);
                had_error = true;
            }
        }
    }

    println!();
    println!("Fixed {} files", fixed);

    Ok(exit_code(had_error))
}

//! Release installer CLI entrypoint.
//!
//! Resolves a GitHub release, downloads the archive for this host, verifies
//! it and unpacks it under the base directory. A one-word summary on stdout
//! says whether anything changed.

use clap::Parser;
use ghr_installer::cli::{Cli, Command, InstallArgs};
use ghr_installer::config::InstallerConfig;
use ghr_installer::error::Result;
use ghr_installer::install::{InstallContext, install};
use ghr_installer::output::{summary_word, write_stderr_line};
use ghr_installer::platform::HostPlatform;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let Command::Install(args) = &cli.command;
    init_logging(args);

    let mut stderr = std::io::stderr();
    let run_result = run(args, &mut stderr);
    let mut stdout = std::io::stdout();
    let exit_code = exit_code_for_run_result(run_result, args.quiet, &mut stdout, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Installs `env_logger` at the level implied by `-v`; `RUST_LOG` wins.
fn init_logging(args: &InstallArgs) {
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(args: &InstallArgs, stderr: &mut dyn Write) -> Result<bool> {
    let config = InstallerConfig::load(
        args.base_directory.clone(),
        args.config.as_deref(),
        args.api_url.as_deref(),
    )?;
    let layout = config.layout();
    let client = config.client();
    let platform = HostPlatform::detect();
    log::debug!("installing {} for {platform} under {}", args.spec, layout.base_directory());

    let ctx = InstallContext {
        layout: &layout,
        platform: &platform,
        client: &client,
        quiet: args.quiet,
    };
    install(&args.spec, &ctx, stderr)
}

fn exit_code_for_run_result(
    result: Result<bool>,
    quiet: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    match result {
        Ok(changed) => {
            if !quiet && writeln!(stdout, "{}", summary_word(changed)).is_err() {
                // Best-effort summary; the install itself succeeded.
            }
            0
        }
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use std::fs;
use std::path::PathBuf;

use update_assembly_info::cli::{Cli, normalize_args};
use update_assembly_info::config::Config;
use update_assembly_info::filesystem::{Filesystem, RealFilesystem};
use update_assembly_info::host::HostEnvironment;
use update_assembly_info::render::{self, RenderEnvironment};
use update_assembly_info::{GenerationOptions, RepositoryContext, resolve};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("update-assembly-info")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("update-assembly-info.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn generate(cli: &Cli, config: &Config, fs: &dyn Filesystem, host: &HostEnvironment) -> Result<RepositoryContext> {
    let options = GenerationOptions::from_cli(cli, config);
    let context = resolve(fs, &host.working_dir, &config.version_tag_file);

    match &context.root {
        Some(root) => info!(
            "Repository {} at {}: branch={:?} revision={:?} tag={:?}",
            context.repository_name.as_deref().unwrap_or_default(),
            root.display(),
            context.branch(),
            context.revision,
            context.version_tag
        ),
        None => info!("No repository found from {}", host.working_dir.display()),
    }

    if cli.print_context {
        eprint!("{}", context.to_yaml().context("Failed to serialize repository context")?);
    }

    let env = RenderEnvironment::from(host);
    if cli.files.is_empty() {
        render::write_stdout(&options, &context, &env);
    } else {
        render::write_files(fs, &cli.files, &options, &context, &env)?;
        for path in &cli.files {
            println!("{} Generated {}", "✓".green(), path.display().to_string().cyan());
        }
    }

    Ok(context)
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let host = HostEnvironment::detect()?;

    info!("Starting update-assembly-info in {}", host.working_dir.display());

    generate(&cli, &config, &RealFilesystem, &host).context("Failed to generate assembly info")?;

    Ok(())
}

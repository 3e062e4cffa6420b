mod cli;

use cascade::store::DirectoryBackend;
use cascade::value::{Mapping, Value};
use cascade::{Registry, RegistryOptions};
use std::io::Write;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("CASCADE_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let registry = Registry::with_options(
        DirectoryBackend::new(&cli.documents),
        RegistryOptions::default().with_max_depth(cli.max_depth),
    );

    let command_result = match cli.command {
        cli::Command::Get(get_cli) => get(&registry, get_cli),
        cli::Command::Chain(chain_cli) => chain(&registry, chain_cli),
        cli::Command::List => list(&registry),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn get(registry: &Registry<DirectoryBackend>, cli: cli::GetCommand) -> anyhow::Result<()> {
    let fields = registry.get(&cli.name)?;
    output(&cli.output, fields)?;
    Ok(())
}

pub fn chain(registry: &Registry<DirectoryBackend>, cli: cli::ChainCommand) -> anyhow::Result<()> {
    for name in &registry.chain(&cli.name)? {
        println!("{name}");
    }
    Ok(())
}

pub fn list(registry: &Registry<DirectoryBackend>) -> anyhow::Result<()> {
    write_list(registry, &mut std::io::stdout().lock())
}

/// An empty directory lists nothing, it is not an error
fn write_list(registry: &Registry<DirectoryBackend>, out: &mut impl Write) -> anyhow::Result<()> {
    let names = registry.list_available()?;
    if names.is_empty() {
        tracing::info!(directory=%registry.store().backend().root().display(), "No documents found");
    }

    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

fn output(output: &cli::OutputArgs, fields: Mapping) -> anyhow::Result<()> {
    let value = Value::Object(fields);
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), &value)?,
        cli::OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), &value)?;
            println!();
        }
    };

    Ok(())
}

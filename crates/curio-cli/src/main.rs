// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use curio_app::Controller;
use runtime::{CatalogOrigin, LoaderRuntime};
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `curio --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let data_root = options.data_root.clone().unwrap_or_else(|| config.data_root());
    if options.print_data_root {
        println!("{data_root}");
        return Ok(());
    }

    logging::init(&config.log_path()?, config.log_level())?;

    let mut runtime = if options.demo {
        LoaderRuntime::demo()
    } else {
        LoaderRuntime::new(
            CatalogOrigin::Root(data_root),
            config.manifest(),
            config.source_timeout()?,
        )
    };
    info!(origin = ?runtime.origin(), "starting curio");

    if options.check_only {
        let report = runtime.load_report()?;
        println!("{}", report.summary());
        for failure in &report.failures {
            println!(
                "  {} ({}): {}",
                failure.path,
                failure.kind.as_str(),
                failure.message
            );
        }
        return Ok(());
    }

    let mut controller = Controller::new(config.controller_settings().with_context(|| {
        format!(
            "invalid [view] or [pricing] config in {}",
            options.config_path.display()
        )
    })?);
    curio_tui::run_app(&mut controller, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    data_root: Option<String>,
    print_config_path: bool,
    print_data_root: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        data_root: None,
        print_config_path: false,
        print_data_root: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--data" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--data requires a directory or URL"))?;
                options.data_root = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-data-root" => {
                options.print_data_root = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    if options.demo && options.data_root.is_some() {
        return Err(anyhow!("--demo and --data cannot be combined"));
    }

    Ok(options)
}

fn print_help() {
    println!("curio");
    println!("  --config <path>          Use a specific config path");
    println!("  --data <root>            Catalog directory or http(s) base URL");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-data-root        Print resolved catalog root");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Browse a generated catalog (in-memory)");
    println!("  --check                  Load the catalog once and print a summary");
    println!("  --help                   Show this help");
}

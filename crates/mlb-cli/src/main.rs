use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mlb_cli::{commands, logging};
use std::path::PathBuf;

fn cli() -> Command {
    let catalog = Arg::new("catalog")
        .long("catalog")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Card catalog JSON file");
    let workspace = Arg::new("workspace")
        .long("workspace")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Workspace snapshot JSON file");
    let config = Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration with [workspace] and [gates] tables");
    let json = Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON");

    Command::new("mlb")
        .version(mlb_cli::VERSION)
        .about("ML bias-card workspace: gate reports, summaries and demo data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("validate")
                .about("Evaluate completion gates for a workspace")
                .arg(catalog.clone())
                .arg(workspace.clone())
                .arg(config.clone())
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("summary")
                .about("Show collection counts and activity progress")
                .arg(catalog.clone())
                .arg(workspace)
                .arg(config.clone())
                .arg(json),
        )
        .subcommand(
            Command::new("demo")
                .about("Seed a demo workspace from a catalog")
                .arg(catalog)
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the snapshot here instead of stdout"),
                )
                .arg(config),
        )
}

fn path<'a>(args: &'a ArgMatches, id: &str) -> Option<&'a std::path::Path> {
    args.get_one::<PathBuf>(id).map(PathBuf::as_path)
}

fn required_path<'a>(args: &'a ArgMatches, id: &str) -> anyhow::Result<&'a std::path::Path> {
    path(args, id).ok_or_else(|| anyhow::anyhow!("missing --{id}"))
}

fn run(matches: &ArgMatches) -> anyhow::Result<i32> {
    match matches.subcommand() {
        Some(("validate", args)) => {
            let outcome = commands::run_validate(
                required_path(args, "catalog")?,
                required_path(args, "workspace")?,
                path(args, "config"),
                args.get_flag("json"),
            )?;
            print!("{}", outcome.rendered);
            if !outcome.rendered.ends_with('\n') {
                println!();
            }
            Ok(outcome.exit_code())
        }
        Some(("summary", args)) => {
            let out = commands::run_summary(
                required_path(args, "catalog")?,
                required_path(args, "workspace")?,
                path(args, "config"),
                args.get_flag("json"),
            )?;
            println!("{}", out.trim_end());
            Ok(0)
        }
        Some(("demo", args)) => {
            let output = path(args, "output");
            let json = commands::run_demo(
                required_path(args, "catalog")?,
                output,
                path(args, "config"),
            )?;
            if output.is_none() {
                println!("{json}");
            }
            Ok(0)
        }
        _ => Ok(2),
    }
}

fn main() {
    let matches = cli().get_matches();
    logging::init(matches.get_flag("log-json"));

    match run(&matches) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}

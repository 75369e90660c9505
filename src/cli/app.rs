//! Main CLI application

use crate::config::{parse_manifest_auto, parse_manifest_file, validate_manifest, Manifest};
use crate::error::GantryError;
use crate::orchestrator::{
    resolve, rules_from_manifest, Context, Executor, Registry, ToolSet, Verbosity,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Parsed manifest
    manifest: Manifest,
    /// Manifest file path
    manifest_path: PathBuf,
}

impl App {
    /// Create a new app with automatic manifest discovery
    pub fn new() -> Result<Self, GantryError> {
        let (manifest, manifest_path) = parse_manifest_auto()?;
        validate_manifest(&manifest)?;

        let command = build_command(&manifest);

        Ok(App {
            command,
            manifest,
            manifest_path,
        })
    }

    /// Create app with a specific manifest file
    pub fn with_manifest_file(path: PathBuf) -> Result<Self, GantryError> {
        let manifest = parse_manifest_file(&path)?;
        validate_manifest(&manifest)?;

        let command = build_command(&manifest);

        Ok(App {
            command,
            manifest,
            manifest_path: path,
        })
    }

    /// Run the application with command line arguments
    pub fn run(mut self) -> Result<(), GantryError> {
        let matches = self.command.clone().get_matches();

        let verbosity = get_verbosity(&matches);
        let dry_run = matches.get_flag("dry-run");

        // Which pipeline was requested?
        let (pipeline_name, target) = match matches.subcommand() {
            Some((name, sub_matches)) => (
                name.to_string(),
                sub_matches.get_one::<String>("target").cloned(),
            ),
            None => {
                // Bare invocation runs the default pipeline when one exists
                if self.manifest.pipelines.contains_key("default") {
                    ("default".to_string(), None)
                } else {
                    self.command.print_help()?;
                    println!();
                    return Ok(());
                }
            }
        };

        // Build the read-only registry and tool set once
        let registry = Registry::from_manifest(&self.manifest)?;
        let tools = ToolSet::from_manifest(&self.manifest);
        let watchers = rules_from_manifest(&self.manifest)?;

        // Each invocation gets its own context
        let mut ctx = Context::new()
            .with_target(target)
            .with_manifest_path(self.manifest_path.clone())
            .with_env(self.manifest.env.clone())
            .with_verbosity(verbosity);

        if let Some(interpreter) = &self.manifest.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        let plan = resolve(&registry, &pipeline_name, &ctx)?;

        if dry_run {
            print!("{}", plan);
            return Ok(());
        }

        ctx.print_pipeline_start(&pipeline_name);

        let executor = Executor::new(&registry, &tools, &watchers);
        executor.run_plan(&plan, &ctx)?;

        ctx.print_pipeline_complete(&pipeline_name);

        Ok(())
    }
}

/// Build the clap command from the manifest
fn build_command(manifest: &Manifest) -> Command {
    let mut cmd = Command::new(manifest.name.clone().unwrap_or_else(|| "gantry".to_string()))
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            manifest
                .usage
                .clone()
                .unwrap_or_else(|| "A YAML-based build pipeline orchestrator".to_string()),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to gantry.yml manifest file")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print tool output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the resolved plan without executing it")
                .action(ArgAction::SetTrue)
                .global(true),
        );

    // Add subcommands for each pipeline
    for (pipeline_name, pipeline) in &manifest.pipelines {
        if pipeline.hidden {
            continue;
        }

        let mut pipeline_cmd = Command::new(pipeline_name.clone())
            .about(pipeline.usage.clone().unwrap_or_default())
            .arg(
                Arg::new("target")
                    .value_name("TARGET")
                    .help("Target parameter for conditional steps"),
            );

        if let Some(desc) = &pipeline.description {
            pipeline_cmd = pipeline_cmd.long_about(desc.clone());
        }

        cmd = cmd.subcommand(pipeline_cmd);
    }

    cmd
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application
pub fn run() -> Result<(), GantryError> {
    // Check if --file flag is provided before clap parsing, since the
    // subcommand surface is built from the manifest itself
    let args: Vec<String> = std::env::args().collect();
    let file_path = extract_file_arg(&args);

    let app = if let Some(path) = file_path {
        App::with_manifest_file(path)?
    } else {
        App::new()?
    };

    app.run()
}

/// Extract --file argument before clap parsing
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if (args[i] == "--file" || args[i] == "-f") && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
        if let Some(path) = args[i].strip_prefix("--file=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

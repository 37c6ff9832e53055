//! Main CLI application

use crate::config::{
    config_dir, parse_config_auto, parse_config_file, select_tasks, validate_config, Config,
};
use crate::dependency::Dependency;
use crate::error::DoitError;
use crate::runner::{RunResult, Runner, Task};
use crate::ui::Console;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

/// Task file and the settings derived from it and the command line
struct Session {
    config: Config,
    config_path: PathBuf,
    dep_file: PathBuf,
    verbosity: u8,
    debug: bool,
}

impl Session {
    fn load(matches: &ArgMatches) -> Result<Self, DoitError> {
        let (config, config_path) = match matches.get_one::<PathBuf>("file") {
            Some(path) => (parse_config_file(path)?, path.clone()),
            None => parse_config_auto()?,
        };
        validate_config(&config)?;

        let verbosity = matches
            .get_one::<u8>("verbosity")
            .copied()
            .or(config.verbosity)
            .unwrap_or(0);
        let dep_file = matches
            .get_one::<PathBuf>("dep-file")
            .cloned()
            .unwrap_or_else(|| config.dep_file_path(&config_path));

        Ok(Session {
            config,
            config_path,
            dep_file,
            verbosity,
            debug: matches.get_flag("debug"),
        })
    }

    fn build_task(&self, def: &crate::config::Task) -> Result<Task, DoitError> {
        let base_dir = config_dir(&self.config_path);
        Ok(Task::from_config(def, &base_dir, &self.config.interpreter())?)
    }

    /// Register the selected tasks and run them
    fn run_tasks(&self, selected: &[String]) -> Result<RunResult, DoitError> {
        let console = Console::stdio().with_debug(self.debug);
        let mut runner = Runner::new(&self.dep_file, self.verbosity)?.with_console(console);

        for def in select_tasks(&self.config, selected)? {
            runner.add_task(self.build_task(def)?)?;
        }

        Ok(runner.run())
    }

    /// Print each task name with its title
    fn list_tasks(&self) -> Result<RunResult, DoitError> {
        let tasks = self
            .config
            .tasks
            .iter()
            .map(|def| self.build_task(def))
            .collect::<Result<Vec<_>, _>>()?;

        let width = tasks.iter().map(|t| t.name().len()).max().unwrap_or(0);
        for task in &tasks {
            println!("{:<width$}  {}", task.name(), task.title(), width = width);
        }

        Ok(RunResult::Success)
    }

    /// Drop recorded signatures so the named tasks run again
    fn forget_tasks(&self, names: &[String]) -> Result<RunResult, DoitError> {
        select_tasks(&self.config, names)?;

        let mut dependency = Dependency::open(&self.dep_file)?;
        for name in names {
            if dependency.forget(name)? {
                println!("Forgot '{}'", name);
            } else {
                println!("Nothing recorded for '{}'", name);
            }
        }

        Ok(RunResult::Success)
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("rdoit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run build tasks whose dependencies changed since their last success")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the dodo.yml task file")
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .value_name("LEVEL")
                .value_parser(value_parser!(u8).range(0..=2))
                .help("0: capture stdout and stderr, 1: capture stdout, 2: capture nothing")
                .global(true),
        )
        .arg(
            Arg::new("dep-file")
                .long("dep-file")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Signature file recording successful runs")
                .global(true),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Print debug output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Run tasks (all of them when none are named)")
                .arg(Arg::new("tasks").value_name("TASK").num_args(0..)),
        )
        .subcommand(Command::new("list").about("List tasks"))
        .subcommand(
            Command::new("forget")
                .about("Forget recorded signatures so tasks run again")
                .arg(
                    Arg::new("tasks")
                        .value_name("TASK")
                        .num_args(1..)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Print shell completions")
                .arg(
                    Arg::new("shell")
                        .value_name("SHELL")
                        .value_parser(value_parser!(Shell))
                        .required(true),
                ),
        )
}

/// Task names given to a subcommand
fn task_names(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("tasks")
        .map(|names| names.cloned().collect())
        .unwrap_or_default()
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<RunResult, DoitError> {
    run_from(std::env::args_os())
}

/// Run the CLI application with provided arguments
pub fn run_from<I, T>(args: I) -> Result<RunResult, DoitError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = build_command();
    let matches = command.clone().get_matches_from(args);

    if let Some(("completions", sub_matches)) = matches.subcommand() {
        if let Some(shell) = sub_matches.get_one::<Shell>("shell").copied() {
            clap_complete::generate(shell, &mut command, "rdoit", &mut io::stdout());
        }
        return Ok(RunResult::Success);
    }

    let session = Session::load(&matches)?;

    match matches.subcommand() {
        Some(("list", _)) => session.list_tasks(),
        Some(("forget", sub_matches)) => session.forget_tasks(&task_names(sub_matches)),
        Some(("run", sub_matches)) => session.run_tasks(&task_names(sub_matches)),
        _ => session.run_tasks(&[]),
    }
}

use anyhow::{anyhow, Result};
use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use xth_poster::build::{create_poster, update_list};
use xth_poster::config::Config;
use xth_poster::prompt::{Lines, Prompt, Terminal};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("xth-poster")
        .version(crate_version!())
        .about("Creates poster pages and rebuilds the poster listing")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .global(true)
                .help("Project file to use instead of searching for xth-poster.yaml"),
        )
        .subcommand(
            SubCommand::with_name("create")
                .about("Creates a new poster page from the template")
                .arg(
                    Arg::with_name("template")
                        .long("template")
                        .value_name("FILE")
                        .takes_value(true)
                        .help("Poster template (default: chudiemnho.html)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("update-list")
                .about("Rebuilds the listing page from the posters in a directory")
                .arg(
                    Arg::with_name("dir")
                        .long("dir")
                        .value_name("DIR")
                        .takes_value(true)
                        .help("Directory to scan (default: the current directory)"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("create", Some(sub)) => create(&matches, sub),
        ("update-list", Some(sub)) => list(&matches, sub),
        (name, _) => Err(anyhow!("unknown subcommand `{}`", name)),
    }
}

fn load_config(matches: &ArgMatches, sub: &ArgMatches, dir: &Path) -> Result<Config> {
    match sub.value_of("config").or_else(|| matches.value_of("config")) {
        Some(path) => Config::from_project_file(Path::new(path)),
        None => Config::discover(dir),
    }
}

fn create(matches: &ArgMatches, sub: &ArgMatches) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = load_config(matches, sub, &cwd)?;

    println!("--- Philosophy poster generator ---");
    let mut prompt: Box<dyn Prompt> = match io::stdin().is_terminal() {
        true => Box::new(Terminal::new()),
        false => Box::new(Lines::new(io::stdin().lock(), io::stdout())),
    };
    let output = create_poster(&config, sub.value_of("template").map(Path::new), &mut *prompt)?;
    log::info!("created `{}`", output.display());
    Ok(())
}

fn list(matches: &ArgMatches, sub: &ArgMatches) -> Result<()> {
    let dir = match sub.value_of("dir") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let config = load_config(matches, sub, &dir)?;
    let listing = update_list(&config, &dir)?;
    log::info!(
        "updated `{}` with {} poster(s)",
        listing.path.display(),
        listing.count
    );
    Ok(())
}

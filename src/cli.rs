//! Command line parsing exposed via the library.
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use structopt::StructOpt;

use crate::{
    asset::AssetOutput,
    environment::Environment,
    generate,
    manifest::MANIFEST_FILE,
    rules::RuleTableBuilder,
    utils::join_normalized,
};

#[derive(StructOpt)]
struct Locations {
    /// Directory owning the cache, DLL bundle and node_modules
    #[structopt(short = "d", long, parse(from_os_str))]
    package_dir: Option<PathBuf>,
}

impl Locations {
    fn package_dir(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir()
            .context("Unable to determine the current directory")?;
        Ok(match &self.package_dir {
            Some(dir) => join_normalized(cwd, dir),
            None => cwd,
        })
    }
}

#[derive(StructOpt)]
#[structopt(about = "Build pipeline configuration compiler")]
enum PumiceCommands {
    /// Print the compiled configuration as JSON
    Config {
        #[structopt(flatten)]
        locations: Locations,

        /// DLL manifest, defaults to dll/libs-manifest.json in the package directory
        #[structopt(short, long, parse(from_os_str))]
        manifest: Option<PathBuf>,

        /// Print compact JSON
        #[structopt(short, long)]
        compact: bool,
    },

    /// Print the rule each file dispatches to
    Rule {
        #[structopt(flatten)]
        locations: Locations,

        /// Files to dispatch
        #[structopt(parse(from_os_str), required = true)]
        files: Vec<PathBuf>,
    },

    /// Show whether an asset is inlined or emitted
    Asset {
        #[structopt(flatten)]
        locations: Locations,

        /// Asset file
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },
}

/// Parse the given arguments list or `std::env::os_args` and run the program.
pub fn run<T>(argv: Option<Vec<T>>) -> Result<()>
where
    T: Into<OsString> + Clone,
{
    if std::env::var("RUST_LOG").ok().is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let app = PumiceCommands::clap();
    let matches = if let Some(argv) = argv {
        app.get_matches_from(argv)
    } else {
        app.get_matches()
    };
    let args = PumiceCommands::from_clap(&matches);
    let vars: HashMap<String, String> = std::env::vars().collect();
    match args {
        PumiceCommands::Config {
            locations,
            manifest,
            compact,
        } => config(&vars, &locations.package_dir()?, manifest, compact)?,
        PumiceCommands::Rule { locations, files } => {
            rule(&vars, &locations.package_dir()?, files)?
        }
        PumiceCommands::Asset { locations, file } => {
            asset(&vars, &locations.package_dir()?, file)?
        }
    }
    Ok(())
}

fn config(
    vars: &HashMap<String, String>,
    package_dir: &Path,
    manifest: Option<PathBuf>,
    compact: bool,
) -> Result<()> {
    let manifest = manifest
        .unwrap_or_else(|| package_dir.join("dll").join(MANIFEST_FILE));
    let config = generate(vars, package_dir, &manifest)?;
    let json = if compact {
        serde_json::to_string(&config)?
    } else {
        serde_json::to_string_pretty(&config)?
    };
    println!("{}", json);
    Ok(())
}

fn rule(
    vars: &HashMap<String, String>,
    package_dir: &Path,
    files: Vec<PathBuf>,
) -> Result<()> {
    let env = Environment::from_vars(vars, package_dir)?;
    let table = RuleTableBuilder::new(&env).build()?;
    for file in files {
        let file = join_normalized(env.project_root(), &file);
        match table.resolve(&file) {
            Some(rule) => println!(
                "{} -> {} [{}]",
                file.display(),
                rule.kind,
                rule.tool_ids().join(" ! ")
            ),
            None => println!("{} -> (engine default)", file.display()),
        }
    }
    Ok(())
}

fn asset(
    vars: &HashMap<String, String>,
    package_dir: &Path,
    file: PathBuf,
) -> Result<()> {
    let env = Environment::from_vars(vars, package_dir)?;
    let table = RuleTableBuilder::new(&env).build()?;
    let file = join_normalized(env.project_root(), &file);
    let contents = std::fs::read(&file)
        .context(format!("Unable to read asset {}", file.display()))?;
    let rule = match table.resolve(&file) {
        Some(rule) => rule,
        None => bail!("No rule accepts {}", file.display()),
    };
    match rule.output(&file, &contents) {
        Some(AssetOutput::Inline { data_url }) => {
            log::info!("{} is inlined ({} bytes)", file.display(), contents.len());
            println!("{}", data_url);
        }
        Some(AssetOutput::Emit { path }) => println!("{}", path),
        None => bail!(
            "{} is transformed by the {} rule, not emitted as an asset",
            file.display(),
            rule.kind
        ),
    }
    Ok(())
}

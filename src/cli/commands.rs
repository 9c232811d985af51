use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands};
use crate::cli::output;
use crate::config::{CriticalConfig, RawConfig};
use crate::display::ToTreeString;
use crate::errors::{CriticalError, CriticalResult};
use crate::{extract_to_string, parser};

pub fn execute_command(cli: &Cli) -> CriticalResult<()> {
    match &cli.command {
        Some(Commands::Extract {
            file,
            output,
            output_path,
            output_dest,
            no_preserve,
            no_minify,
            dry_run,
        }) => _extract(
            file,
            output.as_deref(),
            RawConfig {
                output_path: output_path.clone(),
                output_dest: output_dest.clone(),
                preserve: no_preserve.then_some(false),
                minify: no_minify.then_some(false),
                dry_run: dry_run.then_some(true),
            },
        ),
        Some(Commands::Tree { file }) => _tree(file),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

#[instrument(skip(overlay))]
fn _extract(file: &Path, output: Option<&Path>, overlay: RawConfig) -> CriticalResult<()> {
    let css = read_stylesheet(file)?;
    let local_dir = file.parent().unwrap_or(Path::new("."));
    let config = CriticalConfig::load(local_dir)?.merge(&overlay);
    debug!(?config, "resolved configuration");

    let cleaned = extract_to_string(&css, &config)?;
    match output {
        Some(path) => {
            fs::write(path, cleaned).map_err(|source| CriticalError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })?;
            output::action("cleaned", &path.display());
        }
        None => print!("{}", cleaned),
    }
    Ok(())
}

#[instrument]
fn _tree(file: &Path) -> CriticalResult<()> {
    let css = read_stylesheet(file)?;
    let arena = parser::parse_stylesheet(&css)?;
    output::info(&arena.to_tree_string());
    Ok(())
}

fn read_stylesheet(file: &Path) -> CriticalResult<String> {
    fs::read_to_string(file).map_err(|source| CriticalError::ReadFailed {
        path: PathBuf::from(file),
        source,
    })
}

//! Command dispatch: maps parsed arguments onto application services

use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::EditSession;
use crate::cli::args::{ClassesCommands, Cli, Commands, ConfigCommands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::{PairSettings, Settings};
use crate::domain::{NodeId, TreeArena};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    let base = cli.project_dir.as_deref();
    match &cli.command {
        Some(Commands::Classes { command }) => match command {
            ClassesCommands::Show { file } => classes_show(container, &resolve(base, file)),
            ClassesCommands::Import {
                groups,
                output,
                prefix,
            } => classes_import(
                container,
                &resolve(base, groups),
                &resolve(base, output),
                prefix.as_deref(),
            ),
            ClassesCommands::Leader {
                file,
                class,
                glyph,
                force,
            } => classes_leader(container, &resolve(base, file), class, glyph, *force),
        },
        Some(Commands::Pairs {
            composition,
            classes,
            output,
            dedup,
        }) => pairs(
            container,
            &resolve(base, composition),
            &resolve(base, classes),
            &resolve(base, output),
            *dedup,
        ),
        Some(Commands::Transplant {
            source,
            destination,
            output,
            force,
        }) => transplant(
            container,
            &resolve(base, source),
            &resolve(base, destination),
            output.as_ref().map(|p| resolve(base, p)).as_deref(),
            *force,
        ),
        Some(Commands::Config { command }) => config(&container.settings, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Relative paths resolve against the project directory when one is given.
fn resolve(base: Option<&Path>, path: &Path) -> PathBuf {
    match base {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

/// Render an arena subtree for the terminal.
pub fn to_termtree<T: Display>(arena: &TreeArena<T>, id: NodeId) -> Tree<String> {
    let label = arena.get(id).map(ToString::to_string).unwrap_or_default();
    let leaves: Vec<_> = arena
        .children(id)
        .unwrap_or(&[])
        .iter()
        .map(|child| to_termtree(arena, *child))
        .collect();
    Tree::new(label).with_leaves(leaves)
}

#[instrument(skip(container))]
fn classes_show(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let store = container.classes.load(file)?;
    let view = store.to_tree();
    let leaves: Vec<_> = view
        .roots()
        .iter()
        .map(|id| to_termtree(&view, *id))
        .collect();
    let tree = Tree::new(file.display().to_string()).with_leaves(leaves);
    output::info(&tree);
    debug!("{} classes shown", store.len());
    Ok(())
}

#[instrument(skip(container))]
fn classes_import(
    container: &ServiceContainer,
    groups: &Path,
    out: &Path,
    prefix: Option<&str>,
) -> CliResult<()> {
    let prefix = prefix.unwrap_or(&container.settings.group_prefix);
    let store = container.classes.import_groups(groups, prefix)?;
    container.classes.save(out, &store)?;
    output::success(&format!(
        "imported {} classes into {}",
        store.len(),
        out.display()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn classes_leader(
    container: &ServiceContainer,
    file: &Path,
    class: &str,
    glyph: &str,
    force: bool,
) -> CliResult<()> {
    container.classes.set_leader(file, class, glyph, force)?;
    output::success(&format!("{} now leads {}", glyph, class));
    Ok(())
}

#[instrument(skip(container))]
fn pairs(
    container: &ServiceContainer,
    composition: &Path,
    classes: &Path,
    out: &Path,
    dedup: bool,
) -> CliResult<()> {
    let mut session = EditSession::new();
    container.classes.open(&mut session, classes)?;
    container.compositions.open(&mut session, composition)?;

    let written = if dedup {
        let settings = PairSettings {
            dedup: true,
            ..container.kerning.settings().clone()
        };
        container
            .kerning
            .with_settings(settings)
            .export_session(&mut session, out)?
    } else {
        container.kerning.export_session(&mut session, out)?
    };
    output::success(&format!("wrote {} pairs to {}", written, out.display()));
    Ok(())
}

#[instrument(skip(container))]
fn transplant(
    container: &ServiceContainer,
    source: &Path,
    destination: &Path,
    out: Option<&Path>,
    force: bool,
) -> CliResult<()> {
    let outcome = container
        .leaders
        .transplant_files(source, destination, out, force)?;
    for warning in &outcome.warnings {
        output::warning(warning);
    }
    output::success(&format!(
        "leaders transplanted into {}",
        out.unwrap_or(destination).display()
    ));
    Ok(())
}

fn config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

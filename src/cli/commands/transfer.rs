use std::path::PathBuf;

use ws_core::export::export_file_name;
use ws_domain::Collection;

use super::{required, CommandDefinition};
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;

const EXPORT_USAGE: &str = "export sales|expenses [path]";
const IMPORT_USAGE: &str = "import sales|expenses <path>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("export", "Write a collection as CSV", EXPORT_USAGE, cmd_export),
        CommandDefinition::new("import", "Append rows from a CSV export", IMPORT_USAGE, cmd_import),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let collection: Collection = required(args, 0, EXPORT_USAGE)?.parse()?;
    let path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(export_file_name(default_title(collection))),
    };
    let count = context.workspace.export_csv(collection, &path)?;
    output::success(format!("Exported {count} {collection} rows to {}.", path.display()));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let collection: Collection = required(args, 0, IMPORT_USAGE)?.parse()?;
    let path = PathBuf::from(required(args, 1, IMPORT_USAGE)?);
    let count = context.workspace.import_csv(collection, &path)?;
    output::success(format!("Imported {count} {collection} rows from {}.", path.display()));
    Ok(())
}

fn default_title(collection: Collection) -> &'static str {
    match collection {
        Collection::Sales => "Warrior Sales",
        Collection::Expenses => "Warrior Expenses",
    }
}

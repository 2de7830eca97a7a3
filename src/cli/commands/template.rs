use ws_domain::{RowId, SalesField, SalesPatch};

use super::{required, CommandDefinition};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Align};
use crate::Workspace;

const TEMPLATE_USAGE: &str = "template save <name> [field=value...] | template apply <name> <sale-id> | template list | template remove <name>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "template",
        "Manage reusable sales-row presets",
        TEMPLATE_USAGE,
        cmd_template,
    )]
}

fn cmd_template(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match required(args, 0, TEMPLATE_USAGE)? {
        "save" => {
            let name = required(args, 1, TEMPLATE_USAGE)?;
            let fields = parse_assignments(&args[2..])?;
            if context.workspace.templates_mut().save_template(name, fields)? {
                output::success(format!("Template `{}` saved.", name.trim()));
            } else {
                output::warning("Template name cannot be blank.");
            }
        }
        "apply" => {
            let name = required(args, 1, TEMPLATE_USAGE)?;
            let id = RowId::new(required(args, 2, TEMPLATE_USAGE)?);
            apply(&mut context.workspace, name, &id)?;
        }
        "list" => list(&context.workspace),
        "remove" => {
            let name = required(args, 1, TEMPLATE_USAGE)?;
            if context.workspace.templates_mut().remove_template(name)? {
                output::success(format!("Template `{}` removed.", name.trim()));
            } else {
                output::warning(format!("No template named `{name}`."));
            }
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown action `{other}`; usage: {TEMPLATE_USAGE}"
            )))
        }
    }
    Ok(())
}

fn apply(workspace: &mut Workspace, name: &str, id: &RowId) -> CommandResult {
    let Some(fields) = workspace.templates().get(name).map(|t| t.fields.clone()) else {
        output::warning(format!("No template named `{name}`."));
        return Ok(());
    };
    if workspace.ledger_mut().update_row(id, fields)? {
        output::success(format!("Applied `{}` to {id}.", name.trim()));
    } else {
        output::warning(format!("No sale `{id}`."));
    }
    Ok(())
}

fn list(workspace: &Workspace) {
    let templates = workspace.templates().list_templates();
    if templates.is_empty() {
        output::info("No templates saved.");
        return;
    }
    let rows: Vec<Vec<String>> = templates
        .iter()
        .map(|template| vec![template.name.clone(), describe(workspace, &template.fields)])
        .collect();
    output::table(&["Template", "Fields"], &[Align::Left, Align::Left], &rows);
}

fn describe(workspace: &Workspace, fields: &SalesPatch) -> String {
    let mut parts = Vec::new();
    if let Some(name) = &fields.name {
        parts.push(format!("name={name}"));
    }
    for (label, value) in [
        ("qris", fields.qris),
        ("transfer", fields.transfer),
        ("cash", fields.cash),
    ] {
        if let Some(value) = value {
            parts.push(format!("{label}={}", workspace.format_amount(value)));
        }
    }
    if parts.is_empty() {
        "-".into()
    } else {
        parts.join(", ")
    }
}

/// Parses `field=value` pairs into a patch.
fn parse_assignments(args: &[&str]) -> Result<SalesPatch, CommandError> {
    let mut patch = SalesPatch::new();
    for arg in args {
        let (field, value) = arg.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected field=value, got `{arg}`"))
        })?;
        let field: SalesField = field.parse()?;
        patch.set_field(field, value);
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_fill_only_named_fields() {
        let patch = parse_assignments(&["qris=5000", "name=Vans Old Skool"]).unwrap();
        assert_eq!(patch.qris, Some(5_000.0));
        assert_eq!(patch.name.as_deref(), Some("Vans Old Skool"));
        assert_eq!(patch.cash, None);
    }

    #[test]
    fn malformed_assignment_is_rejected() {
        assert!(matches!(
            parse_assignments(&["qris"]),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            parse_assignments(&["size=42"]),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}

use ws_core::{chart::short_label, ChartSeries};
use ws_domain::{amount, Channel, Collection, ExpenseField, ExpensePatch, RowId, SalesField, SalesPatch};

use super::{required, CommandDefinition};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Align};

const SALE_USAGE: &str = "sale add <name> [qris] [transfer] [cash] | sale set <id> <field> <value>";
const EXPENSE_USAGE: &str = "expense add <name> [amount] | expense set <id> <field> <value>";
const REMOVE_USAGE: &str = "remove sale|expense <id>";
const CHART_WIDTH: f64 = 40.0;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("sale", "Add or edit a sales row", SALE_USAGE, cmd_sale),
        CommandDefinition::new("expense", "Add or edit an expense row", EXPENSE_USAGE, cmd_expense),
        CommandDefinition::new("remove", "Remove a row by id", REMOVE_USAGE, cmd_remove),
        CommandDefinition::new("list", "Show sales and expense rows", "list [sales|expenses]", cmd_list),
        CommandDefinition::new("totals", "Show channel totals and remaining cash", "totals [--json]", cmd_totals),
        CommandDefinition::new("chart", "Draw per-row channel bars", "chart", cmd_chart),
        CommandDefinition::new("reset", "Delete all sales and expense rows", "reset", cmd_reset),
    ]
}

fn cmd_sale(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match required(args, 0, SALE_USAGE)? {
        "add" => {
            let mut draft = SalesPatch::new().name(args.get(1).copied().unwrap_or_default());
            let channels = [SalesField::Qris, SalesField::Transfer, SalesField::Cash];
            for (field, raw) in channels.into_iter().zip(args.iter().skip(2)) {
                draft.set_field(field, raw);
            }
            let row = context.workspace.ledger_mut().add_sales_row(draft)?;
            output::success(format!("Sale added: {}", row.id));
        }
        "set" => {
            let id = RowId::new(required(args, 1, SALE_USAGE)?);
            let field: SalesField = required(args, 2, SALE_USAGE)?.parse()?;
            let value = required(args, 3, SALE_USAGE)?;
            let patch = SalesPatch::new().with_field(field, value);
            report_update(context.workspace.ledger_mut().update_row(&id, patch)?, &id);
        }
        other => return Err(unknown_action(other, SALE_USAGE)),
    }
    Ok(())
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match required(args, 0, EXPENSE_USAGE)? {
        "add" => {
            let name = args.get(1).copied().unwrap_or_default();
            let value = args.get(2).map(|raw| amount::parse(raw)).unwrap_or_default();
            let draft = ExpensePatch::new().name(name).amount(value);
            let row = context.workspace.ledger_mut().add_expense_row(draft)?;
            output::success(format!("Expense added: {}", row.id));
        }
        "set" => {
            let id = RowId::new(required(args, 1, EXPENSE_USAGE)?);
            let field: ExpenseField = required(args, 2, EXPENSE_USAGE)?.parse()?;
            let value = required(args, 3, EXPENSE_USAGE)?;
            let patch = ExpensePatch::new().with_field(field, value);
            report_update(context.workspace.ledger_mut().update_row(&id, patch)?, &id);
        }
        other => return Err(unknown_action(other, EXPENSE_USAGE)),
    }
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let collection: Collection = required(args, 0, REMOVE_USAGE)?.parse()?;
    let id = RowId::new(required(args, 1, REMOVE_USAGE)?);
    if context.workspace.ledger_mut().remove_row(collection, &id)? {
        output::success(format!("Removed {id} from {collection}."));
    } else {
        output::warning(format!("No row `{id}` in {collection}."));
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let only = args.first().map(|raw| raw.parse::<Collection>()).transpose()?;
    let workspace = &context.workspace;
    let ledger = workspace.ledger();

    if only != Some(Collection::Expenses) {
        output::section("Sales");
        let rows: Vec<Vec<String>> = ledger
            .sales()
            .iter()
            .map(|row| {
                vec![
                    row.id.to_string(),
                    row.name.clone(),
                    workspace.format_amount(row.qris),
                    workspace.format_amount(row.transfer),
                    workspace.format_amount(row.cash),
                    workspace.format_amount(row.subtotal()),
                ]
            })
            .collect();
        output::table(
            &["ID", "Name", "QRIS", "Transfer", "Cash", "Subtotal"],
            &[Align::Left, Align::Left, Align::Right, Align::Right, Align::Right, Align::Right],
            &rows,
        );
    }

    if only != Some(Collection::Sales) {
        output::section("Expenses");
        let rows: Vec<Vec<String>> = ledger
            .expenses()
            .iter()
            .map(|row| {
                vec![
                    row.id.to_string(),
                    row.name.clone(),
                    workspace.format_amount(row.amount),
                ]
            })
            .collect();
        output::table(&["ID", "Expense", "Amount"], &[Align::Left, Align::Left, Align::Right], &rows);
    }
    Ok(())
}

fn cmd_totals(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let workspace = &context.workspace;
    let totals = workspace.ledger().totals();
    if args.first() == Some(&"--json") {
        let json = serde_json::to_string_pretty(&totals).map_err(ws_core::CoreError::from)?;
        output::info(json);
        return Ok(());
    }

    output::section("Totals");
    let rows = vec![
        vec!["QRIS".to_string(), workspace.format_amount(totals.qris_sum)],
        vec!["Transfer".to_string(), workspace.format_amount(totals.transfer_sum)],
        vec!["Cash".to_string(), workspace.format_amount(totals.cash_sum)],
        vec!["Total in".to_string(), workspace.format_amount(totals.total_in)],
        vec!["Expenses".to_string(), workspace.format_amount(totals.expense_sum)],
        vec!["Remaining cash".to_string(), workspace.format_amount(totals.net_cash)],
    ];
    output::table(&["", "Amount"], &[Align::Left, Align::Right], &rows);
    Ok(())
}

fn cmd_chart(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let series = ChartSeries::from_rows(context.workspace.ledger().sales());
    if series.is_empty() {
        output::info("No sales rows to chart.");
        return Ok(());
    }

    output::section("Sales by channel");
    let ticks = series
        .ticks()
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" | ");
    output::info(format!("Scale: {ticks}"));
    for (index, label) in series.labels.iter().enumerate() {
        for channel in Channel::ALL {
            let value = series.values(channel)[index];
            let bar = "#".repeat(series.scale(value, CHART_WIDTH).round() as usize);
            let name = if channel == Channel::Qris {
                short_label(label)
            } else {
                String::new()
            };
            output::info(format!("{name:<9} {channel:<8} {bar} {}", context.workspace.format_amount(value)));
        }
    }
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.workspace.ledger_mut().clear()?;
    output::success("Ledger cleared. Templates were kept.");
    Ok(())
}

fn report_update(changed: bool, id: &RowId) {
    if changed {
        output::success(format!("Updated {id}."));
    } else {
        output::warning(format!("No row `{id}`."));
    }
}

fn unknown_action(action: &str, usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("unknown action `{action}`; usage: {usage}"))
}

//! Comma-separated export of row collections, and the matching import.

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use ws_domain::{amount, ExpensePatch, ExpenseRow, SalesPatch, SalesRow};

use crate::{CoreError, CoreResult};

pub const SALES_HEADER: [&str; 4] = ["Name", "QRIS", "Transfer", "Cash"];
pub const EXPENSE_HEADER: [&str; 2] = ["Expense", "Amount"];

pub fn sales_to_csv(rows: &[SalesRow]) -> CoreResult<String> {
    let records = rows.iter().map(|row| {
        vec![
            row.name.clone(),
            plain_decimal(row.qris),
            plain_decimal(row.transfer),
            plain_decimal(row.cash),
        ]
    });
    render(&SALES_HEADER, records)
}

pub fn expenses_to_csv(rows: &[ExpenseRow]) -> CoreResult<String> {
    let records = rows
        .iter()
        .map(|row| vec![row.name.clone(), plain_decimal(row.amount)]);
    render(&EXPENSE_HEADER, records)
}

/// Parses text produced by [`sales_to_csv`]. Ids are not exported, so rows come back as
/// patches ready for the ledger store.
pub fn parse_sales_csv(text: &str) -> CoreResult<Vec<SalesPatch>> {
    parse(text, &SALES_HEADER, |record| {
        SalesPatch::new()
            .name(field(record, 0))
            .qris(amount::parse(field(record, 1)))
            .transfer(amount::parse(field(record, 2)))
            .cash(amount::parse(field(record, 3)))
    })
}

pub fn parse_expenses_csv(text: &str) -> CoreResult<Vec<ExpensePatch>> {
    parse(text, &EXPENSE_HEADER, |record| {
        ExpensePatch::new()
            .name(field(record, 0))
            .amount(amount::parse(field(record, 1)))
    })
}

/// Download name for a table title: whitespace runs become `_`.
pub fn export_file_name(title: &str) -> String {
    let stem = title.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() {
        "export.csv".into()
    } else {
        format!("{stem}.csv")
    }
}

/// Decimal text without exponent or a trailing `.0`.
pub fn plain_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn render(header: &[&str], records: impl Iterator<Item = Vec<String>>) -> CoreResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for record in records {
        writer.write_record(&record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| CoreError::Csv(err.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|err| CoreError::Csv(err.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

fn parse<T>(
    text: &str,
    expected: &[&str],
    build: impl Fn(&StringRecord) -> T,
) -> CoreResult<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let header = reader.headers()?.clone();
    let matches = header.len() == expected.len()
        && header
            .iter()
            .zip(expected)
            .all(|(found, wanted)| found.trim().eq_ignore_ascii_case(wanted));
    if !matches {
        return Err(CoreError::Csv(format!(
            "unexpected header `{}` (expected `{}`)",
            header.iter().collect::<Vec<_>>().join(","),
            expected.join(",")
        )));
    }
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(build(&record?));
    }
    Ok(rows)
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ws_domain::{LedgerRow, RowId};

    fn sale(name: &str, qris: f64, transfer: f64, cash: f64) -> SalesRow {
        SalesRow::from_patch(
            RowId::new(name),
            &SalesPatch::new()
                .name(name)
                .qris(qris)
                .transfer(transfer)
                .cash(cash),
        )
    }

    #[test]
    fn sales_csv_has_fixed_header_and_plain_numbers() {
        let csv = sales_to_csv(&[sale("Shoe A", 100_000.0, 0.0, 50_000.0)]).unwrap();
        assert_eq!(csv, "Name,QRIS,Transfer,Cash\nShoe A,100000,0,50000");
    }

    #[test]
    fn names_with_delimiters_and_quotes_are_escaped() {
        let csv = sales_to_csv(&[sale("Nike \"Air\", Max", 1.5, 0.0, 0.0)]).unwrap();
        assert_eq!(
            csv,
            "Name,QRIS,Transfer,Cash\n\"Nike \"\"Air\"\", Max\",1.5,0,0"
        );
    }

    #[test]
    fn export_parses_back_to_same_values() {
        let rows = vec![
            sale("Adidas, Samba", 150_000.0, 25_000.5, 0.0),
            sale("Say \"hi\"", 0.0, 0.0, 1_250_000.0),
            sale("Line\nbreak", 7.0, 8.0, 9.0),
        ];
        let parsed = parse_sales_csv(&sales_to_csv(&rows).unwrap()).unwrap();
        assert_eq!(parsed.len(), rows.len());
        for (patch, row) in parsed.iter().zip(&rows) {
            assert_eq!(patch.name.as_deref(), Some(row.name.as_str()));
            assert_eq!(patch.qris, Some(row.qris));
            assert_eq!(patch.transfer, Some(row.transfer));
            assert_eq!(patch.cash, Some(row.cash));
        }
    }

    #[test]
    fn expenses_round_trip() {
        let rows = vec![ExpenseRow::from_patch(
            RowId::new("e1"),
            &ExpensePatch::new().name("Box, large").amount(20_000.0),
        )];
        let csv = expenses_to_csv(&rows).unwrap();
        assert!(csv.starts_with("Expense,Amount\n"));
        let parsed = parse_expenses_csv(&csv).unwrap();
        assert_eq!(parsed[0].name.as_deref(), Some("Box, large"));
        assert_eq!(parsed[0].amount, Some(20_000.0));
    }

    #[test]
    fn wrong_header_is_rejected() {
        let err = parse_expenses_csv("Name,QRIS,Transfer,Cash\nA,1,2,3").unwrap_err();
        assert!(matches!(err, CoreError::Csv(_)));
    }

    #[test]
    fn file_names_collapse_whitespace() {
        assert_eq!(export_file_name("Sales  Report"), "Sales_Report.csv");
        assert_eq!(export_file_name("  "), "export.csv");
    }
}

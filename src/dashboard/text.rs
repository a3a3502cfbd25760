//! Plain-text renderings for the terminal.

use std::fmt::Write;

use crate::{
    aggregation::Aggregates, category::Category, html::format_currency,
    transaction::Transaction,
};

/// The summary, category totals and month totals as aligned text.
pub fn dashboard_text(aggregates: &Aggregates) -> String {
    let mut out = String::new();
    let summary = &aggregates.summary;

    let _ = writeln!(out, "{:<10}{:>16}", "Income", format_currency(summary.income));
    let _ = writeln!(out, "{:<10}{:>16}", "Expense", format_currency(summary.expense));
    let _ = writeln!(out, "{:<10}{:>16}", "Balance", format_currency(summary.balance));

    if !aggregates.by_category.is_empty() {
        let _ = writeln!(out, "\nCategory Breakdown");
        for (category, total) in aggregates.by_category.iter() {
            let _ = writeln!(out, "  {:<20}{:>16}", category, format_currency(total));
        }
    }

    if !aggregates.by_month.is_empty() {
        let _ = writeln!(out, "\nMonthly Overview");
        let _ = writeln!(out, "  {:<6}{:>16}{:>16}", "Month", "Income", "Expense");
        for (label, totals) in aggregates.by_month.iter() {
            let _ = writeln!(
                out,
                "  {:<6}{:>16}{:>16}",
                label,
                format_currency(totals.income),
                format_currency(totals.expense)
            );
        }
    }

    out
}

/// One line per transaction, with a header.
pub fn transactions_text(transactions: &[Transaction]) -> String {
    let mut out = format!(
        "{:<34}{:<16}{:<10}{:>14}  {:<12}{}\n",
        "ID", "Category", "Type", "Amount", "Date", "Note"
    );

    for transaction in transactions {
        let date = transaction
            .date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_owned());
        let _ = writeln!(
            out,
            "{:<34}{:<16}{:<10}{:>14}  {:<12}{}",
            transaction.id,
            transaction.category,
            transaction.kind,
            format_currency(transaction.amount),
            date,
            transaction.note.as_deref().unwrap_or("-")
        );
    }

    out
}

/// One line per category, with a header.
pub fn categories_text(categories: &[Category]) -> String {
    let mut out = format!("{:<34}{:<20}{}\n", "ID", "Name", "Type");

    for category in categories {
        let _ = writeln!(out, "{:<34}{:<20}{}", category.id, category.name, category.kind);
    }

    out
}

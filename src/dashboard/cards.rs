//! The income, expense and balance cards at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    aggregation::Summary,
    html::{CARD_STYLE, format_currency},
};

const POSITIVE_STYLE: &str = "text-green-600 dark:text-green-400";
const NEGATIVE_STYLE: &str = "text-red-600 dark:text-red-400";

struct Card {
    title: &'static str,
    amount: f64,
    style: &'static str,
}

pub(super) fn summary_cards(summary: &Summary) -> Markup {
    let balance_style = if summary.balance >= 0.0 {
        POSITIVE_STYLE
    } else {
        NEGATIVE_STYLE
    };

    let cards = [
        Card {
            title: "Income",
            amount: summary.income,
            style: POSITIVE_STYLE,
        },
        Card {
            title: "Expense",
            amount: summary.expense,
            style: NEGATIVE_STYLE,
        },
        Card {
            title: "Balance",
            amount: summary.balance,
            style: balance_style,
        },
    ];

    html! {
        section id="summary" class="w-full flex flex-col md:flex-row gap-4 mb-4"
        {
            @for card in &cards {
                div class=(CARD_STYLE) data-card=(card.title)
                {
                    h3 class="text-sm font-medium text-gray-500 dark:text-gray-400" { (card.title) }
                    p class={"text-2xl font-bold " (card.style)} { (format_currency(card.amount)) }
                }
            }
        }
    }
}

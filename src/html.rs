//! Shared HTML layout, styles and number formatting for the rendered reports.

use maud::{DOCTYPE, Markup, PreEscaped, html};

/// The ECharts build used to draw the dashboard charts.
pub const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

/// The style of a summary card.
pub const CARD_STYLE: &str = "flex-1 p-4 rounded-lg shadow bg-white dark:bg-gray-800";

/// The style of a table header row.
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";
/// The style of a table body row.
pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";
/// The padding of table cells.
pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

/// The container that centers page content.
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// Extra elements for the `<head>` of a page.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

/// Wrap `content` in a complete HTML document.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Expense Manager" }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

/// Format `number` as rupees with thousands separators and two decimals,
/// e.g. "₹1,234.50" or "-₹12.00".
///
/// Non-finite numbers are shown as zero.
pub fn format_currency(number: f64) -> String {
    let number = if number.is_finite() { number } else { 0.0 };
    let digits = format!("{:.2}", number.abs());
    let (rupees, paise) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let sign = if number < 0.0 && digits != "0.00" { "-" } else { "" };

    format!("{sign}₹{}.{paise}", group_thousands(rupees))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

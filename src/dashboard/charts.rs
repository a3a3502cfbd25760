//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations of the filtered transactions:
//! - **Category Breakdown**: a pie chart of the total amount per category
//! - **Monthly Overview**: income and expense bars per month
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Legend, Title},
    element::{AxisType, Color, ItemStyle, Tooltip, Trigger},
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregation::{CategoryBreakdown, MonthlyBreakdown},
    html::HeadElement,
};

/// The colors of the category slices, reused in order.
pub const CATEGORY_COLORS: [&str; 4] = ["#4CAF50", "#FF5722", "#2196F3", "#FFC107"];
/// The color of the income bars.
pub const INCOME_COLOR: &str = "#4CAF50";
/// The color of the expense bars.
pub const EXPENSE_COLOR: &str = "#FF5722";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[300px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Escape `<` in chart options so text such as a category named
/// `</script>` cannot end the script element early.
fn script_safe_json(options: &str) -> String {
    options.replace('<', "\\u003c")
}

/// Generates JavaScript initialization code for dashboard charts.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});
                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id,
                script_safe_json(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Build the dashboard charts.
pub(super) fn dashboard_charts(
    by_category: &CategoryBreakdown,
    by_month: &MonthlyBreakdown,
) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "category-breakdown-chart",
            options: category_chart(by_category).to_string(),
        },
        DashboardChart {
            id: "monthly-overview-chart",
            options: monthly_chart(by_month).to_string(),
        },
    ]
}

pub(super) fn category_chart(by_category: &CategoryBreakdown) -> Chart {
    let data: Vec<(f64, &str)> = by_category
        .iter()
        .map(|(category, total)| (total, category))
        .collect();

    Chart::new()
        .title(Title::new().text("Category Breakdown"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("0"))
        .color(CATEGORY_COLORS.iter().map(|color| Color::from(*color)).collect())
        .series(Pie::new().name("Amount").radius("60%").data(data))
}

pub(super) fn monthly_chart(by_month: &MonthlyBreakdown) -> Chart {
    let labels: Vec<&str> = by_month.iter().map(|(label, _)| label).collect();
    let income: Vec<f64> = by_month.iter().map(|(_, totals)| totals.income).collect();
    let expense: Vec<f64> = by_month.iter().map(|(_, totals)| totals.expense).collect();

    Chart::new()
        .title(Title::new().text("Monthly Overview"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new().bottom("0"))
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            bar::Bar::new()
                .name("income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .data(income),
        )
        .series(
            bar::Bar::new()
                .name("expense")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .data(expense),
        )
}

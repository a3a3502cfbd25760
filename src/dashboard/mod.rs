//! The dashboard report: summary cards, charts and a paginated table of the
//! transactions that match the current filters.

mod cards;
mod charts;
mod tables;
mod text;

pub use charts::{CATEGORY_COLORS, EXPENSE_COLOR, INCOME_COLOR};
pub use text::{categories_text, dashboard_text, transactions_text};

use maud::{Markup, html};

use crate::{
    aggregation::{Aggregates, FilterCriteria},
    auth::Session,
    html::{ECHARTS_SCRIPT_URL, HeadElement, PAGE_CONTAINER_STYLE, base},
    navigation::{NavBar, Screen},
    pagination::{PageState, PaginationConfig},
    transaction::Transaction,
};

use cards::summary_cards;
use charts::{charts_script, charts_view, dashboard_charts};
use tables::{pagination_controls, transactions_table};

/// Everything needed to render the dashboard for one viewer.
pub struct DashboardView<'a> {
    session: &'a Session,
    criteria: &'a FilterCriteria,
    page: PageState,
    config: &'a PaginationConfig,
    aggregates: Aggregates,
}

impl<'a> DashboardView<'a> {
    /// Aggregate `transactions` under `criteria` for display on `page`.
    pub fn new(
        session: &'a Session,
        transactions: &[Transaction],
        criteria: &'a FilterCriteria,
        page: PageState,
        config: &'a PaginationConfig,
    ) -> Self {
        Self {
            session,
            criteria,
            page,
            config,
            aggregates: Aggregates::compute(transactions, criteria),
        }
    }

    /// The totals and groupings behind the view.
    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    /// The filtered transactions on the current page.
    pub fn page_rows(&self) -> &[Transaction] {
        self.page.slice(&self.aggregates.filtered)
    }

    /// Render the full HTML document.
    pub fn into_html(self) -> Markup {
        let nav_bar = NavBar::new(Screen::Dashboard, self.session).into_html();
        let aggregates = &self.aggregates;

        let charts = dashboard_charts(&aggregates.by_category, &aggregates.by_month);
        let has_data = !aggregates.filtered.is_empty();
        let mut scripts = Vec::new();
        if has_data {
            scripts.push(HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()));
            scripts.push(charts_script(&charts));
        }

        let content = html! {
            (nav_bar)

            div class=(PAGE_CONTAINER_STYLE)
            {
                div class="w-full max-w-5xl"
                {
                    h1 class="text-2xl font-bold mb-4" { "Dashboard" }

                    (filter_summary(self.criteria))
                    (summary_cards(&aggregates.summary))

                    @if has_data {
                        (charts_view(&charts))
                    } @else {
                        p id="no-data" class="mb-4 text-gray-500 dark:text-gray-400"
                        {
                            "No transactions to chart yet."
                        }
                    }

                    (transactions_table(self.page_rows()))
                    (pagination_controls(
                        &self.page,
                        aggregates.filtered.len(),
                        self.criteria,
                        self.config,
                    ))
                }
            }
        };

        base("Dashboard", &scripts, &content)
    }
}

fn filter_summary(criteria: &FilterCriteria) -> Markup {
    html! {
        section id="filters" class="mb-4 text-sm text-gray-600 dark:text-gray-300"
        {
            @if criteria.is_empty() {
                "Showing all transactions."
            } @else {
                "Showing transactions"
                @if !criteria.query.is_empty() {
                    " matching \"" (criteria.query) "\""
                }
                @if let Some(from) = criteria.date_from {
                    " from " (from)
                }
                @if let Some(to) = criteria.date_to {
                    " to " (to)
                }
                "."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        aggregation::FilterCriteria,
        dashboard::DashboardView,
        pagination::{PageState, PaginationConfig},
        test_utils::{assert_valid_html, test_session},
        transaction::{Transaction, TransactionKind},
    };

    fn transactions() -> Vec<Transaction> {
        (1..=15)
            .map(|day| {
                Transaction::build(TransactionKind::Expense, "Food", day as f64)
                    .id(&format!("t{day}"))
                    .date(date!(2024 - 01 - 01).replace_day(day).unwrap())
                    .finalise()
            })
            .chain([Transaction::build(TransactionKind::Income, "Salary", 1000.0)
                .id("salary")
                .date(date!(2024 - 02 - 01))
                .finalise()])
            .collect()
    }

    #[test]
    fn renders_cards_charts_and_first_page() {
        let session = test_session("user-1");
        let criteria = FilterCriteria::new();
        let config = PaginationConfig::default();
        let transactions = transactions();

        let view = DashboardView::new(
            &session,
            &transactions,
            &criteria,
            PageState::new(&config),
            &config,
        );
        let html = Html::parse_document(&view.into_html().into_string());
        assert_valid_html(&html);

        let rows = Selector::parse("#transactions tbody tr").unwrap();
        assert_eq!(html.select(&rows).count(), 10);

        let charts = Selector::parse("#category-breakdown-chart, #monthly-overview-chart").unwrap();
        assert_eq!(html.select(&charts).count(), 2);

        let text = html.html();
        assert!(text.contains("₹1,000.00"));
        assert!(text.contains("echarts.init"));
    }

    #[test]
    fn filters_reduce_rows_and_totals() {
        let session = test_session("user-1");
        let criteria = FilterCriteria::new().query("salary");
        let config = PaginationConfig::default();
        let transactions = transactions();

        let view = DashboardView::new(
            &session,
            &transactions,
            &criteria,
            PageState::new(&config),
            &config,
        );

        assert_eq!(view.page_rows().len(), 1);
        assert_eq!(view.aggregates().summary.expense, 0.0);

        let html = Html::parse_document(&view.into_html().into_string());
        assert!(html.html().contains("matching \"salary\""));
    }

    #[test]
    fn empty_dashboard_has_no_charts() {
        let session = test_session("user-1");
        let criteria = FilterCriteria::new();
        let config = PaginationConfig::default();

        let view = DashboardView::new(&session, &[], &criteria, PageState::new(&config), &config);
        let html = Html::parse_document(&view.into_html().into_string());
        assert_valid_html(&html);

        let no_data = Selector::parse("#no-data").unwrap();
        assert_eq!(html.select(&no_data).count(), 1);
        assert!(!html.html().contains("echarts.init"));
    }

    #[test]
    fn category_names_cannot_inject_markup() {
        let session = test_session("user-1");
        let criteria = FilterCriteria::new();
        let config = PaginationConfig::default();
        let transactions = [Transaction::build(
            TransactionKind::Expense,
            "</script><script>alert(1)</script>",
            5.0,
        )
        .id("t1")
        .date(date!(2024 - 01 - 01))
        .finalise()];

        let view = DashboardView::new(
            &session,
            &transactions,
            &criteria,
            PageState::new(&config),
            &config,
        );
        let text = view.into_html().into_string();

        assert!(!text.contains("<script>alert(1)</script>"));
        assert!(text.contains("&lt;/script&gt;&lt;script&gt;alert(1)&lt;/script&gt;"));
    }
}

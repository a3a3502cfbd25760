//! The transactions table and its pagination controls.

use maud::{Markup, html};

use crate::{
    aggregation::FilterCriteria,
    date::format_date,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    pagination::{PageState, PaginationConfig, PaginationIndicator, create_pagination_indicators},
    transaction::Transaction,
};

const PAGE_LINK_STYLE: &str = "px-3 py-1 rounded border border-gray-300 dark:border-gray-600 \
    hover:bg-gray-100 dark:hover:bg-gray-700";
const CURRENT_PAGE_STYLE: &str = "px-3 py-1 rounded border border-blue-600 bg-blue-600 text-white";

/// The query string for `page`, keeping the active filters.
fn page_href(page: usize, page_size: usize, criteria: &FilterCriteria) -> String {
    let mut params = vec![("page", page.to_string()), ("page_size", page_size.to_string())];
    if !criteria.query.is_empty() {
        params.push(("query", criteria.query.clone()));
    }
    if let Some(from) = criteria.date_from {
        params.push(("from", format_date(from)));
    }
    if let Some(to) = criteria.date_to {
        params.push(("to", format_date(to)));
    }

    match serde_urlencoded::to_string(&params) {
        Ok(query) => format!("?{query}"),
        Err(error) => {
            tracing::error!("Could not encode the link to page {page}: {error}");
            format!("?page={page}&page_size={page_size}")
        }
    }
}

/// The rows of the current page, or a placeholder row when the page is empty.
pub(super) fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow w-full"
        {
            table id="transactions" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class=(TABLE_CELL_STYLE) { (transaction.kind) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @match transaction.date {
                                    Some(date) => (date),
                                    None => "-",
                                }
                            }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (transaction.note.as_deref().unwrap_or("-"))
                            }
                        }
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="5" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No transactions match the current filters."
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The page-size selector and page number buttons.
pub(super) fn pagination_controls(
    state: &PageState,
    item_count: usize,
    criteria: &FilterCriteria,
    config: &PaginationConfig,
) -> Markup {
    let page_count = state.page_count(item_count);
    let indicators = create_pagination_indicators(state.page(), page_count, config.max_pages);
    let page_size = state.page_size();

    html! {
        nav id="pagination" class="flex flex-wrap items-center justify-between gap-2 w-full mt-4"
        {
            div class="flex items-center gap-2"
            {
                span { "Rows per page:" }
                @for option in &config.page_size_options {
                    @if *option == page_size {
                        span class=(CURRENT_PAGE_STYLE) aria-current="true" { (option) }
                    } @else {
                        a href=(page_href(1, *option, criteria)) class=(PAGE_LINK_STYLE) { (option) }
                    }
                }
            }

            ul class="flex items-center gap-1"
            {
                @for indicator in &indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::CurrPage(page) => {
                                span class=(CURRENT_PAGE_STYLE) aria-current="page" { (page) }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(page_href(*page, page_size, criteria)) class=(PAGE_LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="px-2" { "..." }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_href(*page, page_size, criteria)) class=(PAGE_LINK_STYLE) { "Back" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_href(*page, page_size, criteria)) class=(PAGE_LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
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
        dashboard::tables::{pagination_controls, transactions_table},
        pagination::{PageState, PaginationConfig},
        test_utils::assert_valid_html,
        transaction::{Transaction, TransactionKind},
    };

    #[test]
    fn missing_note_shows_dash() {
        let transactions = [Transaction::build(TransactionKind::Expense, "Food", 12.5)
            .id("t1")
            .date(date!(2024 - 03 - 01))
            .finalise()];

        let html = Html::parse_fragment(&transactions_table(&transactions).into_string());
        assert_valid_html(&html);

        let selector = Selector::parse("tbody td").unwrap();
        let cells: Vec<String> = html
            .select(&selector)
            .map(|td| td.text().collect::<String>().trim().to_owned())
            .collect();

        assert_eq!(cells, ["Food", "expense", "₹12.50", "2024-03-01", "-"]);
    }

    #[test]
    fn empty_table_shows_placeholder() {
        let html = Html::parse_fragment(&transactions_table(&[]).into_string());

        assert!(html.html().contains("No transactions match the current filters."));
    }

    #[test]
    fn pagination_marks_current_page_and_size() {
        let config = PaginationConfig::default();
        let mut state = PageState::new(&config);
        state.set_page(2);

        let html =
            Html::parse_fragment(
                &pagination_controls(&state, 25, &FilterCriteria::new(), &config).into_string(),
            );
        assert_valid_html(&html);

        let current = Selector::parse("[aria-current=\"page\"]").unwrap();
        let size = Selector::parse("[aria-current=\"true\"]").unwrap();
        assert_eq!(
            html.select(&current).next().unwrap().text().collect::<String>(),
            "2"
        );
        assert_eq!(
            html.select(&size).next().unwrap().text().collect::<String>(),
            "10"
        );
        assert!(html.html().contains("Back"));
        assert!(html.html().contains("Next"));
    }

    #[test]
    fn page_links_keep_filters() {
        let config = PaginationConfig::default();
        let criteria = FilterCriteria::new()
            .query("food & drink")
            .date_from(date!(2024 - 01 - 01))
            .date_to(date!(2024 - 06 - 30));

        let html = Html::parse_fragment(
            &pagination_controls(&PageState::new(&config), 25, &criteria, &config).into_string(),
        );

        let links = Selector::parse("a").unwrap();
        let hrefs: Vec<&str> = html
            .select(&links)
            .filter_map(|link| link.value().attr("href"))
            .collect();

        assert!(!hrefs.is_empty());
        for href in hrefs {
            assert!(href.contains("query=food+%26+drink"), "{href}");
            assert!(href.contains("from=2024-01-01"), "{href}");
            assert!(href.contains("to=2024-06-30"), "{href}");
        }
    }
}

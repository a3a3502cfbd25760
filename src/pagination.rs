//! This module defines the common functionality for paging data.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified.
    pub default_page: usize,
    /// The number of rows to display per page when not specified.
    pub default_page_size: usize,
    /// The page sizes offered in the page-size selector.
    pub page_size_options: Vec<usize>,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            page_size_options: vec![10, 20, 40, 80],
            max_pages: 5,
        }
    }
}

/// Get page `page_index` of `items`, counting from 1.
///
/// Page `i` holds `items[(i - 1) * page_size..i * page_size]`, cut short at
/// the end of the list. A page index of zero, an index past the last page or a
/// page size of zero gives an empty page.
pub fn paginate<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    if page_index == 0 || page_size == 0 {
        return &[];
    }

    let start = (page_index - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(items.len());

    items.get(start..end).unwrap_or(&[])
}

/// The number of pages needed to show `item_count` items, `page_size` at a time.
///
/// Zero when there are no items or the page size is zero.
pub fn page_count(item_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }

    item_count.div_ceil(page_size)
}

/// The page a viewer is on and how many rows each page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page: usize,
    page_size: usize,
}

impl PageState {
    /// Start on the default page with the default page size.
    pub fn new(config: &PaginationConfig) -> Self {
        Self {
            page: config.default_page,
            page_size: config.default_page_size,
        }
    }

    /// The current page, counting from 1.
    pub fn page(&self) -> usize {
        self.page
    }

    /// The number of rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Go to `page`. Pages past the end show nothing.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// The rows of `items` on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.page, self.page_size)
    }

    /// The number of pages for `item_count` items.
    pub fn page_count(&self, item_count: usize) -> usize {
        page_count(item_count, self.page_size)
    }
}

/// An element of the page-number button row.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A link to another page.
    Page(usize),
    /// The page being shown.
    CurrPage(usize),
    /// A gap in the page numbers.
    Ellipsis,
    /// A link to the next page.
    NextButton(usize),
    /// A link to the previous page.
    BackButton(usize),
}

/// Build the page-number button row for `curr_page` of `page_count` pages,
/// showing at most `max_pages` numbers around the current page.
pub fn create_pagination_indicators(
    curr_page: usize,
    page_count: usize,
    max_pages: usize,
) -> Vec<PaginationIndicator> {
    if page_count == 0 {
        return Vec::new();
    }

    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        let back_page = (curr_page - 1).min(page_count);
        indicators.insert(0, PaginationIndicator::BackButton(back_page));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

#[cfg(test)]
mod paginate_tests {
    use crate::pagination::{PageState, PaginationConfig, page_count, paginate};

    #[test]
    fn second_page_of_five() {
        let items = [1, 2, 3, 4, 5];

        assert_eq!(paginate(&items, 2, 2), [3, 4]);
        assert_eq!(page_count(items.len(), 2), 3);
    }

    #[test]
    fn last_page_is_short() {
        assert_eq!(paginate(&[1, 2, 3, 4, 5], 3, 2), [5]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items = [1, 2, 3, 4, 5];

        assert!(paginate(&items, 0, 2).is_empty());
        assert!(paginate(&items, 4, 2).is_empty());
        assert!(paginate(&items, usize::MAX, 2).is_empty());
        assert!(paginate(&items, 1, 0).is_empty());
    }

    #[test]
    fn empty_list_has_no_pages() {
        let items: [u8; 0] = [];

        assert_eq!(page_count(items.len(), 10), 0);
        assert_eq!(page_count(10, 0), 0);
        assert!(paginate(&items, 1, 10).is_empty());
    }

    #[test]
    fn pages_reconstruct_list() {
        let items: Vec<u32> = (0..23).collect();

        for page_size in 1..=30 {
            let count = page_count(items.len(), page_size);
            let rebuilt: Vec<u32> = (1..=count)
                .flat_map(|page| paginate(&items, page, page_size).iter().copied())
                .collect();

            assert_eq!(rebuilt, items, "page size {page_size}");
            assert!(paginate(&items, count + 1, page_size).is_empty());
        }
    }

    #[test]
    fn changing_page_size_resets_page() {
        let config = PaginationConfig::default();
        let mut state = PageState::new(&config);
        assert_eq!((state.page(), state.page_size()), (1, 10));

        state.set_page(3);
        state.set_page_size(20);

        assert_eq!((state.page(), state.page_size()), (1, 20));
    }

    #[test]
    fn default_options() {
        let config = PaginationConfig::default();

        assert_eq!(config.page_size_options, [10, 20, 40, 80]);
        assert_eq!(config.default_page_size, 10);
    }
}

#[cfg(test)]
mod indicator_tests {
    use crate::pagination::{PaginationIndicator, create_pagination_indicators};

    #[test]
    fn no_pages_no_indicators() {
        assert!(create_pagination_indicators(1, 0, 5).is_empty());
    }

    #[test]
    fn back_button_past_the_end_goes_to_last_page() {
        let got = create_pagination_indicators(7, 2, 5);

        assert_eq!(
            got,
            [
                PaginationIndicator::BackButton(2),
                PaginationIndicator::Page(1),
                PaginationIndicator::Page(2),
            ]
        );
    }

    #[test]
    fn shows_all_pages() {
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(1, 5, 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_both_buttons_and_trailing_ellipsis() {
        let want = [
            PaginationIndicator::BackButton(2),
            PaginationIndicator::Page(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::CurrPage(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(4),
        ];

        let got = create_pagination_indicators(3, 10, 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_right() {
        let want = [
            PaginationIndicator::BackButton(9),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Page(8),
            PaginationIndicator::Page(9),
            PaginationIndicator::CurrPage(10),
        ];

        let got = create_pagination_indicators(10, 10, 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_in_center() {
        let want = [
            PaginationIndicator::BackButton(4),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::CurrPage(5),
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(6),
        ];

        let got = create_pagination_indicators(5, 10, 5);

        assert_eq!(want, got.as_slice());
    }
}

use serde::Serialize;

/// Page size used by every paginated listing.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Page numbers to render, `None` standing for an ellipsis.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let current_page = current_page.min(last_page);
    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current)
        .saturating_add(1)
        .min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    /// Wraps one page of `items` out of `total` matching rows.
    pub fn new(items: Vec<T>, current_page: usize, total: usize) -> Self {
        let current_page = current_page.max(1);
        let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            items,
            pages,
            page: current_page,
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pages: self.pages,
            page: self.page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pages_without_items() {
        let page: Paginated<i32> = Paginated::new(vec![], 1, 0);
        assert!(page.pages.is_empty());
        assert_eq!(page.page, 1);
    }

    #[test]
    fn zero_page_means_first() {
        let page = Paginated::new(vec![1], 0, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, vec![Some(1)]);
    }

    #[test]
    fn long_listings_get_ellipses() {
        let page = Paginated::new(vec![0; 20], 10, 20 * 20);
        assert_eq!(
            page.pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20),
            ]
        );
    }

    #[test]
    fn page_past_the_end_keeps_edges() {
        let page: Paginated<i32> = Paginated::new(vec![], usize::MAX, 3 * 20);
        assert_eq!(page.page, usize::MAX);
        assert_eq!(page.pages, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn map_keeps_navigation() {
        let page = Paginated::new(vec![1, 2], 1, 2).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 2);
    }
}

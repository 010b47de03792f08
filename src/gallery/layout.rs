use crate::constants::{MEDIUM_BREAKPOINT, WIDE_BREAKPOINT};

// Cards shown side by side for a viewport width
pub fn items_per_page(viewport_width: u32) -> usize {
    if viewport_width >= WIDE_BREAKPOINT {
        3
    } else if viewport_width >= MEDIUM_BREAKPOINT {
        2
    } else {
        1
    }
}

pub fn page_count(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints() {
        assert_eq!(items_per_page(1440), 3);
        assert_eq!(items_per_page(1024), 3);
        assert_eq!(items_per_page(1023), 2);
        assert_eq!(items_per_page(640), 2);
        assert_eq!(items_per_page(639), 1);
        assert_eq!(items_per_page(0), 1);
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(0, 3), 0);
        assert_eq!(page_count(7, 3), 3);
        assert_eq!(page_count(6, 3), 2);
        assert_eq!(page_count(5, 1), 5);
    }
}

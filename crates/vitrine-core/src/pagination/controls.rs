//! Desktop page-number controls
//!
//! Page indices are zero-based throughout: `Previous`, `Next` and numbered
//! buttons all report the index of the page they lead to.

/// One element of the desktop control strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Previous { enabled: bool },
    Page { index: usize, active: bool },
    Ellipsis,
    Next { enabled: bool },
}

/// Build the control strip for `current` out of `total` pages
///
/// At most `max_buttons` numbered/ellipsis slots are produced. The first and
/// last pages are always shown.
pub fn page_controls(current: usize, total: usize, max_buttons: usize) -> Vec<PageControl> {
    let mut controls = vec![PageControl::Previous {
        enabled: current > 0 && total > 0,
    }];

    if total > 0 {
        let current = current.min(total - 1);
        let page = |index| PageControl::Page {
            index,
            active: index == current,
        };

        if total <= max_buttons {
            controls.extend((0..total).map(page));
        } else {
            let last = total - 1;
            // Slots between the first and last page, ellipses included
            let side = max_buttons.saturating_sub(2).max(3);
            let middle = side - 2;
            let start = current.saturating_sub((middle - 1) / 2);
            let end = start + middle - 1;

            controls.push(page(0));
            // An ellipsis always hides at least two pages
            if start < 3 {
                controls.extend((1..side).map(page));
                controls.push(PageControl::Ellipsis);
            } else if end + 3 > last {
                controls.push(PageControl::Ellipsis);
                controls.extend((last + 1 - side..last).map(page));
            } else {
                controls.push(PageControl::Ellipsis);
                controls.extend((start..=end).map(page));
                controls.push(PageControl::Ellipsis);
            }
            controls.push(page(last));
        }
    }

    controls.push(PageControl::Next {
        enabled: current + 1 < total,
    });
    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compact rendering: pages as numbers, active in brackets, `..` for gaps
    fn render(controls: &[PageControl]) -> String {
        controls
            .iter()
            .filter_map(|c| match c {
                PageControl::Page { index, active: true } => Some(format!("[{index}]")),
                PageControl::Page { index, .. } => Some(index.to_string()),
                PageControl::Ellipsis => Some("..".to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_few_pages_all_shown() {
        let controls = page_controls(1, 4, 7);
        assert_eq!(render(&controls), "0 [1] 2 3");
        assert_eq!(controls[0], PageControl::Previous { enabled: true });
        assert_eq!(controls[5], PageControl::Next { enabled: true });
    }

    #[test]
    fn test_window_positions() {
        assert_eq!(render(&page_controls(0, 20, 7)), "[0] 1 2 3 4 .. 19");
        assert_eq!(render(&page_controls(5, 20, 7)), "0 .. 4 [5] 6 .. 19");
        assert_eq!(render(&page_controls(10, 20, 7)), "0 .. 9 [10] 11 .. 19");
        assert_eq!(render(&page_controls(19, 20, 7)), "0 .. 15 16 17 18 [19]");
    }

    #[test]
    fn test_never_exceeds_slot_budget() {
        for current in 0..30 {
            let controls = page_controls(current, 30, 7);
            let slots = controls
                .iter()
                .filter(|c| matches!(c, PageControl::Page { .. } | PageControl::Ellipsis))
                .count();
            assert!(slots <= 7, "current {current}: {slots} slots");
            assert!(controls.contains(&PageControl::Page {
                index: current,
                active: true
            }));
        }
    }

    #[test]
    fn test_small_window_positions() {
        assert_eq!(render(&page_controls(2, 10, 5)), "0 1 [2] .. 9");
        assert_eq!(render(&page_controls(3, 10, 5)), "0 .. [3] .. 9");
        assert_eq!(render(&page_controls(4, 6, 5)), "0 .. 3 [4] 5");
        assert_eq!(render(&page_controls(3, 8, 7)), "0 1 2 [3] 4 .. 7");
        assert_eq!(render(&page_controls(4, 8, 7)), "0 .. 3 [4] 5 6 7");
    }

    #[test]
    fn test_ellipsis_never_hides_a_single_page() {
        for max_buttons in 5..=9 {
            for total in 1..25 {
                for current in 0..total {
                    let controls = page_controls(current, total, max_buttons);
                    let pages: Vec<usize> = controls
                        .iter()
                        .filter_map(|c| match c {
                            PageControl::Page { index, .. } => Some(*index),
                            _ => None,
                        })
                        .collect();
                    let ellipses = controls
                        .iter()
                        .filter(|c| matches!(c, PageControl::Ellipsis))
                        .count();
                    let gaps = pages.windows(2).filter(|w| w[1] > w[0] + 1).count();
                    assert_eq!(ellipses, gaps, "{current}/{total} max {max_buttons}");
                    for w in pages.windows(2) {
                        assert!(
                            w[1] == w[0] + 1 || w[1] >= w[0] + 3,
                            "{current}/{total} max {max_buttons}: {}",
                            render(&controls)
                        );
                    }
                    assert!(pages.contains(&current));
                    assert!(pages.len() + ellipses <= max_buttons);
                }
            }
        }
    }

    #[test]
    fn test_edges_disable_prev_next() {
        let first = page_controls(0, 3, 7);
        assert_eq!(first[0], PageControl::Previous { enabled: false });
        let last = page_controls(2, 3, 7);
        assert_eq!(*last.last().unwrap(), PageControl::Next { enabled: false });
    }

    #[test]
    fn test_no_pages() {
        assert_eq!(
            page_controls(0, 0, 7),
            vec![
                PageControl::Previous { enabled: false },
                PageControl::Next { enabled: false }
            ]
        );
    }
}

//! Reading-order sort for barcode symbols
//!
//! Symbols are ordered by page. On the same page, two symbols whose centers
//! are less than `row_threshold` pixels apart vertically share a row and read
//! left to right; otherwise the higher one comes first.
//!
//! The pairwise rule is not transitive when rows chain (0 -> 20 -> 40), and
//! `sort_by` may panic on an inconsistent order. A stable insertion sort
//! applies it instead; the same input order always gives the same output.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::BarcodeSymbol;

/// Reading-order settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingOptions {
    /// Max vertical center distance (px) for two symbols to share a row
    pub row_threshold: f64,
}

impl Default for OrderingOptions {
    fn default() -> Self {
        Self {
            row_threshold: 30.0,
        }
    }
}

/// Sort symbols into page / row / left-to-right reading order.
/// The sort is stable: exact ties keep detection order.
pub fn sort_symbols(symbols: &mut [BarcodeSymbol], options: &OrderingOptions) {
    for i in 1..symbols.len() {
        let mut j = i;
        while j > 0 && reading_order(&symbols[j - 1], &symbols[j], options) == Ordering::Greater {
            symbols.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Pairwise reading-order comparison
pub fn reading_order(a: &BarcodeSymbol, b: &BarcodeSymbol, options: &OrderingOptions) -> Ordering {
    page_key(a).cmp(&page_key(b)).then_with(|| {
        if (a.center.y - b.center.y).abs() < options.row_threshold {
            a.center.x.total_cmp(&b.center.x)
        } else {
            a.center.y.total_cmp(&b.center.y)
        }
    })
}

/// Images have a single implicit page, which sorts first
fn page_key(symbol: &BarcodeSymbol) -> u32 {
    symbol.page.unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::EngineDetection;
    use crate::vision::Point2D;

    fn symbol(text: &str, page: Option<u32>, x: f64, y: f64) -> BarcodeSymbol {
        let mut s = BarcodeSymbol::from_detection(EngineDetection::new(text, "CODE_39"), page);
        s.center = Point2D::new(x, y);
        s
    }

    fn texts(symbols: &[BarcodeSymbol]) -> Vec<&str> {
        symbols.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_same_row_reads_left_to_right() {
        let mut symbols = vec![
            symbol("A", Some(1), 50.0, 10.0),
            symbol("B", Some(1), 10.0, 15.0),
            symbol("C", Some(1), 5.0, 200.0),
        ];

        sort_symbols(&mut symbols, &OrderingOptions::default());
        assert_eq!(texts(&symbols), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_pages_first() {
        let mut symbols = vec![
            symbol("p2-top", Some(2), 0.0, 0.0),
            symbol("p1-bottom", Some(1), 0.0, 900.0),
            symbol("p1-top", Some(1), 500.0, 0.0),
        ];

        sort_symbols(&mut symbols, &OrderingOptions::default());
        assert_eq!(texts(&symbols), vec!["p1-top", "p1-bottom", "p2-top"]);
    }

    #[test]
    fn test_row_boundary_is_exclusive() {
        let mut symbols = vec![
            symbol("upper-right", None, 100.0, 0.0),
            symbol("lower-left", None, 0.0, 30.0),
        ];

        sort_symbols(&mut symbols, &OrderingOptions::default());
        assert_eq!(texts(&symbols), vec!["upper-right", "lower-left"]);
    }

    #[test]
    fn test_pairwise_rule_within_a_row_band() {
        // b shares a row with both neighbours, a and c do not share one
        let mut symbols = vec![
            symbol("c", None, 0.0, 40.0),
            symbol("b", None, 300.0, 20.0),
            symbol("a", None, 200.0, 0.0),
        ];

        sort_symbols(&mut symbols, &OrderingOptions::default());
        assert_eq!(texts(&symbols), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_later_symbol_moves_ahead_in_its_row() {
        let mut symbols = vec![
            symbol("A", Some(1), 0.0, 0.0),
            symbol("B", Some(1), 100.0, 20.0),
            symbol("C", Some(1), 50.0, 45.0),
        ];

        sort_symbols(&mut symbols, &OrderingOptions::default());
        assert_eq!(texts(&symbols), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_reading_order_comparator() {
        let options = OrderingOptions::default();
        let left = symbol("l", Some(1), 0.0, 10.0);
        let right = symbol("r", Some(1), 90.0, 0.0);
        let below = symbol("d", Some(1), 0.0, 80.0);
        let next_page = symbol("n", Some(2), 0.0, 0.0);

        assert_eq!(reading_order(&left, &right, &options), Ordering::Less);
        assert_eq!(reading_order(&right, &below, &options), Ordering::Less);
        assert_eq!(reading_order(&next_page, &below, &options), Ordering::Greater);
        assert_eq!(reading_order(&left, &left.clone(), &options), Ordering::Equal);
    }

    #[test]
    fn test_cyclic_input_is_repeatable() {
        // Pairwise a<b, b<c, c<a: any order is inconsistent, but it must not
        // panic and must not vary between runs
        let input = vec![
            symbol("a", None, 0.0, 40.0),
            symbol("b", None, 50.0, 20.0),
            symbol("c", None, 100.0, 0.0),
        ];

        let mut first = input.clone();
        let mut second = input;
        sort_symbols(&mut first, &OrderingOptions::default());
        sort_symbols(&mut second, &OrderingOptions::default());
        assert_eq!(texts(&first), texts(&second));
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_sort_is_deterministic_under_permutation() {
        let base = vec![
            symbol("a", Some(1), 10.0, 100.0),
            symbol("b", Some(1), 400.0, 112.0),
            symbol("c", Some(1), 200.0, 95.0),
            symbol("d", Some(1), 50.0, 300.0),
            symbol("e", Some(2), 10.0, 5.0),
        ];

        let mut forward = base.clone();
        let mut backward: Vec<_> = base.into_iter().rev().collect();
        sort_symbols(&mut forward, &OrderingOptions::default());
        sort_symbols(&mut backward, &OrderingOptions::default());

        assert_eq!(texts(&forward), texts(&backward));
        assert_eq!(texts(&forward), vec!["a", "c", "b", "d", "e"]);
    }
}

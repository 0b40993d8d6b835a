//! Domain-specific assertion macros for ffa harnesses.
//!
//! These add context-rich failure messages that make it clear *which* record
//! or term broke an expectation.

// ---------------------------------------------------------------------------
// Term assertions
// ---------------------------------------------------------------------------

/// Assert that parsing `query` yields exactly `expected` terms.
///
/// ```rust
/// assert_terms!("ward: 5 smith", ["ward: 5", "smith"]);
/// ```
#[macro_export]
macro_rules! assert_terms {
    ($query:expr, [$($term:expr),* $(,)?]) => {{
        let query: &str = $query;
        let actual = ffa_core::search::parse_search_terms(query);
        let expected: Vec<String> = vec![$($term.to_string()),*];
        if actual != expected {
            panic!(
                "assert_terms! failed for {:?}:\n  expected: {:?}\n  actual:   {:?}",
                query, expected, actual
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Result-set assertions
// ---------------------------------------------------------------------------

/// Assert that every record in a result set satisfies a predicate.
///
/// ```rust
/// assert_results_all!(results, |r: &serde_json::Value| r["ward"] == 5);
/// ```
#[macro_export]
macro_rules! assert_results_all {
    ($results:expr, $pred:expr) => {{
        let results: &[&serde_json::Value] = &$results;
        let pred = $pred;
        let failing: Vec<&serde_json::Value> = results.iter().copied().filter(|r| !pred(*r)).collect();
        if !failing.is_empty() {
            panic!(
                "assert_results_all! failed: {} of {} records did not satisfy predicate.\n  first: {}",
                failing.len(),
                results.len(),
                failing[0]
            );
        }
    }};
}

/// Assert that a result set is drawn from `input`, in input order.
pub fn assert_ordered_subset(results: &[&serde_json::Value], input: &[serde_json::Value]) {
    let mut cursor = input.iter();
    for result in results {
        assert!(
            cursor.any(|candidate| std::ptr::eq(candidate, *result)),
            "result {result} is not in the input or is out of order"
        );
    }
}

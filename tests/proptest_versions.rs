//! Property-based tests using proptest
//!
//! These tests check version ordering, the version gate, sorting and batch
//! accounting over randomized inputs.

use manila_cli::api::version::ApiVersion;
use manila_cli::batch::run_batch;
use manila_cli::error::ApiError;
use manila_cli::output::sort_items;
use manila_cli::resource::{get_resource, Resource, SearchOpts};
use manila_cli::version_gate::{VersionGate, PATTERN_FILTERS};
use proptest::prelude::*;
use serde_json::json;

fn arb_version() -> impl Strategy<Value = ApiVersion> {
    (2u32..3, 0u32..80).prop_map(|(major, minor)| ApiVersion::new(major, minor))
}

/// Any subset of the pattern filters plus an always-allowed filter
fn arb_opts() -> impl Strategy<Value = SearchOpts> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(name_like, desc_like, desc, status)| {
            let mut opts = SearchOpts::new();
            opts.insert_flag("name~", name_like);
            opts.insert_flag("description~", desc_like);
            opts.insert_flag("description", desc);
            opts.insert_flag("status", status);
            opts
        },
    )
}

proptest! {
    /// Versions order numerically, never as strings ("2.9" < "2.10")
    #[test]
    fn version_order_matches_tuple_order(a in arb_version(), b in arb_version()) {
        prop_assert_eq!(a.cmp(&b), (a.major, a.minor).cmp(&(b.major, b.minor)));
    }

    /// Display and parse agree
    #[test]
    fn version_display_parses_back(v in arb_version()) {
        prop_assert_eq!(v.to_string().parse::<ApiVersion>().unwrap(), v);
    }

    /// If a version accepts some options, every later version does too
    #[test]
    fn gate_is_monotonic(a in arb_version(), b in arb_version(), opts in arb_opts()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        if VersionGate::new(low).check(&opts, PATTERN_FILTERS).is_ok() {
            prop_assert!(VersionGate::new(high).check(&opts, PATTERN_FILTERS).is_ok());
        }
    }

    /// A refusal names exactly the gated options that were present
    #[test]
    fn gate_reports_every_offending_param(minor in 0u32..36, opts in arb_opts()) {
        let result = VersionGate::new(ApiVersion::new(2, minor)).check(&opts, PATTERN_FILTERS);
        let present: Vec<String> = PATTERN_FILTERS
            .iter()
            .filter(|p| opts.contains(p.name))
            .map(|p| p.name.to_string())
            .collect();

        match result {
            Ok(()) => prop_assert!(present.is_empty()),
            Err(ApiError::UnsupportedByVersion { params, required, .. }) => {
                prop_assert_eq!(params, present);
                prop_assert_eq!(required, ApiVersion::new(2, 36));
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    /// k failures out of n targets, every target attempted
    #[test]
    fn batch_counts_failures(failing in prop::collection::vec(any::<bool>(), 1..20)) {
        let targets: Vec<String> = (0..failing.len()).map(|i| format!("s{}", i)).collect();
        let mut attempts = 0;

        let outcome = tokio_test::block_on(run_batch("delete snapshot", &targets, |target| {
            attempts += 1;
            let idx: usize = target[1..].parse().unwrap();
            let fail = failing[idx];
            async move {
                if fail {
                    Err(ApiError::command("boom"))
                } else {
                    Ok(())
                }
            }
        }));

        let expected = failing.iter().filter(|f| **f).count();
        prop_assert_eq!(attempts, failing.len());
        prop_assert_eq!(outcome.failed(), expected);

        let result = outcome.into_result("snapshots", "delete");
        if expected == 0 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result.unwrap_err().to_string(),
                format!("{} of {} snapshots failed to delete.", expected, failing.len())
            );
        }
    }

    /// Sorting by size ascending yields a non-decreasing sequence
    #[test]
    fn sort_by_size_is_ordered(sizes in prop::collection::vec(0u64..10_000, 0..50)) {
        let def = get_resource("snapshots").unwrap();
        let mut items: Vec<Resource> = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| {
                Resource::from_value(def, json!({"id": format!("s{}", i), "size": size})).unwrap()
            })
            .collect();

        sort_items(&mut items, "size:asc").unwrap();

        let sorted: Vec<u64> = items
            .iter()
            .map(|r| r.attr_display("size").parse().unwrap())
            .collect();
        prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    }
}

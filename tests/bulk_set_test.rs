use proptest::prelude::*;
use rand::Rng;
use rayon::prelude::*;
use samyama_structure::graph::{DetachedVertex, ElementKind, GraphStore};
use samyama_structure::process::BulkSet;
use samyama_structure::StructureError;

#[test]
fn test_correct_bulk_counts() {
    let mut set = BulkSet::new();
    set.add("marko");
    set.add("matthias");
    set.add_bulk("marko", 7);
    set.add("stephen");
    set.add("stephen");

    assert_eq!(set.get("marko"), 8);
    assert_eq!(set.get("matthias"), 1);
    assert_eq!(set.get("stephen"), 2);
    assert_eq!(set.size(), 11);
    assert_eq!(set.unique_size(), 3);

    let mut expected = vec!["marko"; 8];
    expected.push("matthias");
    expected.extend(["stephen"; 2]);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), expected);
}

#[test]
fn test_names_with_bulks() {
    let mut set = BulkSet::new();
    set.add_bulk("marko".to_string(), 1);
    set.add_bulk("matthias".to_string(), 1000);
    set.add_bulk("matthias".to_string(), 1000);
    set.add_bulk("stephen".to_string(), 1_000_000_000_000);

    assert_eq!(set.size(), 1_000_000_002_001);
    assert_eq!(set.unique_size(), 3);
    assert_eq!(set.get("marko"), 1);
    assert_eq!(set.get("matthias"), 2000);
    assert_eq!(set.get("stephen"), 1_000_000_000_000);
    assert_eq!(set.get("bob"), 0);

    // Lazy iteration: only a prefix of the trillion stephens is ever produced
    let prefix: Vec<&String> = set.iter().take(2002).collect();
    assert_eq!(prefix[0], "marko");
    assert!(prefix[1..2001].iter().all(|name| *name == "matthias"));
    assert_eq!(prefix[2001], "stephen");
}

#[test]
fn test_ten_million_random_booleans() {
    let mut rng = rand::thread_rng();
    let mut set = BulkSet::new();
    for _ in 0..10_000_000 {
        set.add(rng.gen::<bool>());
    }

    assert_eq!(set.size(), 10_000_000);
    assert_eq!(set.unique_size(), 2);
    assert_eq!(set.get(&true) + set.get(&false), 10_000_000);
}

#[test]
fn test_iteration_yields_size_items() {
    let set: BulkSet<i64> = [1, 2, 2, 3, 3, 3].into_iter().collect();
    let items: Vec<i64> = set.iter().copied().collect();
    assert_eq!(items, vec![1, 2, 2, 3, 3, 3]);
    assert_eq!(set.iter().count() as u64, set.size());
}

#[test]
fn test_negative_bulk_rejected() {
    let mut set = BulkSet::new();
    set.add("a");
    let err = set.try_add_bulk("a", -5).unwrap_err();
    assert!(matches!(err, StructureError::InvalidBulk(-5)));
    assert_eq!(set.size(), 1);
    assert_eq!(set.get("a"), 1);
}

#[test]
fn test_remove_whole_entry() {
    let mut set = BulkSet::new();
    set.add_bulk("a", 10);
    set.add_bulk("b", 5);
    assert_eq!(set.remove("a"), 10);
    assert_eq!(set.remove("a"), 0);
    assert_eq!(set.size(), 5);
    assert_eq!(set.unique_size(), 1);
}

#[test]
fn test_elements_fold_by_identity() {
    let mut store = GraphStore::new();
    let marko = store.add_vertex("person").unwrap();
    store.set_vertex_property(&marko, "name", "marko").unwrap();

    let mut set = BulkSet::new();
    let live = store.vertex(&marko).unwrap();
    set.add(DetachedVertex::detach(&live));
    // A bare reference with the same id lands in the same entry
    set.add_bulk(DetachedVertex::new(marko.clone(), "person"), 99);

    assert_eq!(set.unique_size(), 1);
    assert_eq!(set.size(), 100);
    assert_eq!(set.get(&DetachedVertex::new(marko, "other")), 100);
}

#[test]
fn test_parallel_branches_merge() {
    let kinds = [ElementKind::Vertex, ElementKind::Edge];

    let branches: Vec<BulkSet<String>> = (0..8u64)
        .into_par_iter()
        .map(|branch| {
            let mut set = BulkSet::new();
            for i in 0..1000u64 {
                let kind = kinds[((branch + i) % 2) as usize];
                set.add(kind.to_string());
            }
            set
        })
        .collect();

    let mut merged = BulkSet::new();
    for branch in &branches {
        for (value, bulk) in branch.iter_bulk() {
            merged.add_bulk(value.clone(), bulk);
        }
    }

    assert_eq!(merged.size(), 8000);
    assert_eq!(merged.unique_size(), 2);
    assert_eq!(merged.get("Vertex"), 4000);
    assert_eq!(merged.get("Edge"), 4000);
}

#[test]
fn test_serde_as_value_bulk_pairs() {
    let mut set = BulkSet::new();
    set.add_bulk("a".to_string(), 3);
    set.add("b".to_string());

    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(json, r#"[["a",3],["b",1]]"#);

    let back: BulkSet<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, set);
    assert_eq!(back.size(), 4);
}

proptest! {
    #[test]
    fn prop_size_is_sum_of_bulks(entries in prop::collection::vec((0u8..16, 0u64..1000), 0..64)) {
        let mut set = BulkSet::new();
        for (value, bulk) in &entries {
            set.add_bulk(*value, *bulk);
        }

        let total: u64 = entries.iter().map(|(_, bulk)| bulk).sum();
        prop_assert_eq!(set.size(), total);

        let by_entry: u64 = set.iter_bulk().map(|(_, bulk)| bulk).sum();
        prop_assert_eq!(by_entry, total);

        for value in 0u8..16 {
            let expected: u64 = entries.iter().filter(|(v, _)| *v == value).map(|(_, b)| b).sum();
            prop_assert_eq!(set.get(&value), expected);
            prop_assert_eq!(set.contains(&value), expected > 0);
        }
    }

    #[test]
    fn prop_iteration_order_is_first_insertion(values in prop::collection::vec(0u8..8, 0..64)) {
        let set: BulkSet<u8> = values.iter().copied().collect();

        let mut first_seen = Vec::new();
        for value in &values {
            if !first_seen.contains(value) {
                first_seen.push(*value);
            }
        }
        let order: Vec<u8> = set.iter_bulk().map(|(value, _)| *value).collect();
        prop_assert_eq!(order, first_seen);

        // Every repetition of a value is contiguous
        let expanded: Vec<u8> = set.iter().copied().collect();
        prop_assert_eq!(expanded.len() as u64, set.size());
        let mut runs = expanded.clone();
        runs.dedup();
        prop_assert_eq!(runs.len(), set.unique_size());
    }
}

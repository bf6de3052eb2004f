//! Integration test: topology changes.
//!
//! Add and remove nodes on a populated ring and verify that only the
//! expected arcs move, nothing is lost or duplicated, and the slot index
//! stays sorted.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotring_integration_tests::{HOST_AT_25, TestCluster, keys};
use slotring_placement::RingError;
use slotring_types::Slot;

#[test]
fn test_add_moves_exactly_the_claimed_arc() {
    let mut c = TestCluster::abc();
    for k in keys("key", 200) {
        c.ring.put(&k, "v").unwrap();
    }
    let before = c.all_entities();
    let c_before = c.entities_on("C");

    assert_eq!(c.add("D", HOST_AT_25).unwrap(), Slot::new(25));

    let expected: Vec<_> = c_before
        .iter()
        .filter(|e| Slot::new(18) < e.bucket && e.bucket <= Slot::new(25))
        .cloned()
        .collect();
    assert!(!expected.is_empty());
    assert_eq!(c.entities_on("D"), expected);
    assert_eq!(c.entities_on("C").len(), c_before.len() - expected.len());

    assert_eq!(c.all_entities(), before);
    c.assert_placement();
    c.assert_index();
}

#[test]
fn test_add_leaves_untouched_nodes_alone() {
    let mut c = TestCluster::abc();
    for k in keys("key", 200) {
        c.ring.put(&k, "v").unwrap();
    }
    let a_before = c.entities_on("A");
    let b_before = c.entities_on("B");

    c.add("D", HOST_AT_25).unwrap();

    assert_eq!(c.entities_on("A"), a_before);
    assert_eq!(c.entities_on("B"), b_before);
}

#[test]
fn test_remove_hands_everything_to_successor() {
    let mut c = TestCluster::abc();
    for k in keys("key", 200) {
        c.ring.put(&k, "v").unwrap();
    }
    let before = c.all_entities();
    let b_entities = c.entities_on("B");
    let c_before = c.entities_on("C").len();

    assert_eq!(c.remove("B").unwrap(), Slot::new(18));

    let c_after = c.entities_on("C");
    assert_eq!(c_after.len(), c_before + b_entities.len());
    for e in &b_entities {
        assert!(c_after.contains(e), "{e:?} missing from successor");
    }
    assert_eq!(c.ring.slots(), vec![Slot::new(5), Slot::new(33)]);
    assert_eq!(c.all_entities(), before);
    c.assert_placement();
}

#[test]
fn test_full_ring_is_left_unchanged() {
    let mut c = TestCluster::new(8);
    for host in [
        "node-0", "node-4", "node-16", "node-1", "node-2", "node-3", "node-6", "node-7",
    ] {
        c.add(host, host).unwrap();
    }
    let slots = c.ring.slots();
    assert_eq!(slots.len(), 8);

    assert!(matches!(
        c.add("extra", "node-5"),
        Err(RingError::HashSpaceFull { total_range: 8 })
    ));
    assert_eq!(c.ring.slots(), slots);
    c.assert_index();
}

#[test]
fn test_demo_hosts_land_on_known_slots() {
    let mut c = TestCluster::new(50);
    let hosts = [
        ("S1", "10.131.20.20", 9),
        ("S2", "10.131.20.10", 16),
        ("S3", "10.131.20.40", 30),
        ("S4", "10.131.20.51", 37),
        ("S5", "10.131.10.25", 41),
    ];
    for (name, host, slot) in hosts {
        assert_eq!(c.add(name, host).unwrap(), Slot::new(slot));
    }
    for i in 1..=14 {
        c.ring.put(&i.to_string(), &format!("Value{i}")).unwrap();
    }

    // Entity "1" hashes onto S4's own slot.
    assert_eq!(c.ring.assign("1").unwrap().name(), "S4");
    c.remove("S4").unwrap();
    assert_eq!(c.ring.assign("1").unwrap().name(), "S5");

    assert_eq!(c.add("S6", "10.10.12.11").unwrap(), Slot::new(48));
    // "3", "7" and "8" hash to 46, 47 and 45: S6 takes them from S1.
    let moved: Vec<String> = c.entities_on("S6").into_iter().map(|e| e.key).collect();
    assert_eq!(moved, vec!["8", "3", "7"]);

    for i in 1..=14 {
        assert_eq!(c.ring.get(&i.to_string()).unwrap(), Some(format!("Value{i}")));
    }
    c.assert_placement();
}

#[test]
fn test_random_churn_preserves_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut c = TestCluster::new(50);
    c.add("seed", "host-seed").unwrap();

    let keys = keys("entity", 300);
    for k in &keys {
        c.ring.put(k, k).unwrap();
    }
    let expected = c.all_entities();

    let mut live = vec!["seed".to_string()];
    for step in 0..200 {
        if live.len() > 1 && rng.random_bool(0.4) {
            let name = live.swap_remove(rng.random_range(0..live.len()));
            c.remove(&name).unwrap();
        } else {
            let name = format!("n{step}");
            match c.add(&name, &format!("host-{step}")) {
                Ok(_) => live.push(name),
                Err(RingError::SlotCollision { .. }) | Err(RingError::HashSpaceFull { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        c.assert_index();
        c.assert_placement();
        assert_eq!(c.all_entities(), expected, "step {step}");
    }
}

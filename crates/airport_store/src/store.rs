//! In-memory airport store.
//!
//! Uses `DashMap` so readers (HTTP handlers) never contend with each other
//! and only briefly with the population tasks writing into the same shard.
//! Values are `Arc<Airport>`: an insert swaps the pointer, so a reader
//! holds either the old record or the new one, never a mix.

use common::Airport;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A stored record plus the position of its key's first insertion.
#[derive(Debug, Clone)]
struct Slot {
    seq: u64,
    airport: Arc<Airport>,
}

#[derive(Debug, Default)]
struct Inner {
    airports: DashMap<String, Slot>,
    next_seq: AtomicU64,
}

/// Thread-safe airport store keyed by ICAO identifier.
///
/// Cloning is cheap and every clone shares the same records.
#[derive(Debug, Clone, Default)]
pub struct AirportStore {
    inner: Arc<Inner>,
}

impl AirportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the record under `airport.icao`. Last write wins;
    /// a replaced key keeps its original enumeration position.
    pub fn insert(&self, airport: Airport) -> Arc<Airport> {
        let airport = Arc::new(airport);
        match self.inner.airports.entry(airport.icao.clone()) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().airport = Arc::clone(&airport);
            }
            Entry::Vacant(slot) => {
                let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
                slot.insert(Slot {
                    seq,
                    airport: Arc::clone(&airport),
                });
            }
        }
        airport
    }

    /// Current record for `id`, or `None` if nothing has been stored yet.
    pub fn lookup(&self, id: &str) -> Option<Arc<Airport>> {
        self.inner
            .airports
            .get(id)
            .map(|slot| Arc::clone(&slot.airport))
    }

    /// Snapshot of every stored record in first-insertion order.
    ///
    /// Each call starts a fresh traversal. Records inserted after the call
    /// returns are not included.
    pub fn all(&self) -> Airports {
        let mut slots: Vec<(u64, Arc<Airport>)> = self
            .inner
            .airports
            .iter()
            .map(|slot| (slot.seq, Arc::clone(&slot.airport)))
            .collect();
        slots.sort_unstable_by_key(|(seq, _)| *seq);

        Airports {
            inner: slots.into_iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.airports.is_empty()
    }
}

/// Iterator returned by [`AirportStore::all`].
#[derive(Debug)]
pub struct Airports {
    inner: std::vec::IntoIter<(u64, Arc<Airport>)>,
}

impl Iterator for Airports {
    type Item = Arc<Airport>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, airport)| airport)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Airports {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn make_airport(icao: &str, name: &str) -> Airport {
        Airport {
            icao: icao.into(),
            name: name.into(),
            city: "St Louis".into(),
            state: "MO".into(),
            elevation_ft: Some(600.0),
            latitude: 38.7,
            longitude: -90.4,
            runways: Vec::new(),
        }
    }

    #[test]
    fn test_insert_then_lookup() {
        let store = AirportStore::new();
        let stl = make_airport("KSTL", "Lambert Intl");

        let stored = store.insert(stl.clone());
        assert_eq!(*stored, stl);

        let found = store.lookup("KSTL").expect("KSTL should be stored");
        assert_eq!(*found, stl);
    }

    #[test]
    fn test_overwrite_keeps_one_entry() {
        let store = AirportStore::new();
        store.insert(make_airport("KSTL", "Lambert Field"));
        store.insert(make_airport("KSTL", "Lambert Intl"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("KSTL").map(|a| a.name.clone()).as_deref(), Some("Lambert Intl"));
        assert_eq!(store.all().count(), 1);
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let store = AirportStore::new();
        assert!(store.lookup("KXXX").is_none());

        store.insert(make_airport("KSTL", "Lambert Intl"));
        assert!(store.lookup("KXXX").is_none());
    }

    #[test]
    fn test_all_yields_each_record_once() {
        let store = AirportStore::new();
        for id in ["A", "B", "C"] {
            store.insert(make_airport(id, id));
        }

        let ids: Vec<String> = store.all().map(|a| a.icao.clone()).collect();
        assert_eq!(ids.len(), 3);
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_all_is_restartable_and_keeps_first_position() {
        let store = AirportStore::new();
        store.insert(make_airport("KSTL", "Lambert Intl"));
        store.insert(make_airport("KSUS", "Spirit of St Louis"));
        store.insert(make_airport("KSTL", "Lambert Intl (updated)"));

        let first: Vec<String> = store.all().map(|a| a.name.clone()).collect();
        let second: Vec<String> = store.all().map(|a| a.name.clone()).collect();
        assert_eq!(first, vec!["Lambert Intl (updated)", "Spirit of St Louis"]);
        assert_eq!(first, second);
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_inserts() {
        let store = AirportStore::new();
        store.insert(make_airport("A", "A"));
        let snapshot = store.all();
        store.insert(make_airport("B", "B"));

        assert_eq!(snapshot.count(), 1);
        assert_eq!(store.all().count(), 2);
    }

    #[test]
    fn test_clones_share_records() {
        let store = AirportStore::new();
        let handle = store.clone();
        handle.insert(make_airport("KSTL", "Lambert Intl"));

        assert!(store.lookup("KSTL").is_some());
        assert!(!store.is_empty());
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_records() {
        // Every variant has name == city, so a torn read would break the pairing.
        fn variant(n: usize) -> Airport {
            let tag = format!("v{n}");
            Airport {
                icao: "KSTL".into(),
                name: tag.clone(),
                city: tag.clone(),
                state: tag,
                elevation_ft: Some(n as f64),
                latitude: n as f64,
                longitude: n as f64,
                runways: Vec::new(),
            }
        }

        let store = AirportStore::new();
        store.insert(variant(0));

        std::thread::scope(|s| {
            for w in 0..2 {
                let store = store.clone();
                s.spawn(move || {
                    for i in 0..2_000 {
                        store.insert(variant(w * 10_000 + i));
                        store.insert(make_airport(&format!("W{w}-{}", i % 50), "filler"));
                    }
                });
            }
            for _ in 0..4 {
                let store = store.clone();
                s.spawn(move || {
                    for _ in 0..2_000 {
                        let current = store.lookup("KSTL").expect("KSTL never removed");
                        assert_eq!(current.name, current.city);
                        assert_eq!(current.city, current.state);
                        assert_eq!(current.latitude, current.longitude);

                        let stl: Vec<_> = store.all().filter(|a| a.icao == "KSTL").collect();
                        assert_eq!(stl.len(), 1);
                        assert_eq!(stl[0].name, stl[0].city);
                    }
                });
            }
        });

        assert_eq!(store.len(), 1 + 2 * 50);
    }
}

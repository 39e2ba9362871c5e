//! Tests for the address book indices

use super::*;
use crate::domain::{PeerRecord, PublicKey, Timestamp};
use std::net::Ipv4Addr;

fn make_record(key: u8, ips: &[[u8; 4]], port: u16) -> PeerRecord {
    PeerRecord::new(
        PublicKey::new([key; 32], [key; 32]),
        ips.iter().map(|ip| Ipv4Addr::from(*ip)).collect(),
        port,
        Timestamp::from_secs(1000),
        true,
    )
}

#[test]
fn test_insert_indexes_by_id_and_every_ip() {
    let mut index = AddressBookIndex::new();
    let record = make_record(1, &[[10, 0, 0, 1], [10, 0, 0, 2]], 9000);
    let id = record.id();

    index.insert(record.clone());

    assert_eq!(index.len(), 1);
    assert_eq!(index.get_by_id(&id).as_deref(), Some(&record));
    assert_eq!(index.get_by_ip(&Ipv4Addr::new(10, 0, 0, 1)).as_deref(), Some(&record));
    assert_eq!(index.get_by_ip(&Ipv4Addr::new(10, 0, 0, 2)).as_deref(), Some(&record));
}

#[test]
fn test_same_key_replaces_existing_entry() {
    let mut index = AddressBookIndex::new();
    index.insert(make_record(1, &[[10, 0, 0, 1]], 9000));
    let newer = make_record(1, &[[10, 0, 0, 1]], 9001);

    index.insert(newer.clone());

    assert_eq!(index.len(), 1);
    assert_eq!(index.get_by_id(&newer.id()).unwrap().port, 9001);
}

#[test]
fn test_replacement_drops_stale_ip_entries() {
    let mut index = AddressBookIndex::new();
    index.insert(make_record(1, &[[10, 0, 0, 1], [10, 0, 0, 2]], 9000));

    index.insert(make_record(1, &[[10, 0, 0, 3]], 9000));

    assert!(index.get_by_ip(&Ipv4Addr::new(10, 0, 0, 1)).is_none());
    assert!(index.get_by_ip(&Ipv4Addr::new(10, 0, 0, 2)).is_none());
    assert!(index.get_by_ip(&Ipv4Addr::new(10, 0, 0, 3)).is_some());
    assert_eq!(index.ip_count(), 1);
}

#[test]
fn test_shared_ip_is_last_writer_wins() {
    let mut index = AddressBookIndex::new();
    let first = make_record(1, &[[192, 168, 0, 10]], 9000);
    let second = make_record(2, &[[192, 168, 0, 10]], 9001);

    index.insert(first.clone());
    index.insert(second.clone());

    assert_eq!(index.len(), 2);
    let owner = index.get_by_ip(&Ipv4Addr::new(192, 168, 0, 10)).unwrap();
    assert_eq!(owner.id(), second.id());
}

#[test]
fn test_replacing_one_peer_keeps_ip_owned_by_another() {
    let mut index = AddressBookIndex::new();
    index.insert(make_record(1, &[[192, 168, 0, 10]], 9000));
    let second = make_record(2, &[[192, 168, 0, 10]], 9001);
    index.insert(second.clone());

    // Peer 1 moves away; the shared IP still belongs to peer 2.
    index.insert(make_record(1, &[[172, 16, 0, 1]], 9000));

    let owner = index.get_by_ip(&Ipv4Addr::new(192, 168, 0, 10)).unwrap();
    assert_eq!(owner.id(), second.id());
}

#[test]
fn test_snapshot_is_detached_from_later_writes() {
    let mut index = AddressBookIndex::new();
    index.insert(make_record(1, &[[10, 0, 0, 1]], 9000));

    let snapshot = index.snapshot();
    index.insert(make_record(2, &[[10, 0, 0, 2]], 9000));

    assert_eq!(snapshot.len(), 1);
    assert_eq!(index.snapshot().len(), 2);
}

//! Tests for node identity

use super::*;
use proptest::prelude::*;
use shared_crypto::sha256_concat;

#[test]
fn test_restored_identity_matches_generated() {
    let original = NodeIdentity::generate();
    let restored = NodeIdentity::from_secret_bytes(&original.secret_bytes()).unwrap();

    assert_eq!(restored.public_key(), original.public_key());
    assert_eq!(restored.node_id(), original.node_id());
}

#[test]
fn test_node_id_is_hash_of_padded_coordinates() {
    let identity = NodeIdentity::generate();
    let pk = identity.public_key();

    assert_eq!(identity.node_id().0, sha256_concat(&[pk.x(), pk.y()]));
}

#[test]
fn test_leading_zero_coordinate_hashes_canonically() {
    // A coordinate whose minimal big-endian form is 31 bytes must produce the
    // same id as its 32-byte padded form.
    let mut x = [0x5Au8; 32];
    x[0] = 0;
    let y = [0xA5u8; 32];

    let trimmed = PublicKey::from_coordinates(&x[1..], &y).unwrap();
    let padded = PublicKey::new(x, y);

    assert_eq!(derive_node_id(&trimmed), derive_node_id(&padded));
    assert_eq!(
        hex::encode(derive_node_id(&padded).0),
        hex::encode(sha256_concat(&[&x, &y]))
    );
}

#[test]
fn test_malformed_scalar_is_rejected() {
    assert!(matches!(
        NodeIdentity::from_secret_bytes(&[0u8; 32]),
        Err(IdentityError::MalformedKey(_))
    ));
    assert!(matches!(
        NodeIdentity::from_secret_bytes(&[7u8; 40]),
        Err(IdentityError::MalformedKey(_))
    ));
}

#[test]
fn test_signatures_verify_against_public_key() {
    let identity = NodeIdentity::generate();
    let sig = identity.sign(b"greeting");
    assert!(identity.public_key().verify(b"greeting", &sig).is_ok());
}

proptest! {
    #[test]
    fn prop_derive_node_id_is_pure(x in any::<[u8; 32]>(), y in any::<[u8; 32]>()) {
        let key = PublicKey::new(x, y);
        prop_assert_eq!(derive_node_id(&key), derive_node_id(&key));
    }
}

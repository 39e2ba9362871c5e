use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{CodecError, GreetingRequest, GreetingResponse, PeerRecord};
use crate::ports::RecordCodec;

/// Format version byte prefixed to every encoded value.
pub const CODEC_VERSION: u8 = 1;

/// Bincode codec with a one-byte format version prefix.
///
/// Greeting messages also carry their own protocol version; this byte covers
/// the encoding itself, including stored records.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl BincodeCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let body = bincode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))?;
        let mut bytes = Vec::with_capacity(body.len() + 1);
        bytes.push(CODEC_VERSION);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        let (&version, body) = bytes.split_first().ok_or(CodecError::Empty)?;
        if version != CODEC_VERSION {
            return Err(CodecError::UnsupportedVersion {
                found: version,
                expected: CODEC_VERSION,
            });
        }
        bincode::deserialize(body).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

impl RecordCodec for BincodeCodec {
    fn encode_record(&self, record: &PeerRecord) -> Result<Vec<u8>, CodecError> {
        self.encode(record)
    }

    fn decode_record(&self, bytes: &[u8]) -> Result<PeerRecord, CodecError> {
        self.decode(bytes)
    }

    fn encode_request(&self, request: &GreetingRequest) -> Result<Vec<u8>, CodecError> {
        self.encode(request)
    }

    fn decode_request(&self, bytes: &[u8]) -> Result<GreetingRequest, CodecError> {
        self.decode(bytes)
    }

    fn encode_response(&self, response: &GreetingResponse) -> Result<Vec<u8>, CodecError> {
        self.encode(response)
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<GreetingResponse, CodecError> {
        self.decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PublicKey, Timestamp};
    use proptest::prelude::*;
    use std::net::Ipv4Addr;

    fn arb_record() -> impl Strategy<Value = PeerRecord> {
        (
            any::<[u8; 32]>(),
            any::<[u8; 32]>(),
            prop::collection::vec(any::<[u8; 4]>(), 0..4),
            any::<u16>(),
            any::<u64>(),
            any::<bool>(),
        )
            .prop_map(|(x, y, addrs, port, ts, active)| {
                PeerRecord::new(
                    PublicKey::new(x, y),
                    addrs.into_iter().map(Ipv4Addr::from).collect(),
                    port,
                    Timestamp::from_nanos(ts),
                    active,
                )
            })
    }

    proptest! {
        #[test]
        fn prop_record_survives_codec(record in arb_record()) {
            let codec = BincodeCodec::new();
            let bytes = codec.encode_record(&record).unwrap();
            let decoded = codec.decode_record(&bytes).unwrap();
            prop_assert_eq!(decoded.id(), record.id());
            prop_assert_eq!(decoded, record);
        }
    }

    #[test]
    fn test_encoded_values_carry_version_prefix() {
        let codec = BincodeCodec::new();
        let request = GreetingRequest::new(40000, PublicKey::new([1; 32], [2; 32]));
        let bytes = codec.encode_request(&request).unwrap();
        assert_eq!(bytes[0], CODEC_VERSION);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let codec = BincodeCodec::new();
        let mut bytes = codec
            .encode_response(&GreetingResponse {
                observed_address: Ipv4Addr::LOCALHOST,
                observed_port: 1,
                visible: true,
            })
            .unwrap();
        bytes[0] = 9;

        assert_eq!(
            codec.decode_response(&bytes),
            Err(CodecError::UnsupportedVersion { found: 9, expected: 1 })
        );
    }

    #[test]
    fn test_empty_and_garbage_input() {
        let codec = BincodeCodec::new();
        assert_eq!(codec.decode_record(&[]), Err(CodecError::Empty));
        assert!(matches!(
            codec.decode_request(&[CODEC_VERSION, 0xFF]),
            Err(CodecError::Decode(_))
        ));
    }
}

//! Several calls in one envelope, decoded by position.
//!
//! A batch is a tuple of [`Rpc`]s. The envelope carries their calls in
//! tuple order, and sub-response *N* is decoded as the response type of
//! element *N*:
//!
//! ```text
//! (GetMapObjectsRequest, GetInventoryRequest, CheckAwardedBadgesRequest)
//!          │                     │                     │
//!          ▼                     ▼                     ▼
//!   sub_responses[0]      sub_responses[1]      sub_responses[2]
//!          │                     │                     │
//!          ▼                     ▼                     ▼
//! (GetMapObjectsResponse, GetInventoryResponse, CheckAwardedBadgesResponse)
//! ```

use trailhead_protocol::{Call, Codec, ProtocolError};

use crate::Rpc;

/// An ordered group of calls sent in a single envelope.
pub trait RpcBatch {
    /// Number of calls in the batch.
    const LEN: usize;

    /// The decoded responses, one per call, in call order.
    type Responses;

    /// Encodes every call, preserving order.
    fn calls<C: Codec>(&self, codec: &C) -> Result<Vec<Call>, ProtocolError>;

    /// Decodes `sub_responses` positionally.
    ///
    /// # Errors
    /// [`ProtocolError::ResponseCountMismatch`] if the count differs from
    /// [`LEN`](Self::LEN), otherwise the first decode failure.
    fn decode<C: Codec>(
        codec: &C,
        sub_responses: &[Vec<u8>],
    ) -> Result<Self::Responses, ProtocolError>;
}

macro_rules! batch {
    ($len:literal; $($rpc:ident $idx:tt),+) => {
        impl<$($rpc: Rpc),+> RpcBatch for ($($rpc,)+) {
            const LEN: usize = $len;
            type Responses = ($(<$rpc as Rpc>::Response,)+);

            fn calls<K: Codec>(&self, codec: &K) -> Result<Vec<Call>, ProtocolError> {
                Ok(vec![$(self.$idx.to_call(codec)?),+])
            }

            fn decode<K: Codec>(
                codec: &K,
                sub_responses: &[Vec<u8>],
            ) -> Result<Self::Responses, ProtocolError> {
                if sub_responses.len() != $len {
                    return Err(ProtocolError::ResponseCountMismatch {
                        expected: $len,
                        actual: sub_responses.len(),
                    });
                }
                Ok(($(codec.decode::<<$rpc as Rpc>::Response>(&sub_responses[$idx])?,)+))
            }
        }
    };
}

batch!(1; A 0);
batch!(2; A 0, B 1);
batch!(3; A 0, B 1, C 2);
batch!(4; A 0, B 1, C 2, D 3);
batch!(5; A 0, B 1, C 2, D 3, E 4);
batch!(6; A 0, B 1, C 2, D 3, E 4, F 5);

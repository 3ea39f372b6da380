//! Error handling for ragchat.
//!
//! Transport and stream failures are modelled by [`StreamError`]. Payload
//! parse problems never surface as errors; see `sse::decoder`.
//!
//! | Class | Variant(s) | Surfaced to user |
//! |-------|------------|------------------|
//! | Transport | `Transport`, `NoBody`, `Connection`, `Timeout`, `Read`, `Decode` | one generic notice |
//! | Cancellation | `Cancelled` | never |
//! | Caller error | `AlreadyStreaming` | hint only |

mod stream;

pub use stream::{classify_reqwest_error, StreamError, GENERIC_FAILURE_NOTICE};

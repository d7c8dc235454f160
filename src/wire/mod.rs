//! Wire framing: codec, frame reader, and response encoder.

pub mod codec;
pub mod frame;
pub mod response;

pub use frame::{read_frame, RawFrame};
pub use response::ResponseWriter;

//! Call automation backend for the voicebot
//!
//! [`CallAutomation`] and [`CallConnection`] are the seam between call
//! media control and the telephony service. [`acs::AcsCallAutomation`] is
//! the REST implementation; tests substitute recording fakes.

pub mod acs;
pub mod error;
pub mod media;
pub mod traits;

pub use acs::{AcsCallAutomation, AcsClientConfig};
pub use error::{BackendError, TransportError};
pub use media::{DtmfTone, PlaySource, RecognitionChoice, RecognizeRequest};
pub use traits::{CallAutomation, CallConnection};

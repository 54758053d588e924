//! Client-side orchestration for the Timemania draw service: input
//! validation, remote calls, operation lifecycle and region rendering.

pub mod error;
pub mod format;
pub mod orchestrator;
pub mod presenter;
pub mod transport;
pub mod validation;
pub mod view;

pub use error::{Field, OperationError, TransportError, ValidationError};
pub use orchestrator::{ControlState, Operation, OperationState, Payload, RequestOrchestrator};
pub use presenter::{MemorySink, PresentationSink, Presenter, Region};
pub use transport::{HttpLotteryService, LotteryService};
pub use view::{render_text, Block};

pub mod domain;
pub mod error;
pub mod export;
pub mod extract;
pub mod generator;
pub mod ports;
pub mod preview;
pub mod prompt;
pub mod session;

pub use domain::{Framework, GenerationRequest, GenerationResult, GenerationStatus, RequestId};
pub use error::{ExportError, GenerateError, SessionError, ValidationError};
pub use extract::extract_code;
pub use generator::{GenerationOutcome, Generator};
pub use ports::{ClipboardService, CompletionService, PortError, PortResult};
pub use preview::{PreviewMode, PreviewState, PreviewTab, SurfaceKey};
pub use prompt::build_prompt;
pub use session::Session;

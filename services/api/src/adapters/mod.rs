pub mod clipboard;
pub mod completion_llm;

pub use clipboard::SystemClipboardAdapter;
pub use completion_llm::LlmCompletionAdapter;

//! 基础设施层

pub mod canned;
pub mod gemini;
pub mod memory;
pub mod probes;
pub mod seed;

pub use canned::CannedAssistant;
pub use gemini::GeminiClient;
pub use memory::InMemoryRepository;
pub use probes::RepositoryProbe;

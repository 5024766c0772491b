//! Clients for external services: the S3-compatible object store that
//! holds resume and Q&A bundles, and the LLM backend that generates
//! interview questions.

pub mod bundle_store;
pub mod question_generator;

pub use bundle_store::{BundleStore, BundleStoreError, MemoryBundleStore, S3BundleStore};
pub use question_generator::{
    CannedGenerator, ChatCompletionGenerator, GeneratedQuestion, QuestionGenerator,
    QuestionGeneratorError,
};

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement lifecycle
//! operations (round creation, answer recording, completion recording) run
//! inside a single transaction scoped to the affected aggregate.

pub mod question_answer_repo;
pub mod room_repo;
pub mod round_completion_repo;
pub mod round_repo;
pub mod session_repo;

pub use question_answer_repo::QuestionAnswerRepo;
pub use room_repo::RoomRepo;
pub use round_completion_repo::RoundCompletionRepo;
pub use round_repo::RoundRepo;
pub use session_repo::SessionRepo;

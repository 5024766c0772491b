//! Object-store path conventions for interview artefacts.
//!
//! All artefacts for a room live under `rooms/{room_id}/`, with per-session
//! material nested below it. Keeping path construction in one place means
//! the API layer, the bundle store, and the external orchestrator agree on
//! where every object lives.

use crate::types::DbId;

/// Path of the parsed resume JSON uploaded for a room.
pub fn resume_path(room_id: DbId) -> String {
    format!("rooms/{room_id}/resume.json")
}

/// Path of the generated question bundle for one round.
pub fn questions_path(room_id: DbId, session_id: DbId, round_index: i32) -> String {
    format!("rooms/{room_id}/sessions/{session_id}/questions/round_{round_index}.json")
}

/// Path of the completed QA transcript bundle for one round.
///
/// This is the object the completion webhook refers to once the external
/// orchestrator has finalized it.
pub fn analysis_path(room_id: DbId, session_id: DbId, round_index: i32) -> String {
    format!("rooms/{room_id}/sessions/{session_id}/analysis/qa_complete_{round_index}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn paths_nest_under_room() {
        let room = Uuid::new_v4();
        let session = Uuid::new_v4();

        assert_eq!(resume_path(room), format!("rooms/{room}/resume.json"));
        assert!(questions_path(room, session, 0).starts_with(&format!("rooms/{room}/sessions/{session}/")));
        assert!(analysis_path(room, session, 2).ends_with("analysis/qa_complete_2.json"));
    }

    #[test]
    fn round_index_distinguishes_paths() {
        let room = Uuid::new_v4();
        let session = Uuid::new_v4();
        assert_ne!(
            questions_path(room, session, 0),
            questions_path(room, session, 1)
        );
    }
}

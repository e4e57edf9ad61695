mod autosave;
pub mod context;
mod editor_state;
mod persistence;
mod status;

pub use autosave::{Autosave, SaveReason};
pub use context::EditorContext;
pub use editor_state::EditorState;
pub use persistence::{
    EditorSnapshot, EframeStore, ElementRecord, FileStore, MemoryStore, PageRecord, PersistenceError,
    PersistenceResult, RecordPosition, SnapshotStore, load_snapshot, save_snapshot,
};
pub use status::StatusMessage;

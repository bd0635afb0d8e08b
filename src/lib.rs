pub mod core;
pub mod persistence;
pub mod srs;
pub mod sync;

pub use crate::{
    core::{
        ItemType,
        JlptLevel,
        KiokuError,
        SourceItem,
    },
    srs::{
        HistoryMap,
        HistoryRecord,
        ProgressTracker,
    },
    sync::{
        HttpRemoteStore,
        RemoteStore,
        SyncEngine,
    },
};

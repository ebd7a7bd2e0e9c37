/// Events emitted by the puzzle core.
/// The presentation layer consumes these for display and for deciding
/// when to persist a snapshot.

use crate::domain::light::SourceKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    InventoryChanged { bulbs: u32, flashlights: u32 },
    IlluminationChanged { cell: usize, lit: bool },
    SourcePlaced { cell: usize, kind: SourceKind },
    SourceRemoved { cell: usize, kind: SourceKind },
    WinDetected,
    LevelAdvanced { level_id: u32 },
    GameCompleted,
    Shortage { kind: SourceKind },
}

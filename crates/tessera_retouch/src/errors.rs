//! Diff and patch errors.

use tessera_atelier::SlotKind;
use tessera_carton::String;
use thiserror::Error;

/// Two renders that cannot have come from the same template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateMismatch {
    #[error("statics length differs: {prev} vs {next}")]
    StaticsLength { prev: usize, next: usize },
    #[error("static segment {index} differs")]
    StaticsDiffer { index: usize },
    #[error("dynamics length differs: {prev} vs {next}")]
    DynamicsLength { prev: usize, next: usize },
    #[error("slot {slot} changed kind from {prev} to {next}")]
    SlotKind {
        slot: usize,
        prev: SlotKind,
        next: SlotKind,
    },
}

/// Errors raised while applying a patch list to a structured render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("slot {slot} is out of range ({len} slots)")]
    SlotOutOfRange { slot: usize, len: usize },
    #[error("slot {slot} is a {found} slot, expected {expected}")]
    KindMismatch {
        slot: usize,
        expected: SlotKind,
        found: SlotKind,
    },
    #[error("list slot {slot} has no row keyed `{key}`")]
    UnknownKey { slot: usize, key: String },
    #[error("list slot {slot}: position {pos} is out of range ({len} rows)")]
    PositionOutOfRange { slot: usize, pos: usize, len: usize },
    #[error("row `{key}` has no sub-slot {slot}")]
    RowSlotOutOfRange { key: String, slot: usize },
}

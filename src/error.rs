//! Caller-visible precondition failures.
//!
//! Degenerate geometry (parallel rays, zero-length normals) is never reported
//! here; those paths return `None`. Every operation that returns one of these
//! errors leaves the editor state untouched.

use crate::gfx::scene::ItemId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Boolean subtraction needs exactly two queued operands.
    #[error("subtraction needs exactly two selected meshes, {0} selected")]
    OperandCount(usize),

    /// An operand of a boolean operation is not a solid mesh.
    #[error("item {0} is not a CSG-capable mesh")]
    NotCsgCapable(ItemId),

    /// Vertex editing requested without any selected item.
    #[error("vertex editing requires one or more selected meshes")]
    NothingSelected,

    /// Vertex editing requested while a non-solid item is selected.
    #[error("vertex editing requires CSG-capable meshes, item {0} is not")]
    VertexEditUnsupported(ItemId),

    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    #[error("item {0} is not a group")]
    NotAGroup(ItemId),

    /// Adding the child would make a group its own descendant.
    #[error("item {child} cannot be placed inside group {group}: it would create a cycle")]
    GroupCycle { group: ItemId, child: ItemId },

    /// A flat mesh payload has inconsistent array lengths or indices.
    #[error("malformed mesh payload: {0}")]
    MalformedMesh(String),
}

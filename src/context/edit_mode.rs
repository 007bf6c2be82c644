use std::fmt;

/// What a primary press picks: whole items or single shared vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Mesh,
    Vertex,
}

impl EditMode {
    pub fn toggled(self) -> Self {
        match self {
            EditMode::Mesh => EditMode::Vertex,
            EditMode::Vertex => EditMode::Mesh,
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Mesh => write!(f, "mesh"),
            EditMode::Vertex => write!(f, "vertex"),
        }
    }
}

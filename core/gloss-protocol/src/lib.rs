pub mod tags;
pub mod token;
pub mod structure;

// Re-export core types for convenience
pub use tags::{CoarsePos, FinePos, DependencyRole, EntityLabel};
pub use token::{Token, Sentence, Paragraph};
pub use structure::*;

pub mod model;
pub use model::*;

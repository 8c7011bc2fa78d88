//! Domain layer: class/tree model and the pair and leader algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod classes;
pub mod composition;
pub mod entities;
pub mod error;
pub mod pairs;
pub mod transplant;

pub use arena::{NodeId, TreeArena, TreeNode};
pub use classes::{ClassDefinition, ClassStore};
pub use composition::{
    toggle_class_mark, toggle_side, ClassMark, CompositionEntry, CompositionGroup,
    CompositionNode, MemberRef, PairComposition, Side,
};
pub use entities::Identifier;
pub use error::{DomainError, DomainResult};
pub use pairs::{dedup_pairs, generate, sort_pairs, KernPair, PairGroup, PairMember};
pub use transplant::{transplant, TransplantOutcome, TransplantWarning};

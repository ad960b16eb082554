//! Trait seams between subsystems: the fact store contract and the
//! external language-model collaborator contract.

mod collaborator;
mod store;

pub use collaborator::ICollaborator;
pub use store::{FactHistory, IFactStore};

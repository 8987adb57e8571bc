pub mod artifact;
pub mod loader;

pub use artifact::{Classifier, DecisionTree, ModelArtifact, OutputKind, TreeNode};
pub use loader::{ensure_compatible, load_artifact, validate_artifact, ModelError, ModelLoader};

pub mod attrs;
pub mod lazy;
pub mod node;

pub use attrs::{Attribute, extract};
pub use lazy::LazyFragment;
pub use node::CachedVariableNode;

use stencil::library::Library;

/// Install the `variable` block tag into a library.
pub fn register(library: &mut Library) {
    library.register(node::TAG_NAME, node::CachedVariableNode::parse);
}

/// A library with the `variable` tag pre-registered.
pub fn default_library() -> Library {
    let mut library = Library::new();
    register(&mut library);
    library
}

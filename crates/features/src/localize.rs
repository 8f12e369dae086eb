//! # Localization Finalizer
//!
//! Geometry built in a local frame is wrapped in a transform carrying the
//! frame's inverse, so it renders at its true world position.

use crate::context::FilterContext;
use crate::node::{MatrixTransform, Node};

/// Wrap `node` in the local→world transform of `cx`'s reference frame.
///
/// Without a frame the node is returned unchanged. With a frame, the result
/// is always a transform, which is empty when `node` is `None`.
pub fn finalize(node: Option<Node>, cx: &FilterContext) -> Option<Node> {
    let Some(frame) = cx.reference_frame() else {
        return node;
    };

    let mut transform = MatrixTransform::new(*frame.inverse());
    transform.add_child(node);
    Some(Node::Transform(transform))
}

use crate::dom::NodeId;

/// Caller mistakes when anchoring. Not finding a match is not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnchorError {
    #[error("search text must not be empty")]
    EmptyText,
    #[error("node {0} is not attached under the search root")]
    DetachedNode(NodeId),
    #[error("range start comes after its end")]
    InvalidRange,
}

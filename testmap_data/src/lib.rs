//! The cockpit test map: which test contexts run for which project, branch and
//! image, and the queries answering "what must run when image X changes".

pub mod context;
mod map;
pub mod v1;

pub use crate::context::{
    image_of, is_pseudo_branch, qualify, split_context, QualifiedContext, DEFAULT_BRANCH,
    SELF_TEST_CONTEXT,
};
pub use crate::map::{BranchContexts, TestMap};

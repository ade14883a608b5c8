//! Maps tool identifiers to adaptor instances.

use crate::tools::blast::Blast;
use crate::tools::esbmc::Esbmc;
use crate::tools::{Tool, ToolContext, ToolId};

/// Adaptor for `id`, sharing the collaborators in `ctx`.
pub fn create(id: ToolId, ctx: ToolContext) -> Box<dyn Tool> {
    match id {
        ToolId::Blast => Box::new(Blast::new(ctx)),
        ToolId::Esbmc => Box::new(Esbmc::new(ctx)),
    }
}

/// One adaptor per supported tool, ordered by id.
pub fn all(ctx: &ToolContext) -> Vec<Box<dyn Tool>> {
    ToolId::ALL
        .into_iter()
        .map(|id| create(id, ctx.clone()))
        .collect()
}

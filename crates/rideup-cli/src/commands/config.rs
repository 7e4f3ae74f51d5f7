use anyhow::Result;

use super::print_json;
use crate::context::AppContext;

pub fn path(ctx: &AppContext) {
    println!("{}", ctx.config_service.path().display());
}

pub fn show(ctx: &AppContext) -> Result<()> {
    print_json(&ctx.config)
}

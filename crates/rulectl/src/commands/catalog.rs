//! Catalog command implementation.
//!
//! Shows the attributes rules may reference.

use super::{CommandContext, Result};
use crate::output::{format_catalog_json, format_catalog_table};

/// Executes the catalog command.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let catalog = ctx.engine.catalog();

    if ctx.json_output {
        let output = format_catalog_json(catalog)?;
        println!("{output}");
    } else if !ctx.quiet {
        print!("{}", format_catalog_table(catalog, ctx.use_colors));
    }

    Ok(())
}

use anyhow::Result;
use vergen::EmitBuilder;

// Short git SHA for the binaries' `--version` output.
fn main() -> Result<()> {
    EmitBuilder::builder().git_sha(true).emit()?;
    Ok(())
}

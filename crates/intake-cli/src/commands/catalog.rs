//! Questionnaire catalog listing.

use anyhow::Result;
use intake_core::catalog::Catalog;

use crate::output;

pub fn execute() -> Result<()> {
    output::print_catalog(Catalog::intake());
    Ok(())
}

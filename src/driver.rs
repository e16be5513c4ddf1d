// SPDX-License-Identifier: Unlicense
use std::{io::Read, path::Path};

use crate::{parser, printer, rewrite};
use anyhow::{Context, Result};
use tracing::info;

pub fn read_file(source: &Path) -> Result<String> {
    let mut buf = String::new();
    let mut f = std::fs::File::open(source)
        .with_context(|| format!("failed to open {}", source.display()))?;
    f.read_to_string(&mut buf)?;
    Ok(buf)
}

pub fn optimize_source(source: &str) -> Result<String> {
    let (mut arena, root, comments) = parser::parse_with_comments(source)?;
    rewrite::rewrite(&mut arena, root);
    Ok(printer::print_with_comments(&arena, root, &comments))
}

pub fn optimize_file(source: &Path) -> Result<String> {
    info!("optimizing {}", source.display());
    let src = read_file(source)?;
    optimize_source(src.as_str())
}

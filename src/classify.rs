// SPDX-License-Identifier: Unlicense
use crate::ast;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("node is not an integer literal")]
    NotALiteral,
    #[error("integer literal is not a power of two")]
    NotPowerOfTwo,
}

pub fn is_power_of_two(value: i64) -> bool {
    value != 0 && (value & value.wrapping_sub(1)) == 0
}

pub fn exponent_of(value: i64) -> u32 {
    debug_assert!(is_power_of_two(value));
    // unsigned, so i64::MIN ends at 63 instead of spinning on -1
    let mut bits = value as u64;
    let mut count = 0;
    while bits != 1 {
        count += 1;
        bits >>= 1;
    }
    count
}

/// Returns `e` such that the node is the integer literal `2^e`.
/// Panics on literal text that is not a valid `i64`.
pub fn classify_power_of_two(arena: &ast::Arena, id: ast::Id) -> Result<u32, ClassifyError> {
    let text = match &arena[id].kind {
        ast::NodeKind::Lit(ast::LitKind::Int(text)) => text,
        _ => return Err(ClassifyError::NotALiteral),
    };
    let value: i64 = text
        .parse()
        .unwrap_or_else(|e| panic!("integer literal `{}` is malformed: {}", text, e));
    if !is_power_of_two(value) {
        return Err(ClassifyError::NotPowerOfTwo);
    }
    Ok(exponent_of(value))
}

// SPDX-License-Identifier: Unlicense
//! Peephole rewriter that turns multiplication and division by an integer
//! power of two into bit shifts.
pub mod ast;
pub mod classify;
pub mod driver;
pub mod parser;
pub mod printer;
pub mod rewrite;

//! `@set`, `@if` and `@unless` operands.
//!
//! The left side is `$N` (integer variable, `N < VAR_COUNT`) or `%x` (name
//! variable, one lowercase letter). Name variables only support `==`/`!=` in
//! comparisons and `=` in assignments.

use novella_script::lexer::unquote;

use super::error::{ExecError, Result};
use crate::runtime::{Ctx, NAME_VAR_RANGE, VAR_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Var(usize),
    Name(char),
}

fn operand(token: &str) -> Result<Operand> {
    let bad = || ExecError::BadVariable(token.to_string());
    if let Some(index) = token.strip_prefix('$') {
        let index: usize = index.parse().map_err(|_| bad())?;
        return if index < VAR_COUNT { Ok(Operand::Var(index)) } else { Err(bad()) };
    }
    if let Some(name) = token.strip_prefix('%') {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if NAME_VAR_RANGE.contains(&c) {
                return Ok(Operand::Name(c));
            }
        }
    }
    Err(bad())
}

/// Leading integer of `s`, 0 when there is none.
pub fn atoi(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn int_value(ctx: &Ctx, token: &str) -> Result<i32> {
    if token.starts_with('$') {
        return match operand(token)? {
            Operand::Var(index) => Ok(ctx.var(index)),
            Operand::Name(_) => Err(ExecError::BadVariable(token.to_string())),
        };
    }
    Ok(match token {
        "true" | "yes" | "はい" => 1,
        "false" | "no" | "いいえ" => 0,
        _ => atoi(token),
    })
}

/// Evaluates `lhs op rhs`.
pub fn condition(ctx: &Ctx, lhs: &str, op: &str, rhs: &str) -> Result<bool> {
    match operand(lhs)? {
        Operand::Var(index) => {
            let left = ctx.var(index);
            let right = int_value(ctx, rhs)?;
            Ok(match op {
                ">" => left > right,
                ">=" => left >= right,
                "==" => left == right,
                "<=" => left <= right,
                "<" => left < right,
                "!=" => left != right,
                _ => return Err(ExecError::BadOperator(op.to_string())),
            })
        }
        Operand::Name(name) => {
            let left = ctx.name_var(name);
            match op {
                "==" => Ok(left == unquote(rhs)),
                "!=" => Ok(left != unquote(rhs)),
                _ => Err(ExecError::BadOperator(op.to_string())),
            }
        }
    }
}

/// Whether the integer variable `token` is set to a non-zero value.
pub fn flag(ctx: &Ctx, token: &str) -> Result<bool> {
    match operand(token)? {
        Operand::Var(index) => Ok(ctx.var(index) != 0),
        Operand::Name(_) => Err(ExecError::BadVariable(token.to_string())),
    }
}

/// Applies `lhs op rhs` to the context.
pub fn assign(ctx: &mut Ctx, lhs: &str, op: &str, rhs: &str) -> Result<()> {
    match operand(lhs)? {
        Operand::Var(index) => {
            let left = ctx.var(index);
            let right = int_value(ctx, rhs)?;
            let value = match op {
                "=" => right,
                "+=" => left.wrapping_add(right),
                "-=" => left.wrapping_sub(right),
                "*=" => left.wrapping_mul(right),
                "/=" | "%=" if right == 0 => return Err(ExecError::DivisionByZero),
                "/=" => left.wrapping_div(right),
                "%=" => left.wrapping_rem(right),
                _ => return Err(ExecError::BadOperator(op.to_string())),
            };
            log::trace!("${} = {}", index, value);
            ctx.set_var(index, value);
        }
        Operand::Name(name) => {
            if op != "=" {
                return Err(ExecError::BadOperator(op.to_string()));
            }
            ctx.set_name_var(name, unquote(rhs));
        }
    }
    Ok(())
}

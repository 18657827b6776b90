//! Constant evaluation for binary operators.
//!
//! Shared between the optimizer's `BinOp` folding and (indirectly, through
//! `blc_par::BinOp`) the `-print-ir` debug suffixes, so the two never
//! disagree about what an operator means.

use blc_par::BinOp;

/// Signed 64-bit evaluation matching the backends' emitted instructions.
/// Division and modulo by zero fold to 0 rather than trapping, so folding
/// stays total and order-independent.
pub fn eval(op: BinOp, lhs: i64, rhs: i64) -> i64 {
    match op {
        BinOp::Add => lhs.wrapping_add(rhs),
        BinOp::Sub => lhs.wrapping_sub(rhs),
        BinOp::Mul => lhs.wrapping_mul(rhs),
        BinOp::Div => {
            if rhs == 0 {
                0
            } else {
                lhs.wrapping_div(rhs)
            }
        },
        BinOp::Mod => {
            if rhs == 0 {
                0
            } else {
                lhs.wrapping_rem(rhs)
            }
        },
        BinOp::Eq => (lhs == rhs) as i64,
        BinOp::Ne => (lhs != rhs) as i64,
        BinOp::Lt => (lhs < rhs) as i64,
        BinOp::Le => (lhs <= rhs) as i64,
        BinOp::Gt => (lhs > rhs) as i64,
        BinOp::Ge => (lhs >= rhs) as i64,
        BinOp::And => ((lhs != 0) && (rhs != 0)) as i64,
        BinOp::Or => ((lhs != 0) || (rhs != 0)) as i64,
        BinOp::Shl => lhs.wrapping_shl(rhs as u32 & 63),
        BinOp::Shr => lhs.wrapping_shr(rhs as u32 & 63),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_by_zero_folds_to_zero_instead_of_trapping() {
        assert_eq!(eval(BinOp::Div, 10, 0), 0);
        assert_eq!(eval(BinOp::Mod, 10, 0), 0);
    }

    #[test]
    fn comparisons_yield_zero_or_one() {
        assert_eq!(eval(BinOp::Lt, 2, 3), 1);
        assert_eq!(eval(BinOp::Lt, 3, 2), 0);
    }

    #[test]
    fn logical_operators_use_standard_truthiness() {
        assert_eq!(eval(BinOp::And, 5, 0), 0);
        assert_eq!(eval(BinOp::Or, 0, 5), 1);
    }

    #[test]
    fn left_fold_of_two_plus_three_times_four_is_twenty() {
        // `2 + 3 * 4` has no precedence climbing, so it parses as
        // `(2 + 3) * 4`.
        let sum = eval(BinOp::Add, 2, 3);
        assert_eq!(eval(BinOp::Mul, sum, 4), 20);
    }
}

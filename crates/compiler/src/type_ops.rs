//! The numeric containing-type utility (§4.5.4): given two numeric types,
//! computes the smallest type that represents both. Used by type resolution
//! and (eventually) codegen, not directly by the type-verification pass.

use crate::ast::Node;
use forge_core::Range;

fn int_same_sign(unsigned: bool, a_width: u8, b_width: u8) -> Node {
    Node::new_type_int(Range::null(), unsigned, a_width.max(b_width))
}

fn int_different_signs(a_width: u8, b_width: u8) -> Node {
    let width = 64u32.min(2 * a_width.max(b_width) as u32) as u8;
    Node::new_type_int(Range::null(), false, width)
}

fn ints(a_unsigned: bool, a_width: u8, b_unsigned: bool, b_width: u8) -> Node {
    if a_unsigned == b_unsigned {
        int_same_sign(a_unsigned, a_width, b_width)
    } else {
        int_different_signs(a_width, b_width)
    }
}

fn floats(a_width: u8, b_width: u8) -> Node {
    Node::new_type_float(Range::null(), a_width.max(b_width))
}

/// `i32 + f32` resolves to `f32` when the int is signed and `f64` when
/// unsigned — an asymmetry the source project's own comment flags as
/// unusual but intentional; this repository preserves it literally.
fn int_and_float(int_unsigned: bool, int_width: u8, float_width: u8) -> Node {
    if float_width == 64 {
        return Node::new_type_float(Range::null(), 64);
    }
    if int_width < 32 {
        Node::new_type_float(Range::null(), 32)
    } else if int_width == 32 {
        if int_unsigned {
            Node::new_type_float(Range::null(), 64)
        } else {
            Node::new_type_float(Range::null(), 32)
        }
    } else {
        Node::new_type_float(Range::null(), 64)
    }
}

/// Returns `None` ("no such type") for non-numeric combinations.
pub fn numeric_containing_type(a: &Node, b: &Node) -> Option<Node> {
    match (a, b) {
        (
            Node::TypeInt { unsigned: au, bit_width: aw, .. },
            Node::TypeInt { unsigned: bu, bit_width: bw, .. },
        ) => Some(ints(*au, *aw, *bu, *bw)),
        (Node::TypeInt { unsigned, bit_width, .. }, Node::TypeFloat { bit_width: fw, .. }) => {
            Some(int_and_float(*unsigned, *bit_width, *fw))
        }
        (Node::TypeFloat { bit_width: fw, .. }, Node::TypeInt { unsigned, bit_width, .. }) => {
            Some(int_and_float(*unsigned, *bit_width, *fw))
        }
        (Node::TypeFloat { bit_width: aw, .. }, Node::TypeFloat { bit_width: bw, .. }) => {
            Some(floats(*aw, *bw))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(unsigned: bool, width: u8) -> Node {
        Node::new_type_int(Range::null(), unsigned, width)
    }

    fn float(width: u8) -> Node {
        Node::new_type_float(Range::null(), width)
    }

    #[test]
    fn same_sign_ints_widen_to_max_retaining_sign() {
        let result = numeric_containing_type(&int(false, 8), &int(false, 32)).unwrap();
        assert_eq!(result, int(false, 32));
    }

    #[test]
    fn different_sign_ints_take_signed_double_width() {
        let result = numeric_containing_type(&int(false, 16), &int(true, 8)).unwrap();
        assert_eq!(result, int(false, 32));
    }

    #[test]
    fn different_sign_ints_cap_at_64_bits() {
        let result = numeric_containing_type(&int(false, 64), &int(true, 64)).unwrap();
        assert_eq!(result, int(false, 64));
    }

    #[test]
    fn floats_widen_to_max() {
        let result = numeric_containing_type(&float(32), &float(64)).unwrap();
        assert_eq!(result, float(64));
    }

    #[test]
    fn small_int_and_float_widens_to_f32() {
        let result = numeric_containing_type(&int(false, 16), &float(32)).unwrap();
        assert_eq!(result, float(32));
    }

    #[test]
    fn i32_plus_f32_signed_stays_f32_unsigned_becomes_f64() {
        let signed = numeric_containing_type(&int(false, 32), &float(32)).unwrap();
        assert_eq!(signed, float(32));
        let unsigned = numeric_containing_type(&int(true, 32), &float(32)).unwrap();
        assert_eq!(unsigned, float(64));
    }

    #[test]
    fn any_float64_combination_stays_f64() {
        let result = numeric_containing_type(&int(false, 8), &float(64)).unwrap();
        assert_eq!(result, float(64));
    }

    #[test]
    fn wider_than_32_bit_int_with_float_becomes_f64() {
        let result = numeric_containing_type(&int(false, 64), &float(32)).unwrap();
        assert_eq!(result, float(64));
    }

    #[test]
    fn non_numeric_combination_has_no_containing_type() {
        assert!(numeric_containing_type(&Node::TypeBool { range: Range::null() }, &int(false, 32)).is_none());
    }
}

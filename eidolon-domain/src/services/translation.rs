// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Translation Layer
//!
//! Performs the value-level transform a [`CoercionRule`](crate::value_objects::CoercionRule)
//! names (§4.4). `TypeExpr::is_compatible_with` only proves a rule *exists*;
//! this module is where the bytes actually move. The infrastructure-side LRU
//! cache in the runtime crate memoises `CoercionRule::resolve` lookups, not
//! this function — `coerce` itself stays a pure, cheap-to-call domain
//! function operating on a single already-resolved rule.

use crate::value_objects::{CoercionRule, Payload, TypeExpr};
use crate::EidolonError;

/// Coerces `value`, declared as `src`, into the shape `dst` expects.
///
/// Returns [`EidolonError::TranslationFailure`] if no coercion rule bridges
/// the two types, or if `value`'s runtime shape doesn't match `src` (a
/// producer declaring one type but emitting another is a module fault, not a
/// wiring-time concern, so it surfaces as a translation failure here).
pub fn coerce(value: &Payload, src: &TypeExpr, dst: &TypeExpr) -> Result<Payload, EidolonError> {
    if src == dst {
        return Ok(value.clone());
    }
    if matches!(dst, TypeExpr::Any) {
        return Ok(value.clone());
    }

    if let TypeExpr::Union(alts) = dst {
        for alt in alts {
            if src.is_compatible_with(alt) {
                return coerce(value, src, alt);
            }
        }
        return Err(translation_failure(src, dst, "no union member accepts this value's type"));
    }

    let rule = CoercionRule::resolve(src, dst)
        .ok_or_else(|| translation_failure(src, dst, "no coercion rule bridges these types"))?;
    apply(value, src, dst, &rule)
}

fn apply(value: &Payload, src: &TypeExpr, dst: &TypeExpr, rule: &CoercionRule) -> Result<Payload, EidolonError> {
    match rule {
        CoercionRule::Identity => Ok(value.clone()),
        CoercionRule::NumericWiden => match value {
            Payload::Int(i) => Ok(Payload::Float(*i as f64)),
            _ => Err(translation_failure(src, dst, "expected an int value")),
        },
        CoercionRule::WrapSingleton => match dst {
            TypeExpr::List(_) => Ok(Payload::List(vec![value.clone()])),
            TypeExpr::Set(_) => Ok(Payload::Set(vec![value.clone()])),
            _ => unreachable!("WrapSingleton only resolves against list/set destinations"),
        },
        CoercionRule::Recontainer => match (value, dst) {
            (Payload::List(items), TypeExpr::Set(_)) => Ok(Payload::Set(dedup_preserve_order(items))),
            (Payload::Set(items), TypeExpr::List(_)) => Ok(Payload::List(items.clone())),
            _ => Err(translation_failure(src, dst, "expected a list or set value")),
        },
        CoercionRule::StrToBytes => match value {
            Payload::Str(s) => Ok(Payload::Bytes(s.clone().into_bytes())),
            _ => Err(translation_failure(src, dst, "expected a str value")),
        },
        CoercionRule::BytesToStr => match value {
            Payload::Bytes(b) => String::from_utf8(b.clone())
                .map(Payload::Str)
                .map_err(|_| translation_failure(src, dst, "bytes are not valid UTF-8")),
            _ => Err(translation_failure(src, dst, "expected a bytes value")),
        },
        CoercionRule::DictToListTuple => match value {
            Payload::Dict(entries) => Ok(Payload::List(
                entries
                    .iter()
                    .map(|(k, v)| Payload::Tuple(vec![k.clone(), v.clone()]))
                    .collect(),
            )),
            _ => Err(translation_failure(src, dst, "expected a dict value")),
        },
        CoercionRule::TupleToList => match value {
            Payload::Tuple(items) => Ok(Payload::List(items.clone())),
            _ => Err(translation_failure(src, dst, "expected a tuple value")),
        },
        CoercionRule::ElementWise(inner_rule) => match (value, src, dst) {
            (Payload::List(items), TypeExpr::List(src_elem), TypeExpr::List(dst_elem)) => {
                let coerced = items
                    .iter()
                    .map(|item| apply(item, src_elem, dst_elem, inner_rule))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Payload::List(coerced))
            }
            _ => Err(translation_failure(src, dst, "expected a list value")),
        },
    }
}

fn dedup_preserve_order(items: &[Payload]) -> Vec<Payload> {
    let mut out: Vec<Payload> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

fn translation_failure(src: &TypeExpr, dst: &TypeExpr, reason: &str) -> EidolonError {
    EidolonError::TranslationFailure {
        src: src.to_string(),
        dst: dst.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_widens_to_float() {
        let out = coerce(&Payload::Int(3), &TypeExpr::Int, &TypeExpr::Float).unwrap();
        assert_eq!(out, Payload::Float(3.0));
    }

    #[test]
    fn scalar_wraps_into_singleton_list() {
        let list_of_int = TypeExpr::List(Box::new(TypeExpr::Int));
        let out = coerce(&Payload::Int(3), &TypeExpr::Int, &list_of_int).unwrap();
        assert_eq!(out, Payload::List(vec![Payload::Int(3)]));
    }

    #[test]
    fn list_recontainers_into_set_with_dedup() {
        let list_int = TypeExpr::List(Box::new(TypeExpr::Int));
        let set_int = TypeExpr::Set(Box::new(TypeExpr::Int));
        let value = Payload::List(vec![Payload::Int(1), Payload::Int(1), Payload::Int(2)]);
        let out = coerce(&value, &list_int, &set_int).unwrap();
        assert_eq!(out, Payload::Set(vec![Payload::Int(1), Payload::Int(2)]));
    }

    #[test]
    fn dict_to_list_of_tuple() {
        let dict_t = TypeExpr::Dict(Box::new(TypeExpr::Str), Box::new(TypeExpr::Int));
        let list_t = TypeExpr::List(Box::new(TypeExpr::Tuple(vec![TypeExpr::Str, TypeExpr::Int])));
        let value = Payload::Dict(vec![(Payload::Str("a".into()), Payload::Int(1))]);
        let out = coerce(&value, &dict_t, &list_t).unwrap();
        assert_eq!(
            out,
            Payload::List(vec![Payload::Tuple(vec![Payload::Str("a".into()), Payload::Int(1)])])
        );
    }

    #[test]
    fn list_of_int_coerces_element_wise_into_list_of_float() {
        let list_int = TypeExpr::List(Box::new(TypeExpr::Int));
        let list_float = TypeExpr::List(Box::new(TypeExpr::Float));
        let value = Payload::List(vec![Payload::Int(1), Payload::Int(2)]);
        let out = coerce(&value, &list_int, &list_float).unwrap();
        assert_eq!(out, Payload::List(vec![Payload::Float(1.0), Payload::Float(2.0)]));
    }

    #[test]
    fn incompatible_types_fail_with_translation_failure() {
        let err = coerce(&Payload::Str("x".into()), &TypeExpr::Str, &TypeExpr::Int).unwrap_err();
        assert_eq!(err.category(), "translation_failure");
    }

    #[test]
    fn optional_destination_picks_the_matching_union_member() {
        let optional_int = TypeExpr::Union(vec![TypeExpr::Int, TypeExpr::Null]);
        let out = coerce(&Payload::Int(3), &TypeExpr::Int, &optional_int).unwrap();
        assert_eq!(out, Payload::Int(3));
    }
}

// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Envelope Payload
//!
//! The dynamically typed value carried inside an [`Envelope`](crate::entities::Envelope).
//! Modules observe payloads only through the envelope's stable accessor;
//! this is the concrete shape the Translation Layer dispatches on.

use crate::value_objects::TypeExpr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Null,
    List(Vec<Payload>),
    /// Insertion order of first occurrence, as required for deterministic
    /// `list<T> -> set<T>` re-containment (§4.4).
    Set(Vec<Payload>),
    /// Iterated in insertion order; `dict<K,V> -> list<tuple<K,V>>` order is
    /// unspecified by the grammar but must be deterministic within a run.
    Dict(Vec<(Payload, Payload)>),
    Tuple(Vec<Payload>),
}

impl Payload {
    /// The runtime-observed type of this value, used both for static
    /// wiring-time validation surfaces (tests, diagnostics) and as half of
    /// the Translation Layer's `(observed src type, declared dst type)`
    /// cache key.
    pub fn type_of(&self) -> TypeExpr {
        match self {
            Payload::Str(_) => TypeExpr::Str,
            Payload::Int(_) => TypeExpr::Int,
            Payload::Float(_) => TypeExpr::Float,
            Payload::Bool(_) => TypeExpr::Bool,
            Payload::Bytes(_) => TypeExpr::Bytes,
            Payload::Null => TypeExpr::Null,
            Payload::List(items) => TypeExpr::List(Box::new(
                items.first().map(Payload::type_of).unwrap_or(TypeExpr::Any),
            )),
            Payload::Set(items) => TypeExpr::Set(Box::new(
                items.first().map(Payload::type_of).unwrap_or(TypeExpr::Any),
            )),
            Payload::Dict(entries) => {
                let (k, v) = entries
                    .first()
                    .map(|(k, v)| (k.type_of(), v.type_of()))
                    .unwrap_or((TypeExpr::Any, TypeExpr::Any));
                TypeExpr::Dict(Box::new(k), Box::new(v))
            }
            Payload::Tuple(items) => TypeExpr::Tuple(items.iter().map(Payload::type_of).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_of_matches_declared_primitive_shape() {
        assert_eq!(Payload::Int(3).type_of(), TypeExpr::Int);
        assert_eq!(Payload::Str("x".into()).type_of(), TypeExpr::Str);
    }

    #[test]
    fn type_of_list_uses_first_element() {
        let list = Payload::List(vec![Payload::Int(1), Payload::Int(2)]);
        assert_eq!(list.type_of(), TypeExpr::List(Box::new(TypeExpr::Int)));
    }
}

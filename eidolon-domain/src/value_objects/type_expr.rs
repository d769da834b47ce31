// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Type Expression Grammar
//!
//! The textual type grammar manifests use to declare input/output types
//! (§4.4, §6), plus the static compatibility relation wiring-time validation
//! checks against it.
//!
//! Grammar: primitives `str, int, float, bool, bytes, any`; parametric
//! `list<T>`, `set<T>`, `dict<K,V>`, `tuple<T1,…,Tn>`; union `T1|T2|…`;
//! `optional<T>` is parsed directly as sugar for `T|null` — there is no
//! separate `Optional` variant, which keeps the compatibility relation's
//! union case (§4.4 rule 4) the single place that has to know about it.

use crate::EidolonError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeExpr {
    Str,
    Int,
    Float,
    Bool,
    Bytes,
    Any,
    /// Only reachable as a union member, produced by the `optional<T>` sugar.
    Null,
    List(Box<TypeExpr>),
    Set(Box<TypeExpr>),
    Dict(Box<TypeExpr>, Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Union(Vec<TypeExpr>),
}

impl TypeExpr {
    pub fn parse(src: &str) -> Result<Self, EidolonError> {
        let mut parser = Parser {
            chars: src.chars().collect(),
            pos: 0,
        };
        let expr = parser.parse_union()?;
        parser.skip_ws();
        if parser.pos != parser.chars.len() {
            return Err(EidolonError::bad_manifest(format!(
                "trailing input in type expression '{src}' at byte {}",
                parser.pos
            )));
        }
        Ok(expr)
    }

    /// The static compatibility relation (§4.4): is a value declared as
    /// `self` acceptable where `dst` is declared?
    pub fn is_compatible_with(&self, dst: &TypeExpr) -> bool {
        if matches!(dst, TypeExpr::Any) {
            return true;
        }
        if self == dst {
            return true;
        }
        if CoercionRule::resolve(self, dst).is_some() {
            return true;
        }
        if let TypeExpr::Union(alts) = dst {
            return alts.iter().any(|alt| self.is_compatible_with(alt));
        }
        false
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Str => write!(f, "str"),
            TypeExpr::Int => write!(f, "int"),
            TypeExpr::Float => write!(f, "float"),
            TypeExpr::Bool => write!(f, "bool"),
            TypeExpr::Bytes => write!(f, "bytes"),
            TypeExpr::Any => write!(f, "any"),
            TypeExpr::Null => write!(f, "null"),
            TypeExpr::List(t) => write!(f, "list<{t}>"),
            TypeExpr::Set(t) => write!(f, "set<{t}>"),
            TypeExpr::Dict(k, v) => write!(f, "dict<{k},{v}>"),
            TypeExpr::Tuple(ts) => {
                write!(f, "tuple<")?;
                for (i, t) in ts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ">")
            }
            TypeExpr::Union(ts) => {
                for (i, t) in ts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{t}")?;
                }
                Ok(())
            }
        }
    }
}

/// Which coercion rule of §4.4 bridges `src` into `dst`, if any. `coerce()`
/// in `services::translation` switches on this to perform the actual value
/// transform; `TypeExpr::is_compatible_with` only needs to know one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercionRule {
    Identity,
    NumericWiden,
    WrapSingleton,
    Recontainer,
    StrToBytes,
    BytesToStr,
    DictToListTuple,
    TupleToList,
    ElementWise(Box<CoercionRule>),
}

impl CoercionRule {
    pub fn resolve(src: &TypeExpr, dst: &TypeExpr) -> Option<CoercionRule> {
        use TypeExpr::*;
        match (src, dst) {
            (_, Any) => Some(CoercionRule::Identity),
            (Int, Float) => Some(CoercionRule::NumericWiden),
            (s, List(inner)) if s == inner.as_ref() => Some(CoercionRule::WrapSingleton),
            (s, Set(inner)) if s == inner.as_ref() => Some(CoercionRule::WrapSingleton),
            (List(a), Set(b)) if a == b => Some(CoercionRule::Recontainer),
            (Set(a), List(b)) if a == b => Some(CoercionRule::Recontainer),
            (Str, Bytes) => Some(CoercionRule::StrToBytes),
            (Bytes, Str) => Some(CoercionRule::BytesToStr),
            (Dict(k, v), List(inner)) => match inner.as_ref() {
                Tuple(ts) if ts.len() == 2 && &ts[0] == k.as_ref() && &ts[1] == v.as_ref() => {
                    Some(CoercionRule::DictToListTuple)
                }
                _ => None,
            },
            (Tuple(ts), List(inner)) if !ts.is_empty() && ts.iter().all(|t| t == inner.as_ref()) => {
                Some(CoercionRule::TupleToList)
            }
            (List(a), List(b)) if a != b => {
                CoercionRule::resolve(a, b).map(|inner| CoercionRule::ElementWise(Box::new(inner)))
            }
            _ => None,
        }
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn expect(&mut self, expected: char) -> Result<(), EidolonError> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            other => Err(EidolonError::bad_manifest(format!(
                "expected '{expected}', found {:?} at byte {}",
                other, self.pos
            ))),
        }
    }

    /// `union := atom ('|' atom)*`
    fn parse_union(&mut self) -> Result<TypeExpr, EidolonError> {
        let mut alts = vec![self.parse_atom()?];
        loop {
            self.skip_ws();
            if self.peek() == Some('|') {
                self.bump();
                alts.push(self.parse_atom()?);
            } else {
                break;
            }
        }
        if alts.len() == 1 {
            Ok(alts.pop().unwrap())
        } else {
            Ok(TypeExpr::Union(alts))
        }
    }

    /// `atom := identifier ('<' union (',' union)* '>')?`
    fn parse_atom(&mut self) -> Result<TypeExpr, EidolonError> {
        let name = self.parse_identifier()?;
        self.skip_ws();
        if self.peek() == Some('<') {
            self.bump();
            let mut args = vec![self.parse_union()?];
            loop {
                self.skip_ws();
                if self.peek() == Some(',') {
                    self.bump();
                    args.push(self.parse_union()?);
                } else {
                    break;
                }
            }
            self.expect('>')?;
            self.build_parametric(&name, args)
        } else {
            self.build_primitive(&name)
        }
    }

    fn parse_identifier(&mut self) -> Result<String, EidolonError> {
        self.skip_ws();
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(EidolonError::bad_manifest(format!(
                "expected type name at byte {}",
                self.pos
            )));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn build_primitive(&self, name: &str) -> Result<TypeExpr, EidolonError> {
        match name {
            "str" => Ok(TypeExpr::Str),
            "int" => Ok(TypeExpr::Int),
            "float" => Ok(TypeExpr::Float),
            "bool" => Ok(TypeExpr::Bool),
            "bytes" => Ok(TypeExpr::Bytes),
            "any" => Ok(TypeExpr::Any),
            "null" => Ok(TypeExpr::Null),
            other => Err(EidolonError::bad_manifest(format!(
                "unknown type '{other}', or missing type arguments"
            ))),
        }
    }

    fn build_parametric(&self, name: &str, mut args: Vec<TypeExpr>) -> Result<TypeExpr, EidolonError> {
        match (name, args.len()) {
            ("list", 1) => Ok(TypeExpr::List(Box::new(args.remove(0)))),
            ("set", 1) => Ok(TypeExpr::Set(Box::new(args.remove(0)))),
            ("optional", 1) => {
                let inner = args.remove(0);
                Ok(TypeExpr::Union(vec![inner, TypeExpr::Null]))
            }
            ("dict", 2) => {
                let v = args.remove(1);
                let k = args.remove(0);
                Ok(TypeExpr::Dict(Box::new(k), Box::new(v)))
            }
            ("tuple", n) if n >= 1 => Ok(TypeExpr::Tuple(args)),
            (other, n) => Err(EidolonError::bad_manifest(format!(
                "'{other}' does not accept {n} type argument(s)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primitives() {
        assert_eq!(TypeExpr::parse("int").unwrap(), TypeExpr::Int);
        assert_eq!(TypeExpr::parse("any").unwrap(), TypeExpr::Any);
    }

    #[test]
    fn parses_nested_parametric_types() {
        let t = TypeExpr::parse("list<dict<str,int>>").unwrap();
        assert_eq!(
            t,
            TypeExpr::List(Box::new(TypeExpr::Dict(
                Box::new(TypeExpr::Str),
                Box::new(TypeExpr::Int)
            )))
        );
    }

    #[test]
    fn parses_union_and_optional_sugar() {
        assert_eq!(
            TypeExpr::parse("int|str").unwrap(),
            TypeExpr::Union(vec![TypeExpr::Int, TypeExpr::Str])
        );
        assert_eq!(
            TypeExpr::parse("optional<int>").unwrap(),
            TypeExpr::Union(vec![TypeExpr::Int, TypeExpr::Null])
        );
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(TypeExpr::parse("dict<str>").is_err());
        assert!(TypeExpr::parse("list<str,int>").is_err());
    }

    #[test]
    fn int_is_compatible_with_float_via_widening() {
        assert!(TypeExpr::Int.is_compatible_with(&TypeExpr::Float));
        assert!(!TypeExpr::Float.is_compatible_with(&TypeExpr::Int));
    }

    #[test]
    fn anything_is_compatible_with_any() {
        assert!(TypeExpr::parse("list<tuple<int,str>>")
            .unwrap()
            .is_compatible_with(&TypeExpr::Any));
    }

    #[test]
    fn producer_of_t_satisfies_optional_t() {
        let optional_int = TypeExpr::parse("optional<int>").unwrap();
        assert!(TypeExpr::Int.is_compatible_with(&optional_int));
    }

    #[test]
    fn str_to_int_is_not_a_coercion_rule() {
        assert!(!TypeExpr::Str.is_compatible_with(&TypeExpr::Int));
    }

    #[test]
    fn list_element_wise_coercion_is_recursive() {
        let list_int = TypeExpr::List(Box::new(TypeExpr::Int));
        let list_float = TypeExpr::List(Box::new(TypeExpr::Float));
        assert!(list_int.is_compatible_with(&list_float));
    }
}

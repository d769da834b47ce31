// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module Manifest
//!
//! Describes one module on disk (§3, §6). The manifest is parsed from YAML
//! by an infrastructure adapter and handed to the domain already validated
//! for uniqueness of input/output names and well-formed declared types; the
//! constructors here re-check both invariants so the entity can never exist
//! in an invalid state regardless of who builds it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::value_objects::{ModuleName, TypeExpr};
use crate::EidolonError;

/// One declared input or output of a module (§3: `{name, declared type,
/// description}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr_raw: String,
    #[serde(default)]
    pub description: String,
    /// `on_trigger` slots require exactly one input declared `trigger: true`
    /// (§9, open question 3).
    #[serde(default)]
    pub trigger: bool,
}

impl Port {
    pub fn parsed_type(&self) -> Result<TypeExpr, EidolonError> {
        TypeExpr::parse(&self.type_expr_raw)
    }
}

/// A dependency requirement a module declares against its runtime
/// environment (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub version: String,
}

/// The module's entry point and optional test entry point (§6:
/// `runtime.{main, tests?}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeDescriptor {
    pub main: String,
    #[serde(default)]
    pub tests: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub name: ModuleName,
    pub alias: String,
    pub creator: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub repository: Option<String>,
    pub runtime: RuntimeDescriptor,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub inputs: Vec<Port>,
    #[serde(default)]
    pub outputs: Vec<Port>,
}

impl ModuleManifest {
    /// Re-validates the structural invariants of §3: input names unique,
    /// output names unique, every declared type parses under the grammar of
    /// §4.4, and at most one input is marked `trigger: true`.
    pub fn validate(&self) -> Result<(), EidolonError> {
        let mut seen_inputs = HashSet::new();
        for input in &self.inputs {
            if !seen_inputs.insert(input.name.as_str()) {
                return Err(EidolonError::bad_manifest(format!(
                    "module '{}' declares input '{}' more than once",
                    self.name, input.name
                )));
            }
            input.parsed_type()?;
        }

        let mut seen_outputs = HashSet::new();
        for output in &self.outputs {
            if !seen_outputs.insert(output.name.as_str()) {
                return Err(EidolonError::bad_manifest(format!(
                    "module '{}' declares output '{}' more than once",
                    self.name, output.name
                )));
            }
            output.parsed_type()?;
        }

        let trigger_count = self.inputs.iter().filter(|i| i.trigger).count();
        if trigger_count > 1 {
            return Err(EidolonError::bad_manifest(format!(
                "module '{}' declares {trigger_count} trigger inputs, at most one is allowed",
                self.name
            )));
        }

        Ok(())
    }

    pub fn output(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|o| o.name == name)
    }

    pub fn input(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|i| i.name == name)
    }

    pub fn trigger_input(&self) -> Option<&Port> {
        self.inputs.iter().find(|i| i.trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(inputs: Vec<Port>, outputs: Vec<Port>) -> ModuleManifest {
        ModuleManifest {
            name: ModuleName::new("crawler").unwrap(),
            alias: "Crawler".into(),
            creator: "eidolon".into(),
            version: "1.0.0".into(),
            description: String::new(),
            repository: None,
            runtime: RuntimeDescriptor {
                main: "main.py".into(),
                tests: None,
            },
            requirements: vec![],
            inputs,
            outputs,
        }
    }

    fn port(name: &str, type_expr: &str) -> Port {
        Port {
            name: name.into(),
            type_expr_raw: type_expr.into(),
            description: String::new(),
            trigger: false,
        }
    }

    #[test]
    fn duplicate_output_names_are_rejected() {
        let m = manifest(vec![], vec![port("x", "int"), port("x", "str")]);
        assert!(m.validate().is_err());
    }

    #[test]
    fn unparseable_declared_type_is_rejected() {
        let m = manifest(vec![], vec![port("x", "not a type")]);
        assert!(m.validate().is_err());
    }

    #[test]
    fn at_most_one_trigger_input_allowed() {
        let mut a = port("a", "any");
        a.trigger = true;
        let mut b = port("b", "any");
        b.trigger = true;
        let m = manifest(vec![a, b], vec![]);
        assert!(m.validate().is_err());
    }
}

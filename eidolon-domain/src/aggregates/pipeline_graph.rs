// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Graph
//!
//! The aggregate root over a validated [`PipelineDocument`]: turns the
//! `depends_on` relation into a topological execution order (§4.1, §4.7
//! step 4), detects cycles via Kahn's algorithm (§4.1), and computes the
//! transitive closure of slots excluded by the security admission policy
//! (§4.7 step 3, §9 "dependency graph with transitive exclusion").
//!
//! This is the only place in the domain that reasons about the pipeline as a
//! graph rather than as a flat document; the Module Engine in the runtime
//! crate drives construction/wiring/shutdown from the order this aggregate
//! produces but does not recompute it.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::entities::PipelineDocument;
use crate::value_objects::SlotId;
use crate::EidolonError;

#[derive(Debug, Clone)]
pub struct PipelineGraph {
    /// Slots in topological order (dependencies before dependents).
    order: Vec<SlotId>,
    edges: HashMap<SlotId, Vec<SlotId>>,
    reverse_edges: HashMap<SlotId, Vec<SlotId>>,
}

impl PipelineGraph {
    /// Builds the graph from an already-[`validate`](PipelineDocument::validate)d
    /// document and computes its topological order.
    ///
    /// # Errors
    /// Returns `EidolonError::Cycle` naming every slot that could not be
    /// scheduled if `depends_on` contains a cycle (§4.1, Kahn-style
    /// topological reduction: any node left with a non-zero in-degree after
    /// the reduction terminates is part of, or downstream of, a cycle).
    pub fn build(doc: &PipelineDocument) -> Result<Self, EidolonError> {
        let mut edges: HashMap<SlotId, Vec<SlotId>> = HashMap::new();
        let mut reverse_edges: HashMap<SlotId, Vec<SlotId>> = HashMap::new();
        let mut in_degree: HashMap<SlotId, usize> = HashMap::new();

        for slot in &doc.slots {
            edges.entry(slot.id.clone()).or_default();
            reverse_edges.entry(slot.id.clone()).or_default();
            in_degree.entry(slot.id.clone()).or_insert(0);
        }
        for slot in &doc.slots {
            for dep in &slot.depends_on {
                edges.entry(dep.clone()).or_default().push(slot.id.clone());
                reverse_edges.entry(slot.id.clone()).or_default().push(dep.clone());
                *in_degree.entry(slot.id.clone()).or_insert(0) += 1;
            }
        }

        // Deterministic order among simultaneously-ready slots.
        let mut initially_ready: Vec<SlotId> = in_degree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(id, _)| id.clone())
            .collect();
        initially_ready.sort();
        let mut queue: VecDeque<SlotId> = initially_ready.into();

        let mut order = Vec::with_capacity(doc.slots.len());
        while let Some(id) = queue.pop_front() {
            order.push(id.clone());
            let mut newly_ready = Vec::new();
            if let Some(dependents) = edges.get(&id) {
                for dependent in dependents {
                    let deg = in_degree.get_mut(dependent).expect("tracked above");
                    *deg -= 1;
                    if *deg == 0 {
                        newly_ready.push(dependent.clone());
                    }
                }
            }
            newly_ready.sort();
            for id in newly_ready {
                queue.push_back(id);
            }
        }

        if order.len() != doc.slots.len() {
            let scheduled: HashSet<&SlotId> = order.iter().collect();
            let mut offenders: Vec<String> = doc
                .slots
                .iter()
                .map(|s| &s.id)
                .filter(|id| !scheduled.contains(id))
                .map(|id| id.as_str().to_string())
                .collect();
            offenders.sort();
            return Err(EidolonError::Cycle(offenders));
        }

        Ok(Self {
            order,
            edges,
            reverse_edges,
        })
    }

    /// Slots in dependency order, dependencies before dependents (§4.7 step
    /// 4: "Topologically sort the surviving slots").
    pub fn topological_order(&self) -> &[SlotId] {
        &self.order
    }

    /// The same order reversed, used to drive the shutdown coordinator
    /// (§4.7 step 8: "reverse topological order").
    pub fn reverse_topological_order(&self) -> Vec<SlotId> {
        self.order.iter().rev().cloned().collect()
    }

    pub fn direct_dependents(&self, id: &SlotId) -> &[SlotId] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn direct_dependencies(&self, id: &SlotId) -> &[SlotId] {
        self.reverse_edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Computes the transitive closure of `excluded` over the dependent
    /// relation: every slot that (directly or indirectly) consumes an
    /// excluded slot's outputs is excluded too (§4.7 step 3, §9).
    ///
    /// Returned in topological order so the caller can log exclusions in a
    /// stable, deterministic sequence.
    pub fn transitive_exclusion(&self, excluded: &HashSet<SlotId>) -> Vec<SlotId> {
        let mut closure: HashSet<SlotId> = excluded.clone();
        let mut changed = true;
        while changed {
            changed = false;
            for id in &self.order {
                if closure.contains(id) {
                    continue;
                }
                if self
                    .direct_dependencies(id)
                    .iter()
                    .any(|dep| closure.contains(dep))
                {
                    closure.insert(id.clone());
                    changed = true;
                }
            }
        }
        self.order.iter().filter(|id| closure.contains(*id)).cloned().collect()
    }

    /// Topological order restricted to slots not in `excluded`.
    pub fn surviving_order(&self, excluded: &HashSet<SlotId>) -> Vec<SlotId> {
        self.order.iter().filter(|id| !excluded.contains(*id)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ExecutionOptions, ModuleSlot};
    use crate::value_objects::{ModuleName, RunMode};
    use std::collections::HashMap as Map;

    fn slot(id: &str, depends_on: Vec<&str>) -> ModuleSlot {
        ModuleSlot {
            id: SlotId::new(id).unwrap(),
            name: ModuleName::new("m").unwrap(),
            config: Map::new(),
            run_mode: RunMode::Once,
            depends_on: depends_on.into_iter().map(|s| SlotId::new(s).unwrap()).collect(),
            input: Map::new(),
            mailbox_size: None,
            mailbox_policy: None,
            cycle_delay: None,
        }
    }

    fn doc(slots: Vec<ModuleSlot>) -> PipelineDocument {
        PipelineDocument {
            name: "p".into(),
            description: String::new(),
            options: ExecutionOptions::default(),
            slots,
        }
    }

    #[test]
    fn linear_chain_orders_dependencies_first() {
        let graph = PipelineGraph::build(&doc(vec![
            slot("a", vec![]),
            slot("b", vec!["a"]),
            slot("c", vec!["b"]),
        ]))
        .unwrap();
        let order: Vec<&str> = graph.topological_order().iter().map(|s| s.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn two_node_cycle_is_rejected() {
        let err = PipelineGraph::build(&doc(vec![slot("a", vec!["b"]), slot("b", vec!["a"])])).unwrap_err();
        match err {
            EidolonError::Cycle(mut nodes) => {
                nodes.sort();
                assert_eq!(nodes, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected Cycle, got {other:?}"),
        }
    }

    #[test]
    fn reverse_order_is_exactly_reversed() {
        let graph = PipelineGraph::build(&doc(vec![slot("a", vec![]), slot("b", vec!["a"])])).unwrap();
        let fwd: Vec<&str> = graph.topological_order().iter().map(|s| s.as_str()).collect();
        let rev: Vec<&str> = graph
            .reverse_topological_order()
            .iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(fwd, vec!["a", "b"]);
        assert_eq!(rev, vec!["b", "a"]);
    }

    #[test]
    fn transitive_exclusion_removes_downstream_consumers() {
        let graph = PipelineGraph::build(&doc(vec![
            slot("a", vec![]),
            slot("b", vec!["a"]),
            slot("c", vec!["b"]),
            slot("d", vec![]),
        ]))
        .unwrap();
        let mut excluded = HashSet::new();
        excluded.insert(SlotId::new("a").unwrap());
        let closure = graph.transitive_exclusion(&excluded);
        let names: Vec<&str> = closure.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(!names.contains(&"d"));
    }
}

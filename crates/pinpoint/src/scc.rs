//! Strongly connected components of the conclusion dependency graph
//!
//! Edges go from a conclusion to the premises of each of its inferences. Only
//! conclusions reachable from the goal are visited. Components are computed
//! with an iterative version of Tarjan's algorithm and listed premises first:
//! if `v` is a premise of an inference for `u`, then the component of `v`
//! never comes after the component of `u`.

use crate::proof::Proof;
use indexmap::IndexSet;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

const UNVISITED: usize = usize::MAX;

/// Components of a proof restricted to the ancestors of a goal.
#[derive(Debug, Clone)]
pub struct StronglyConnectedComponents<C> {
    components: Vec<Vec<C>>,
    component_of: HashMap<C, usize>,
    /// Whether each component contains a cycle (size > 1 or a self-loop)
    cyclic: Vec<bool>,
}

/// Per-node traversal state, indexed by interned conclusion.
struct Tarjan {
    successors: Vec<Vec<usize>>,
    self_loop: Vec<bool>,
    index: Vec<usize>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
}

impl Tarjan {
    /// Intern the premises of `node` and record them as its successors.
    fn expand<C, P>(&mut self, node: usize, nodes: &mut IndexSet<C>, proof: &P)
    where
        C: Clone + Eq + Hash,
        P: Proof<C> + ?Sized,
    {
        let conclusion = nodes[node].clone();
        let mut successors = Vec::new();
        for inference in proof.inferences(&conclusion) {
            for premise in inference.premises {
                let (id, _) = nodes.insert_full(premise);
                if id == node {
                    self.self_loop[node] = true;
                }
                if !successors.contains(&id) {
                    successors.push(id);
                }
            }
        }
        while self.index.len() < nodes.len() {
            self.successors.push(Vec::new());
            self.self_loop.push(false);
            self.index.push(UNVISITED);
            self.lowlink.push(UNVISITED);
            self.on_stack.push(false);
        }
        self.successors[node] = successors;
    }
}

impl<C> StronglyConnectedComponents<C>
where
    C: Clone + Eq + Hash,
{
    pub fn compute<P: Proof<C> + ?Sized>(proof: &P, goal: &C) -> Self {
        let mut nodes: IndexSet<C> = IndexSet::new();
        nodes.insert(goal.clone());
        let mut tarjan = Tarjan {
            successors: vec![Vec::new()],
            self_loop: vec![false],
            index: vec![UNVISITED],
            lowlink: vec![UNVISITED],
            on_stack: vec![false],
        };

        let mut counter = 0;
        let mut stack: Vec<usize> = Vec::new();
        // (node, position of the next successor to visit)
        let mut frames: Vec<(usize, usize)> = Vec::new();
        let mut raw_components: Vec<Vec<usize>> = Vec::new();

        tarjan.index[0] = counter;
        tarjan.lowlink[0] = counter;
        counter += 1;
        stack.push(0);
        tarjan.on_stack[0] = true;
        tarjan.expand(0, &mut nodes, proof);
        frames.push((0, 0));

        while let Some(&(node, position)) = frames.last() {
            if let Some(&next) = tarjan.successors[node].get(position) {
                if let Some(frame) = frames.last_mut() {
                    frame.1 += 1;
                }
                if tarjan.index[next] == UNVISITED {
                    tarjan.index[next] = counter;
                    tarjan.lowlink[next] = counter;
                    counter += 1;
                    stack.push(next);
                    tarjan.on_stack[next] = true;
                    tarjan.expand(next, &mut nodes, proof);
                    frames.push((next, 0));
                } else if tarjan.on_stack[next] {
                    tarjan.lowlink[node] = tarjan.lowlink[node].min(tarjan.index[next]);
                }
                continue;
            }

            frames.pop();
            if tarjan.lowlink[node] == tarjan.index[node] {
                let mut component = Vec::new();
                while let Some(member) = stack.pop() {
                    tarjan.on_stack[member] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                raw_components.push(component);
            }
            if let Some(&(parent, _)) = frames.last() {
                tarjan.lowlink[parent] = tarjan.lowlink[parent].min(tarjan.lowlink[node]);
            }
        }

        let mut components = Vec::with_capacity(raw_components.len());
        let mut component_of = HashMap::with_capacity(nodes.len());
        let mut cyclic = Vec::with_capacity(raw_components.len());
        for (id, members) in raw_components.into_iter().enumerate() {
            cyclic.push(members.len() > 1 || tarjan.self_loop[members[0]]);
            let component: Vec<C> = members.iter().map(|&member| nodes[member].clone()).collect();
            for conclusion in &component {
                component_of.insert(conclusion.clone(), id);
            }
            components.push(component);
        }

        let result = StronglyConnectedComponents {
            components,
            component_of,
            cyclic,
        };
        debug!(
            conclusions = nodes.len(),
            components = result.len(),
            cyclic = result.cyclic_components().count(),
            largest = result.largest_component_size(),
            "computed strongly connected components"
        );
        result
    }

    /// Components, premises first.
    pub fn components(&self) -> &[Vec<C>] {
        &self.components
    }

    pub fn component_id(&self, conclusion: &C) -> Option<usize> {
        self.component_of.get(conclusion).copied()
    }

    pub fn component(&self, id: usize) -> &[C] {
        &self.components[id]
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether the component contains a cycle.
    pub fn is_cyclic(&self, id: usize) -> bool {
        self.cyclic[id]
    }

    /// Components containing a cycle.
    pub fn cyclic_components(&self) -> impl Iterator<Item = &[C]> {
        self.components
            .iter()
            .zip(&self.cyclic)
            .filter(|(_, &cyclic)| cyclic)
            .map(|(component, _)| component.as_slice())
    }

    pub fn largest_component_size(&self) -> usize {
        self.components.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Whether some conclusion reachable from the goal depends on itself.
pub fn has_cycle<C, P>(proof: &P, goal: &C) -> bool
where
    C: Clone + Eq + Hash,
    P: Proof<C> + ?Sized,
{
    StronglyConnectedComponents::compute(proof, goal).cyclic_components().next().is_some()
}

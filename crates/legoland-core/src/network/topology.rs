//! Wiring description of a process network
//!
//! A topology lists every process with the channels it reads and writes.
//! Two processes are connected when one writes a channel the other reads.
//! Its main use is checking that every feedback cycle carries a seed.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::comm::ChannelId;
use crate::{Error, Result};

/// One process in a topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Qualified name, e.g. `"fib/pairs/tail"`
    pub name: String,
    /// Process kind, e.g. `"tail"`
    pub kind: &'static str,
    /// Whether the process injects a value before its first read
    pub seed: bool,
    pub inputs: Vec<ChannelId>,
    pub outputs: Vec<ChannelId>,
}

/// Static wiring of a network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Topology {
    nodes: Vec<Node>,
}

impl Topology {
    /// Create an empty topology
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a process
    pub fn add(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Fold in another topology, qualifying its node names with `prefix`
    pub fn merge(&mut self, prefix: &str, other: Topology) {
        self.nodes.extend(other.nodes.into_iter().map(|mut node| {
            node.name = format!("{}/{}", prefix, node.name);
            node
        }));
    }

    /// All processes
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every channel touched by some process
    pub fn channels(&self) -> BTreeSet<ChannelId> {
        self.nodes
            .iter()
            .flat_map(|n| n.inputs.iter().chain(&n.outputs))
            .copied()
            .collect()
    }

    /// Channels read inside the network but written outside it
    pub fn external_inputs(&self) -> BTreeSet<ChannelId> {
        let written: BTreeSet<_> = self.nodes.iter().flat_map(|n| &n.outputs).collect();
        self.nodes
            .iter()
            .flat_map(|n| &n.inputs)
            .filter(|c| !written.contains(c))
            .copied()
            .collect()
    }

    /// Channels written inside the network but read outside it
    pub fn external_outputs(&self) -> BTreeSet<ChannelId> {
        let read: BTreeSet<_> = self.nodes.iter().flat_map(|n| &n.inputs).collect();
        self.nodes
            .iter()
            .flat_map(|n| &n.outputs)
            .filter(|c| !read.contains(c))
            .copied()
            .collect()
    }

    /// Feedback cycles with no seed on them
    ///
    /// Seed processes are removed from the graph; every strongly connected
    /// component that still contains a cycle is returned as a list of node
    /// names.
    pub fn unseeded_cycles(&self) -> Vec<Vec<String>> {
        let live: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| !self.nodes[i].seed)
            .collect();

        let mut reader_of: HashMap<ChannelId, usize> = HashMap::new();
        for &i in &live {
            for &c in &self.nodes[i].inputs {
                reader_of.insert(c, i);
            }
        }

        let successors: HashMap<usize, Vec<usize>> = live
            .iter()
            .map(|&i| {
                let next = self.nodes[i]
                    .outputs
                    .iter()
                    .filter_map(|c| reader_of.get(c).copied())
                    .collect();
                (i, next)
            })
            .collect();

        strongly_connected(&live, &successors)
            .into_iter()
            .filter(|scc| scc.len() > 1 || successors[&scc[0]].contains(&scc[0]))
            .map(|scc| scc.into_iter().map(|i| self.nodes[i].name.clone()).collect())
            .collect()
    }

    /// Check that every feedback cycle carries a seed
    pub fn validate(&self) -> Result<()> {
        match self.unseeded_cycles().first() {
            None => Ok(()),
            Some(cycle) => Err(Error::Topology(format!(
                "feedback cycle without a seed: {}",
                cycle.join(" -> ")
            ))),
        }
    }
}

/// Tarjan's algorithm; components come out in reverse topological order
fn strongly_connected(
    nodes: &[usize],
    successors: &HashMap<usize, Vec<usize>>,
) -> Vec<Vec<usize>> {
    struct State<'a> {
        successors: &'a HashMap<usize, Vec<usize>>,
        index: HashMap<usize, usize>,
        lowlink: HashMap<usize, usize>,
        stack: Vec<usize>,
        on_stack: BTreeSet<usize>,
        next_index: usize,
        components: Vec<Vec<usize>>,
    }

    fn visit(state: &mut State<'_>, v: usize) {
        state.index.insert(v, state.next_index);
        state.lowlink.insert(v, state.next_index);
        state.next_index += 1;
        state.stack.push(v);
        state.on_stack.insert(v);

        let successors = state.successors;
        for &w in successors.get(&v).map(Vec::as_slice).unwrap_or_default() {
            if !state.index.contains_key(&w) {
                visit(state, w);
                let low = state.lowlink[&v].min(state.lowlink[&w]);
                state.lowlink.insert(v, low);
            } else if state.on_stack.contains(&w) {
                let low = state.lowlink[&v].min(state.index[&w]);
                state.lowlink.insert(v, low);
            }
        }

        if state.lowlink[&v] == state.index[&v] {
            let mut component = Vec::new();
            while let Some(w) = state.stack.pop() {
                state.on_stack.remove(&w);
                component.push(w);
                if w == v {
                    break;
                }
            }
            component.sort_unstable();
            state.components.push(component);
        }
    }

    let mut state = State {
        successors,
        index: HashMap::new(),
        lowlink: HashMap::new(),
        stack: Vec::new(),
        on_stack: BTreeSet::new(),
        next_index: 0,
        components: Vec::new(),
    };
    for &v in nodes {
        if !state.index.contains_key(&v) {
            visit(&mut state, v);
        }
    }
    state.components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::channel;
    use crate::Value;

    fn ids(n: usize) -> Vec<ChannelId> {
        (0..n).map(|_| channel::<Value>().0.id()).collect()
    }

    fn node(name: &str, seed: bool, inputs: &[ChannelId], outputs: &[ChannelId]) -> Node {
        Node {
            name: name.to_string(),
            kind: "test",
            seed,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        }
    }

    #[test]
    fn test_empty_topology_is_valid() {
        let topology = Topology::new();
        assert!(topology.validate().is_ok());
        assert!(topology.channels().is_empty());
    }

    #[test]
    fn test_pipeline_has_no_cycles() {
        let c = ids(3);
        let mut t = Topology::new();
        t.add(node("a", false, &[c[0]], &[c[1]]));
        t.add(node("b", false, &[c[1]], &[c[2]]));

        assert!(t.unseeded_cycles().is_empty());
        assert_eq!(t.external_inputs().into_iter().collect::<Vec<_>>(), vec![c[0]]);
        assert_eq!(t.external_outputs().into_iter().collect::<Vec<_>>(), vec![c[2]]);
        assert_eq!(t.channels().len(), 3);
    }

    #[test]
    fn test_unseeded_cycle_detected() {
        let c = ids(3);
        let mut t = Topology::new();
        t.add(node("delta", false, &[c[0]], &[c[1], c[2]]));
        t.add(node("succ", false, &[c[1]], &[c[0]]));

        assert_eq!(
            t.unseeded_cycles(),
            vec![vec!["delta".to_string(), "succ".to_string()]]
        );
        let err = t.validate().unwrap_err();
        assert!(matches!(err, Error::Topology(ref msg) if msg.contains("delta -> succ")));
    }

    #[test]
    fn test_seed_breaks_cycle() {
        let c = ids(4);
        let mut t = Topology::new();
        t.add(node("prefix", true, &[c[3]], &[c[0]]));
        t.add(node("delta", false, &[c[0]], &[c[1], c[2]]));
        t.add(node("succ", false, &[c[1]], &[c[3]]));

        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_self_loop_detected() {
        let c = ids(1);
        let mut t = Topology::new();
        t.add(node("id", false, &[c[0]], &[c[0]]));
        assert_eq!(t.unseeded_cycles(), vec![vec!["id".to_string()]]);
    }

    #[test]
    fn test_merge_qualifies_names() {
        let c = ids(2);
        let mut inner = Topology::new();
        inner.add(node("tail", false, &[c[0]], &[c[1]]));

        let mut outer = Topology::new();
        outer.merge("pairs", inner);
        assert_eq!(outer.nodes()[0].name, "pairs/tail");
    }
}

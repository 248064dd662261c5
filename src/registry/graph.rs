// src/registry/graph.rs

//! Cycle detection over snapshot dependencies.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::Result;
use crate::registry::{ConfigId, ConfigurationRegistry};

/// Return a configuration that takes part in a dependency cycle, if any.
///
/// Edge direction follows the dependency: `source -> target`.
pub fn find_cycle_in<'a, N, E>(nodes: N, edges: E) -> Option<ConfigId>
where
    N: IntoIterator<Item = &'a str>,
    E: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for node in nodes {
        graph.add_node(node);
    }
    for (source, target) in edges {
        graph.add_edge(source, target, ());
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => None,
        Err(cycle) => Some(cycle.node_id().to_string()),
    }
}

/// Check the live registry for a dependency cycle.
pub fn find_cycle(registry: &dyn ConfigurationRegistry) -> Result<Option<ConfigId>> {
    let configs = registry.active_configurations();

    let mut edges = Vec::new();
    for config in &configs {
        for edge in registry.dependencies(config)? {
            edges.push((edge.source, edge.target));
        }
    }

    Ok(find_cycle_in(
        configs.iter().map(String::as_str),
        edges.iter().map(|(s, t)| (s.as_str(), t.as_str())),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_has_no_cycle() {
        let found = find_cycle_in(["A", "B", "C"], [("A", "B"), ("B", "C")]);
        assert_eq!(found, None);
    }

    #[test]
    fn two_node_cycle_is_found() {
        let found = find_cycle_in(["A", "B"], [("A", "B"), ("B", "A")]).unwrap();
        assert!(found == "A" || found == "B");
    }

    #[test]
    fn self_loop_is_a_cycle() {
        assert_eq!(find_cycle_in(["A"], [("A", "A")]), Some("A".to_string()));
    }
}

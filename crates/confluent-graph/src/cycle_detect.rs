use std::collections::HashSet;

use crate::dep_graph::ReferenceGraph;

/// Detect a reference cycle using DFS, starting from nodes in declaration
/// order. The returned path repeats its first node at the end
/// (`a -> b -> a`; a self reference is `a -> a`).
pub fn find_cycle(graph: &ReferenceGraph) -> Option<Vec<String>> {
    let mut visited = HashSet::new();

    for node in graph.nodes() {
        if !visited.contains(node) {
            if let Some(cycle) = dfs_find_cycle(node, graph, &mut visited) {
                tracing::debug!(cycle = %cycle.join(" -> "), "reference cycle detected");
                return Some(cycle);
            }
        }
    }
    None
}

/// DFS from `root` on an explicit stack. Each entry holds the references an
/// open node has left to visit; `path` holds the open nodes themselves.
fn dfs_find_cycle<'a>(
    root: &'a str,
    graph: &'a ReferenceGraph,
    visited: &mut HashSet<&'a str>,
) -> Option<Vec<String>> {
    let mut in_stack = HashSet::new();
    let mut path = vec![root];
    let mut stack = vec![graph.references(root)];
    visited.insert(root);
    in_stack.insert(root);

    while let Some(targets) = stack.last_mut() {
        match targets.next() {
            Some(target) if in_stack.contains(target) => {
                // Found a cycle: extract the cycle from path
                let start_idx = path.iter().position(|n| *n == target).unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[start_idx..].iter().map(|n| n.to_string()).collect();
                cycle.push(target.to_string()); // Close the cycle
                return Some(cycle);
            }
            Some(target) if visited.contains(target) => {}
            Some(target) => {
                visited.insert(target);
                in_stack.insert(target);
                path.push(target);
                stack.push(graph.references(target));
            }
            None => {
                stack.pop();
                if let Some(done) = path.pop() {
                    in_stack.remove(done);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_cycle() {
        let mut graph = ReferenceGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");
        graph.add_edge("a", "c");
        graph.add_node("c");

        assert_eq!(find_cycle(&graph), None);
    }

    #[test]
    fn test_two_node_cycle() {
        let mut graph = ReferenceGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");

        assert_eq!(find_cycle(&graph).unwrap(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_self_reference() {
        let mut graph = ReferenceGraph::new();
        graph.add_node("ok");
        graph.add_edge("me", "me");

        assert_eq!(find_cycle(&graph).unwrap(), vec!["me", "me"]);
    }

    #[test]
    fn test_cycle_path_excludes_entry_prefix() {
        let mut graph = ReferenceGraph::new();
        graph.add_edge("entry", "x");
        graph.add_edge("x", "y");
        graph.add_edge("y", "z");
        graph.add_edge("z", "x");

        assert_eq!(find_cycle(&graph).unwrap(), vec!["x", "y", "z", "x"]);
    }

    #[test]
    fn test_long_chains_do_not_recurse() {
        const LEN: usize = 200_000;
        let names: Vec<String> = (0..LEN).map(|i| format!("p{i}")).collect();

        let mut graph = ReferenceGraph::new();
        for i in (1..LEN).rev() {
            graph.add_edge(&names[i], &names[i - 1]);
        }
        graph.add_node(&names[0]);
        assert_eq!(find_cycle(&graph), None);

        graph.add_edge(&names[0], &names[LEN - 1]);
        let cycle = find_cycle(&graph).unwrap();
        assert_eq!(cycle.len(), LEN + 1);
        assert_eq!(cycle.first(), cycle.last());
    }
}

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use gloss_protocol::{DependencyRole, Sentence};
use std::collections::HashMap;

/// Dependency arcs of one sentence, governor -> dependent.
///
/// Node weights are slice indices into the sentence the tree was built from.
/// Tokens governed from outside the sentence (clause roots) get no incoming arc.
pub struct DependencyTree {
    graph: Graph<usize, DependencyRole, Directed>,
    index_map: HashMap<usize, NodeIndex>,
}

impl DependencyTree {
    pub fn build(sentence: &Sentence) -> Self {
        let mut graph = Graph::new();
        let mut index_map = HashMap::new();
        let mut by_position = HashMap::new();

        for (i, token) in sentence.iter().enumerate() {
            let node = graph.add_node(i);
            index_map.insert(i, node);
            by_position.insert(token.position, node);
        }

        for (i, token) in sentence.iter().enumerate() {
            if token.head == token.position {
                continue;
            }
            if let Some(&head) = by_position.get(&token.head) {
                graph.add_edge(head, index_map[&i], token.dependency);
            }
        }

        Self { graph, index_map }
    }

    fn governor(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph.neighbors_directed(node, Direction::Incoming).next()
    }

    /// Governors of `index`, nearest first.
    pub fn ancestors(&self, index: usize) -> Vec<usize> {
        let mut result = Vec::new();
        let Some(&start) = self.index_map.get(&index) else {
            return result;
        };

        let mut visited = vec![start];
        let mut current = start;
        while let Some(parent) = self.governor(current) {
            // Annotation errors can produce cycles.
            if visited.contains(&parent) {
                break;
            }
            visited.push(parent);
            result.push(self.graph[parent]);
            current = parent;
        }
        result
    }

    /// True when `ancestor` governs `index` directly or transitively.
    pub fn descends_from(&self, index: usize, ancestor: usize) -> bool {
        self.ancestors(index).contains(&ancestor)
    }

    /// Direct dependents of `index` with their relation, in sentence order.
    pub fn children(&self, index: usize) -> Vec<(usize, DependencyRole)> {
        let mut children: Vec<(usize, DependencyRole)> = match self.index_map.get(&index) {
            Some(&node) => self
                .graph
                .edges(node)
                .map(|edge| (self.graph[edge.target()], *edge.weight()))
                .collect(),
            None => Vec::new(),
        };
        children.sort_by_key(|(i, _)| *i);
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_annotate::parse_sentence;

    // "The dog that bit me ran away"
    const SENTENCE: &str = "\
1\tThe\tthe\tDET\tDT\t2\tdet
2\tdog\tdog\tNOUN\tNN\t6\tnsubj
3\tthat\tthat\tPRON\tWDT\t4\tnsubj
4\tbit\tbite\tVERB\tVBD\t2\trelcl
5\tme\tI\tPRON\tPRP\t4\tdobj
6\tran\trun\tVERB\tVBD\t0\tROOT
7\taway\taway\tADV\tRB\t6\tadvmod
";

    #[test]
    fn test_ancestors_walk_to_the_root() {
        let sentence = parse_sentence(SENTENCE).unwrap();
        let tree = DependencyTree::build(&sentence);

        // me -> bit -> dog -> ran
        assert_eq!(tree.ancestors(4), vec![3, 1, 5]);
        assert!(tree.descends_from(4, 5));
        assert!(!tree.descends_from(5, 4));
        assert!(tree.ancestors(5).is_empty());
    }

    #[test]
    fn test_children_in_sentence_order() {
        let sentence = parse_sentence(SENTENCE).unwrap();
        let tree = DependencyTree::build(&sentence);

        let children = tree.children(5);
        assert_eq!(children, vec![(1, DependencyRole::NominalSubject), (6, DependencyRole::AdverbialModifier)]);
    }

    #[test]
    fn test_clause_roots_have_no_governor() {
        let sentence = parse_sentence(SENTENCE).unwrap().span(2, 5);
        let tree = DependencyTree::build(&sentence);

        // "bit" is governed by "dog", outside the span
        assert!(tree.ancestors(1).is_empty());
        assert_eq!(tree.ancestors(2), vec![1]);
    }
}

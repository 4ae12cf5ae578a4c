use petgraph::algo::{astar, connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};

use crate::cells::CellIndex;
use crate::maze::Maze;

/// The maze's passages as an undirected graph. Node `i` is cell `i`.
pub fn maze_graph(maze: &Maze) -> UnGraph<(), (), u32> {
    let mut graph = UnGraph::with_capacity(maze.size(), maze.size().saturating_sub(1));
    for _ in 0..maze.size() {
        let _ = graph.add_node(());
    }
    for (a, b) in maze.iter_links() {
        let _ = graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
    }
    graph
}

/// A perfect maze's passages form a spanning tree: one component, no cycles, `N - 1` passages.
pub fn is_perfect_maze(maze: &Maze) -> bool {
    let graph = maze_graph(maze);
    graph.edge_count() + 1 == graph.node_count() && connected_components(&graph) == 1 &&
    !is_cyclic_undirected(&graph)
}

/// The cells on the route from the maze start to its end, both included.
/// None if the end cannot be reached, which never happens for a generated maze.
pub fn solution_path(maze: &Maze) -> Option<Vec<CellIndex>> {
    shortest_path(maze, maze.start(), maze.end())
}

pub fn shortest_path(maze: &Maze, from: CellIndex, to: CellIndex) -> Option<Vec<CellIndex>> {
    if from >= maze.size() || to >= maze.size() {
        return None;
    }
    let graph = maze_graph(maze);
    let goal = NodeIndex::new(to);
    astar(&graph, NodeIndex::new(from), |n| n == goal, |_| 1usize, |_| 0)
        .map(|(_, path)| path.into_iter().map(|n| n.index()).collect())
}

/// The maze as a plain text edge list: "n m" (cell and passage counts) on the first line, then one
/// "a b" line per passage with 1-based cell numbers.
pub fn edge_list(maze: &Maze) -> String {
    let mut graph_data = format!("{} {}\n", maze.size(), maze.links_count());
    for (src, dst) in maze.iter_links() {
        graph_data.push_str(&format!("{} {}\n", src + 1, dst + 1));
    }
    graph_data
}

use super::error::HierarchyClamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyNode {
    pub depth: usize,
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyOutcome {
    pub nodes: Vec<HierarchyNode>,
    pub clamps: Vec<HierarchyClamp>,
}

#[cfg(test)]
impl HierarchyOutcome {
    pub fn parents(&self) -> Vec<Option<usize>> {
        self.nodes.iter().map(|node| node.parent).collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct Previous {
    index: usize,
    depth: usize,
    parent: Option<usize>,
}

/// Assigns each row the nearest preceding row of lesser depth as its parent.
///
/// Only the ordered depth sequence matters. Parents are row indices; a row
/// always points backwards, so `parent < index` holds for every node.
pub fn build_hierarchy(depths: &[usize]) -> HierarchyOutcome {
    let (outcome, _) = depths.iter().copied().enumerate().fold(
        (HierarchyOutcome::default(), None::<Previous>),
        |(mut outcome, previous), (index, depth)| {
            let parent = match previous {
                None => None,
                Some(_) if depth == 0 => None,
                Some(previous) if depth > previous.depth => Some(previous.index),
                Some(previous) if depth == previous.depth => previous.parent,
                Some(previous) => {
                    let levels = previous.depth - depth;
                    let (ancestor, missing_levels) =
                        walk_up(&outcome.nodes, previous.parent, levels);
                    if missing_levels > 0 {
                        outcome.clamps.push(HierarchyClamp {
                            row: index,
                            depth,
                            missing_levels,
                        });
                    }
                    ancestor
                }
            };

            outcome.nodes.push(HierarchyNode { depth, parent });
            (
                outcome,
                Some(Previous {
                    index,
                    depth,
                    parent,
                }),
            )
        },
    );

    outcome
}

fn walk_up(nodes: &[HierarchyNode], start: Option<usize>, levels: usize) -> (Option<usize>, usize) {
    let mut current = start;
    for step in 0..levels {
        let Some(index) = current else {
            return (None, levels - step);
        };
        current = nodes[index].parent;
    }

    (current, 0)
}

/// Builds `parent:child` path identifiers from per-row keys.
pub fn path_ids(keys: &[String], nodes: &[HierarchyNode]) -> Vec<String> {
    let mut ids = Vec::<String>::with_capacity(keys.len());
    for (key, node) in keys.iter().zip(nodes) {
        let id = match node.parent.and_then(|parent| ids.get(parent)) {
            Some(parent_id) => format!("{parent_id}:{key}"),
            None => key.clone(),
        };
        ids.push(id);
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_increasing_depths_chain_to_previous_row() {
        let outcome = build_hierarchy(&[0, 1, 2]);

        assert_eq!(outcome.parents(), vec![None, Some(0), Some(1)]);
        assert!(outcome.clamps.is_empty());
    }

    #[test]
    fn closing_nested_blocks_returns_to_ancestor_level() {
        let outcome = build_hierarchy(&[0, 1, 2, 3, 2, 1]);

        assert_eq!(
            outcome.parents(),
            vec![None, Some(0), Some(1), Some(2), Some(1), Some(0)]
        );
    }

    #[test]
    fn return_to_root_starts_a_new_tree() {
        let outcome = build_hierarchy(&[0, 1, 2, 0, 1, 1]);

        assert_eq!(
            outcome.parents(),
            vec![None, Some(0), Some(1), None, Some(3), Some(3)]
        );
    }

    #[test]
    fn dropping_several_levels_at_once_walks_the_chain() {
        let outcome = build_hierarchy(&[0, 1, 2, 3, 1]);

        assert_eq!(outcome.parents()[4], Some(0));
    }

    #[test]
    fn skipped_level_clamps_to_none_and_is_reported() {
        let outcome = build_hierarchy(&[0, 3, 1]);

        assert_eq!(outcome.parents(), vec![None, Some(0), None]);
        assert_eq!(
            outcome.clamps,
            vec![HierarchyClamp {
                row: 2,
                depth: 1,
                missing_levels: 1,
            }]
        );
    }

    #[test]
    fn landing_on_root_after_walking_is_not_a_clamp() {
        let outcome = build_hierarchy(&[1, 2, 1]);

        assert_eq!(outcome.parents(), vec![None, Some(0), None]);
        assert!(outcome.clamps.is_empty());
    }

    #[test]
    fn first_row_has_no_parent_even_when_nested() {
        let outcome = build_hierarchy(&[2, 2, 3]);

        assert_eq!(outcome.parents(), vec![None, None, Some(1)]);
    }

    #[test]
    fn parent_depth_is_always_lower() {
        let sequences: [&[usize]; 4] = [
            &[0, 1, 2, 3, 2, 1, 0, 1],
            &[0, 2, 4, 1, 3, 0],
            &[1, 0, 3, 3, 2, 5, 1],
            &[0, 0, 1, 1, 2, 2, 1, 0],
        ];

        for depths in sequences {
            let outcome = build_hierarchy(depths);
            for node in &outcome.nodes {
                if let Some(parent) = node.parent {
                    assert!(outcome.nodes[parent].depth < node.depth, "{depths:?}");
                }
            }
        }
    }

    #[test]
    fn empty_sequence_yields_no_nodes() {
        assert_eq!(build_hierarchy(&[]), HierarchyOutcome::default());
    }

    #[test]
    fn path_ids_prefix_parent_path() {
        let outcome = build_hierarchy(&[0, 1, 2, 1]);
        let keys = ["0008-1110", "0008-1150", "0008-1155", "0008-1160"]
            .map(str::to_string)
            .to_vec();

        let ids = path_ids(&keys, &outcome.nodes);

        assert_eq!(
            ids,
            vec![
                "0008-1110",
                "0008-1110:0008-1150",
                "0008-1110:0008-1150:0008-1155",
                "0008-1110:0008-1160",
            ]
        );
    }
}

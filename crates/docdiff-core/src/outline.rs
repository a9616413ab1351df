//! Outline traversal helpers.

use crate::model::{OutlineNode, Provision};

impl OutlineNode {
    /// Child parts in display order (empty for leaf holders).
    pub fn children(&self) -> &[OutlineNode] {
        self.parts.as_deref().unwrap_or(&[])
    }

    /// Provisions held directly by this node (empty for containers).
    pub fn leaf_provisions(&self) -> &[Provision] {
        self.provisions.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty() || !self.leaf_provisions().is_empty()
    }
}

/// Every provision id in the outline, depth-first in display order.
pub fn all_provision_ids(outline: &[OutlineNode]) -> Vec<&str> {
    let mut ids = Vec::new();
    for node in outline {
        collect_provision_ids(node, &mut ids);
    }
    ids
}

fn collect_provision_ids<'a>(node: &'a OutlineNode, ids: &mut Vec<&'a str>) {
    ids.extend(node.leaf_provisions().iter().map(|p| p.id.as_str()));
    for part in node.children() {
        collect_provision_ids(part, ids);
    }
}

/// Find a provision anywhere in the outline.
pub fn find_provision<'a>(outline: &'a [OutlineNode], id: &str) -> Option<&'a Provision> {
    outline.iter().find_map(|node| find_provision_in(node, id))
}

fn find_provision_in<'a>(node: &'a OutlineNode, id: &str) -> Option<&'a Provision> {
    node.leaf_provisions()
        .iter()
        .find(|p| p.id == id)
        .or_else(|| node.children().iter().find_map(|part| find_provision_in(part, id)))
}

/// Find a chapter or part by id.
pub fn find_node<'a>(outline: &'a [OutlineNode], id: &str) -> Option<&'a OutlineNode> {
    outline.iter().find_map(|node| {
        if node.id == id {
            Some(node)
        } else {
            find_node(node.children(), id)
        }
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn provision(id: &str, title: &str) -> Provision {
        Provision {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    pub fn leaf_holder(id: &str, title: &str, provisions: Vec<Provision>) -> OutlineNode {
        OutlineNode {
            id: id.to_string(),
            title: title.to_string(),
            parts: None,
            provisions: Some(provisions),
        }
    }

    pub fn container(id: &str, title: &str, parts: Vec<OutlineNode>) -> OutlineNode {
        OutlineNode {
            id: id.to_string(),
            title: title.to_string(),
            parts: Some(parts),
            provisions: None,
        }
    }

    /// Two chapters; the second nests a division between chapter and part.
    pub fn nsw_outline() -> Vec<OutlineNode> {
        vec![
            container(
                "C1",
                "Preliminary",
                vec![leaf_holder(
                    "P1",
                    "Introductory",
                    vec![
                        provision("1_NSW", "Citation"),
                        provision("2_NSW", "Commencement"),
                    ],
                )],
            ),
            container(
                "C2",
                "Representation and participation",
                vec![
                    container(
                        "D1",
                        "Work groups",
                        vec![leaf_holder(
                            "P2",
                            "Negotiations",
                            vec![provision("4_NSW", "Duty to consult workers")],
                        )],
                    ),
                    leaf_holder("P3", "Health and safety committees", vec![]),
                ],
            ),
        ]
    }

    pub fn vic_outline() -> Vec<OutlineNode> {
        vec![container(
            "V1",
            "General duties",
            vec![leaf_holder(
                "VP1",
                "Consultation",
                vec![
                    provision("4_Victoria", "Duty to consult employees"),
                    provision("5_Victoria", "Representatives"),
                ],
            )],
        )]
    }
}

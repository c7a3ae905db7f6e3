// explicit transform tree standing in for the host scene graph
// every node owns a local transform and a cached world transform, and
// re-parenting recomputes the child's local from its current world, never
// the reverse, so parenting never shifts anything on screen

use bevy::math::{Affine3A, Mat4};
use bevy::prelude::Transform;

use crate::systems::GenError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(usize);

// what the host should realize this node as
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Empty,
    Camera,
    AreaLight,
    CurveProxy, // controller stand-in, a circle the user can grab
    Backdrop,
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Transform,
    world: Affine3A,
    locked: bool,
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn local(&self) -> Transform {
        self.local
    }

    pub fn world(&self) -> Affine3A {
        self.world
    }

    pub fn locked(&self) -> bool {
        self.locked
    }
}

// node storage is a slab, ids stay stable across deletions
#[derive(Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<SceneNode>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, name: impl Into<String>, kind: NodeKind, local: Transform) -> NodeId {
        let node = SceneNode {
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
            local,
            world: local.compute_affine(),
            locked: false,
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().enumerate().find_map(|(i, slot)| {
            slot.as_ref()
                .filter(|node| node.name == name)
                .map(|_| NodeId(i))
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn node(&self, id: NodeId) -> Result<&SceneNode, GenError> {
        self.get(id)
            .ok_or_else(|| GenError::MissingController(format!("node #{}", id.0)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, GenError> {
        self.nodes
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .ok_or_else(|| GenError::MissingController(format!("node #{}", id.0)))
    }

    // canonical-value writes, used by the rig machinery itself
    pub fn set_local(&mut self, id: NodeId, local: Transform) -> Result<(), GenError> {
        self.node_mut(id)?.local = local;
        self.refresh_world(id);
        Ok(())
    }

    // direct-manipulation path, refused on locked nodes
    pub fn edit_local(&mut self, id: NodeId, local: Transform) -> Result<(), GenError> {
        let node = self.node_mut(id)?;
        if node.locked {
            return Err(GenError::LockedChannels(node.name.clone()));
        }
        node.local = local;
        self.refresh_world(id);
        Ok(())
    }

    pub fn lock(&mut self, id: NodeId) -> Result<(), GenError> {
        self.node_mut(id)?.locked = true;
        Ok(())
    }

    // attach child under parent, keeping the child's world transform
    pub fn parent_keep_transform(&mut self, child: NodeId, parent: NodeId) -> Result<(), GenError> {
        // refuse self-parenting and any link that would close a cycle,
        // refresh_world never terminates on a cyclic tree
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(GenError::CyclicParent(self.node(child)?.name.clone()));
            }
            ancestor = self.node(id)?.parent;
        }
        let child_world = self.node(child)?.world;
        let parent_world = self.node(parent)?.world;

        if let Some(old_parent) = self.node(child)?.parent {
            let old = self.node_mut(old_parent)?;
            old.children.retain(|&c| c != child);
        }

        // uniform scales only in this rig, the TRS decomposition is exact
        let new_local = Transform::from_matrix(Mat4::from(parent_world.inverse() * child_world));
        {
            let node = self.node_mut(child)?;
            node.parent = Some(parent);
            node.local = new_local;
        }
        self.node_mut(parent)?.children.push(child);
        self.refresh_world(child);
        Ok(())
    }

    // delete a node and everything below it, returns how many went
    pub fn delete_subtree(&mut self, root: NodeId) -> Result<usize, GenError> {
        if let Some(parent) = self.node(root)?.parent {
            self.node_mut(parent)?.children.retain(|&c| c != root);
        }
        let doomed = self.collect_subtree(root);
        for id in &doomed {
            self.nodes[id.0] = None;
        }
        Ok(doomed.len())
    }

    // root first, then descendants depth-first
    pub fn collect_subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                out.push(id);
                stack.extend(node.children.iter().copied());
            }
        }
        out
    }

    // recompute cached world transforms for id and its whole subtree
    fn refresh_world(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else { continue };
            let parent_world = node
                .parent
                .and_then(|p| self.get(p))
                .map(|p| p.world)
                .unwrap_or(Affine3A::IDENTITY);
            let world = parent_world * node.local.compute_affine();
            if let Some(node) = self.nodes[current.0].as_mut() {
                node.world = world;
                stack.extend(node.children.iter().copied());
            }
        }
    }
}

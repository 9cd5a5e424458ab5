/// The mesh collection shared between a grid and its cameras
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::mesh::Mesh;

/// Identity of a mesh inside its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshId(u64);

/// A set of meshes compared by identity, not by value
///
/// Ids are never reused, so a stale id can not alias a newer mesh.
#[derive(Debug, Default)]
pub struct MeshCollection {
    meshes: BTreeMap<MeshId, Mesh>,
    next_id: u64,
}

/// Owning handle held by the grid. Cameras keep a `Weak` to the same cell.
///
/// Mutation borrows the cell exclusively and drawing borrows it shared, so
/// a mutation interleaved with a draw pass fails loudly instead of racing.
pub type SharedMeshes = Rc<RefCell<MeshCollection>>;

impl MeshCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedMeshes {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn insert(&mut self, mesh: Mesh) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        self.meshes.insert(id, mesh);
        tracing::debug!(?id, total = self.meshes.len(), "mesh added");
        id
    }

    pub fn remove(&mut self, id: MeshId) -> Option<Mesh> {
        let removed = self.meshes.remove(&id);
        if removed.is_some() {
            tracing::debug!(?id, total = self.meshes.len(), "mesh removed");
        }
        removed
    }

    pub fn clear(&mut self) {
        tracing::debug!(removed = self.meshes.len(), "meshes cleared");
        self.meshes.clear();
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(&id)
    }

    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(&id)
    }

    pub fn contains(&self, id: MeshId) -> bool {
        self.meshes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().map(|(&id, mesh)| (id, mesh))
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.values()
    }

    pub fn meshes_mut(&mut self) -> impl Iterator<Item = &mut Mesh> {
        self.meshes.values_mut()
    }

    /// Advance every kinematic mesh by `dt` seconds
    pub fn simulate(&mut self, dt: f64) -> usize {
        let mut moved = 0;
        for mesh in self.meshes_mut().filter(|m| m.is_kinematic()) {
            mesh.simulate(dt);
            moved += 1;
        }
        moved
    }
}

impl Extend<Mesh> for MeshCollection {
    fn extend<I: IntoIterator<Item = Mesh>>(&mut self, iter: I) {
        for mesh in iter {
            self.insert(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Vector};
    use crate::physics::Kinematics;
    use crate::shapes;

    #[test]
    fn test_identical_meshes_are_distinct_members() {
        let mut meshes = MeshCollection::new();
        let mesh = Mesh::at(&shapes::cube(1.0), Point::origin(), None);
        let a = meshes.insert(mesh.clone());
        let b = meshes.insert(mesh);
        assert_ne!(a, b);
        assert_eq!(meshes.len(), 2);

        assert!(meshes.remove(a).is_some());
        assert!(meshes.remove(a).is_none());
        assert!(meshes.contains(b));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut meshes = MeshCollection::new();
        let a = meshes.insert(Mesh::at(&shapes::cube(1.0), Point::origin(), None));
        meshes.clear();
        let b = meshes.insert(Mesh::at(&shapes::cube(1.0), Point::origin(), None));
        assert_ne!(a, b);
        assert!(meshes.get(a).is_none());
    }

    #[test]
    fn test_simulate_only_moves_kinematic_meshes() {
        let mut meshes = MeshCollection::new();
        let still = meshes.insert(Mesh::at(&shapes::cube(2.0), Point::origin(), None));
        let moving = meshes.insert(
            Mesh::at(&shapes::cube(2.0), Point::origin(), None)
                .with_kinematics(Kinematics::with_velocity(Vector::new(0.0, 0.0, 1.0))),
        );

        assert_eq!(meshes.simulate(0.5), 1);
        assert_eq!(meshes.get(still).unwrap().center(), Some(Point::origin()));
        assert_eq!(
            meshes.get(moving).unwrap().center(),
            Some(Point::new(0.0, 0.0, 0.5))
        );
    }
}

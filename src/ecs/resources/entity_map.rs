use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

/// Bidirectional mapping between building ids (u64) and Bevy entities, for
/// every building currently in the active set.
#[derive(Resource, Debug, Clone, Default)]
pub struct BuildingIndex {
    to_bevy: BTreeMap<u64, Entity>,
    to_id: BTreeMap<Entity, u64>,
}

impl BuildingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping. Panics if the id is already registered.
    pub fn insert(&mut self, id: u64, entity: Entity) {
        let prev = self.to_bevy.insert(id, entity);
        assert!(prev.is_none(), "duplicate building id {id} in BuildingIndex");
        self.to_id.insert(entity, id);
    }

    pub fn remove(&mut self, id: u64) -> Option<Entity> {
        let entity = self.to_bevy.remove(&id)?;
        self.to_id.remove(&entity);
        Some(entity)
    }

    /// Look up a Bevy entity by building id.
    pub fn get_bevy(&self, id: u64) -> Option<Entity> {
        self.to_bevy.get(&id).copied()
    }

    /// Look up a building id by Bevy entity.
    pub fn get_id(&self, entity: Entity) -> Option<u64> {
        self.to_id.get(&entity).copied()
    }

    /// Active buildings in id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.to_bevy.values().copied()
    }

    pub fn len(&self) -> usize {
        self.to_bevy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_bevy.is_empty()
    }
}

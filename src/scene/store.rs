//! Entity stores the submission pipeline can read from
//!
//! The pipeline never sees a concrete ECS. It asks a `RenderSource` for every
//! entity that has both a `Transform` and a `Renderable`, with its optional
//! `CullObject`. `Scene` is the in-memory store used by the demo and tests;
//! `hecs::World` gets the same view for free.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::cull::CullObject;
use super::shape::Renderable;
use super::transform::Transform;
use crate::error::RenderError;

/// Opaque entity handle shared by all stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// One entity as seen by the renderer
#[derive(Debug, Clone, Copy)]
pub struct RenderItem<'a> {
    pub entity: EntityId,
    pub transform: &'a Transform,
    pub renderable: &'a Renderable,
    pub cull: Option<&'a CullObject>,
}

/// Read-only view over entities with `Transform` + `Renderable`.
///
/// Iteration order is whatever the store yields. Consumers must not depend on
/// it for correctness. An error returned by `visit` stops the iteration and is
/// passed straight back to the caller.
pub trait RenderSource {
    fn for_each_renderable(
        &self,
        visit: &mut dyn FnMut(RenderItem<'_>) -> Result<(), RenderError>,
    ) -> Result<(), RenderError>;
}

/// An entity stored in a `Scene`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEntity {
    pub id: EntityId,
    pub transform: Transform,
    pub renderable: Option<Renderable>,
    pub cull: Option<CullObject>,
}

/// In-memory entity store with stable iteration (by entity ID)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SceneData")]
pub struct Scene {
    /// Sorted by id, no duplicates
    entities: Vec<SceneEntity>,
    /// Greater than every id in `entities`
    next_id: u64,
}

/// Serialized form; restored into a sorted scene with a fresh id counter
#[derive(Deserialize)]
struct SceneData {
    entities: Vec<SceneEntity>,
    #[serde(default)]
    next_id: u64,
}

impl From<SceneData> for Scene {
    fn from(data: SceneData) -> Self {
        let mut entities = data.entities;
        // Stable sort: the first entity with a given id wins
        entities.sort_by_key(|e| e.id);
        let loaded = entities.len();
        entities.dedup_by_key(|e| e.id);
        if entities.len() != loaded {
            log::warn!(
                "Dropped {} scene entities with duplicate ids",
                loaded - entities.len()
            );
        }

        let next_id = entities
            .last()
            .map_or(0, |e| e.id.0.saturating_add(1))
            .max(data.next_id);
        Self { entities, next_id }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an entity with only a transform
    pub fn spawn(&mut self, transform: Transform) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        // IDs only grow, so pushing keeps the vec sorted
        self.entities.push(SceneEntity {
            id,
            transform,
            renderable: None,
            cull: None,
        });
        id
    }

    /// Spawn a drawable entity, optionally taking part in culling
    pub fn spawn_renderable(
        &mut self,
        transform: Transform,
        renderable: Renderable,
        cull: Option<CullObject>,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(SceneEntity {
            id,
            transform,
            renderable: Some(renderable),
            cull,
        });
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&SceneEntity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SceneEntity> {
        self.index_of(id).map(move |i| &mut self.entities[i])
    }

    pub fn set_renderable(&mut self, id: EntityId, renderable: Option<Renderable>) -> bool {
        self.get_mut(id)
            .map(|e| e.renderable = renderable)
            .is_some()
    }

    pub fn set_cull(&mut self, id: EntityId, cull: Option<CullObject>) -> bool {
        self.get_mut(id).map(|e| e.cull = cull).is_some()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneEntity> {
        self.entities.iter()
    }

    /// Copy authoritative physics positions into transforms.
    ///
    /// Must run before the frame is culled. Positions for entities that no
    /// longer exist are skipped. Returns how many transforms were updated.
    pub fn sync_positions<I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = (EntityId, Vec3)>,
    {
        let mut updated = 0;
        for (id, position) in positions {
            if let Some(entity) = self.get_mut(id) {
                entity.transform.position = position;
                updated += 1;
            } else {
                log::debug!("Physics position for unknown entity {:?}", id);
            }
        }
        updated
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }
}

impl RenderSource for Scene {
    fn for_each_renderable(
        &self,
        visit: &mut dyn FnMut(RenderItem<'_>) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        for entity in &self.entities {
            if let Some(renderable) = &entity.renderable {
                visit(RenderItem {
                    entity: entity.id,
                    transform: &entity.transform,
                    renderable,
                    cull: entity.cull.as_ref(),
                })?;
            }
        }
        Ok(())
    }
}

impl RenderSource for hecs::World {
    fn for_each_renderable(
        &self,
        visit: &mut dyn FnMut(RenderItem<'_>) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        let mut query = self.query::<(&Transform, &Renderable, Option<&CullObject>)>();
        for (entity, (transform, renderable, cull)) in query.iter() {
            visit(RenderItem {
                entity: EntityId(entity.to_bits().get()),
                transform,
                renderable,
                cull,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Category, Shape};

    fn sphere() -> Renderable {
        Renderable::new(Category::Object, Shape::Sphere { radius: 0.5 }, Vec3::ONE)
    }

    fn collect(source: &dyn RenderSource) -> Vec<(EntityId, bool)> {
        let mut seen = Vec::new();
        source
            .for_each_renderable(&mut |item| {
                seen.push((item.entity, item.cull.is_some()));
                Ok(())
            })
            .unwrap();
        seen
    }

    #[test]
    fn test_scene_skips_entities_without_renderable() {
        let mut scene = Scene::new();
        let a = scene.spawn_renderable(Transform::default(), sphere(), None);
        let _bare = scene.spawn(Transform::default());
        let c = scene.spawn_renderable(Transform::default(), sphere(), Some(CullObject::new(0.5)));

        assert_eq!(collect(&scene), vec![(a, false), (c, true)]);
    }

    #[test]
    fn test_scene_despawn_keeps_order() {
        let mut scene = Scene::new();
        let ids: Vec<_> = (0..4)
            .map(|_| scene.spawn_renderable(Transform::default(), sphere(), None))
            .collect();
        assert!(scene.despawn(ids[1]));
        assert!(!scene.despawn(ids[1]));

        let seen: Vec<_> = collect(&scene).into_iter().map(|(id, _)| id).collect();
        assert_eq!(seen, vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn test_sync_positions_ignores_unknown() {
        let mut scene = Scene::new();
        let a = scene.spawn(Transform::default());
        let updated = scene.sync_positions([
            (a, Vec3::new(1.0, 2.0, 3.0)),
            (EntityId(999), Vec3::ONE),
        ]);
        assert_eq!(updated, 1);
        assert_eq!(scene.get(a).unwrap().transform.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_visit_error_stops_iteration() {
        let mut scene = Scene::new();
        for _ in 0..3 {
            scene.spawn_renderable(Transform::default(), sphere(), None);
        }
        let mut visited = 0;
        let result = scene.for_each_renderable(&mut |_| {
            visited += 1;
            Err(RenderError::QueueFull { capacity: 0 })
        });
        assert!(matches!(result, Err(RenderError::QueueFull { .. })));
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_deserialize_restores_order_and_ids() {
        let mut scene = Scene::new();
        let ids: Vec<_> = (0..3)
            .map(|i| scene.spawn_renderable(Transform::from_position(Vec3::X * i as f32), sphere(), None))
            .collect();

        // Shuffled entities, duplicated id and a stale counter
        let mut value = serde_json::to_value(&scene).unwrap();
        let entities = value["entities"].as_array_mut().unwrap();
        entities.reverse();
        let duplicate = entities[0].clone();
        entities.push(duplicate);
        value["next_id"] = serde_json::json!(0);

        let mut restored: Scene = serde_json::from_value(value).unwrap();
        assert_eq!(restored.len(), 3);
        let order: Vec<_> = restored.iter().map(|e| e.id).collect();
        assert_eq!(order, ids);
        assert_eq!(restored.get(ids[1]).unwrap().transform.position, Vec3::X);

        let fresh = restored.spawn(Transform::default());
        assert!(!ids.contains(&fresh));
        assert_eq!(fresh, EntityId(3));
    }

    #[test]
    fn test_hecs_world_as_render_source() {
        let mut world = hecs::World::new();
        world.spawn((Transform::default(), sphere()));
        world.spawn((Transform::default(), sphere(), CullObject::new(1.0)));
        world.spawn((Transform::default(),));

        let seen = collect(&world);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen.iter().filter(|(_, culled)| *culled).count(), 1);
    }
}

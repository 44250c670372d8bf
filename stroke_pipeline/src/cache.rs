//! Mesh cache keyed by `(stroke index, point count)`.
//!
//! Completed strokes are immutable, so a key that is already present never
//! needs rebuilding.  A viewport change moves every mapped vertex and drops
//! the whole cache.  Missing entries are built in parallel across strokes.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::landmark::Viewport;
use crate::mesh::{build_stroke_mesh, TubeMesh};
use crate::recorder::Stroke;

/// Identity of a cached mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshKey {
    pub stroke_index: usize,
    pub point_count:  usize,
}

impl MeshKey {
    pub fn for_stroke(stroke_index: usize, stroke: &Stroke) -> Self {
        MeshKey { stroke_index, point_count: stroke.len() }
    }
}

/// `None` entries remember strokes that produced no mesh so they are not
/// retried every frame.
pub struct MeshCache {
    config:   PipelineConfig,
    entries:  HashMap<MeshKey, Option<Arc<TubeMesh>>>,
    viewport: Option<Viewport>,
    builds:   usize,
}

impl MeshCache {
    pub fn new(config: PipelineConfig) -> Self {
        MeshCache { config, entries: HashMap::new(), viewport: None, builds: 0 }
    }

    /// Meshes for `strokes`, in collection order, building what is missing.
    pub fn sync(&mut self, strokes: &[Stroke], viewport: Viewport) -> Vec<Option<Arc<TubeMesh>>> {
        if self.viewport != Some(viewport) {
            if !self.entries.is_empty() {
                info!(
                    entries = self.entries.len(),
                    width = viewport.width,
                    height = viewport.height,
                    "viewport changed, dropping mesh cache"
                );
            }
            self.entries.clear();
            self.viewport = Some(viewport);
        }

        let keys: Vec<MeshKey> =
            strokes.iter().enumerate().map(|(i, s)| MeshKey::for_stroke(i, s)).collect();

        self.entries.retain(|k, _| keys.get(k.stroke_index) == Some(k));

        let missing: Vec<(MeshKey, &Stroke)> = keys
            .iter()
            .zip(strokes)
            .filter(|(k, _)| !self.entries.contains_key(k))
            .map(|(k, s)| (*k, s))
            .collect();

        if !missing.is_empty() {
            let curve = &self.config.curve;
            let mesh = &self.config.mesh;
            let built: Vec<(MeshKey, Option<Arc<TubeMesh>>)> = missing
                .par_iter()
                .map(|(key, stroke)| {
                    let m = build_stroke_mesh(stroke, key.stroke_index, viewport, curve, mesh);
                    (*key, m.map(Arc::new))
                })
                .collect();

            debug!(built = built.len(), total = keys.len(), "meshes rebuilt");
            self.builds += built.len();
            self.entries.extend(built);
        }

        keys.iter().map(|k| self.entries.get(k).cloned().flatten()).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total meshes built since construction.
    pub fn build_count(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Point;

    fn line(n: usize, y: f32) -> Stroke {
        Stroke::new((0..n).map(|i| Point::new(50.0 + i as f32 * 20.0, y + (i % 3) as f32 * 8.0)).collect())
    }

    const VIEW: Viewport = Viewport::new(640.0, 480.0);

    #[test]
    fn builds_once_per_key() {
        let mut cache = MeshCache::new(PipelineConfig::default());
        let strokes = vec![line(8, 100.0), line(12, 200.0)];

        let first = cache.sync(&strokes, VIEW);
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(Option::is_some));
        assert_eq!(cache.build_count(), 2);

        let again = cache.sync(&strokes, VIEW);
        assert_eq!(cache.build_count(), 2);
        assert!(Arc::ptr_eq(first[0].as_ref().unwrap(), again[0].as_ref().unwrap()));
    }

    #[test]
    fn only_new_strokes_are_built() {
        let mut cache = MeshCache::new(PipelineConfig::default());
        let mut strokes = vec![line(8, 100.0)];
        cache.sync(&strokes, VIEW);
        strokes.push(line(9, 300.0));
        let meshes = cache.sync(&strokes, VIEW);
        assert_eq!(cache.build_count(), 2);
        assert_eq!(meshes[1].as_ref().unwrap().stroke_index, 1);
    }

    #[test]
    fn short_strokes_are_remembered_as_none() {
        let mut cache = MeshCache::new(PipelineConfig::default());
        let strokes = vec![line(2, 100.0)];
        assert_eq!(cache.sync(&strokes, VIEW), vec![None]);
        cache.sync(&strokes, VIEW);
        assert_eq!(cache.build_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn viewport_change_rebuilds_everything() {
        let mut cache = MeshCache::new(PipelineConfig::default());
        let strokes = vec![line(8, 100.0), line(8, 200.0)];
        cache.sync(&strokes, VIEW);
        cache.sync(&strokes, Viewport::new(1280.0, 720.0));
        assert_eq!(cache.build_count(), 4);
    }

    #[test]
    fn cleared_collection_drops_entries() {
        let mut cache = MeshCache::new(PipelineConfig::default());
        cache.sync(&[line(8, 100.0), line(8, 200.0)], VIEW);
        assert!(cache.sync(&[], VIEW).is_empty());
        assert!(cache.is_empty());
    }
}

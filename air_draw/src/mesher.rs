//! Background mesh worker.
//!
//! Curve synthesis and tube sweeping run here, off the render thread.  The
//! worker owns a [`MeshCache`]; each sync request carries a snapshot of the
//! completed strokes (cheap: strokes share their point storage) and the
//! reply is the full, ordered mesh list for that snapshot.
//!
//! Every command carries the handle's generation, bumped on each clear.
//! Replies echo it back, so a sync answered after a clear is dropped on
//! the render side instead of flashing old tubes.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use stroke_pipeline::{MeshCache, PipelineConfig, Stroke, TubeMesh, Viewport};

// ════════════════════════════════════════════════════════════════════════════
// MeshCommand: sent to the worker thread
// ════════════════════════════════════════════════════════════════════════════

pub enum MeshCommand {
    /// Bring the mesh list in line with `strokes`.
    Sync { strokes: Vec<Stroke>, viewport: Viewport, generation: u64 },
    /// Drop every cached mesh.
    Clear { generation: u64 },
    /// Terminate the thread.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// MeshUpdate: sent back to the render loop
// ════════════════════════════════════════════════════════════════════════════

/// Ordered meshes for one stroke snapshot.  Entry `i` belongs to stroke `i`;
/// `None` marks a stroke too short to mesh.
#[derive(Clone, Debug, Default)]
pub struct MeshUpdate {
    pub meshes: Vec<Option<Arc<TubeMesh>>>,
    /// Meshes built since the worker started.
    pub builds: usize,
    /// Clear generation the request was issued under.
    pub generation: u64,
}

impl MeshUpdate {
    pub fn visible(&self) -> impl Iterator<Item = &TubeMesh> {
        self.meshes.iter().filter_map(|m| m.as_deref())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MeshWorker: handle to the worker thread
// ════════════════════════════════════════════════════════════════════════════

pub struct MeshWorker {
    cmd_tx:    Sender<MeshCommand>,
    update_rx: Receiver<MeshUpdate>,
    handle:    Option<JoinHandle<()>>,
    generation: u64,
}

impl MeshWorker {
    /// Spawn the worker thread.
    pub fn spawn(config: PipelineConfig) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<MeshCommand>();
        let (update_tx, update_rx) = mpsc::channel::<MeshUpdate>();

        let handle = thread::Builder::new()
            .name("mesh-worker".into())
            .spawn(move || worker_thread(MeshCache::new(config), cmd_rx, update_tx))?;

        Ok(MeshWorker { cmd_tx, update_rx, handle: Some(handle), generation: 0 })
    }

    pub fn sync(&self, strokes: &[Stroke], viewport: Viewport) {
        let _ = self.cmd_tx.send(MeshCommand::Sync {
            strokes: strokes.to_vec(),
            viewport,
            generation: self.generation,
        });
    }

    /// Drop every mesh.  Replies to syncs sent before this call are
    /// discarded when they arrive.
    pub fn clear(&mut self) {
        self.generation += 1;
        let _ = self.cmd_tx.send(MeshCommand::Clear { generation: self.generation });
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Newest current update, discarding older and stale ones (non-blocking).
    pub fn drain_latest(&self) -> Option<MeshUpdate> {
        self.update_rx.try_iter().filter(|u| u.generation == self.generation).last()
    }

    /// Block until the next current update arrives.  `None` once the worker
    /// is gone.
    pub fn recv(&self) -> Option<MeshUpdate> {
        self.update_rx.iter().find(|u| u.generation == self.generation)
    }
}

impl Drop for MeshWorker {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(MeshCommand::Quit);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// worker_thread: the actual loop
// ════════════════════════════════════════════════════════════════════════════

fn worker_thread(mut cache: MeshCache, cmd_rx: Receiver<MeshCommand>, update_tx: Sender<MeshUpdate>) {
    info!("mesh worker started");

    while let Ok(cmd) = cmd_rx.recv() {
        // Only the newest sync matters; skip the ones it supersedes.
        let mut cmd = cmd;
        let mut skipped = 0usize;
        while let MeshCommand::Sync { .. } = cmd {
            match cmd_rx.try_recv() {
                Ok(next @ MeshCommand::Sync { .. }) => {
                    cmd = next;
                    skipped += 1;
                }
                Ok(other) => {
                    // Apply the pending sync first, then fall through to `other`.
                    handle_sync(&mut cache, cmd, &update_tx);
                    cmd = other;
                    break;
                }
                Err(_) => break,
            }
        }
        if skipped > 0 {
            debug!(skipped, "superseded mesh syncs dropped");
        }

        match cmd {
            MeshCommand::Sync { .. } => handle_sync(&mut cache, cmd, &update_tx),
            MeshCommand::Clear { generation } => {
                cache.clear();
                let _ = update_tx.send(MeshUpdate { meshes: Vec::new(), builds: cache.build_count(), generation });
            }
            MeshCommand::Quit => break,
        }
    }

    info!(builds = cache.build_count(), "mesh worker stopped");
}

fn handle_sync(cache: &mut MeshCache, cmd: MeshCommand, update_tx: &Sender<MeshUpdate>) {
    if let MeshCommand::Sync { strokes, viewport, generation } = cmd {
        let meshes = cache.sync(&strokes, viewport);
        let _ = update_tx.send(MeshUpdate { meshes, builds: cache.build_count(), generation });
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

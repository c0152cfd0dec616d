//! GC root scanning for VM.

use ck_runtime::{CollectStats, Gc};

use crate::fiber::Fiber;
use crate::vm::Vm;

impl Vm {
    /// Mark every root and run a full collection.
    pub fn collect_garbage(&mut self) -> CollectStats {
        let gc = &mut self.state.gc;
        if let Some(fiber) = &self.fiber {
            scan_fiber(gc, fiber);
        }
        for fiber in &self.suspended {
            scan_fiber(gc, fiber);
        }
        for &root in &self.roots {
            gc.mark_gray(root);
        }
        if let Some(path) = self.module_path {
            gc.mark_gray(path);
        }
        for module in self.modules.module_refs() {
            gc.mark_gray(module);
        }

        let stats = gc.collect();
        log::debug!(
            "gc: {} -> {} objects, {} -> {} bytes",
            stats.objects_before,
            stats.objects_after,
            stats.bytes_before,
            stats.bytes_after
        );
        stats
    }
}

fn scan_fiber(gc: &mut Gc, fiber: &Fiber) {
    for &value in fiber.live() {
        gc.mark_value(value);
    }
}

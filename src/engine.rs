//! Workload replay engine interface
//!
//! The measurement core drives replay through `ReplayEngine` and hands the
//! engine a context instead of a bare surface: the context also carries a
//! similar-surface hook, so any sub-surface the trace creates mid-replay
//! comes from the same target family and its cost lands in the same
//! measurement.

use crate::error::{Result, TrazarError};
use crate::target::{Content, Surface, Target};
use crate::workload::Workload;

/// Replay context for one iteration of one (target, workload) pair
pub struct ReplayContext<'a> {
    /// Surface the trace renders onto
    pub surface: &'a mut dyn Surface,
    target: &'a dyn Target,
}

impl<'a> ReplayContext<'a> {
    /// Bind a surface and its originating target
    pub fn new(surface: &'a mut dyn Surface, target: &'a dyn Target) -> Self {
        Self { surface, target }
    }

    /// Synthesize a same-family sub-surface on the engine's behalf
    ///
    /// # Errors
    /// Propagates the target's surface-creation failure.
    pub fn create_similar(
        &self,
        content: Content,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn Surface>> {
        self.target.create_surface(content, width, height)
    }
}

/// Replays one workload against a context
pub trait ReplayEngine {
    /// Replay the workload once, to completion
    ///
    /// # Errors
    /// Returns `TrazarError::Replay` when the workload cannot be executed.
    fn replay(&mut self, ctx: &mut ReplayContext<'_>, workload: &Workload) -> Result<()>;
}

/// Line-oriented trace interpreter for the built-in trace format
///
/// Each line is one operation:
///
/// ```text
/// clear
/// fill <x> <y> <w> <h> <argb-hex>
/// similar <w> <h>
/// ```
///
/// `similar` routes through the context's sub-surface hook. Blank lines
/// and `#` comments are skipped.
pub struct ScriptEngine;

impl ScriptEngine {
    /// Create the interpreter
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn replay_line(ctx: &mut ReplayContext<'_>, workload: &Workload, line: &str) -> Result<()> {
        let mut parts = line.split_whitespace();
        let Some(op) = parts.next() else {
            return Ok(());
        };

        let args: Vec<&str> = parts.collect();
        match op {
            "clear" => {
                ctx.surface.clear();
                Ok(())
            }
            "fill" => {
                let [x, y, w, h, argb] = args.as_slice() else {
                    return Err(bad_op(workload, line, "fill takes x y w h argb"));
                };
                let rect: Vec<u32> = [x, y, w, h]
                    .iter()
                    .map(|v| v.parse::<u32>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| bad_op(workload, line, "non-integer coordinate"))?;
                let color = u32::from_str_radix(argb.trim_start_matches("0x"), 16)
                    .map_err(|_| bad_op(workload, line, "non-hex color"))?;
                ctx.surface.fill(rect[0], rect[1], rect[2], rect[3], color);
                Ok(())
            }
            "similar" => {
                let [w, h] = args.as_slice() else {
                    return Err(bad_op(workload, line, "similar takes w h"));
                };
                let (w, h) = match (w.parse::<u32>(), h.parse::<u32>()) {
                    (Ok(w), Ok(h)) => (w, h),
                    _ => return Err(bad_op(workload, line, "non-integer size")),
                };
                let mut sub = ctx.create_similar(Content::ColorAlpha, w, h)?;
                sub.clear();
                Ok(())
            }
            _ => Err(bad_op(workload, line, "unknown operation")),
        }
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayEngine for ScriptEngine {
    fn replay(&mut self, ctx: &mut ReplayContext<'_>, workload: &Workload) -> Result<()> {
        let script =
            std::fs::read_to_string(&workload.path).map_err(|e| TrazarError::Replay {
                workload: workload.name.clone(),
                reason: e.to_string(),
            })?;

        for line in script.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            Self::replay_line(ctx, workload, line)?;
        }
        Ok(())
    }
}

fn bad_op(workload: &Workload, line: &str, reason: &str) -> TrazarError {
    TrazarError::Replay {
        workload: workload.name.clone(),
        reason: format!("{reason}: '{line}'"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::target::ImageTarget;

    fn workload_with(script: &str) -> (tempfile::TempDir, Workload) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scratch.trace");
        std::fs::write(&path, script).unwrap();
        (dir, Workload::from_path(&path))
    }

    #[test]
    fn test_replays_well_formed_script() {
        let (_dir, workload) = workload_with("# demo\nclear\nfill 0 0 1 1 0xff0000ff\nsimilar 2 2\n");
        let target = ImageTarget::new();
        let mut surface = target
            .create_surface(crate::target::Content::ColorAlpha, 1, 1)
            .unwrap();
        let mut ctx = ReplayContext::new(surface.as_mut(), &target);

        let mut engine = ScriptEngine::new();
        engine.replay(&mut ctx, &workload).unwrap();
    }

    #[test]
    fn test_unknown_operation_is_a_replay_error() {
        let (_dir, workload) = workload_with("teleport 1 2\n");
        let target = ImageTarget::new();
        let mut surface = target
            .create_surface(crate::target::Content::ColorAlpha, 1, 1)
            .unwrap();
        let mut ctx = ReplayContext::new(surface.as_mut(), &target);

        let mut engine = ScriptEngine::new();
        let err = engine.replay(&mut ctx, &workload).unwrap_err();
        assert!(matches!(err, TrazarError::Replay { .. }));
    }

    #[test]
    fn test_malformed_fill_is_a_replay_error() {
        let (_dir, workload) = workload_with("fill 0 0 one 1 0xff\n");
        let target = ImageTarget::new();
        let mut surface = target
            .create_surface(crate::target::Content::ColorAlpha, 1, 1)
            .unwrap();
        let mut ctx = ReplayContext::new(surface.as_mut(), &target);

        let mut engine = ScriptEngine::new();
        assert!(engine.replay(&mut ctx, &workload).is_err());
    }

    #[test]
    fn test_missing_file_is_a_replay_error() {
        let workload = Workload::from_path(Path::new("/nonexistent/script.trace"));
        let target = ImageTarget::new();
        let mut surface = target
            .create_surface(crate::target::Content::ColorAlpha, 1, 1)
            .unwrap();
        let mut ctx = ReplayContext::new(surface.as_mut(), &target);

        let mut engine = ScriptEngine::new();
        assert!(engine.replay(&mut ctx, &workload).is_err());
    }

    #[test]
    fn test_similar_routes_through_target_family() {
        let (_dir, workload) = workload_with("similar 8 8\n");
        let target = ImageTarget::new();
        let mut surface = target
            .create_surface(crate::target::Content::ColorAlpha, 1, 1)
            .unwrap();
        let mut ctx = ReplayContext::new(surface.as_mut(), &target);

        let sub = ctx
            .create_similar(crate::target::Content::ColorAlpha, 8, 8)
            .unwrap();
        assert_eq!(sub.width(), 8);

        let mut engine = ScriptEngine::new();
        engine.replay(&mut ctx, &workload).unwrap();
    }
}

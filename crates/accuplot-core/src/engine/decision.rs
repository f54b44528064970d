//! Replot Decision Engine.
//!
//! Para cada entrada, en orden:
//! 1. sin outputs ⇒ skip (`NoOutputs`), nunca es elegible;
//! 2. `force` ⇒ render;
//! 3. id ausente del store ⇒ render (`FirstSeen`);
//! 4. fingerprint distinto ⇒ render (`ConfigChanged`);
//! 5. si no ⇒ skip (`Unchanged`).
//!
//! `force` se activa si el renderer es más nuevo que el `last_modified` del
//! store: un cambio de dibujado invalida todos los plots aunque ninguna
//! configuración haya cambiado.
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;

use crate::model::{Fingerprints, PlotEntry};
use crate::store::HashRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReplotReason {
    Forced,
    FirstSeen,
    ConfigChanged,
    Unchanged,
    NoOutputs,
}

impl ReplotReason {
    pub fn renders(self) -> bool {
        matches!(self, Self::Forced | Self::FirstSeen | Self::ConfigChanged)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Forced => "forced",
            Self::FirstSeen => "new",
            Self::ConfigChanged => "config changed",
            Self::Unchanged => "unchanged",
            Self::NoOutputs => "no outputs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub id: String,
    pub reason: ReplotReason,
}

/// Partición estática de las entradas, calculada antes de renderizar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplotPlan {
    pub render: Vec<Decision>,
    pub skip: Vec<Decision>,
    pub forced: bool,
}

impl ReplotPlan {
    pub fn reason(&self, id: &str) -> Option<ReplotReason> {
        self.render.iter().chain(&self.skip).find(|d| d.id == id).map(|d| d.reason)
    }

    pub fn renders(&self, id: &str) -> bool {
        self.render.iter().any(|d| d.id == id)
    }

    pub fn skips(&self, id: &str) -> bool {
        self.skip.iter().any(|d| d.id == id)
    }
}

/// `true` si el renderer cambió después de la última escritura del store.
pub fn should_force(renderer_mtime: Option<DateTime<Utc>>, last_modified: DateTime<Utc>) -> bool {
    renderer_mtime.is_some_and(|m| m > last_modified)
}

pub fn decide(entries: &[PlotEntry],
              current: &Fingerprints,
              stored: &HashRecord,
              renderer_mtime: Option<DateTime<Utc>>,
              force: bool)
              -> ReplotPlan {
    let forced = force || should_force(renderer_mtime, stored.last_modified);
    let mut plan = ReplotPlan { forced, ..ReplotPlan::default() };

    for entry in entries {
        let reason = if !entry.is_renderable() {
            ReplotReason::NoOutputs
        } else if forced {
            ReplotReason::Forced
        } else if !stored.contains(&entry.id) {
            ReplotReason::FirstSeen
        } else {
            match current.get(&entry.id) {
                Some(fp) if stored.matches(&entry.id, fp) => ReplotReason::Unchanged,
                _ => ReplotReason::ConfigChanged,
            }
        };
        let decision = Decision { id: entry.id.clone(), reason };
        if reason.renders() {
            plan.render.push(decision);
        } else {
            plan.skip.push(decision);
        }
    }
    plan
}

/// Modificación más reciente entre los archivos de los que depende el
/// renderer. Rutas ilegibles se ignoran con un warning.
pub fn newest_mtime(paths: &[PathBuf]) -> Option<DateTime<Utc>> {
    paths.iter()
         .filter_map(|p| match fs::metadata(p).and_then(|m| m.modified()) {
             Ok(t) => Some(DateTime::<Utc>::from(t)),
             Err(e) => {
                 warn!("cannot stat renderer source {}: {e}", p.display());
                 None
             }
         })
         .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fingerprint_all;
    use chrono::Duration;
    use serde_json::json;

    fn entries() -> Vec<PlotEntry> {
        ["a", "b", "c"].iter()
                       .map(|id| {
                           serde_json::from_value(json!({
                               "id": id, "data": format!("{id}.csv"), "xname": "base_x",
                               "ynames": [["max_ulp_error", "(max)", "-"]], "outputs": [format!("{id}.svg")]
                           })).unwrap()
                       })
                       .collect()
    }

    fn stored_from(current: &Fingerprints) -> HashRecord {
        let mut r = HashRecord::from_fingerprints(current);
        r.last_modified = Utc::now();
        r
    }

    #[test]
    fn first_run_renders_everything() {
        let es = entries();
        let current = fingerprint_all(&es);
        let plan = decide(&es, &current, &HashRecord::empty(), None, false);
        assert_eq!(plan.render.len(), 3);
        assert!(plan.render.iter().all(|d| d.reason == ReplotReason::FirstSeen));
        assert!(!plan.forced);
    }

    #[test]
    fn unchanged_entries_are_skipped() {
        let es = entries();
        let current = fingerprint_all(&es);
        let stored = stored_from(&current);
        let plan = decide(&es, &current, &stored, None, false);
        assert!(plan.render.is_empty());
        assert_eq!(plan.skip.len(), 3);
        assert_eq!(plan.reason("b"), Some(ReplotReason::Unchanged));
    }

    #[test]
    fn changed_entry_only_is_rendered() {
        let mut es = entries();
        let stored = stored_from(&fingerprint_all(&es));
        es[1].params.xscale = crate::model::ScaleKind::Linear;
        let current = fingerprint_all(&es);
        let plan = decide(&es, &current, &stored, None, false);
        assert_eq!(plan.render, vec![Decision { id: "b".into(), reason: ReplotReason::ConfigChanged }]);
        assert!(plan.skips("a") && plan.skips("c"));
    }

    #[test]
    fn newer_renderer_forces_full_replot() {
        let es = entries();
        let current = fingerprint_all(&es);
        let stored = stored_from(&current);
        let newer = stored.last_modified + Duration::seconds(5);
        let plan = decide(&es, &current, &stored, Some(newer), false);
        assert!(plan.forced);
        assert_eq!(plan.render.len(), 3);
        assert!(plan.render.iter().all(|d| d.reason == ReplotReason::Forced));

        let older = stored.last_modified - Duration::seconds(5);
        assert!(decide(&es, &current, &stored, Some(older), false).render.is_empty());
        assert_eq!(decide(&es, &current, &stored, None, true).render.len(), 3);
    }

    #[test]
    fn entries_without_outputs_never_render() {
        let mut es = entries();
        es[0].outputs.clear();
        let current = fingerprint_all(&es);
        let plan = decide(&es, &current, &HashRecord::empty(), None, true);
        assert_eq!(plan.reason("a"), Some(ReplotReason::NoOutputs));
        assert_eq!(plan.render.len(), 2);
    }

    #[test]
    fn newest_mtime_ignores_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let f = dir.path().join("renderer.bin");
        std::fs::write(&f, b"x").unwrap();
        let missing = dir.path().join("nope");
        assert!(newest_mtime(&[missing.clone(), f]).is_some());
        assert!(newest_mtime(&[missing]).is_none());
        assert!(!should_force(None, HashRecord::empty().last_modified));
    }
}

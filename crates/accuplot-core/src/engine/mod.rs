//! Motor de replot: decisión skip/render, despacho al renderer y sesión
//! completa (carga store → decide → render → persiste).

pub mod collaborators;
pub mod decision;
pub mod dispatch;
pub mod session;

pub use collaborators::{DataSource, Renderer};
pub use decision::{decide, newest_mtime, should_force, Decision, ReplotPlan, ReplotReason};
pub use dispatch::{DispatchReport, EntryOutcome, RenderDispatcher};
pub use session::{persisted_record, CurrentState, ReplotSession, RunSummary, SessionOptions};

// ABOUTME: Core domain types for factory: spec summaries, growth plans, simulations, deployments.
// ABOUTME: Also holds the static fallback payloads, the app template catalog, views, and the in-memory store.

pub mod model;
pub mod store;
pub mod templates;
pub mod views;

pub use model::{
    DataContracts, Deployment, Desire, Entity, GrowthPlan, Identity, Interface, Morph,
    NormalizedSpec, Pipeline, Simulation, SimulationDiff, SpecSummary, Workflows, new_id,
};
pub use store::{PlanRecord, SpecRecord, Store};
pub use templates::{AppTemplate, get_template, list_templates};
pub use views::{
    BoardColumns, MindmapBranch, RenderMode, RenderView, TimelineEntry, lineage_timeline,
};

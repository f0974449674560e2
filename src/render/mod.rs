//! Export rendering.
//!
//! A [`plan::ExportSnapshot`] is laid out into an [`plan::ExportPlan`] of draw
//! ops in output pixels, which [`cpu::CpuRasterizer`] executes.
//! [`compositor::Compositor`] ties both to thumbnail loading.

pub mod compositor;
pub mod cpu;
pub mod plan;

//! Read-only view of the mesh-network tracker's persisted queue.

pub mod queue;

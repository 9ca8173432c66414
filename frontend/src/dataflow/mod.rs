//! Dataflow primitives the dashboard state is built from
//!
//! Every piece of mutable dashboard state lives inside an Actor whose
//! processing loop is the only writer. Inputs reach the loop through
//! Relays (user or collaborator events) or through another Actor's signal.
//!
//! # Core Components
//!
//! - **[`Relay`]** - Typed event channel into an Actor loop
//! - **[`Actor`]** - Single-value state container
//! - **[`ActorVec`]** - Collection state container
//! - **[`Task`]** / **[`TaskHandle`]** - Spawned work cancelled when its handle drops
//!
//! # Conventions
//!
//! 1. **Event-Source Naming** - Relays follow `{source}_{event}_relay`
//! 2. **No Direct Access** - State is read through signals, never `.get()`
//! 3. **Owned Timers** - Recurring work is a `TaskHandle` stored by its owner

pub mod actor;
pub mod actor_vec;
pub mod relay;
pub mod task;

pub use actor::Actor;
pub use actor_vec::{ActorVec, ActorVecHandle};
pub use relay::{Relay, relay};
pub use task::{Task, TaskHandle};

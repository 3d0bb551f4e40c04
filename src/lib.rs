//! # smg-rs: a state machine compiler core
//!
//! **`smg-rs`** turns a declarative model of a state machine (state variables, event
//! triggers and guarded effects) into straight-line event handlers. Every handler reads the
//! current state, applies the transitions of the event and fires the effects of all guards
//! the transition activates, with common subexpressions evaluated only once.
//!
//! ## How it works
//!
//! Conditions are boolean expressions over *elementary conditions* such as `s(b)`
//! ("variable `s` is in state `b`"). They are kept as gates in canonical sum-of-products
//! form, hash-consed by a scoped cache, so equal conditions share one handle.
//!
//! 1. The [`StateMachine`][crate::machine::StateMachine] model splits every trigger into
//!    product triggers with an exact pre-state and rejects ambiguous transitions.
//! 2. [`calculate`][crate::machine::StateMachine::calculate] relates every product trigger
//!    to the guards it activates and collects the effects of each event.
//! 3. The [`CodeGenerator`][crate::generate::CodeGenerator] schedules all conditions of an
//!    event as code labels in two stages (before and after the transition) and drives an
//!    [`Emitter`][crate::emit::Emitter] that writes the target code.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All gate operations go through the
//!   [`Algebra`][crate::algebra::Algebra] manager, which keeps every gate canonical.
//! - **Scoped Caching**: Per-event gates live in a cache scope and are discarded with it.
//! - **Target Independence**: Code is written through a small callback protocol, any
//!   emitter implementing it can be substituted.
//!
//! ## Basic Usage
//!
//! ```rust
//! use smg_rs::effect::Effect;
//! use smg_rs::generate::generate;
//! use smg_rs::machine::StateMachine;
//! use smg_rs::pseudo::PseudoCode;
//! use smg_rs::trigger::GuardKind;
//!
//! let mut sm = StateMachine::new();
//! sm.add_simple_type("Door", &["open", "closed"])?;
//! let door = sm.state_type("Door")?;
//! sm.add_variable("door", door)?;
//!
//! // door(open => closed) on event `close`
//! let close = sm.transition_condition("door", &["open"], &["closed"])?;
//! sm.add_trigger("close", close, vec![])?;
//!
//! // call `lock` whenever the door becomes closed
//! let closed = sm.state_condition("door", &["closed"])?;
//! sm.add_guard(closed, Some(GuardKind::Enter), None, vec![Effect::Call("lock".into())])?;
//!
//! let mut out = PseudoCode::new();
//! generate(&mut sm, &mut out)?;
//! assert!(out.as_str().contains("CALL lock"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`algebra`]**: The gate manager: composition, simplification and projection.
//! - **[`machine`]**: The model, triggers and guards, and the ambiguity checks.
//! - **[`dependency`]** and **[`effect`]**: Trigger-guard relations and effect collection.
//! - **[`label`]** and **[`generate`]**: Two-stage label scheduling and handler generation.
//! - **[`emit`]** and **[`pseudo`]**: The emission protocol and a reference target.

pub mod algebra;
pub mod bitset;
pub mod cache;
pub mod condition;
pub mod debug;
pub mod dependency;
pub mod effect;
pub mod emit;
pub mod error;
pub mod eval;
pub mod gate;
pub mod generate;
pub mod label;
pub mod machine;
pub mod options;
pub mod product;
pub mod pseudo;
pub mod reference;
pub mod sat;
pub mod transition;
pub mod trigger;
pub mod types;
pub mod variable;

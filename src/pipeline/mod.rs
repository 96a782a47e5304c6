//! Pipeline stages for report generation.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and keeps the order-sensitive
//! rule tables (cleaning, classification) isolated from orchestration.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ clean ──▶ classify ──▶ corpus ──▶ summarize
//! (lopdf)    (rules)   (category)   (insumo)   (LLM | local)
//! ```
//!
//! 1. [`extract`]   — per-page text from PDF bytes; per-file failures become
//!    placeholders, never batch aborts
//! 2. [`clean`]     — ordered removal/normalization rules; pure, total,
//!    idempotent
//! 3. [`classify`]  — first-match-wins specialty table; total (falls back to
//!    OTROS)
//! 4. [`corpus`]    — category-grouped consolidation in first-seen order
//! 5. [`summarize`] — path policy (LLM vs. local), the only stage with
//!    network I/O

pub mod classify;
pub mod clean;
pub mod corpus;
pub mod extract;
pub mod summarize;

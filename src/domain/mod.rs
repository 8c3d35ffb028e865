//! Domain models - core gate monitoring types
//!
//! This module contains the canonical data types used throughout the system:
//! - `GateId` - stable hardware address identifying a timing gate
//! - `RawObservation` - one gate reading from a polling cycle
//! - `GateView` - ordered, annotated view row with derived metrics
//! - `SequenceDelta` / `SequenceStats` - selection timing analysis
//! - `ActivityClass` / `ActivityThresholds` - freshness classification
//! - `GatesResponse` / `WireGate` - device wire format

pub mod types;

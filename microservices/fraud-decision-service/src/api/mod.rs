//! HTTP API surface (spec §6): decision, health, policy and
//! chargeback/refund ingestion endpoints.

pub mod rest;

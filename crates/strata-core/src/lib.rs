//! Strata Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Strata schema
//! dependency tooling. It includes:
//!
//! - **Identifiers**: Interned type and resource names ([`identifier::Id`])
//! - **Vocabulary**: Scalar type names and marker interfaces ([`vocabulary::Vocabulary`])

pub mod identifier;
pub mod vocabulary;

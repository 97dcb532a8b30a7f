//! Gerenuk library main entry point.
//!
//! Gerenuk computes, for a genomic variant overlapping one or more gene models,
//! the Sequence Ontology consequence terms per transcript and the HGVS
//! nomenclature strings at the cDNA and protein level.  The crate is a pure
//! computation engine; persistence of gene models and genome sequence is left
//! to the two collaborator traits in [`provider`].

pub mod annotate;
pub mod common;
pub mod model;
pub mod provider;

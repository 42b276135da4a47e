//! Track circuit catalogue.

use crate::domain::store::{Exportable, Importable, Resource, ResourceStore};
use crate::domain::{Circuit, CircuitDraft};

/// `circuits/` collection.
#[derive(Debug, Clone, Copy)]
pub struct Circuits;

impl Resource for Circuits {
    type Entity = Circuit;
    type Draft = CircuitDraft;
    const PATH: &'static str = "circuits/";
    const NOUN: &'static str = "circuit";
    const PLURAL: &'static str = "circuits";
    const TITLE: &'static str = "Circuit";
}

impl Importable for Circuits {
    const IMPORT_PATH: &'static str = "circuits/import_from_excel/";
}

impl Exportable for Circuits {
    const EXPORT_PATH: &'static str = "circuits/export_to_excel/";
    const EXPORT_FILE_NAME: &'static str = "circuits_export.xlsx";
}

/// Circuit list plus import/export.
pub type CircuitStore<T, N> = ResourceStore<Circuits, T, N>;

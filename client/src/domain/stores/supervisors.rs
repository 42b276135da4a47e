//! Supervisors and their jurisdictions.

use crate::domain::store::{Exportable, Importable, Resource, ResourceStore};
use crate::domain::{Supervisor, SupervisorDraft};

/// `supervisors/` collection.
#[derive(Debug, Clone, Copy)]
pub struct Supervisors;

impl Resource for Supervisors {
    type Entity = Supervisor;
    type Draft = SupervisorDraft;
    const PATH: &'static str = "supervisors/";
    const NOUN: &'static str = "supervisor";
    const PLURAL: &'static str = "supervisors";
    const TITLE: &'static str = "Supervisor";
}

impl Importable for Supervisors {
    const IMPORT_PATH: &'static str = "supervisors/import_from_excel/";
}

impl Exportable for Supervisors {
    const EXPORT_PATH: &'static str = "supervisors/export_to_excel/";
    const EXPORT_FILE_NAME: &'static str = "supervisors_export.xlsx";
}

/// Supervisor list plus import/export.
pub type SupervisorStore<T, N> = ResourceStore<Supervisors, T, N>;

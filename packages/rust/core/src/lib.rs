//! ReST writers for the documentation build.
//!
//! Each writer implements [`RstWriter`] and receives its collaborators
//! (module catalog, corpus documenter, notebook source and converter)
//! explicitly, so the transformation logic is testable without a real
//! introspection step or converter installed.

pub mod corpus;
pub mod modules;
pub mod notebook;
mod walk;
pub mod writer;

pub use corpus::{CorpusDirectoryDocumenter, CorpusDocumenter, CorpusReferenceWriter};
pub use modules::{JsonModuleCatalog, ModuleCatalog, ModuleReferenceWriter};
pub use notebook::{
    CommandConverter, NotebookConverter, NotebookDirectory, NotebookPaths, NotebookSource,
    NotebookWriter, convert_one,
};
pub use writer::{RstWriter, SilentReporter, WriteReporter, write_and_report, write_if_changed};

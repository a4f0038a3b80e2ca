//! Bulk directory population from many documents.

use rayon::prelude::*;
use tracing::debug;

use crate::document::PatchDocument;
use crate::symbols::SymbolDirectory;

/// One document to harvest records from.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    /// File identifier recorded into record locations.
    pub path: String,
    /// Full document text.
    pub text: String,
    /// Mod the document belongs to, stamped onto its records.
    pub origin: Option<String>,
}

/// Parse `sources` and merge their records into `directory`.
///
/// Parsing runs in parallel; merging is sequential in the order given,
/// which is the load order — later sources override earlier ones.
/// Unparsable documents are skipped. Returns the number of records
/// merged.
pub fn populate_directory(directory: &mut SymbolDirectory, sources: &[DocumentSource]) -> usize {
    let parsed: Vec<Option<PatchDocument>> = sources
        .par_iter()
        .map(
            |source| match PatchDocument::parse_fast(&source.text, Some(&source.path)) {
                Ok(doc) => Some(doc),
                Err(err) => {
                    debug!(path = %source.path, error = %err, "skipping unparsable document");
                    None
                }
            },
        )
        .collect();

    let mut merged = 0;
    for (source, doc) in sources.iter().zip(parsed) {
        let Some(doc) = doc else { continue };
        merged += doc.records().len();
        doc.merge_into(directory, source.origin.as_deref());
    }

    debug!(merged, total = directory.len(), "directory populated");
    merged
}

use lopdf::{dictionary, Document, Object, ObjectId};
use std::path::{Path, PathBuf};

use crate::error::{ConversionError, ConversionResult};
use crate::pdf::load_document;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Copy inherited page-tree attributes onto the page itself so it can be
/// re-parented without losing them.
pub(crate) fn flatten_inherited_attributes(
    doc: &mut Document,
    page_id: ObjectId,
) -> ConversionResult<()> {
    let page = doc.get_dictionary(page_id)?;
    let mut missing: Vec<&[u8]> = INHERITABLE_ATTRIBUTES
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    let mut inherited = Vec::new();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        if missing.is_empty() || depth > 64 {
            break;
        }
        let node = doc.get_dictionary(parent_id)?;
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    Ok(())
}

/// Concatenate the pages of `inputs`, in order, into one document.
pub fn merge_documents(documents: Vec<Document>) -> ConversionResult<Document> {
    if documents.len() < 2 {
        return Err(ConversionError::InvalidParameter(
            "At least two PDF files are required to merge".to_string(),
        ));
    }

    let mut merged = Document::with_version("1.5");
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut max_id = 1;

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        // get_pages is keyed by page number, so values come out in page order
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for page_id in &pages {
            flatten_inherited_attributes(&mut doc, *page_id)?;
        }
        page_ids.extend(pages);
        merged.objects.extend(doc.objects);
    }

    merged.max_id = max_id;
    let pages_id = merged.new_object_id();

    for page_id in &page_ids {
        let page = merged.get_object_mut(*page_id)?.as_dict_mut()?;
        page.set("Parent", pages_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);

    // The source catalogs and page trees are now unreachable
    merged.prune_objects();
    merged.compress();

    Ok(merged)
}

/// Merge the PDFs at `inputs` into `output`. Returns the merged page count.
pub fn merge_pdfs(inputs: &[PathBuf], output: &Path) -> ConversionResult<usize> {
    let documents = inputs
        .iter()
        .map(|path| load_document(path))
        .collect::<ConversionResult<Vec<_>>>()?;

    let mut merged = merge_documents(documents)?;
    let pages = merged.get_pages().len();
    merged.save(output)?;

    tracing::debug!(inputs = inputs.len(), pages, "Merged PDFs");
    Ok(pages)
}

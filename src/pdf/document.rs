use std::collections::{BTreeMap, BTreeSet};

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use super::Rotation;
use crate::error::{Error, Result};
use crate::upload::Upload;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic /Parent chains in broken files
const MAX_TREE_DEPTH: usize = 64;

pub struct PdfDocument {
    pub doc: Document,
    pub name: String,
}

impl PdfDocument {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        let doc = Document::load_mem(bytes).map_err(|source| Error::Unreadable {
            name: name.clone(),
            source,
        })?;
        Ok(PdfDocument { doc, name })
    }

    pub fn from_upload(upload: &Upload) -> Result<Self> {
        Self::from_bytes(upload.name.as_str(), &upload.bytes)
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        self.doc.get_pages().into_iter().collect()
    }

    /// Build a new document containing exactly the given zero-based pages,
    /// in the order given.
    ///
    /// Only the selected pages and the objects they reference are copied. The
    /// source catalog (outlines, named destinations, forms) is left behind, and
    /// link annotations that jump to an unselected page are dropped, so no
    /// other page can be pulled into the result.
    pub fn select_pages(&self, indices: &[u32]) -> Result<Document> {
        let all_pages = self.page_ids();
        let total = all_pages.len();

        let mut selected = Vec::with_capacity(indices.len());
        for &index in indices {
            let (_, id) = all_pages.get(index as usize).ok_or_else(|| {
                Error::validation(format!("Page {} is out of range (1-{})", index + 1, total))
            })?;
            selected.push(*id);
        }

        let every_page: BTreeSet<ObjectId> = all_pages.iter().map(|&(_, id)| id).collect();
        let keep: BTreeSet<ObjectId> = selected.iter().copied().collect();

        let mut new_doc = Document::with_version(self.doc.version.as_str());
        let mut pending = Vec::new();
        for &page_id in &selected {
            let mut page = self.doc.get_dictionary(page_id)?.clone();
            for key in INHERITABLE {
                if page.has(key) {
                    continue;
                }
                if let Some(value) = inherited_value(&self.doc, page_id, key)? {
                    page.set(key.to_vec(), value);
                }
            }
            page.remove(b"Parent");
            drop_foreign_links(&self.doc, &mut page, &every_page, &keep);

            page.iter()
                .for_each(|(_, value)| collect_references(value, &mut pending));
            new_doc.objects.insert(page_id, Object::Dictionary(page));
        }

        // Pages keep their source IDs, so copied objects need no renumbering
        while let Some(id) = pending.pop() {
            if new_doc.objects.contains_key(&id) || every_page.contains(&id) {
                continue;
            }
            let Ok(object) = self.doc.get_object(id) else {
                continue;
            };
            if is_structural(object) {
                continue;
            }
            collect_references(object, &mut pending);
            new_doc.objects.insert(id, object.clone());
        }
        new_doc.max_id = self.doc.max_id;

        let pages_id = new_doc.new_object_id();
        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", selected.len() as i64);
        pages.set("Kids", references(&selected));

        let catalog_id = new_doc.new_object_id();
        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", pages_id);

        new_doc.objects.insert(pages_id, Object::Dictionary(pages));
        new_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        new_doc.trailer.set("Root", catalog_id);

        for &page_id in &selected {
            new_doc.get_dictionary_mut(page_id)?.set("Parent", pages_id);
        }

        debug!(
            source = %self.name,
            pages = selected.len(),
            objects = new_doc.objects.len(),
            "selected pages"
        );
        Ok(new_doc)
    }

    /// Rotate every page clockwise, on top of any rotation it already has
    pub fn rotate(&mut self, rotation: Rotation) -> Result<()> {
        for (_, page_id) in self.page_ids() {
            let current = match inherited_value(&self.doc, page_id, b"Rotate")? {
                Some(Object::Integer(n)) => n,
                Some(Object::Real(r)) => r as i64,
                _ => 0,
            };
            self.doc
                .get_dictionary_mut(page_id)?
                .set("Rotate", rotation.apply_to(current));
        }
        Ok(())
    }

    /// Drop unreachable objects and empty streams, then Flate-compress streams
    pub fn compress(&mut self) {
        let pruned = self.doc.prune_objects();
        let empty = self.doc.delete_zero_length_streams();
        self.doc.compress();
        debug!(
            source = %self.name,
            pruned = pruned.len(),
            empty_streams = empty.len(),
            "compressed document"
        );
    }

    /// Serialize to PDF bytes
    pub fn to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

/// Concatenate the pages of several documents, in order, into a new one.
///
/// Each document's objects are renumbered into a disjoint ID range and a new
/// catalog and page tree are built on top of them.
pub fn merge(documents: Vec<PdfDocument>) -> Result<Document> {
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for PdfDocument { mut doc, name } in documents {
        // The source page trees are dropped, so pages must carry what they inherit
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        flatten_inherited(&mut doc, &pages)?;

        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let pages = doc.get_pages();
        debug!(source = %name, pages = pages.len(), "merging document");
        page_ids.extend(pages.into_values());
        objects.extend(doc.objects);
    }

    let mut merged = Document::with_version("1.5");
    merged.objects.extend(objects);
    // new_object_id() must hand out IDs above everything just inserted
    merged.max_id = max_id - 1;

    let pages_id = merged.new_object_id();
    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", page_ids.len() as i64);
    pages.set("Kids", references(&page_ids));

    let catalog_id = merged.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", pages_id);

    merged.objects.insert(pages_id, Object::Dictionary(pages));
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged.trailer.set("Root", catalog_id);

    for &page_id in &page_ids {
        merged.get_dictionary_mut(page_id)?.set("Parent", pages_id);
    }

    // Old catalogs and page tree nodes are no longer reachable
    merged.prune_objects();
    Ok(merged)
}

fn references(ids: &[ObjectId]) -> Vec<Object> {
    ids.iter().map(|&id| Object::Reference(id)).collect()
}

/// Push every indirect reference found in `object` onto `out`
fn collect_references(object: &Object, out: &mut Vec<ObjectId>) {
    match object {
        Object::Reference(id) => out.push(*id),
        Object::Array(items) => items.iter().for_each(|item| collect_references(item, out)),
        Object::Dictionary(dict) => dict.iter().for_each(|(_, value)| collect_references(value, out)),
        Object::Stream(stream) => stream
            .dict
            .iter()
            .for_each(|(_, value)| collect_references(value, out)),
        _ => {}
    }
}

/// Catalogs and page tree nodes belong to the source document's structure
fn is_structural(object: &Object) -> bool {
    let Ok(dict) = object.as_dict() else {
        return false;
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Catalog") | Ok(b"Pages")
    )
}

fn resolve_object<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// Remove annotations whose destination is a page outside `keep`
fn drop_foreign_links(
    doc: &Document,
    page: &mut Dictionary,
    every_page: &BTreeSet<ObjectId>,
    keep: &BTreeSet<ObjectId>,
) {
    let Ok(annots) = page.get(b"Annots") else {
        return;
    };
    let Ok(annots) = resolve_object(doc, annots).as_array() else {
        return;
    };

    let targets_foreign_page = |annot: &Object| -> bool {
        let Ok(annot) = resolve_object(doc, annot).as_dict() else {
            return false;
        };
        let dest = annot.get(b"Dest").ok().or_else(|| {
            let action = resolve_object(doc, annot.get(b"A").ok()?).as_dict().ok()?;
            action.get(b"D").ok()
        });
        let Some(Ok(dest)) = dest.map(|d| resolve_object(doc, d).as_array()) else {
            return false;
        };
        matches!(dest.first(), Some(Object::Reference(id)) if every_page.contains(id) && !keep.contains(id))
    };

    let kept: Vec<Object> = annots
        .iter()
        .filter(|annot| !targets_foreign_page(annot))
        .cloned()
        .collect();
    if kept.len() != annots.len() {
        page.set("Annots", kept);
    }
}

/// Copy inheritable attributes from ancestors onto each page that lacks them
fn flatten_inherited(doc: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    for &page_id in page_ids {
        let mut inherited = Vec::new();
        for key in INHERITABLE {
            if doc.get_dictionary(page_id)?.has(key) {
                continue;
            }
            if let Some(value) = inherited_value(doc, page_id, key)? {
                inherited.push((key.to_vec(), value));
            }
        }

        let page = doc.get_dictionary_mut(page_id)?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }
    Ok(())
}

/// Look up `key` on a page, walking up /Parent links until it is found
fn inherited_value(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
    let mut node = doc.get_dictionary(page_id)?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Ok(Some(value.clone()));
        }
        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => node = doc.get_dictionary(parent)?,
            Err(_) => break,
        }
    }
    Ok(None)
}

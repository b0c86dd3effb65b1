//! Annotation store: ordered annotations plus a single selection
//!
//! Creation order is z-order: later entries are drawn on top and are
//! hit-tested first. The selection is an [`AnnotationId`] looked up in the
//! store, never a copy, so moving the selection moves the stored element.

use serde::Serialize;

use super::hit_testing::{HitParams, TextMeasure, hit_test};
use crate::config::AnnotationColor;
use crate::domain::{Annotation, AnnotationId, AnnotationKind, Point};
use crate::error::EditorError;

#[derive(Clone, Debug, PartialEq)]
struct Entry {
    id: AnnotationId,
    annotation: Annotation,
}

/// One row of the annotation list shown next to the canvas
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnnotationSummary {
    #[serde(skip)]
    pub id: AnnotationId,
    pub index: usize,
    pub kind: AnnotationKind,
    pub color: AnnotationColor,
    /// Measurement label for labelled measurements, otherwise the kind name
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    entries: Vec<Entry>,
    selected: Option<AnnotationId>,
    next_id: u64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Annotations in creation order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (AnnotationId, &Annotation)> {
        self.entries.iter().map(|e| (e.id, &e.annotation))
    }

    pub fn annotations(&self) -> impl DoubleEndedIterator<Item = &Annotation> {
        self.entries.iter().map(|e| &e.annotation)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.annotation)
    }

    pub fn index_of(&self, id: AnnotationId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<AnnotationId> {
        self.entries.get(index).map(|e| e.id)
    }

    /// Append an annotation on top of all others
    pub fn append(&mut self, annotation: Annotation) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        log::debug!("Appending {} annotation {:?}", annotation.kind().name(), id);
        self.entries.push(Entry { id, annotation });
        id
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Select an annotation, or clear the selection with `None`.
    ///
    /// Returns false (and clears the selection) if the id is not stored.
    pub fn select(&mut self, id: Option<AnnotationId>) -> bool {
        match id {
            Some(id) if self.index_of(id).is_some() => {
                self.selected = Some(id);
                true
            }
            Some(_) => {
                self.selected = None;
                false
            }
            None => {
                self.selected = None;
                true
            }
        }
    }

    /// Select the annotation at a list position
    pub fn select_index(&mut self, index: usize) -> Option<AnnotationId> {
        let id = self.id_at(index);
        self.selected = id;
        id
    }

    /// Translate the selected annotation by an offset
    pub fn move_selected(&mut self, dx: f32, dy: f32) -> Result<(), EditorError> {
        let id = self.selected.ok_or(EditorError::EmptySelection)?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(EditorError::EmptySelection)?;
        entry.annotation.translate(dx, dy);
        Ok(())
    }

    /// Remove the annotation at a list position. Any selection is cleared.
    pub fn delete_at(&mut self, index: usize) -> Option<Annotation> {
        if index >= self.entries.len() {
            return None;
        }
        self.selected = None;
        Some(self.entries.remove(index).annotation)
    }

    /// Remove the selected annotation
    pub fn delete_selected(&mut self) -> Result<Annotation, EditorError> {
        let index = self
            .selected
            .and_then(|id| self.index_of(id))
            .ok_or(EditorError::EmptySelection)?;
        self.delete_at(index).ok_or(EditorError::EmptySelection)
    }

    /// Remove the most recently appended annotation
    pub fn undo(&mut self) -> Result<Annotation, EditorError> {
        let entry = self.entries.pop().ok_or(EditorError::EmptyStore)?;
        self.selected = None;
        Ok(entry.annotation)
    }

    /// Remove every annotation. Callers gate this behind a confirmation.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.selected = None;
        count
    }

    /// Topmost annotation under a point
    pub fn find_at(
        &self,
        point: Point,
        params: &HitParams,
        measure: &dyn TextMeasure,
    ) -> Option<AnnotationId> {
        self.entries
            .iter()
            .rev()
            .find(|e| hit_test(point, &e.annotation, params, measure))
            .map(|e| e.id)
    }

    /// List rows in creation order
    pub fn summaries(&self) -> Vec<AnnotationSummary> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, e)| AnnotationSummary {
                id: e.id,
                index,
                kind: e.annotation.kind(),
                color: e.annotation.color(),
                label: e.annotation.summary_label(),
                selected: self.selected == Some(e.id),
            })
            .collect()
    }
}
